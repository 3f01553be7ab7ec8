//! Infrastructure - configuration and error taxonomy
//!
//! - `config` - Application configuration (TOML loading, env overrides, defaults)
//! - `error` - `AnalysisError` and the `Dataset` discriminator

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::Config;
pub use error::{AnalysisError, Dataset};
