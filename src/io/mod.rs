//! IO modules - external system interfaces
//!
//! - `source` - Dataset retrieval (`DataSource` trait, HTTP implementation)
//! - `egress` - Report output to stdout or a JSON file
//! - `fixture_server` - Local HTTP server serving dataset files

pub mod egress;
pub mod fixture_server;
pub mod source;

// Re-export commonly used types
pub use egress::{print_report, write_report_file};
pub use fixture_server::{serve_fixtures, Fixtures};
pub use source::{load_datasets, DataSource, Datasets, HttpSource};
