//! Domain models - input datasets and the analytics report
//!
//! - `types` - `Venue`, `UserSession`, `SessionEvent`, `Coordinate`
//! - `report` - `AnalyticsReport` and `DwellRecord`

pub mod report;
pub mod types;

// Re-export commonly used types at module level
pub use report::{AnalyticsReport, DwellRecord};
pub use types::{Coordinate, SessionEvent, UserSession, Venue};
