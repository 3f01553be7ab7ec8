//! Services - the analytics themselves
//!
//! - `proximity` - whether a sample counts as being at a venue
//! - `visitors` - unique visitors for a named venue and for gate venues
//! - `dwell` - per-person time spent at venues
//! - `report` - combines the above into one `AnalyticsReport`

pub mod dwell;
pub mod proximity;
pub mod report;
pub mod visitors;

// Re-export commonly used types
pub use dwell::{time_at_venues, DwellGrouping, DwellSummary};
pub use proximity::{was_visit, PROXIMITY_TOLERANCE};
pub use report::{analyze, AnalysisOptions, DEFAULT_NAMED_VENUE};
pub use visitors::{find_venue, gate_visitors, named_venue_visitors, unique_visitors};
