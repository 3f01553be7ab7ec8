//! Analytics report - the single output of a run

use serde::Serialize;
use std::collections::BTreeMap;

/// Accumulated dwell time for one person (optionally at one venue)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DwellRecord {
    pub venue: String,
    pub person: String,
    pub seconds_at_venue: f64,
}

impl DwellRecord {
    pub fn new(venue: impl Into<String>, person: impl Into<String>, seconds_at_venue: f64) -> Self {
        Self { venue: venue.into(), person: person.into(), seconds_at_venue }
    }
}

/// Combined result of the three analytics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    /// Unique visitors at the named venue; None when that venue does not exist
    #[serde(rename = "ducatiVisitorsCount")]
    pub named_venue_visitors: Option<usize>,
    pub gate_visitors: BTreeMap<String, usize>,
    pub time_at_venues: Vec<DwellRecord>,
}
