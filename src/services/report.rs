//! Report assembly - runs the three analytics over one pair of datasets

use crate::domain::report::AnalyticsReport;
use crate::domain::types::{UserSession, Venue};
use crate::infra::error::AnalysisError;
use crate::services::dwell::{time_at_venues, DwellGrouping};
use crate::services::visitors::{gate_visitors, named_venue_visitors};
use std::time::Instant;
use tracing::{error, info};

/// Default venue for the named-venue visitor metric
pub const DEFAULT_NAMED_VENUE: &str = "Ducati";

/// Knobs for a single analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub named_venue: String,
    pub dwell_grouping: DwellGrouping,
    /// Fail the run instead of reporting null when the named venue is missing
    pub require_named_venue: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            named_venue: DEFAULT_NAMED_VENUE.to_string(),
            dwell_grouping: DwellGrouping::default(),
            require_named_venue: false,
        }
    }
}

/// Compute the full report
///
/// A missing named venue only blanks that metric unless
/// `require_named_venue` is set, in which case the error is returned.
pub fn analyze(
    venues: &[Venue],
    sessions: &[UserSession],
    options: &AnalysisOptions,
) -> Result<AnalyticsReport, AnalysisError> {
    let start = Instant::now();

    let named_venue_visitors = match named_venue_visitors(sessions, venues, &options.named_venue) {
        Ok(count) => Some(count),
        Err(e) if options.require_named_venue => return Err(e),
        Err(e) => {
            error!(error = %e, venue = %options.named_venue, "named_venue_metric_skipped");
            None
        }
    };

    let gate_visitors = gate_visitors(sessions, venues);
    let dwell = time_at_venues(sessions, venues, options.dwell_grouping);

    if dwell.unterminated_hits > 0 {
        info!(
            unterminated_hits = %dwell.unterminated_hits,
            "dwell_hits_without_successor_counted_as_zero"
        );
    }

    info!(
        venues = %venues.len(),
        sessions = %sessions.len(),
        named_venue_visitors = ?named_venue_visitors,
        gates = %gate_visitors.len(),
        dwell_records = %dwell.records.len(),
        dwell_grouping = %options.dwell_grouping.as_str(),
        elapsed_us = %start.elapsed().as_micros(),
        "report_ready"
    );

    Ok(AnalyticsReport {
        named_venue_visitors,
        gate_visitors,
        time_at_venues: dwell.records,
    })
}
