//! Unique visitor counts per venue
//!
//! A session visits a venue if any single sample of its path is within
//! proximity of the venue. No minimum dwell is required here.

use crate::domain::types::{UserSession, Venue};
use crate::infra::error::AnalysisError;
use crate::services::proximity::was_visit;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use tracing::debug;

/// Sessions with at least one sample at `venue`
pub fn visiting_sessions<'a>(
    sessions: &'a [UserSession],
    venue: &'a Venue,
) -> impl Iterator<Item = &'a UserSession> + 'a {
    sessions
        .iter()
        .filter(move |s| s.path.iter().any(|p| was_visit(&p.position, &venue.position)))
}

/// Distinct user ids visiting `venue`, in first-seen order
pub fn unique_visitors<'a>(sessions: &'a [UserSession], venue: &'a Venue) -> Vec<&'a str> {
    let mut seen = FxHashSet::default();
    visiting_sessions(sessions, venue)
        .map(|s| s.user_id.as_str())
        .filter(|user_id| seen.insert(*user_id))
        .collect()
}

/// Find a venue by exact match on its trimmed name
pub fn find_venue<'a>(venues: &'a [Venue], name: &str) -> Result<&'a Venue, AnalysisError> {
    let wanted = name.trim();
    venues
        .iter()
        .find(|v| v.trimmed_name() == wanted)
        .ok_or_else(|| AnalysisError::venue_not_found(wanted))
}

/// Number of distinct users who visited the venue called `name`
pub fn named_venue_visitors(
    sessions: &[UserSession],
    venues: &[Venue],
    name: &str,
) -> Result<usize, AnalysisError> {
    let venue = find_venue(venues, name)?;
    let count = unique_visitors(sessions, venue).len();
    debug!(venue = %venue.name, visitors = %count, "named_venue_visitors");
    Ok(count)
}

/// Distinct visitor count for every gate venue, keyed by venue name
///
/// Each gate venue is counted on its own; when several share a name the
/// last one in venue order wins.
pub fn gate_visitors(sessions: &[UserSession], venues: &[Venue]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();

    for gate in venues.iter().filter(|v| v.is_gate()) {
        let count = unique_visitors(sessions, gate).len();
        if let Some(previous) = counts.insert(gate.name.clone(), count) {
            debug!(
                gate = %gate.name,
                previous = %previous,
                count = %count,
                "duplicate_gate_name_replaced"
            );
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Coordinate, SessionEvent};
    use chrono::{TimeZone, Utc};

    fn venue(name: &str, x: f64, y: f64) -> Venue {
        Venue { id: name.to_lowercase(), name: name.to_string(), position: Coordinate::new(x, y) }
    }

    fn session(user_id: &str, points: &[(f64, f64)]) -> UserSession {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        UserSession {
            user_id: user_id.to_string(),
            session_id: format!("{user_id}-session"),
            start_time_utc: None,
            end_time_utc: None,
            start_time_local: None,
            path: points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| {
                    SessionEvent::new(
                        start + chrono::Duration::seconds(i as i64 * 60),
                        Coordinate::new(x, y),
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_single_sample_counts_as_visit() {
        let ducati = venue("Ducati", 0.0, 0.0);
        let sessions = vec![session("u1", &[(50.0, 50.0), (1.0, -1.0)]), session("u2", &[(9.0, 9.0)])];

        assert_eq!(unique_visitors(&sessions, &ducati), vec!["u1"]);
    }

    #[test]
    fn test_unique_visitors_dedupes_users_in_first_seen_order() {
        let ducati = venue("Ducati", 0.0, 0.0);
        let sessions = vec![
            session("u2", &[(0.0, 0.0)]),
            session("u1", &[(1.0, 1.0)]),
            session("u2", &[(2.0, 2.0)]),
        ];

        assert_eq!(unique_visitors(&sessions, &ducati), vec!["u2", "u1"]);
    }

    #[test]
    fn test_count_invariant_under_duplicate_sessions() {
        let venues = vec![venue("Ducati", 0.0, 0.0)];
        let mut sessions = vec![session("u1", &[(0.0, 0.0)]), session("u2", &[(1.0, 0.0)])];
        let before = named_venue_visitors(&sessions, &venues, "Ducati").unwrap();

        sessions.push(sessions[0].clone());
        sessions.push(sessions[1].clone());
        let after = named_venue_visitors(&sessions, &venues, "Ducati").unwrap();

        assert_eq!(before, 2);
        assert_eq!(before, after);
    }

    #[test]
    fn test_find_venue_trims_names() {
        let venues = vec![venue("Gate 1", 5.0, 5.0), venue("  Ducati  ", 0.0, 0.0)];
        let found = find_venue(&venues, "Ducati").unwrap();
        assert_eq!(found.position, Coordinate::new(0.0, 0.0));
    }

    #[test]
    fn test_missing_named_venue_is_error() {
        let venues = vec![venue("Gate 1", 5.0, 5.0)];
        let sessions = vec![session("u1", &[(0.0, 0.0)])];

        let err = named_venue_visitors(&sessions, &venues, "Ducati").unwrap_err();
        assert!(matches!(err, AnalysisError::VenueNotFound { ref name } if name == "Ducati"));
    }

    #[test]
    fn test_gate_visitors_only_gate_venues() {
        let venues = vec![
            venue("Gate 1", 100.0, 100.0),
            venue("GATE2", 200.0, 200.0),
            venue("Gateway 1", 100.0, 100.0),
            venue("Gate 10", 100.0, 100.0),
            venue("Ducati", 0.0, 0.0),
        ];
        let sessions = vec![
            session("u1", &[(100.0, 101.0)]),
            session("u2", &[(99.0, 99.0), (201.0, 200.0)]),
            session("u1", &[(100.0, 100.0)]),
        ];

        let gates = gate_visitors(&sessions, &venues);
        assert_eq!(gates.len(), 2);
        assert_eq!(gates["Gate 1"], 2);
        assert_eq!(gates["GATE2"], 1);
    }

    #[test]
    fn test_duplicate_gate_name_last_venue_wins() {
        let venues = vec![venue("Gate 1", 0.0, 0.0), venue("Gate 1", 100.0, 100.0)];
        let sessions = vec![
            session("u1", &[(0.0, 0.0)]),
            session("u2", &[(100.0, 100.0)]),
            session("u3", &[(101.0, 99.0)]),
        ];

        let gates = gate_visitors(&sessions, &venues);
        assert_eq!(gates.len(), 1);
        assert_eq!(gates["Gate 1"], 2);

        // Reversed order keeps the venue at the origin
        let reversed: Vec<Venue> = venues.into_iter().rev().collect();
        assert_eq!(gate_visitors(&sessions, &reversed)["Gate 1"], 1);
    }

    #[test]
    fn test_gate_without_visitors_reports_zero() {
        let venues = vec![venue("Gate 3", 100.0, 100.0)];
        let sessions = vec![session("u1", &[(0.0, 0.0)])];

        assert_eq!(gate_visitors(&sessions, &venues)["Gate 3"], 0);
    }
}
