//! Dwell-time aggregation
//!
//! A hit sample's dwell is the time until the next sample of the same session
//! in chronological order, whatever venue that next sample is at. Every hit
//! contributes independently, so consecutive hits each add their own gap.
//!
//! A hit with no successor (last sample of the session) contributes zero and is
//! counted as an unterminated hit.

use crate::domain::report::DwellRecord;
use crate::domain::types::{SessionEvent, UserSession, Venue};
use crate::services::proximity::was_visit;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::collections::hash_map::Entry;
use tracing::debug;

/// How dwell contributions are folded into records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DwellGrouping {
    /// One record per (venue, person)
    #[default]
    #[value(name = "venue_person")]
    VenuePerson,
    /// One record per person summing every venue; labelled with the venue of
    /// that person's first contribution
    Person,
}

impl DwellGrouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            DwellGrouping::VenuePerson => "venue_person",
            DwellGrouping::Person => "person",
        }
    }
}

/// Result of a dwell aggregation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DwellSummary {
    pub records: Vec<DwellRecord>,
    /// Hit samples that were last in their session
    pub unterminated_hits: usize,
}

/// Single contribution of one hit sample
#[derive(Debug, Clone, Copy, PartialEq)]
struct Contribution<'a> {
    venue: &'a str,
    person: &'a str,
    seconds: f64,
}

/// Identity of the record a contribution is summed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RecordKey<'a> {
    VenuePerson { venue: &'a str, person: &'a str },
    Person(&'a str),
}

impl<'a> RecordKey<'a> {
    fn for_contribution(contribution: &Contribution<'a>, grouping: DwellGrouping) -> Self {
        match grouping {
            DwellGrouping::VenuePerson => RecordKey::VenuePerson {
                venue: contribution.venue,
                person: contribution.person,
            },
            DwellGrouping::Person => RecordKey::Person(contribution.person),
        }
    }
}

/// Seconds from `path[index]` to its successor, None if it is the last sample
fn seconds_until_next(path: &[&SessionEvent], index: usize) -> Option<f64> {
    let current = path.get(index)?;
    let next = path.get(index + 1)?;
    let elapsed = next.user_time_utc - current.user_time_utc;
    Some(elapsed.num_milliseconds() as f64 / 1000.0)
}

/// Compute dwell records for every venue across all sessions
pub fn time_at_venues(
    sessions: &[UserSession],
    venues: &[Venue],
    grouping: DwellGrouping,
) -> DwellSummary {
    // One canonical ordering per session, shared by every venue
    let ordered: Vec<Vec<&SessionEvent>> =
        sessions.iter().map(UserSession::chronological_path).collect();

    let mut contributions = Vec::new();
    let mut unterminated_hits = 0;

    for venue in venues {
        for (session, path) in sessions.iter().zip(&ordered) {
            for (index, sample) in path.iter().enumerate() {
                if !was_visit(&sample.position, &venue.position) {
                    continue;
                }
                let seconds = match seconds_until_next(path, index) {
                    Some(seconds) => seconds,
                    None => {
                        unterminated_hits += 1;
                        debug!(
                            venue = %venue.name,
                            person = %session.user_id,
                            session = %session.session_id,
                            "dwell_hit_without_successor"
                        );
                        0.0
                    }
                };
                contributions.push(Contribution {
                    venue: &venue.name,
                    person: &session.user_id,
                    seconds,
                });
            }
        }
    }

    DwellSummary { records: fold(contributions, grouping), unterminated_hits }
}

/// Sum contributions into records, ordered by first contribution
fn fold(contributions: Vec<Contribution<'_>>, grouping: DwellGrouping) -> Vec<DwellRecord> {
    let mut records: Vec<DwellRecord> = Vec::new();
    let mut index: FxHashMap<RecordKey<'_>, usize> = FxHashMap::default();

    for c in contributions {
        match index.entry(RecordKey::for_contribution(&c, grouping)) {
            Entry::Occupied(slot) => records[*slot.get()].seconds_at_venue += c.seconds,
            Entry::Vacant(slot) => {
                slot.insert(records.len());
                records.push(DwellRecord::new(c.venue, c.person, c.seconds));
            }
        }
    }

    records
}
