//! Shared input types for venue analytics
//!
//! These mirror the JSON shapes served by the venue and session endpoints.
//! Everything here is read-only once deserialized.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::LazyLock;

/// Venue names of the form "Gate 3", "GATE3", "gate\t7" (ASCII digit only)
static GATE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Gate\s*[0-9]$").expect("gate pattern is valid"));

/// Offset-carrying layouts tried after RFC 3339 (`%z` takes `+0000` and `+00:00`)
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Offset-less layouts, read as UTC
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// 2D grid position in abstract units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One observed position sample of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEvent {
    /// Sample time - ISO 8601 string (with or without offset) or epoch milliseconds
    #[serde(deserialize_with = "deserialize_utc_timestamp")]
    pub user_time_utc: DateTime<Utc>,
    pub position: Coordinate,
}

impl SessionEvent {
    pub fn new(user_time_utc: DateTime<Utc>, position: Coordinate) -> Self {
        Self { user_time_utc, position }
    }
}

/// A user's movement session
///
/// `path` arrives in no particular order; use [`UserSession::chronological_path`]
/// rather than sorting it in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub user_id: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub start_time_utc: Option<String>,
    #[serde(default)]
    pub end_time_utc: Option<String>,
    #[serde(default)]
    pub start_time_local: Option<String>,
    #[serde(default)]
    pub path: Vec<SessionEvent>,
}

impl UserSession {
    /// Path samples ordered by time, ties kept in input order
    pub fn chronological_path(&self) -> Vec<&SessionEvent> {
        let mut ordered: Vec<&SessionEvent> = self.path.iter().collect();
        // sort_by_key is stable
        ordered.sort_by_key(|event| event.user_time_utc);
        ordered
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub position: Coordinate,
}

impl Venue {
    #[inline]
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }

    /// True for venues named "Gate" + optional whitespace + a single digit
    pub fn is_gate(&self) -> bool {
        is_gate_name(&self.name)
    }
}

pub fn is_gate_name(name: &str) -> bool {
    GATE_NAME.is_match(name)
}

fn deserialize_utc_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct TimestampVisitor;

    impl<'de> Visitor<'de> for TimestampVisitor {
        type Value = DateTime<Utc>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("an ISO 8601 timestamp string or epoch milliseconds")
        }

        fn visit_str<E>(self, value: &str) -> Result<DateTime<Utc>, E>
        where
            E: de::Error,
        {
            parse_timestamp(value)
                .ok_or_else(|| E::invalid_value(de::Unexpected::Str(value), &self))
        }

        fn visit_u64<E>(self, value: u64) -> Result<DateTime<Utc>, E>
        where
            E: de::Error,
        {
            let millis = i64::try_from(value)
                .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))?;
            self.visit_i64(millis)
        }

        fn visit_i64<E>(self, value: i64) -> Result<DateTime<Utc>, E>
        where
            E: de::Error,
        {
            Utc.timestamp_millis_opt(value)
                .single()
                .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(value), &self))
        }
    }

    deserializer.deserialize_any(TimestampVisitor)
}

/// Parse RFC 3339, then `T`- or space-separated ISO 8601 with a `%z` offset,
/// then the same without an offset read as UTC
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|naive| naive.and_utc())
        })
}
