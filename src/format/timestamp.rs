//! Timestamp formatting.
//!
//! Upstream data carries dates either as Unix epoch seconds or as
//! ISO-8601 strings. Which one is decided by the value's representation,
//! never by sniffing the content.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// A raw timestamp as delivered by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Seconds since the Unix epoch. Fractional input is rounded down to
    /// the whole second, which never moves the calendar day.
    #[serde(deserialize_with = "whole_seconds")]
    Epoch(i64),
    /// ISO-8601 date or date-time.
    Iso(String),
}

impl From<i64> for Timestamp {
    fn from(secs: i64) -> Self {
        Timestamp::Epoch(secs)
    }
}

impl From<&str> for Timestamp {
    fn from(text: &str) -> Self {
        Timestamp::Iso(text.to_string())
    }
}

impl From<String> for Timestamp {
    fn from(text: String) -> Self {
        Timestamp::Iso(text)
    }
}

impl Timestamp {
    /// Resolve to an instant, if the value is well-formed.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Epoch(secs) => DateTime::from_timestamp_millis(secs.checked_mul(1000)?),
            Timestamp::Iso(text) => parse_iso(text),
        }
    }
}

/// Format a timestamp as `M/D/YYYY` (no zero padding), in UTC.
///
/// Malformed input is echoed back unchanged.
pub fn format_timestamp(stamp: &Timestamp) -> String {
    match stamp.to_datetime() {
        Some(instant) => format!("{}/{}/{}", instant.month(), instant.day(), instant.year()),
        None => {
            debug!("Unparseable timestamp {:?}", stamp);
            match stamp {
                Timestamp::Epoch(secs) => secs.to_string(),
                Timestamp::Iso(text) => text.clone(),
            }
        }
    }
}

fn whole_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Whole(i64),
        Fractional(f64),
    }

    match Seconds::deserialize(deserializer)? {
        Seconds::Whole(secs) => Ok(secs),
        Seconds::Fractional(secs) if secs.is_finite() && secs.abs() < i64::MAX as f64 => {
            Ok(secs.floor() as i64)
        }
        Seconds::Fractional(secs) => Err(D::Error::custom(format!(
            "epoch seconds out of range: {}",
            secs
        ))),
    }
}

fn parse_iso(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }

    // Date-time without an offset is taken as UTC
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
