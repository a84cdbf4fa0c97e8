//! Canonical event records.
//!
//! Both backends are normalized into [`CanonicalEvent`] before any matching
//! happens. Equality between records from different backends is decided by
//! the matcher, never by `id`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalSyncError;

/// Which backend produced an event. Provenance only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "google")]
    Google,
    #[serde(rename = "icloud")]
    ICloud,
}

impl Source {
    /// Name used in action log entries.
    pub fn calendar_name(&self) -> &'static str {
        match self {
            Source::Google => "Google Calendar",
            Source::ICloud => "iCloud",
        }
    }

    /// Provider name used to locate the provider binary.
    pub fn provider_name(&self) -> &'static str {
        match self {
            Source::Google => "google",
            Source::ICloud => "icloud",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.provider_name())
    }
}

impl FromStr for Source {
    type Err = CalSyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(Source::Google),
            "icloud" => Ok(Source::ICloud),
            other => Err(CalSyncError::Config(format!(
                "Unknown calendar '{}'. Expected google or icloud",
                other
            ))),
        }
    }
}

/// A point in time as the backend reported it.
///
/// Offsets and zone names are kept as given. `Date` is an all-day value and
/// is distinct from a date-time at midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    Date(NaiveDate),
    DateTimeUtc(DateTime<Utc>),
    DateTimeOffset(DateTime<FixedOffset>),
    DateTimeFloating(NaiveDateTime),
    DateTimeZoned { datetime: NaiveDateTime, tzid: String },
}

impl EventTime {
    pub fn is_date(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// The wall-clock reading in the time's own frame (dates read as midnight).
    pub fn wall_clock(&self) -> NaiveDateTime {
        match self {
            EventTime::Date(d) => d.and_time(chrono::NaiveTime::MIN),
            EventTime::DateTimeUtc(dt) => dt.naive_utc(),
            EventTime::DateTimeOffset(dt) => dt.naive_local(),
            EventTime::DateTimeFloating(dt) => *dt,
            EventTime::DateTimeZoned { datetime, .. } => *datetime,
        }
    }
}

/// A calendar event in backend-neutral form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalEvent {
    /// Backend-native identifier, meaningless across backends
    pub id: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub all_day: bool,
    pub source: Source,
    /// Backend-native payload, carried through untouched
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl CanonicalEvent {
    /// Events without both times can never be matched.
    pub fn has_times(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Human-readable time range for log output.
    pub fn time_range(&self) -> String {
        let (Some(start), Some(end)) = (&self.start, &self.end) else {
            return "Time not available".to_string();
        };
        let (start, end) = (start.wall_clock(), end.wall_clock());

        if self.all_day {
            if start.date() == end.date() {
                format!("{} (All day)", start.format("%A, %B %d, %Y"))
            } else {
                format!(
                    "{} - {} (All day)",
                    start.format("%B %d"),
                    end.format("%B %d, %Y")
                )
            }
        } else {
            let date = start.format("%A, %B %d, %Y");
            let start_clock = start.format("%-I:%M %p");
            let end_clock = end.format("%-I:%M %p");

            if start.date() == end.date() {
                format!("{date} from {start_clock} to {end_clock}")
            } else {
                let end_date = end.format("%A, %B %d, %Y");
                format!("{date} {start_clock} → {end_date} {end_clock}")
            }
        }
    }
}

impl fmt::Display for CanonicalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)
    }
}
