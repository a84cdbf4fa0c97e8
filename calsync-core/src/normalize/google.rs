//! Google Calendar event resources.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::{CanonicalEvent, EventTime, Source};

/// The subset of a Google Calendar event resource calsync reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start: Option<GoogleEventTime>,
    #[serde(default)]
    pub end: Option<GoogleEventTime>,
}

/// Google's start/end object: either `date` (all-day) or `dateTime`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

pub(super) fn from_google(value: serde_json::Value) -> Option<CanonicalEvent> {
    let event: GoogleEvent = match serde_json::from_value(value.clone()) {
        Ok(event) => event,
        Err(e) => {
            debug!(error = %e, "Not a Google event resource");
            return None;
        }
    };

    let all_day = event.start.as_ref().is_some_and(|s| s.date.is_some());

    Some(CanonicalEvent {
        id: event.id.unwrap_or_default(),
        summary: event.summary.unwrap_or_default(),
        description: event.description.unwrap_or_default(),
        location: event.location.unwrap_or_default(),
        start: event.start.as_ref().and_then(parse_google_time),
        end: event.end.as_ref().and_then(parse_google_time),
        all_day,
        source: Source::Google,
        raw: value,
    })
}

/// Parse a Google start/end object, keeping whatever offset it carries.
fn parse_google_time(time: &GoogleEventTime) -> Option<EventTime> {
    if let Some(ref s) = time.date_time {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(if s.ends_with(['Z', 'z']) {
                EventTime::DateTimeUtc(dt.with_timezone(&Utc))
            } else {
                EventTime::DateTimeOffset(dt)
            });
        }

        // No offset: only meaningful together with a zone name
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok()?;
        return Some(match time.time_zone {
            Some(ref tzid) if tzid.parse::<Tz>().is_ok() => EventTime::DateTimeZoned {
                datetime: naive,
                tzid: tzid.clone(),
            },
            _ => EventTime::DateTimeFloating(naive),
        });
    }

    time.date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(EventTime::Date)
}
