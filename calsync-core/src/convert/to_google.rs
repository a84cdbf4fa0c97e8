//! Canonical events as Google Calendar event resources.

use chrono::{NaiveDateTime, SecondsFormat, TimeZone};
use chrono_tz::Tz;

use crate::event::{CanonicalEvent, EventTime};
use crate::normalize::{GoogleEvent, GoogleEventTime};

/// Build the Google resource for `event`.
///
/// Naive times are placed in `tz`. Times that already carry an offset keep it.
pub fn to_google(event: &CanonicalEvent, tz: Tz) -> GoogleEvent {
    GoogleEvent {
        id: None,
        summary: Some(event.summary.clone()),
        description: Some(event.description.clone()),
        location: Some(event.location.clone()),
        start: event.start.as_ref().map(|t| google_time(t, event.all_day, tz)),
        end: event.end.as_ref().map(|t| google_time(t, event.all_day, tz)),
    }
}

fn google_time(time: &EventTime, all_day: bool, tz: Tz) -> GoogleEventTime {
    if all_day {
        return date_only(time);
    }

    let (date_time, time_zone) = match time {
        EventTime::Date(_) => return date_only(time),
        EventTime::DateTimeUtc(dt) => (
            dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            "UTC".to_string(),
        ),
        EventTime::DateTimeOffset(dt) => (
            dt.to_rfc3339_opts(SecondsFormat::Secs, false),
            tz.name().to_string(),
        ),
        EventTime::DateTimeZoned { datetime, tzid } => match tzid.parse::<Tz>() {
            Ok(zone) => (localized(*datetime, zone), zone.name().to_string()),
            Err(_) => (localized(*datetime, tz), tz.name().to_string()),
        },
        EventTime::DateTimeFloating(naive) => (localized(*naive, tz), tz.name().to_string()),
    };

    GoogleEventTime {
        date: None,
        date_time: Some(date_time),
        time_zone: Some(time_zone),
    }
}

fn date_only(time: &EventTime) -> GoogleEventTime {
    GoogleEventTime {
        date: Some(time.wall_clock().format("%Y-%m-%d").to_string()),
        ..Default::default()
    }
}

/// RFC 3339 with the zone's offset, or the bare local reading plus the
/// zone name when the reading falls in a DST gap.
fn localized(naive: NaiveDateTime, zone: Tz) -> String {
    match zone.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, false),
        None => naive.format("%Y-%m-%dT%H:%M:%S").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Source;
    use chrono::{FixedOffset, NaiveDate, Utc};

    fn event(start: EventTime, end: EventTime, all_day: bool) -> CanonicalEvent {
        CanonicalEvent {
            id: "/cal/abc.ics".to_string(),
            summary: "Standup".to_string(),
            description: "Daily".to_string(),
            location: "Room 1".to_string(),
            start: Some(start),
            end: Some(end),
            all_day,
            source: Source::ICloud,
            raw: serde_json::Value::Null,
        }
    }

    fn naive(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_floating_time_localized_in_configured_zone() {
        let e = event(
            EventTime::DateTimeFloating(naive(9, 0)),
            EventTime::DateTimeFloating(naive(9, 30)),
            false,
        );

        let google = to_google(&e, chrono_tz::America::New_York);
        let start = google.start.unwrap();

        assert_eq!(start.date_time.as_deref(), Some("2024-01-01T09:00:00-05:00"));
        assert_eq!(start.time_zone.as_deref(), Some("America/New_York"));
        assert_eq!(google.summary.as_deref(), Some("Standup"));
        assert!(google.id.is_none());
    }

    #[test]
    fn test_zoned_time_uses_its_own_zone() {
        let e = event(
            EventTime::DateTimeZoned {
                datetime: naive(9, 0),
                tzid: "Europe/Helsinki".to_string(),
            },
            EventTime::DateTimeZoned {
                datetime: naive(10, 0),
                tzid: "Europe/Helsinki".to_string(),
            },
            false,
        );

        let start = to_google(&e, chrono_tz::UTC).start.unwrap();

        assert_eq!(start.date_time.as_deref(), Some("2024-01-01T09:00:00+02:00"));
        assert_eq!(start.time_zone.as_deref(), Some("Europe/Helsinki"));
    }

    #[test]
    fn test_offset_preserved_not_converted() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let e = event(
            EventTime::DateTimeOffset(offset.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
            EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
            false,
        );

        let google = to_google(&e, chrono_tz::UTC);

        assert_eq!(
            google.start.unwrap().date_time.as_deref(),
            Some("2024-01-01T09:00:00+01:00")
        );
        assert_eq!(
            google.end.unwrap().date_time.as_deref(),
            Some("2024-01-01T09:00:00Z")
        );
    }

    #[test]
    fn test_all_day_uses_date() {
        let day = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let next = NaiveDate::from_ymd_opt(2024, 12, 26).unwrap();
        let e = event(EventTime::Date(day), EventTime::Date(next), true);

        let google = to_google(&e, chrono_tz::UTC);
        let json = serde_json::to_value(&google).unwrap();

        assert_eq!(json["start"], serde_json::json!({ "date": "2024-12-25" }));
        assert_eq!(json["end"], serde_json::json!({ "date": "2024-12-26" }));
    }
}
