//! Canonical events as ICS text for CalDAV stores.

use chrono::Utc;
use icalendar::{Calendar, Component, EventLike, Property, ValueType};

use crate::event::{CanonicalEvent, EventTime};

/// A fresh UID for an event that does not exist anywhere yet.
pub fn new_uid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generate a single-VEVENT calendar for `event` under `uid`.
pub fn to_ics(event: &CanonicalEvent, uid: &str) -> String {
    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(uid);
    ics_event.summary(&event.summary);

    let now = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    ics_event.add_property("DTSTAMP", &now);
    ics_event.add_property("LAST-MODIFIED", &now);

    if let Some(ref start) = event.start {
        add_datetime_property(&mut ics_event, "DTSTART", start, event.all_day);
    }
    if let Some(ref end) = event.end {
        add_datetime_property(&mut ics_event, "DTEND", end, event.all_day);
    }

    if !event.description.is_empty() {
        ics_event.description(&event.description);
    }
    if !event.location.is_empty() {
        ics_event.location(&event.location);
    }

    cal.push(ics_event.done());
    let output = cal.done().to_string();

    output
        .lines()
        .filter(|line| *line != "CALSCALE:GREGORIAN")
        .map(|line| {
            if line.starts_with("PRODID:") {
                "PRODID:-//calsync//calsync//EN"
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\r\n")
        + "\r\n"
}

fn add_datetime_property(
    ics_event: &mut icalendar::Event,
    name: &str,
    time: &EventTime,
    all_day: bool,
) {
    match time {
        EventTime::Date(_) => add_date(ics_event, name, time),
        _ if all_day => add_date(ics_event, name, time),
        EventTime::DateTimeUtc(dt) => {
            ics_event.add_property(name, dt.format("%Y%m%dT%H%M%SZ").to_string());
        }
        EventTime::DateTimeOffset(dt) => {
            // ICS has no fixed-offset form; the same instant in UTC
            let utc = dt.with_timezone(&Utc);
            ics_event.add_property(name, utc.format("%Y%m%dT%H%M%SZ").to_string());
        }
        EventTime::DateTimeFloating(dt) => {
            ics_event.add_property(name, dt.format("%Y%m%dT%H%M%S").to_string());
        }
        EventTime::DateTimeZoned { datetime, tzid } => {
            let mut prop = Property::new(name, datetime.format("%Y%m%dT%H%M%S").to_string());
            prop.add_parameter("TZID", tzid);
            ics_event.append_property(prop);
        }
    }
}

fn add_date(ics_event: &mut icalendar::Event, name: &str, time: &EventTime) {
    let mut prop = Property::new(name, time.wall_clock().format("%Y%m%d").to_string());
    prop.append_parameter(ValueType::Date);
    ics_event.append_property(prop);
}
