//! iCloud CalDAV resources (ICS text).

use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::{CanonicalEvent, EventTime, Source};

/// A CalDAV resource as the iCloud provider returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalDavResource {
    pub href: String,
    pub data: String,
}

pub(super) fn from_icalendar(resource: CalDavResource) -> Option<CanonicalEvent> {
    let unfolded = unfold(&resource.data);
    let calendar = match read_calendar(&unfolded) {
        Ok(calendar) => calendar,
        Err(e) => {
            debug!(href = %resource.href, error = %e, "Unreadable ICS resource");
            return None;
        }
    };
    let vevent = calendar.components.iter().find(|c| c.name == "VEVENT")?;

    let start = prop_time(vevent, "DTSTART");
    let end = prop_time(vevent, "DTEND");
    let all_day = start.as_ref().is_some_and(EventTime::is_date);

    let raw = serde_json::to_value(&resource).unwrap_or(serde_json::Value::Null);

    Some(CanonicalEvent {
        id: resource.href,
        summary: prop_text(vevent, "SUMMARY"),
        description: prop_text(vevent, "DESCRIPTION"),
        location: prop_text(vevent, "LOCATION"),
        start,
        end,
        all_day,
        source: Source::ICloud,
        raw,
    })
}

/// The UID of the first VEVENT in an iCloud raw payload, if any.
pub fn ics_uid(raw: &serde_json::Value) -> Option<String> {
    let data = raw.get("data")?.as_str()?;
    let unfolded = unfold(data);
    let calendar = read_calendar(&unfolded).ok()?;
    let vevent = calendar.components.iter().find(|c| c.name == "VEVENT")?;
    vevent.find_prop("UID").map(|p| p.val.to_string())
}

fn prop_text(vevent: &Component, name: &str) -> String {
    vevent
        .find_prop(name)
        .map(|p| p.val.as_ref().trim().to_string())
        .unwrap_or_default()
}

fn prop_time(vevent: &Component, name: &str) -> Option<EventTime> {
    let prop = vevent.find_prop(name)?;
    DatePerhapsTime::try_from(prop).ok().map(to_event_time)
}

/// Convert icalendar's DatePerhapsTime to our EventTime, preserving timezone info
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => EventTime::DateTimeUtc(dt),
            CalendarDateTime::Floating(naive) => EventTime::DateTimeFloating(naive),
            CalendarDateTime::WithTimezone { date_time, tzid } => EventTime::DateTimeZoned {
                datetime: date_time,
                tzid,
            },
        },
    }
}
