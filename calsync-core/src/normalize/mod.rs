//! Converting backend-native events into [`CanonicalEvent`]s.

mod google;
mod icloud;

pub use google::{GoogleEvent, GoogleEventTime};
pub use icloud::{CalDavResource, ics_uid};

use crate::event::CanonicalEvent;

/// A backend-native event as a provider returned it.
#[derive(Debug, Clone)]
pub enum NativeEvent {
    /// A Google Calendar event resource
    Google(serde_json::Value),
    /// A CalDAV resource holding ICS text
    ICalendar(CalDavResource),
}

/// Normalize a native event.
///
/// Unparsable time fields come back as `None` and the event is still
/// returned. `None` only when the payload is not an event at all.
pub fn normalize(native: NativeEvent) -> Option<CanonicalEvent> {
    match native {
        NativeEvent::Google(value) => google::from_google(value),
        NativeEvent::ICalendar(resource) => icloud::from_icalendar(resource),
    }
}

/// Normalize free text for comparison (never for display).
///
/// Trims, unescapes common calendar-export escapes, collapses whitespace
/// runs and lower-cases.
pub fn normalize_text(text: &str) -> String {
    let unescaped = text
        .trim()
        .replace("\\,", ",")
        .replace("\\;", ";")
        .replace("\\n", "\n")
        .replace("\\\\", "\\");

    unescaped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
