//! Putting event times from different frames on a common footing.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::event::EventTime;

/// An event time reduced to either an absolute instant or a naive local reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedTime {
    Aware(DateTime<Utc>),
    Naive(NaiveDateTime),
}

impl EventTime {
    /// Resolve into an instant or a naive reading.
    ///
    /// Returns `None` when a zone name is unknown.
    pub fn resolve(&self) -> Option<ResolvedTime> {
        match self {
            EventTime::Date(_) | EventTime::DateTimeFloating(_) => {
                Some(ResolvedTime::Naive(self.wall_clock()))
            }
            EventTime::DateTimeUtc(dt) => Some(ResolvedTime::Aware(*dt)),
            EventTime::DateTimeOffset(dt) => Some(ResolvedTime::Aware(dt.with_timezone(&Utc))),
            EventTime::DateTimeZoned { datetime, tzid } => {
                let tz: Tz = tzid.parse().ok()?;
                localize(*datetime, tz).map(ResolvedTime::Aware)
            }
        }
    }
}

/// Interpret a naive reading in `tz`. Ambiguous readings take the earlier
/// instant; readings inside a DST gap have no instant.
pub fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Absolute distance in whole seconds between two event times.
///
/// Both aware: compared as instants. Both naive: compared directly. Mixed:
/// the naive one is read in `local_tz`. Sub-second parts are truncated
/// before differencing. `None` when either side cannot be resolved, or when
/// only one side is a date: an all-day value has no distance to a date-time.
pub fn seconds_apart(a: &EventTime, b: &EventTime, local_tz: Tz) -> Option<i64> {
    if a.is_date() != b.is_date() {
        return None;
    }

    let (a, b) = match (a.resolve()?, b.resolve()?) {
        (ResolvedTime::Aware(a), ResolvedTime::Aware(b)) => (a.timestamp(), b.timestamp()),
        (ResolvedTime::Naive(a), ResolvedTime::Naive(b)) => {
            (a.and_utc().timestamp(), b.and_utc().timestamp())
        }
        (ResolvedTime::Aware(a), ResolvedTime::Naive(b)) => {
            (a.timestamp(), localize(b, local_tz)?.timestamp())
        }
        (ResolvedTime::Naive(a), ResolvedTime::Aware(b)) => {
            (localize(a, local_tz)?.timestamp(), b.timestamp())
        }
    };

    Some((a - b).abs())
}
