//! Deciding whether a source event is already present in a target calendar.
//!
//! There is no identifier shared between backends, so matching works on
//! content. A source event is looked up against a fixed target snapshot in
//! three tiers, first hit wins:
//!
//! 1. **Exact**: same fingerprint (normalized summary plus start/end).
//! 2. **Rescheduled**: same summary and description, times moved by more
//!    than [`RESCHEDULE_THRESHOLD_SECS`] on start or end.
//! 3. **Duplicate**: same summary and the same times within
//!    [`TIME_MATCH_TOLERANCE_SECS`], reached without an exact fingerprint hit.

use std::collections::HashMap;
use std::fmt;

use chrono::SecondsFormat;
use chrono_tz::Tz;

use crate::constants::{RESCHEDULE_THRESHOLD_SECS, TIME_MATCH_TOLERANCE_SECS};
use crate::event::{CanonicalEvent, EventTime};
use crate::normalize::normalize_text;
use crate::time::{ResolvedTime, seconds_apart};

/// Content digest over normalized summary, start and end.
///
/// Location is deliberately left out: stores format it too differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

pub fn fingerprint(event: &CanonicalEvent) -> Fingerprint {
    let key = format!(
        "{}|{}|{}",
        normalize_text(&event.summary),
        string_form(event.start.as_ref()),
        string_form(event.end.as_ref())
    );
    Fingerprint(*blake3::hash(key.as_bytes()).as_bytes())
}

/// Stable text form of a time for fingerprinting.
fn string_form(time: Option<&EventTime>) -> String {
    let Some(time) = time else {
        return String::new();
    };

    match (time, time.resolve()) {
        (EventTime::Date(d), _) => d.format("%Y-%m-%d").to_string(),
        (_, Some(ResolvedTime::Aware(dt))) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        (_, Some(ResolvedTime::Naive(dt))) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        (EventTime::DateTimeZoned { datetime, tzid }, None) => {
            format!("{}[{}]", datetime.format("%Y-%m-%dT%H:%M:%S"), tzid)
        }
        (other, None) => format!("{other:?}"),
    }
}

/// Outcome of looking a source event up in a target snapshot.
#[derive(Debug, Clone, Copy)]
pub enum Match<'t> {
    Exact(&'t CanonicalEvent),
    Rescheduled(&'t CanonicalEvent),
    Duplicate(&'t CanonicalEvent),
    None,
}

/// A target snapshot prepared for lookups.
pub struct TargetIndex<'t> {
    events: Vec<&'t CanonicalEvent>,
    by_fingerprint: HashMap<Fingerprint, &'t CanonicalEvent>,
}

impl<'t> TargetIndex<'t> {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Content matcher. Naive times are read in `local_tz`.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    local_tz: Tz,
}

impl Matcher {
    pub fn new(local_tz: Tz) -> Self {
        Matcher { local_tz }
    }

    /// Index the target snapshot. Events without both times are left out.
    pub fn index<'t>(&self, targets: &'t [CanonicalEvent]) -> TargetIndex<'t> {
        let events: Vec<&CanonicalEvent> = targets.iter().filter(|e| e.has_times()).collect();
        let by_fingerprint = events.iter().map(|e| (fingerprint(e), *e)).collect();

        TargetIndex {
            events,
            by_fingerprint,
        }
    }

    /// Find `source` in the indexed targets.
    pub fn find<'t>(&self, source: &CanonicalEvent, targets: &TargetIndex<'t>) -> Match<'t> {
        if !source.has_times() {
            return Match::None;
        }

        if let Some(target) = targets.by_fingerprint.get(&fingerprint(source)) {
            return Match::Exact(target);
        }

        if let Some(target) = targets
            .events
            .iter()
            .find(|t| self.is_reschedule_of(source, t))
        {
            return Match::Rescheduled(target);
        }

        if let Some(target) = targets
            .events
            .iter()
            .find(|t| self.is_duplicate_of(source, t))
        {
            return Match::Duplicate(target);
        }

        Match::None
    }

    /// True iff both times are present and at most a minute apart.
    pub fn times_match(&self, a: Option<&EventTime>, b: Option<&EventTime>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => seconds_apart(a, b, self.local_tz)
                .is_some_and(|diff| diff <= TIME_MATCH_TOLERANCE_SECS),
            _ => false,
        }
    }

    /// True iff start or end moved by more than the reschedule threshold.
    ///
    /// Anything that cannot be compared counts as not moved.
    pub fn significantly_shifted(&self, source: &CanonicalEvent, target: &CanonicalEvent) -> bool {
        let apart = |a: Option<&EventTime>, b: Option<&EventTime>| match (a, b) {
            (Some(a), Some(b)) => seconds_apart(a, b, self.local_tz),
            _ => None,
        };

        match (
            apart(source.start.as_ref(), target.start.as_ref()),
            apart(source.end.as_ref(), target.end.as_ref()),
        ) {
            (Some(start), Some(end)) => {
                start > RESCHEDULE_THRESHOLD_SECS || end > RESCHEDULE_THRESHOLD_SECS
            }
            _ => false,
        }
    }

    /// Same summary and description, materially different time.
    pub fn is_reschedule_of(&self, source: &CanonicalEvent, target: &CanonicalEvent) -> bool {
        let summary = normalize_text(&source.summary);
        if summary.is_empty() || !source.has_times() {
            return false;
        }
        if summary != normalize_text(&target.summary) {
            return false;
        }

        let source_desc = normalize_text(&source.description);
        let target_desc = normalize_text(&target.description);
        if source_desc != target_desc {
            return false;
        }

        let same_times = self.times_match(source.start.as_ref(), target.start.as_ref())
            && self.times_match(source.end.as_ref(), target.end.as_ref());

        !same_times && self.significantly_shifted(source, target)
    }

    /// Same summary and same times.
    pub fn is_duplicate_of(&self, source: &CanonicalEvent, target: &CanonicalEvent) -> bool {
        let summary = normalize_text(&source.summary);
        if summary.is_empty() || !source.has_times() {
            return false;
        }

        summary == normalize_text(&target.summary)
            && self.times_match(source.start.as_ref(), target.start.as_ref())
            && self.times_match(source.end.as_ref(), target.end.as_ref())
    }

    /// Whether an exact-match target differs from its source in title,
    /// description or times. Location is not compared.
    pub fn needs_update(&self, source: &CanonicalEvent, target: &CanonicalEvent) -> bool {
        normalize_text(&source.summary) != normalize_text(&target.summary)
            || normalize_text(&source.description) != normalize_text(&target.description)
            || !self.times_match(source.start.as_ref(), target.start.as_ref())
            || !self.times_match(source.end.as_ref(), target.end.as_ref())
    }
}
