//! The human-readable action log.
//!
//! Every create/update/skip decision produces one [`ActionEntry`], handed to
//! an injected [`ActionLog`] in processing order.

use std::fmt;

use crate::event::CanonicalEvent;
use crate::sync::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Exact match, nothing differs
    UpToDate,
    /// Reschedule left to the source-of-truth pass
    ConflictDeferred,
    /// Fuzzy duplicate already present
    SimilarExists,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::UpToDate => "already exists and up to date",
            SkipReason::ConflictDeferred => "avoiding conflict",
            SkipReason::SimilarExists => "similar event already exists",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Create,
    Update,
    Reschedule { old_time: String },
    Skip { reason: SkipReason },
}

/// One decision about one source event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    pub kind: ActionKind,
    pub summary: String,
    pub direction: Direction,
    /// Formatted time range of the source event
    pub time: String,
    pub location: String,
    pub dry_run: bool,
}

impl ActionEntry {
    pub fn new(kind: ActionKind, event: &CanonicalEvent, direction: Direction, dry_run: bool) -> Self {
        ActionEntry {
            kind,
            summary: event.summary.clone(),
            direction,
            time: event.time_range(),
            location: event.location.clone(),
            dry_run,
        }
    }

    /// First line of the entry, without the dry-run prefix.
    pub fn headline(&self) -> String {
        match &self.kind {
            ActionKind::Create => format!("Creating event: '{}'", self.summary),
            ActionKind::Update => format!("Updating event: '{}'", self.summary),
            ActionKind::Reschedule { .. } => format!("Rescheduling event: '{}'", self.summary),
            ActionKind::Skip {
                reason: SkipReason::ConflictDeferred,
            } => format!(
                "Skipping reschedule: '{}' ({})",
                self.summary,
                SkipReason::ConflictDeferred.describe()
            ),
            ActionKind::Skip { reason } => {
                format!("Skipping event: '{}' ({})", self.summary, reason.describe())
            }
        }
    }

    /// Detail lines under the headline.
    pub fn details(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "From: {} → To: {}",
            self.direction.source().calendar_name(),
            self.direction.target().calendar_name()
        )];

        match &self.kind {
            ActionKind::Reschedule { old_time } => {
                lines.push(format!("Old time: {old_time}"));
                lines.push(format!("New time: {}", self.time));
            }
            _ => lines.push(format!("Time: {}", self.time)),
        }

        if self.kind == ActionKind::Create && !self.location.is_empty() {
            lines.push(format!("Location: {}", self.location));
        }

        lines
    }
}

impl fmt::Display for ActionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            write!(f, "[DRY RUN] ")?;
        }
        write!(f, "{}", self.headline())?;
        for line in self.details() {
            write!(f, "\n  └─ {line}")?;
        }
        Ok(())
    }
}

/// Ordered sink for action entries.
pub trait ActionLog: Send {
    fn record(&mut self, entry: ActionEntry);

    /// Free-form header line, e.g. the bidirectional mode banner.
    fn notice(&mut self, _message: &str) {}
}

impl ActionLog for Vec<ActionEntry> {
    fn record(&mut self, entry: ActionEntry) {
        self.push(entry);
    }
}
