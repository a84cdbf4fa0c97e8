use std::ops::{Add, AddAssign};

use serde::Serialize;

/// Counters for one directional pass.
///
/// `created` and `updated` count attempted mutations, so a failed call is
/// counted there and again in `failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectionStats {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Add for DirectionStats {
    type Output = DirectionStats;

    fn add(self, other: DirectionStats) -> DirectionStats {
        DirectionStats {
            created: self.created + other.created,
            updated: self.updated + other.updated,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }
}

impl AddAssign for DirectionStats {
    fn add_assign(&mut self, other: DirectionStats) {
        *self = *self + other;
    }
}

/// Result record of one sync session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub events_processed: usize,
    pub events_created: usize,
    pub events_updated: usize,
    pub events_skipped: usize,
    pub events_failed: usize,
}

impl SyncReport {
    pub fn new(events_processed: usize, stats: DirectionStats) -> Self {
        SyncReport {
            events_processed,
            events_created: stats.created,
            events_updated: stats.updated,
            events_skipped: stats.skipped,
            events_failed: stats.failed,
        }
    }
}
