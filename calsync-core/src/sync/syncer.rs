//! One directional pass: classify every source event against a fixed target
//! snapshot and apply the resulting create/update calls.

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::event::{CanonicalEvent, Source};
use crate::matcher::{Match, Matcher};
use crate::sync::action::{ActionEntry, ActionKind, ActionLog, SkipReason};
use crate::sync::direction::Direction;
use crate::sync::stats::DirectionStats;

/// What to do with one source event.
#[derive(Debug)]
enum Decision<'t> {
    Create,
    Update(&'t CanonicalEvent),
    Reschedule(&'t CanonicalEvent),
    Skip(SkipReason),
}

/// Runs directional passes against a pair of backends.
pub struct Syncer<'a> {
    matcher: Matcher,
    google: &'a dyn Backend,
    icloud: &'a dyn Backend,
    dry_run: bool,
}

impl<'a> Syncer<'a> {
    pub fn new(
        matcher: Matcher,
        google: &'a dyn Backend,
        icloud: &'a dyn Backend,
        dry_run: bool,
    ) -> Self {
        Syncer {
            matcher,
            google,
            icloud,
            dry_run,
        }
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn backend(&self, source: Source) -> &'a dyn Backend {
        match source {
            Source::Google => self.google,
            Source::ICloud => self.icloud,
        }
    }

    /// Sync `source_events` into `target_events`.
    ///
    /// Source events are processed in order; every lookup runs against the
    /// target snapshot as it was passed in. A failed backend call is logged
    /// and counted, never propagated.
    pub async fn sync_direction(
        &self,
        source_events: &[CanonicalEvent],
        target_events: &[CanonicalEvent],
        direction: Direction,
        avoid_conflicts: bool,
        log: &mut dyn ActionLog,
    ) -> DirectionStats {
        let index = self.matcher.index(target_events);
        let target = self.backend(direction.target());
        let mut stats = DirectionStats::default();

        debug!(
            %direction,
            sources = source_events.len(),
            targets = index.len(),
            avoid_conflicts,
            "Starting directional pass"
        );

        for event in source_events {
            if !event.has_times() {
                warn!(event = %event, %direction, "Event has no usable start/end, not syncing");
                continue;
            }

            let decision = match self.matcher.find(event, &index) {
                Match::Exact(existing) if self.matcher.needs_update(event, existing) => {
                    Decision::Update(existing)
                }
                Match::Exact(_) => Decision::Skip(SkipReason::UpToDate),
                Match::Rescheduled(_) if avoid_conflicts => {
                    Decision::Skip(SkipReason::ConflictDeferred)
                }
                Match::Rescheduled(existing) => Decision::Reschedule(existing),
                Match::Duplicate(_) => Decision::Skip(SkipReason::SimilarExists),
                Match::None => Decision::Create,
            };

            let kind = match decision {
                Decision::Create => ActionKind::Create,
                Decision::Update(_) => ActionKind::Update,
                Decision::Reschedule(existing) => ActionKind::Reschedule {
                    old_time: existing.time_range(),
                },
                Decision::Skip(reason) => ActionKind::Skip { reason },
            };
            log.record(ActionEntry::new(kind, event, direction, self.dry_run));

            match decision {
                Decision::Create => {
                    stats.created += 1;
                    if !self.dry_run {
                        if let Err(e) = target.create_event(event).await {
                            warn!(event = %event, error = %e, "Error creating event");
                            stats.failed += 1;
                        }
                    }
                }
                Decision::Update(existing) | Decision::Reschedule(existing) => {
                    stats.updated += 1;
                    if !self.dry_run {
                        if let Err(e) = target.update_event(existing, event).await {
                            warn!(event = %event, error = %e, "Error updating event");
                            stats.failed += 1;
                        }
                    }
                }
                Decision::Skip(_) => stats.skipped += 1,
            }
        }

        stats
    }
}
