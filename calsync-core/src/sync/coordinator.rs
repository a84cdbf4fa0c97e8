//! Two directional passes under a source-of-truth policy.

use tracing::info;

use crate::event::{CanonicalEvent, Source};
use crate::sync::action::ActionLog;
use crate::sync::direction::{Direction, SourceOfTruth};
use crate::sync::stats::DirectionStats;
use crate::sync::syncer::Syncer;

impl Syncer<'_> {
    /// Sync both ways. The winning store's pass runs first and may claim
    /// reschedules; the other pass defers on them. Both passes see the
    /// snapshots as fetched.
    pub async fn sync_bidirectional(
        &self,
        google_events: &[CanonicalEvent],
        icloud_events: &[CanonicalEvent],
        source_of_truth: SourceOfTruth,
        log: &mut dyn ActionLog,
    ) -> DirectionStats {
        let winner = source_of_truth.resolve();
        info!(source_of_truth = %winner, "Bidirectional sync");

        if self.dry_run() {
            log.notice(&format!(
                "Bidirectional sync mode - Source of truth: {}",
                winner.calendar_name()
            ));
        }

        let (winner_events, loser_events) = match winner {
            Source::Google => (google_events, icloud_events),
            Source::ICloud => (icloud_events, google_events),
        };
        let first = Direction::from_source(winner);

        let claimed = self
            .sync_direction(winner_events, loser_events, first, false, log)
            .await;
        let deferred = self
            .sync_direction(loser_events, winner_events, first.reverse(), true, log)
            .await;

        claimed + deferred
    }
}
