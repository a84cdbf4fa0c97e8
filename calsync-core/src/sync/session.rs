//! A complete sync run: fetch both stores, then dispatch by direction.

use tracing::info;

use crate::backend::Backend;
use crate::config::SyncSettings;
use crate::date_range::DateRange;
use crate::error::{CalSyncError, CalSyncResult};
use crate::event::{CanonicalEvent, Source};
use crate::matcher::Matcher;
use crate::sync::action::ActionLog;
use crate::sync::direction::{Direction, SyncDirection};
use crate::sync::stats::SyncReport;
use crate::sync::syncer::Syncer;

pub struct SyncSession<'a> {
    google: &'a dyn Backend,
    icloud: &'a dyn Backend,
    settings: SyncSettings,
}

impl<'a> SyncSession<'a> {
    pub fn new(google: &'a dyn Backend, icloud: &'a dyn Backend, settings: SyncSettings) -> Self {
        SyncSession {
            google,
            icloud,
            settings,
        }
    }

    /// Run one sync over `range`.
    ///
    /// A failed fetch aborts the run with no partial report. Failed
    /// create/update calls do not; they show up in `events_failed`.
    pub async fn sync(
        &self,
        range: &DateRange,
        dry_run: bool,
        log: &mut dyn ActionLog,
    ) -> CalSyncResult<SyncReport> {
        if self.google.source() != Source::Google || self.icloud.source() != Source::ICloud {
            return Err(CalSyncError::Sync(format!(
                "backends wired the wrong way round (got {} and {})",
                self.google.source(),
                self.icloud.source()
            )));
        }

        let (google_events, icloud_events) =
            tokio::try_join!(fetch(self.google, range), fetch(self.icloud, range))?;

        let processed = google_events.len() + icloud_events.len();
        info!(
            google = google_events.len(),
            icloud = icloud_events.len(),
            direction = %self.settings.direction,
            dry_run,
            "Fetched events"
        );

        let syncer = Syncer::new(
            Matcher::new(self.settings.timezone),
            self.google,
            self.icloud,
            dry_run,
        );

        let stats = match self.settings.direction {
            SyncDirection::Both => {
                syncer
                    .sync_bidirectional(
                        &google_events,
                        &icloud_events,
                        self.settings.source_of_truth,
                        log,
                    )
                    .await
            }
            SyncDirection::GoogleToIcloud => {
                syncer
                    .sync_direction(
                        &google_events,
                        &icloud_events,
                        Direction::GoogleToICloud,
                        false,
                        log,
                    )
                    .await
            }
            SyncDirection::IcloudToGoogle => {
                syncer
                    .sync_direction(
                        &icloud_events,
                        &google_events,
                        Direction::ICloudToGoogle,
                        false,
                        log,
                    )
                    .await
            }
        };

        Ok(SyncReport::new(processed, stats))
    }
}

async fn fetch(backend: &dyn Backend, range: &DateRange) -> CalSyncResult<Vec<CanonicalEvent>> {
    backend
        .list_events(range)
        .await
        .map_err(|e| CalSyncError::Fetch {
            calendar: backend.source(),
            source: Box::new(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::action::{ActionEntry, ActionKind, SkipReason};
    use crate::sync::direction::SourceOfTruth;
    use crate::testing::{MemoryBackend, timed};

    fn settings(direction: SyncDirection) -> SyncSettings {
        SyncSettings {
            direction,
            source_of_truth: SourceOfTruth::Google,
            timezone: chrono_tz::UTC,
        }
    }

    async fn run(
        google: &MemoryBackend,
        icloud: &MemoryBackend,
        direction: SyncDirection,
        dry_run: bool,
    ) -> (SyncReport, Vec<ActionEntry>) {
        let mut log: Vec<ActionEntry> = Vec::new();
        let report = SyncSession::new(google, icloud, settings(direction))
            .sync(&DateRange::upcoming(30).unwrap(), dry_run, &mut log)
            .await
            .unwrap();
        (report, log)
    }

    #[tokio::test]
    async fn test_new_event_is_created() {
        let google = MemoryBackend::new(Source::Google)
            .with_events(vec![timed(Source::Google, "Standup", (9, 0), (9, 30))]);
        let icloud = MemoryBackend::new(Source::ICloud);

        let (report, _) = run(&google, &icloud, SyncDirection::GoogleToIcloud, false).await;

        assert_eq!(report.events_processed, 1);
        assert_eq!(report.events_created, 1);
        assert_eq!(report.events_updated, 0);
        assert_eq!(icloud.created().len(), 1);
    }

    #[tokio::test]
    async fn test_identical_events_are_skipped() {
        let google = MemoryBackend::new(Source::Google)
            .with_events(vec![timed(Source::Google, "Standup", (9, 0), (9, 30))]);
        let icloud = MemoryBackend::new(Source::ICloud)
            .with_events(vec![timed(Source::ICloud, "Standup", (9, 0), (9, 30))]);

        let (report, _) = run(&google, &icloud, SyncDirection::GoogleToIcloud, false).await;

        assert_eq!(report.events_processed, 2);
        assert_eq!(report.events_skipped, 1);
        assert_eq!(report.events_created, 0);
        assert_eq!(report.events_updated, 0);
    }

    #[tokio::test]
    async fn test_hour_shift_is_one_update() {
        let google = MemoryBackend::new(Source::Google)
            .with_events(vec![timed(Source::Google, "Standup", (10, 0), (10, 30))]);
        let icloud = MemoryBackend::new(Source::ICloud)
            .with_events(vec![timed(Source::ICloud, "Standup", (9, 0), (9, 30))]);

        let (report, log) = run(&google, &icloud, SyncDirection::GoogleToIcloud, false).await;

        assert_eq!(report.events_updated, 1);
        assert_eq!(report.events_created, 0);
        assert_eq!(icloud.mutation_count(), 1);
        assert!(matches!(log[0].kind, ActionKind::Reschedule { .. }));
    }

    #[tokio::test]
    async fn test_dry_run_matches_wet_counters_without_calls() {
        let seed = || {
            (
                MemoryBackend::new(Source::Google).with_events(vec![
                    timed(Source::Google, "New", (8, 0), (8, 30)),
                    timed(Source::Google, "Standup", (10, 0), (10, 30)),
                    timed(Source::Google, "Lunch", (12, 0), (13, 0)),
                ]),
                MemoryBackend::new(Source::ICloud).with_events(vec![
                    timed(Source::ICloud, "Standup", (9, 0), (9, 30)),
                    timed(Source::ICloud, "Lunch", (12, 0), (13, 0)),
                    timed(Source::ICloud, "Dentist", (15, 0), (16, 0)),
                ]),
            )
        };

        let (wet_google, wet_icloud) = seed();
        let (wet, _) = run(&wet_google, &wet_icloud, SyncDirection::Both, false).await;

        let (dry_google, dry_icloud) = seed();
        let (dry, dry_log) = run(&dry_google, &dry_icloud, SyncDirection::Both, true).await;

        assert_eq!(wet, dry);
        assert!(wet_google.mutation_count() + wet_icloud.mutation_count() > 0);
        assert_eq!(dry_google.mutation_count(), 0);
        assert_eq!(dry_icloud.mutation_count(), 0);
        assert!(dry_log.iter().all(|e| e.dry_run));
    }

    #[tokio::test]
    async fn test_conflict_deferral_single_icloud_update() {
        let google = MemoryBackend::new(Source::Google)
            .with_events(vec![timed(Source::Google, "Standup", (10, 0), (10, 30))]);
        let icloud = MemoryBackend::new(Source::ICloud)
            .with_events(vec![timed(Source::ICloud, "Standup", (9, 0), (9, 30))]);

        let (report, log) = run(&google, &icloud, SyncDirection::Both, false).await;

        assert_eq!(icloud.attempted_updates(), 1);
        assert_eq!(icloud.attempted_creates(), 0);
        assert_eq!(google.mutation_count(), 0);
        assert_eq!(report.events_updated, 1);
        assert_eq!(report.events_skipped, 1);
        assert_eq!(
            log[1].kind,
            ActionKind::Skip {
                reason: SkipReason::ConflictDeferred
            }
        );
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let google = MemoryBackend::new(Source::Google).with_events(vec![
            timed(Source::Google, "Standup", (10, 0), (10, 30)),
            timed(Source::Google, "Planning", (13, 0), (14, 0)),
        ]);
        let icloud = MemoryBackend::new(Source::ICloud).with_events(vec![
            timed(Source::ICloud, "Standup", (9, 0), (9, 30)),
            timed(Source::ICloud, "Dentist", (15, 0), (16, 0)),
        ]);

        let (first, _) = run(&google, &icloud, SyncDirection::Both, false).await;
        assert!(first.events_created + first.events_updated > 0);
        let calls_after_first = google.mutation_count() + icloud.mutation_count();

        let (second, log) = run(&google, &icloud, SyncDirection::Both, false).await;

        assert_eq!(second.events_created, 0);
        assert_eq!(second.events_updated, 0);
        assert_eq!(
            google.mutation_count() + icloud.mutation_count(),
            calls_after_first
        );
        assert!(log.iter().all(|e| e.kind
            == ActionKind::Skip {
                reason: SkipReason::UpToDate
            }));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_fatal_and_names_calendar() {
        let google = MemoryBackend::new(Source::Google)
            .with_events(vec![timed(Source::Google, "Standup", (9, 0), (9, 30))]);
        let icloud = MemoryBackend::new(Source::ICloud).failing_fetch();
        let mut log: Vec<ActionEntry> = Vec::new();

        let result = SyncSession::new(&google, &icloud, settings(SyncDirection::Both))
            .sync(&DateRange::upcoming(30).unwrap(), false, &mut log)
            .await;

        match result {
            Err(CalSyncError::Fetch { calendar, .. }) => assert_eq!(calendar, Source::ICloud),
            other => panic!("Expected fetch failure, got {:?}", other),
        }
        assert!(log.is_empty());
        assert_eq!(google.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_going() {
        let google = MemoryBackend::new(Source::Google).with_events(vec![
            timed(Source::Google, "Standup", (10, 0), (10, 30)),
            timed(Source::Google, "Planning", (13, 0), (14, 0)),
        ]);
        let icloud = MemoryBackend::new(Source::ICloud)
            .with_events(vec![timed(Source::ICloud, "Standup", (9, 0), (9, 30))])
            .failing_updates();

        let (report, log) = run(&google, &icloud, SyncDirection::GoogleToIcloud, false).await;

        assert_eq!(report.events_updated, 1);
        assert_eq!(report.events_created, 1);
        assert_eq!(report.events_failed, 1);
        assert_eq!(icloud.created()[0].summary, "Planning");
        assert_eq!(log.len(), 2);
    }

    #[tokio::test]
    async fn test_timeless_events_only_count_as_processed() {
        let mut broken = timed(Source::Google, "Broken", (9, 0), (9, 30));
        broken.start = None;
        let google = MemoryBackend::new(Source::Google).with_events(vec![broken]);
        let icloud = MemoryBackend::new(Source::ICloud);

        let (report, log) = run(&google, &icloud, SyncDirection::Both, false).await;

        assert_eq!(report.events_processed, 1);
        assert_eq!(report.events_created + report.events_updated + report.events_skipped, 0);
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_swapped_backends_rejected() {
        let google = MemoryBackend::new(Source::Google);
        let icloud = MemoryBackend::new(Source::ICloud);
        let mut log: Vec<ActionEntry> = Vec::new();

        let result = SyncSession::new(&icloud, &google, settings(SyncDirection::Both))
            .sync(&DateRange::upcoming(30).unwrap(), false, &mut log)
            .await;

        assert!(matches!(result, Err(CalSyncError::Sync(_))));
    }
}
