//! In-memory backend and event builders for engine tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::backend::Backend;
use crate::date_range::DateRange;
use crate::error::{CalSyncError, CalSyncResult};
use crate::event::{CanonicalEvent, EventTime, Source};

#[derive(Default)]
struct State {
    events: Vec<CanonicalEvent>,
    created: Vec<CanonicalEvent>,
    updated: Vec<(String, CanonicalEvent)>,
    attempted_creates: usize,
    attempted_updates: usize,
    next_id: usize,
}

/// A backend that keeps its events in memory and records every mutation.
///
/// Successful creates and updates are applied to the stored events, so a
/// second pass sees the result of the first.
pub struct MemoryBackend {
    source: Source,
    state: Mutex<State>,
    fail_fetch: bool,
    fail_creates: bool,
    fail_updates: bool,
}

impl MemoryBackend {
    pub fn new(source: Source) -> Self {
        MemoryBackend {
            source,
            state: Mutex::new(State::default()),
            fail_fetch: false,
            fail_creates: false,
            fail_updates: false,
        }
    }

    pub fn with_events(self, events: Vec<CanonicalEvent>) -> Self {
        self.state.lock().unwrap().events = events;
        self
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    pub fn failing_creates(mut self) -> Self {
        self.fail_creates = true;
        self
    }

    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    pub fn events(&self) -> Vec<CanonicalEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn created(&self) -> Vec<CanonicalEvent> {
        self.state.lock().unwrap().created.clone()
    }

    /// `(target id, new content)` for each successful update.
    pub fn updated(&self) -> Vec<(String, CanonicalEvent)> {
        self.state.lock().unwrap().updated.clone()
    }

    pub fn attempted_creates(&self) -> usize {
        self.state.lock().unwrap().attempted_creates
    }

    pub fn attempted_updates(&self) -> usize {
        self.state.lock().unwrap().attempted_updates
    }

    /// Every create/update call made, successful or not.
    pub fn mutation_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.attempted_creates + state.attempted_updates
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn source(&self) -> Source {
        self.source
    }

    async fn list_events(&self, _range: &DateRange) -> CalSyncResult<Vec<CanonicalEvent>> {
        if self.fail_fetch {
            return Err(CalSyncError::Provider("connection refused".to_string()));
        }
        Ok(self.events())
    }

    async fn create_event(&self, event: &CanonicalEvent) -> CalSyncResult<String> {
        let mut state = self.state.lock().unwrap();
        state.attempted_creates += 1;
        if self.fail_creates {
            return Err(CalSyncError::Provider("create rejected".to_string()));
        }

        state.next_id += 1;
        let id = format!("{}-new-{}", self.source, state.next_id);
        let mut stored = event.clone();
        stored.id = id.clone();
        stored.source = self.source;

        state.created.push(event.clone());
        state.events.push(stored);
        Ok(id)
    }

    async fn update_event(
        &self,
        target: &CanonicalEvent,
        event: &CanonicalEvent,
    ) -> CalSyncResult<()> {
        let mut state = self.state.lock().unwrap();
        state.attempted_updates += 1;
        if self.fail_updates {
            return Err(CalSyncError::Provider("update rejected".to_string()));
        }

        let existing = state
            .events
            .iter_mut()
            .find(|e| e.id == target.id)
            .ok_or_else(|| CalSyncError::Provider(format!("No event with id {}", target.id)))?;
        let mut stored = event.clone();
        stored.id = target.id.clone();
        stored.source = self.source;
        *existing = stored;

        state.updated.push((target.id.clone(), event.clone()));
        Ok(())
    }
}

/// 2024-01-01 at the given UTC time.
pub fn utc(h: u32, m: u32, s: u32) -> EventTime {
    EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap())
}

/// A timed event on 2024-01-01 (UTC) with an id unique per source, title and start.
pub fn timed(source: Source, summary: &str, start: (u32, u32), end: (u32, u32)) -> CanonicalEvent {
    CanonicalEvent {
        id: format!("{}:{}@{:02}{:02}", source, summary, start.0, start.1),
        summary: summary.to_string(),
        description: String::new(),
        location: String::new(),
        start: Some(utc(start.0, start.1, 0)),
        end: Some(utc(end.0, end.1, 0)),
        all_day: false,
        source,
        raw: serde_json::Value::Null,
    }
}
