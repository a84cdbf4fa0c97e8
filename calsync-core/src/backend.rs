//! The boundary between the engine and a calendar store.

use async_trait::async_trait;

use crate::date_range::DateRange;
use crate::error::CalSyncResult;
use crate::event::{CanonicalEvent, Source};

/// A calendar store the engine can read from and write to.
///
/// Identity across stores is never assumed: `create_event` returns whatever
/// native id the store assigns, and `update_event` receives the target-side
/// record (id plus native payload) that the matcher paired with `event`.
#[async_trait]
pub trait Backend: Send + Sync {
    fn source(&self) -> Source;

    /// Normalized events within `range`. Items that cannot be decoded are
    /// dropped with a warning; the fetch only fails as a whole.
    async fn list_events(&self, range: &DateRange) -> CalSyncResult<Vec<CanonicalEvent>>;

    /// Create `event` in this store and return its native id.
    async fn create_event(&self, event: &CanonicalEvent) -> CalSyncResult<String>;

    /// Overwrite `target` (an event of this store) with the content of `event`.
    async fn update_event(
        &self,
        target: &CanonicalEvent,
        event: &CanonicalEvent,
    ) -> CalSyncResult<()>;
}
