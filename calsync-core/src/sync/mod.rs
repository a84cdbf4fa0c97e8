//! The reconciliation engine: directional passes, the bidirectional
//! coordinator and the session that drives them.

mod action;
mod coordinator;
mod direction;
mod session;
mod stats;
mod syncer;

pub use action::{ActionEntry, ActionKind, ActionLog, SkipReason};
pub use direction::{Direction, SourceOfTruth, SyncDirection};
pub use session::SyncSession;
pub use stats::{DirectionStats, SyncReport};
pub use syncer::Syncer;
