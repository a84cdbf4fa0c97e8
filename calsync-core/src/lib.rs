//! Core of calsync: reconciling events between Google Calendar and iCloud.
//!
//! Events from both stores are normalized into [`CanonicalEvent`]s, matched
//! by content (there is no shared identifier), and the differences are
//! written back through [`Backend`]s:
//! - `normalize` turns native payloads into canonical events
//! - `matcher` decides whether an event already exists on the other side
//! - `sync` runs directional and bidirectional passes
//! - `remote` talks to the provider binaries that own each store

pub mod backend;
pub mod config;
pub mod constants;
pub mod convert;
pub mod date_range;
pub mod error;
pub mod event;
pub mod matcher;
pub mod normalize;
pub mod remote;
pub mod sync;
pub mod time;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::Backend;
pub use event::{CanonicalEvent, EventTime, Source};
