//! Configuration types for calsync.

mod settings;

pub use settings::{Settings, SyncSettings, write_key};
