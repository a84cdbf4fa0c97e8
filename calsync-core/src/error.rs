//! Error types for calsync.

use thiserror::Error;

use crate::event::Source;

/// Errors that can occur in calsync operations.
#[derive(Error, Debug)]
pub enum CalSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider binary '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("Failed to fetch {} events: {source}", calendar.calendar_name())]
    Fetch {
        calendar: Source,
        #[source]
        source: Box<CalSyncError>,
    },

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("Sync failed: {0}")]
    Sync(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<config::ConfigError> for CalSyncError {
    fn from(err: config::ConfigError) -> Self {
        CalSyncError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CalSyncError {
    fn from(err: serde_json::Error) -> Self {
        CalSyncError::Serialization(err.to_string())
    }
}

/// Result type alias for calsync operations.
pub type CalSyncResult<T> = Result<T, CalSyncError>;
