use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalSyncError;
use crate::event::Source;

/// Configured `sync_direction`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    #[default]
    Both,
    GoogleToIcloud,
    IcloudToGoogle,
}

impl SyncDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncDirection::Both => "both",
            SyncDirection::GoogleToIcloud => "google_to_icloud",
            SyncDirection::IcloudToGoogle => "icloud_to_google",
        }
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncDirection {
    type Err = CalSyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "both" => Ok(SyncDirection::Both),
            "google_to_icloud" => Ok(SyncDirection::GoogleToIcloud),
            "icloud_to_google" => Ok(SyncDirection::IcloudToGoogle),
            other => Err(CalSyncError::Config(format!(
                "Unknown sync direction '{}'. Expected both, google_to_icloud or icloud_to_google",
                other
            ))),
        }
    }
}

/// One pass of the engine: events flow from `source()` into `target()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    GoogleToICloud,
    ICloudToGoogle,
}

impl Direction {
    pub fn from_source(source: Source) -> Self {
        match source {
            Source::Google => Direction::GoogleToICloud,
            Source::ICloud => Direction::ICloudToGoogle,
        }
    }

    pub fn source(&self) -> Source {
        match self {
            Direction::GoogleToICloud => Source::Google,
            Direction::ICloudToGoogle => Source::ICloud,
        }
    }

    pub fn target(&self) -> Source {
        match self {
            Direction::GoogleToICloud => Source::ICloud,
            Direction::ICloudToGoogle => Source::Google,
        }
    }

    pub fn reverse(&self) -> Self {
        match self {
            Direction::GoogleToICloud => Direction::ICloudToGoogle,
            Direction::ICloudToGoogle => Direction::GoogleToICloud,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            self.source().calendar_name(),
            self.target().calendar_name()
        )
    }
}

/// Which store wins when both sides moved the same event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOfTruth {
    #[default]
    Auto,
    Google,
    #[serde(rename = "icloud")]
    ICloud,
}

impl SourceOfTruth {
    /// The winning store. `Auto` always picks Google.
    pub fn resolve(&self) -> Source {
        match self {
            SourceOfTruth::Auto | SourceOfTruth::Google => Source::Google,
            SourceOfTruth::ICloud => Source::ICloud,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceOfTruth::Auto => "auto",
            SourceOfTruth::Google => "google",
            SourceOfTruth::ICloud => "icloud",
        }
    }
}

impl fmt::Display for SourceOfTruth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceOfTruth {
    type Err = CalSyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(SourceOfTruth::Auto),
            "google" => Ok(SourceOfTruth::Google),
            "icloud" => Ok(SourceOfTruth::ICloud),
            other => Err(CalSyncError::Config(format!(
                "Unknown source of truth '{}'. Expected google, icloud or auto",
                other
            ))),
        }
    }
}
