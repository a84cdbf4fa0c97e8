//! User settings at ~/.config/calsync/config.toml, overlaid by `CALSYNC_*`
//! environment variables.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SYNC_DAYS, DEFAULT_TIMEZONE};
use crate::date_range::DateRange;
use crate::error::{CalSyncError, CalSyncResult};
use crate::event::Source;
use crate::remote::RemoteConfig;
use crate::sync::{SourceOfTruth, SyncDirection};

const ENV_PREFIX: &str = "CALSYNC";

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_sync_days() -> i64 {
    DEFAULT_SYNC_DAYS
}

fn default_google() -> RemoteConfig {
    RemoteConfig::for_source(Source::Google)
}

fn default_icloud() -> RemoteConfig {
    RemoteConfig::for_source(Source::ICloud)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub sync_direction: SyncDirection,

    #[serde(default)]
    pub source_of_truth: SourceOfTruth,

    /// IANA zone used to read naive times
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_sync_days")]
    pub sync_days: i64,

    #[serde(default = "default_google")]
    pub google: RemoteConfig,

    #[serde(default = "default_icloud")]
    pub icloud: RemoteConfig,
}

/// The part of the settings the engine runs on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncSettings {
    pub direction: SyncDirection,
    pub source_of_truth: SourceOfTruth,
    pub timezone: Tz,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            direction: SyncDirection::Both,
            source_of_truth: SourceOfTruth::Auto,
            timezone: chrono_tz::America::New_York,
        }
    }
}

impl Settings {
    pub fn config_path() -> CalSyncResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalSyncError::Config("Could not determine config directory".into()))?
            .join("calsync");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default config file (optional) and the environment.
    pub fn load() -> CalSyncResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> CalSyncResult<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text alone, without the environment.
    pub fn from_toml(contents: &str) -> CalSyncResult<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> CalSyncResult<()> {
        self.tz()?;

        DateRange::upcoming(self.sync_days).map_err(|e| {
            CalSyncError::Config(format!("Invalid sync_days {}: {e}", self.sync_days))
        })?;

        Ok(())
    }

    pub fn tz(&self) -> CalSyncResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| CalSyncError::Config(format!("Unknown timezone '{}'", self.timezone)))
    }

    pub fn sync_settings(&self) -> CalSyncResult<SyncSettings> {
        Ok(SyncSettings {
            direction: self.sync_direction,
            source_of_truth: self.source_of_truth,
            timezone: self.tz()?,
        })
    }

    pub fn remote_config(&self, source: Source) -> &RemoteConfig {
        match source {
            Source::Google => &self.google,
            Source::ICloud => &self.icloud,
        }
    }

    /// Persist a new source of truth to the default config file.
    pub fn set_source_of_truth(&mut self, value: SourceOfTruth) -> CalSyncResult<()> {
        write_key(&Self::config_path()?, "source_of_truth", value.as_str())?;
        self.source_of_truth = value;
        Ok(())
    }
}

/// Set one top-level key in a TOML file, keeping everything else.
pub fn write_key(path: &Path, key: &str, value: &str) -> CalSyncResult<()> {
    let mut table = if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        contents
            .parse::<toml::Table>()
            .map_err(|e| CalSyncError::Config(format!("Could not parse {}: {e}", path.display())))?
    } else {
        toml::Table::new()
    };

    table.insert(key.to_string(), toml::Value::String(value.to_string()));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            CalSyncError::Config(format!("Could not create config directory: {e}"))
        })?;
    }

    let contents = toml::to_string_pretty(&table).map_err(|e| CalSyncError::Config(e.to_string()))?;
    std::fs::write(path, contents)
        .map_err(|e| CalSyncError::Config(format!("Could not write config file: {e}")))?;

    Ok(())
}
