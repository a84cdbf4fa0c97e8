pub mod auth;
pub mod config;
pub mod status;
pub mod sync;

use anyhow::Result;
use calsync_core::Source;
use calsync_core::config::Settings;
use calsync_core::remote::Remote;

/// Build the remote for one calendar from the settings.
pub fn remote(settings: &Settings, source: Source) -> Result<Remote> {
    Ok(Remote::new(
        source,
        settings.remote_config(source).clone(),
        settings.tz()?,
    ))
}
