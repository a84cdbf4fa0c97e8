use anyhow::{Context, Result};
use calsync_core::Source;
use calsync_core::config::Settings;
use calsync_core::date_range::DateRange;
use calsync_core::sync::SyncSession;
use owo_colors::OwoColorize;

use crate::render::{ConsoleLog, Render};
use crate::utils::tui;

/// Which window to sync, as given on the command line.
pub struct Window {
    pub days: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl Window {
    fn resolve(self, settings: &Settings) -> Result<DateRange> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Ok(DateRange::from_args(&from, &to)?),
            (None, None) => Ok(DateRange::upcoming(self.days.unwrap_or(settings.sync_days))?),
            _ => anyhow::bail!("--from and --to must be given together"),
        }
    }
}

pub async fn run(window: Window, dry_run: bool) -> Result<()> {
    let settings = Settings::load()?;
    let range = window.resolve(&settings)?;
    let google = super::remote(&settings, Source::Google)?;
    let icloud = super::remote(&settings, Source::ICloud)?;

    println!(
        "Syncing calendars from {} to {}",
        range.from.date_naive(),
        range.to.date_naive()
    );
    if dry_run {
        println!("{}", "DRY RUN: No changes will be made".yellow());
    }
    println!();

    let mut log = ConsoleLog::new(tui::create_spinner("Fetching events".to_string()));
    let result = SyncSession::new(&google, &icloud, settings.sync_settings()?)
        .sync(&range, dry_run, &mut log)
        .await;
    log.clear_spinner();

    let report = result.context("Error during sync")?;
    println!("{}", report.render());

    Ok(())
}
