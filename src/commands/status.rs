use anyhow::Result;
use calsync_core::Source;
use calsync_core::config::Settings;
use owo_colors::OwoColorize;

use crate::utils::tui;

pub async fn run() -> Result<()> {
    let settings = Settings::load()?;

    for source in [Source::Google, Source::ICloud] {
        let remote = super::remote(&settings, source)?;

        let spinner = tui::create_spinner(source.calendar_name().to_string());
        let result = remote.list_calendars().await;
        spinner.finish_and_clear();

        match result {
            Ok(calendars) => println!(
                "{} {}: Connected ({} calendars)",
                "✓".green(),
                source.calendar_name(),
                calendars.len()
            ),
            Err(e) => println!(
                "{} {}: Not connected ({})",
                "✗".red(),
                source.calendar_name(),
                e.to_string().dimmed()
            ),
        }
    }

    Ok(())
}
