use anyhow::Result;
use calsync_core::config::Settings;
use calsync_core::sync::{SourceOfTruth, SyncDirection};
use owo_colors::OwoColorize;

pub fn run(source: Option<SourceOfTruth>) -> Result<()> {
    let mut settings = Settings::load()?;

    if let Some(source) = source {
        settings.set_source_of_truth(source)?;
        println!("{} Source of truth set to: {}", "✓".green(), source);
        return Ok(());
    }

    let config_path = Settings::config_path()?;

    println!("{}", "Current Configuration".bold());
    println!("  Config file:     {}", config_path.display());
    println!("  Sync Direction:  {}", settings.sync_direction);
    println!("  Source of Truth: {}", settings.source_of_truth);
    println!("  Timezone:        {}", settings.timezone);
    println!("  Sync Days:       {}", settings.sync_days);

    if settings.sync_direction == SyncDirection::Both
        && settings.source_of_truth == SourceOfTruth::Auto
    {
        println!();
        println!(
            "{}",
            "Tip: For bidirectional sync, set source of truth to resolve conflicts:".yellow()
        );
        println!("   calsync config --source google");
        println!("   calsync config --source icloud");
    }

    Ok(())
}
