use anyhow::Result;
use calsync_core::Source;
use calsync_core::config::Settings;
use owo_colors::OwoColorize;

pub async fn run(calendar: Option<Source>) -> Result<()> {
    let settings = Settings::load()?;
    let sources = match calendar {
        Some(source) => vec![source],
        None => vec![Source::Google, Source::ICloud],
    };

    for source in sources {
        let remote = super::remote(&settings, source)?;

        println!("Authenticating with {}...", source.calendar_name());

        // Provider handles the full sign-in flow and stores credentials/tokens
        let account = remote.authenticate().await?;

        println!(
            "{} {} authenticated as: {}\n",
            "✓".green(),
            source.calendar_name(),
            account
        );
    }

    println!("Run `calsync status` to check both connections.");

    Ok(())
}
