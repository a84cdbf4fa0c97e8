mod commands;
mod render;
mod utils;

use anyhow::Result;
use calsync_core::Source;
use calsync_core::sync::SourceOfTruth;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "calsync")]
#[command(about = "Keep Google Calendar and iCloud in sync without duplicates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync events between Google Calendar and iCloud
    Sync {
        /// Number of days to sync, starting now (defaults to sync_days from config)
        #[arg(long, conflicts_with_all = ["from", "to"])]
        days: Option<i64>,

        /// Start of the window (YYYY-MM-DD), used together with --to
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// End of the window (YYYY-MM-DD, exclusive), used together with --from
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Show what would be synced without making changes
        #[arg(long)]
        dry_run: bool,
    },
    /// Check the connection to both calendars
    Status,
    /// Show the configuration, or change the source of truth
    Config {
        /// Which calendar wins conflicting reschedules: google, icloud or auto
        #[arg(long)]
        source: Option<SourceOfTruth>,
    },
    /// Sign in to a calendar provider (both when omitted)
    Auth {
        /// google or icloud
        calendar: Option<Source>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Sync {
            days,
            from,
            to,
            dry_run,
        } => commands::sync::run(commands::sync::Window { days, from, to }, dry_run).await,
        Commands::Status => commands::status::run().await,
        Commands::Config { source } => commands::config::run(source),
        Commands::Auth { calendar } => commands::auth::run(calendar).await,
    }
}

/// Diagnostics go to stderr so they never interleave with the action log.
fn init_logging() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {}", e))?;

    Ok(())
}
