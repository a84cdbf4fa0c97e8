//! Coloured terminal rendering for calsync-core types.

use calsync_core::sync::{ActionEntry, ActionKind, ActionLog, SyncReport};
use indicatif::ProgressBar;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for ActionEntry {
    fn render(&self) -> String {
        let headline = match self.kind {
            ActionKind::Create => self.headline().green().to_string(),
            ActionKind::Update | ActionKind::Reschedule { .. } => {
                self.headline().yellow().to_string()
            }
            ActionKind::Skip { .. } => self.headline().dimmed().to_string(),
        };

        let mut lines = Vec::new();
        if self.dry_run {
            lines.push(format!("{}{}", "[DRY RUN] ".cyan(), headline));
        } else {
            lines.push(headline);
        }
        for detail in self.details() {
            lines.push(format!("  └─ {}", detail.dimmed()));
        }

        lines.join("\n")
    }
}

impl Render for SyncReport {
    fn render(&self) -> String {
        let mut lines = vec![
            "Sync completed successfully!".green().bold().to_string(),
            format!("Events processed: {}", self.events_processed),
            format!("Events created: {}", self.events_created),
            format!("Events updated: {}", self.events_updated),
            format!("Events skipped: {} (duplicates avoided)", self.events_skipped),
        ];

        if self.events_failed > 0 {
            lines.push(
                format!("Events failed: {} (see warnings above)", self.events_failed)
                    .red()
                    .to_string(),
            );
        }

        lines.join("\n")
    }
}

/// Prints action entries as they are decided.
///
/// Owns the fetch spinner and clears it before the first line is printed.
pub struct ConsoleLog {
    spinner: Option<ProgressBar>,
}

impl ConsoleLog {
    pub fn new(spinner: ProgressBar) -> Self {
        ConsoleLog {
            spinner: Some(spinner),
        }
    }

    pub fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl ActionLog for ConsoleLog {
    fn record(&mut self, entry: ActionEntry) {
        self.clear_spinner();
        println!("{}\n", entry.render());
    }

    fn notice(&mut self, message: &str) {
        self.clear_spinner();
        println!("{}\n", message.bold());
    }
}
