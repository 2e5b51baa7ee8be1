//! Errors command - administrative view of the remote error log
//!
//! Lists all stored error records, unfiltered and unpaginated, in the
//! order the store returns them.

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;

use crate::context::AppContext;
use crate::output::Printer;

#[derive(Debug, Subcommand)]
pub enum ErrorsCommand {
    /// List all stored error records
    List,
}

impl ErrorsCommand {
    pub async fn execute(&self, printer: &Printer, config: Option<&Path>) -> Result<()> {
        match self {
            ErrorsCommand::List => self.list(printer, config).await,
        }
    }

    async fn list(&self, printer: &Printer, config: Option<&Path>) -> Result<()> {
        let ctx = AppContext::load(config)?;

        if !ctx.firestore_configured() {
            printer.warn("Firestore is not configured; nothing to list");
            return Ok(());
        }

        let records = ctx.store.list().await?;

        if printer.json_mode() {
            printer.value(&serde_json::to_value(&records)?);
            return Ok(());
        }

        if records.is_empty() {
            printer.info("No error records stored");
            return Ok(());
        }

        println!(
            "{:<22} {:<38} {:<40} REPLAY",
            "TIMESTAMP", "USER", "MESSAGE"
        );
        for record in &records {
            println!(
                "{:<22} {:<38} {:<40} {}",
                record.timestamp().format("%Y-%m-%d %H:%M:%S"),
                record.user_id(),
                truncate(record.message(), 40),
                record.replay_locator().unwrap_or("-"),
            );
        }
        printer.info(&format!("{} record(s)", records.len()));
        Ok(())
    }
}

/// Shortens a message to `max` characters with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(max.saturating_sub(1)).collect();
    shortened.push('\u{2026}');
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate("boom", 40), "boom");
    }

    #[test]
    fn test_truncate_long_text() {
        let long = "x".repeat(60);
        let shortened = truncate(&long, 40);
        assert_eq!(shortened.chars().count(), 40);
        assert!(shortened.ends_with('\u{2026}'));
    }
}
