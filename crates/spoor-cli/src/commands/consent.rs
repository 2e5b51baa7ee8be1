//! Consent command - view and change tracking consent
//!
//! `spoor consent status` shows the persisted decision; `grant` persists
//! consent and activates instrumentation; `deny` persists the refusal and
//! tears instrumentation down.

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;

use crate::context::AppContext;
use crate::output::Printer;

#[derive(Debug, Subcommand)]
pub enum ConsentCommand {
    /// Show the current consent decision
    Status,
    /// Grant tracking consent and activate instrumentation
    Grant,
    /// Deny tracking consent
    Deny,
}

impl ConsentCommand {
    pub async fn execute(&self, printer: &Printer, config: Option<&Path>) -> Result<()> {
        let ctx = AppContext::load(config)?;
        let gate = ctx.consent_gate();

        match self {
            ConsentCommand::Status => {
                let state = gate.current();
                printer.value(&serde_json::json!({ "consent": state.to_string() }));
                if !printer.json_mode() {
                    println!("Consent: {}", state);
                }
            }
            ConsentCommand::Grant => {
                gate.grant().await?;
                printer.success("Consent granted; instrumentation active");
            }
            ConsentCommand::Deny => {
                gate.deny()?;
                printer.success("Consent denied; instrumentation inactive");
            }
        }
        Ok(())
    }
}
