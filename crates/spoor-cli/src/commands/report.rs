//! Report command - send a manual error report
//!
//! Builds a captured error from the command line and pushes it through the
//! reporter: Firestore append plus the condensed mirror event.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value};

use spoor_core::domain::CapturedError;

use crate::context::AppContext;
use crate::output::Printer;

#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Error message to report
    pub message: String,

    /// Stack or backtrace text to attach
    #[arg(long)]
    pub stack: Option<String>,

    /// Context entry as key=value (repeatable)
    #[arg(long = "context", short = 'c', value_name = "KEY=VALUE")]
    pub context: Vec<String>,
}

impl ReportCommand {
    pub async fn execute(&self, printer: &Printer, config: Option<&Path>) -> Result<()> {
        let ctx = AppContext::load(config)?;
        ctx.consent_gate().init().await;

        if !ctx.firestore_configured() {
            printer.warn("Firestore is not configured; the report will not be stored");
        }

        let mut error = CapturedError::new(&self.message);
        if let Some(stack) = &self.stack {
            error = error.with_stack(stack);
        }

        let mut context = Map::new();
        context.insert("source".to_string(), Value::String("manual".to_string()));
        for raw in &self.context {
            let (key, value) = raw
                .split_once('=')
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .with_context(|| format!("Invalid --context value: '{raw}'. Expected KEY=VALUE"))?;
            context.insert(key, value);
        }

        ctx.interceptor.log_error(&error, context).await;
        printer.success(&format!("Reported '{}'", self.message));
        Ok(())
    }
}
