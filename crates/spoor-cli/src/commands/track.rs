//! Track command - send a manual analytics event
//!
//! Parameters are passed as `key=value` pairs; values that parse as JSON
//! keep their type, everything else is sent as a string.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value};

use crate::context::AppContext;
use crate::output::Printer;

#[derive(Debug, Args)]
pub struct TrackCommand {
    /// Event name, e.g. `signup_clicked`
    pub name: String,

    /// Event parameter as key=value (repeatable)
    #[arg(long = "param", short = 'p', value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

impl TrackCommand {
    pub async fn execute(&self, printer: &Printer, config: Option<&Path>) -> Result<()> {
        let ctx = AppContext::load(config)?;
        ctx.consent_gate().init().await;

        let mut params = Map::new();
        for raw in &self.params {
            let (key, value) = parse_param(raw)
                .with_context(|| format!("Invalid --param value: '{raw}'. Expected KEY=VALUE"))?;
            params.insert(key, value);
        }

        ctx.interceptor.track_event(&self.name, params).await;

        let available: Vec<&str> = ctx
            .sinks
            .iter()
            .filter(|s| s.is_available())
            .map(|s| s.name())
            .collect();
        if available.is_empty() {
            printer.warn("No analytics sink is configured; the event went nowhere");
        } else {
            printer.success(&format!(
                "Tracked '{}' to {}",
                self.name,
                available.join(", ")
            ));
        }
        Ok(())
    }
}

/// Splits `key=value`, parsing the value as JSON when possible.
fn parse_param(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("missing '='"))?;
    if key.is_empty() {
        anyhow::bail!("empty key");
    }

    let parsed = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), parsed))
}
