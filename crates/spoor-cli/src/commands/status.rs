//! Status command - inspect the pipeline configuration and identity

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::context::AppContext;
use crate::output::Printer;

#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn execute(&self, printer: &Printer, config: Option<&Path>) -> Result<()> {
        let ctx = AppContext::load(config)?;
        let gate = ctx.consent_gate();
        gate.init().await;

        let consent = gate.current();
        let user_id = ctx.identity.user_id();
        let session_id = ctx.identity.session_id();

        let sinks: Vec<serde_json::Value> = ctx
            .sinks
            .iter()
            .map(|sink| {
                serde_json::json!({
                    "name": sink.name(),
                    "available": sink.is_available(),
                })
            })
            .collect();

        if printer.json_mode() {
            printer.value(&serde_json::json!({
                "consent": consent.to_string(),
                "instrumentationActive": ctx.interceptor.is_active(),
                "userId": user_id.as_str(),
                "sessionId": session_id.to_string(),
                "errorStoreConfigured": ctx.firestore_configured(),
                "sinks": sinks,
            }));
            return Ok(());
        }

        println!("Consent:         {}", consent);
        println!(
            "Instrumentation: {}",
            if ctx.interceptor.is_active() {
                "active"
            } else {
                "inactive"
            }
        );
        println!("User id:         {}", user_id);
        println!("Session id:      {}", session_id);
        println!(
            "Error store:     {}",
            if ctx.firestore_configured() {
                "firestore"
            } else {
                "not configured"
            }
        );
        println!("Replay host:     {}", ctx.config.posthog.host);
        for sink in &ctx.sinks {
            println!(
                "Sink {:<10}  {}",
                sink.name(),
                if sink.is_available() {
                    "available"
                } else {
                    "not configured"
                }
            );
        }
        Ok(())
    }
}
