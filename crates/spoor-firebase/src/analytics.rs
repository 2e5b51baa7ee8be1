//! GA4 analytics sink via the Measurement Protocol
//!
//! Delivers enriched events with `POST /mp/collect`, authenticated by
//! measurement id and API secret. A sink built without credentials reports
//! itself unavailable and is skipped by the tracker.

use reqwest::Client;
use tracing::debug;

use spoor_core::config::FirebaseConfig;
use spoor_core::domain::TrackedEvent;
use spoor_core::ports::IAnalyticsSink;

use crate::error::FirebaseError;

/// Base URL for the Measurement Protocol.
const MEASUREMENT_BASE_URL: &str = "https://www.google-analytics.com";

struct Credentials {
    measurement_id: String,
    api_secret: String,
}

/// Analytics sink delivering to Google Analytics 4.
pub struct GaAnalyticsSink {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl GaAnalyticsSink {
    /// Creates a sink with explicit credentials.
    pub fn new(measurement_id: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self::build(
            MEASUREMENT_BASE_URL,
            Some(Credentials {
                measurement_id: measurement_id.into(),
                api_secret: api_secret.into(),
            }),
        )
    }

    /// Creates a sink from configuration; missing credentials yield an
    /// unavailable sink rather than an error.
    pub fn from_config(config: &FirebaseConfig) -> Self {
        let credentials = match (&config.measurement_id, &config.api_secret) {
            (Some(measurement_id), Some(api_secret)) => Some(Credentials {
                measurement_id: measurement_id.clone(),
                api_secret: api_secret.clone(),
            }),
            _ => None,
        };
        Self::build(MEASUREMENT_BASE_URL, credentials)
    }

    /// Creates a sink with a custom base URL (useful for testing).
    pub fn with_base_url(
        measurement_id: impl Into<String>,
        api_secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self::build(
            base_url,
            Some(Credentials {
                measurement_id: measurement_id.into(),
                api_secret: api_secret.into(),
            }),
        )
    }

    fn build(base_url: impl Into<String>, credentials: Option<Credentials>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }
}

#[async_trait::async_trait]
impl IAnalyticsSink for GaAnalyticsSink {
    fn name(&self) -> &'static str {
        "ga4"
    }

    fn is_available(&self) -> bool {
        self.credentials.is_some()
    }

    async fn capture(&self, event: &TrackedEvent) -> anyhow::Result<()> {
        let Some(credentials) = &self.credentials else {
            anyhow::bail!("GA4 sink is not configured");
        };

        let url = format!("{}/mp/collect", self.base_url);
        let body = serde_json::json!({
            "client_id": event.user_id().as_str(),
            "events": [{
                "name": event.name(),
                "params": event.enriched_params(),
            }],
        });

        let response = self
            .client
            .post(&url)
            .query(&[
                ("measurement_id", credentials.measurement_id.as_str()),
                ("api_secret", credentials.api_secret.as_str()),
            ])
            .json(&body)
            .send()
            .await
            .map_err(FirebaseError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FirebaseError::Status { status, body }.into());
        }

        debug!(event = event.name(), "Delivered event to GA4");
        Ok(())
    }
}
