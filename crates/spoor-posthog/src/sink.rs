//! PostHog capture sink
//!
//! Delivers enriched events with `POST /capture/`, authenticated by the
//! project API key carried in the request body. When session recording is
//! enabled, the sink also owns the recording session id used to correlate
//! error reports with their replay.

use chrono::Utc;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use spoor_core::config::PosthogConfig;
use spoor_core::domain::TrackedEvent;
use spoor_core::ports::{IAnalyticsSink, ISessionReplay};

/// Errors from PostHog capture calls.
#[derive(Debug, Error)]
pub enum PosthogError {
    /// Transport-level failure
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The capture endpoint answered with a non-success status
    #[error("capture returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Analytics sink delivering to a PostHog instance.
pub struct PosthogSink {
    client: Client,
    host: String,
    api_key: Option<String>,
    /// Recording session id, present while session recording is on.
    /// One id per process, mirroring one recording per page load.
    recording_session_id: Option<String>,
}

impl PosthogSink {
    /// Creates a sink for `host` with the given project API key and
    /// session recording enabled.
    pub fn new(api_key: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            host: host.into(),
            api_key: Some(api_key.into()),
            recording_session_id: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Creates a sink from configuration. A missing API key yields an
    /// unavailable sink; disabled session recording yields no replay
    /// correlation.
    pub fn from_config(config: &PosthogConfig) -> Self {
        let api_key = config.api_key.clone();
        let recording_session_id = if api_key.is_some() && config.session_recording {
            Some(Uuid::new_v4().to_string())
        } else {
            None
        };

        Self {
            client: Client::new(),
            host: config.host.clone(),
            api_key,
            recording_session_id,
        }
    }

    /// Disables session recording (builder style).
    pub fn without_recording(mut self) -> Self {
        self.recording_session_id = None;
        self
    }

    /// The instance host this sink talks to.
    pub fn host(&self) -> &str {
        &self.host
    }
}

#[async_trait::async_trait]
impl IAnalyticsSink for PosthogSink {
    fn name(&self) -> &'static str {
        "posthog"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn capture(&self, event: &TrackedEvent) -> anyhow::Result<()> {
        let Some(api_key) = &self.api_key else {
            anyhow::bail!("PostHog sink is not configured");
        };

        let url = format!("{}/capture/", self.host.trim_end_matches('/'));
        let body = serde_json::json!({
            "api_key": api_key,
            "event": event.name(),
            "distinct_id": event.user_id().as_str(),
            "properties": event.enriched_params(),
            "timestamp": Utc::now().to_rfc3339(),
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(PosthogError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PosthogError::Status { status, body }.into());
        }

        debug!(event = event.name(), "Delivered event to PostHog");
        Ok(())
    }
}

impl ISessionReplay for PosthogSink {
    fn replay_session_id(&self) -> Option<String> {
        self.recording_session_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_sink_is_unavailable() {
        let sink = PosthogSink::from_config(&PosthogConfig::default());
        assert!(!sink.is_available());
        assert!(sink.replay_session_id().is_none());
    }

    #[test]
    fn test_configured_sink_has_recording_session() {
        let config = PosthogConfig {
            api_key: Some("phc_test".into()),
            ..Default::default()
        };
        let sink = PosthogSink::from_config(&config);
        assert!(sink.is_available());
        assert!(sink.replay_session_id().is_some());
    }

    #[test]
    fn test_recording_can_be_disabled() {
        let config = PosthogConfig {
            api_key: Some("phc_test".into()),
            session_recording: false,
            ..Default::default()
        };
        let sink = PosthogSink::from_config(&config);
        assert!(sink.is_available());
        assert!(sink.replay_session_id().is_none());
    }

    #[test]
    fn test_recording_session_id_is_stable() {
        let sink = PosthogSink::new("phc_test", "https://app.posthog.com");
        assert_eq!(sink.replay_session_id(), sink.replay_session_id());
    }
}
