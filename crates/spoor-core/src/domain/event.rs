//! Tracked events and their enrichment rules
//!
//! A tracked event is ephemeral: constructed per call, enriched with the
//! caller's identity, forwarded to the configured sinks, and never
//! persisted locally.

use serde_json::{Map, Value};

use super::errors::DomainError;
use super::newtypes::{SessionId, UserId};

/// A named analytics event with identity attribution.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEvent {
    name: String,
    params: Map<String, Value>,
    user_id: UserId,
    session_id: SessionId,
}

impl TrackedEvent {
    /// Builds an event, rejecting empty names.
    pub fn new(
        name: impl Into<String>,
        params: Map<String, Value>,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidEventName(
                "event name must not be empty".into(),
            ));
        }
        Ok(Self {
            name,
            params,
            user_id,
            session_id,
        })
    }

    /// The event name as delivered to sinks.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The caller-supplied parameters, before enrichment.
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// The wire payload: params plus `userId`/`sessionId`.
    ///
    /// Identity keys always overwrite same-named keys supplied by the
    /// caller, so attribution cannot be spoofed by event parameters.
    pub fn enriched_params(&self) -> Map<String, Value> {
        let mut enriched = self.params.clone();
        enriched.insert(
            "userId".to_string(),
            Value::String(self.user_id.as_str().to_string()),
        );
        enriched.insert(
            "sessionId".to_string(),
            Value::String(self.session_id.to_string()),
        );
        enriched
    }
}
