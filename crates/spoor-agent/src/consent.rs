//! Consent gate
//!
//! Reads and persists the user's tracking decision and drives interceptor
//! activation from it. Instrumentation is strictly opt-in: the interceptor
//! is never active unless the persisted state is `granted`.

use std::sync::Arc;

use anyhow::Context;

use spoor_core::domain::ConsentState;
use spoor_core::ports::{IKeyValueStore, CONSENT_KEY};

use crate::interceptor::Interceptor;

/// Persisted consent flag gating the interceptor.
pub struct ConsentGate {
    storage: Arc<dyn IKeyValueStore>,
    interceptor: Arc<Interceptor>,
}

impl ConsentGate {
    /// Creates a gate over the given storage and interceptor.
    pub fn new(storage: Arc<dyn IKeyValueStore>, interceptor: Arc<Interceptor>) -> Self {
        Self {
            storage,
            interceptor,
        }
    }

    /// The persisted consent decision. Storage failures and unrecognized
    /// values read as `Unset`.
    pub fn current(&self) -> ConsentState {
        match self.storage.get(CONSENT_KEY) {
            Ok(value) => ConsentState::from_stored(value.as_deref()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read consent state");
                ConsentState::Unset
            }
        }
    }

    /// Startup hook: if consent was granted in an earlier session,
    /// activate instrumentation without re-prompting.
    ///
    /// Activation failure is logged and leaves the interceptor Inactive;
    /// it does not propagate, since startup must proceed either way.
    pub async fn init(&self) {
        if self.current().is_granted() {
            if let Err(e) = self.interceptor.activate().await {
                tracing::error!(error = %e, "Failed to activate instrumentation at startup");
            }
        }
    }

    /// Persist a grant and activate instrumentation.
    ///
    /// Idempotent: a second call after activation is a no-op because
    /// interceptor activation is re-entrant-safe.
    pub async fn grant(&self) -> anyhow::Result<()> {
        self.storage
            .set(CONSENT_KEY, "granted")
            .context("Failed to persist consent grant")?;

        if let Err(e) = self.interceptor.activate().await {
            tracing::error!(error = %e, "Failed to activate instrumentation");
            return Err(e);
        }
        Ok(())
    }

    /// Persist a denial and ensure instrumentation is inactive.
    pub fn deny(&self) -> anyhow::Result<()> {
        self.storage
            .set(CONSENT_KEY, "denied")
            .context("Failed to persist consent denial")?;

        self.interceptor.deactivate();
        Ok(())
    }
}
