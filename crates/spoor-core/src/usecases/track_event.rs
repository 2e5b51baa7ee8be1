//! Event tracking use case
//!
//! Enriches a named event with the caller's identity and fans it out to
//! every configured sink that is currently available. Delivery is
//! best-effort per sink: an unavailable sink is silently skipped, a failing
//! sink is logged and skipped, and neither outcome affects the others.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::TrackedEvent;
use crate::identity::SessionIdentityProvider;
use crate::ports::IAnalyticsSink;

/// Use case for forwarding enriched events to analytics sinks.
pub struct EventTracker {
    identity: Arc<SessionIdentityProvider>,
    sinks: Vec<Arc<dyn IAnalyticsSink>>,
}

impl EventTracker {
    /// Creates a tracker delivering to the given sinks.
    pub fn new(identity: Arc<SessionIdentityProvider>, sinks: Vec<Arc<dyn IAnalyticsSink>>) -> Self {
        Self { identity, sinks }
    }

    /// The configured sinks, in delivery order.
    pub fn sinks(&self) -> &[Arc<dyn IAnalyticsSink>] {
        &self.sinks
    }

    /// Enrich `params` with identity and deliver to all available sinks.
    ///
    /// Never returns an error: tracking must not disturb the caller.
    /// Partial delivery (one sink succeeds, another fails) is accepted.
    pub async fn track(&self, name: &str, params: Map<String, Value>) {
        let event = match TrackedEvent::new(
            name,
            params,
            self.identity.user_id(),
            self.identity.session_id(),
        ) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping untrackable event");
                return;
            }
        };

        self.deliver(&event).await;
    }

    /// Deliver an already-built event to all available sinks.
    pub(crate) async fn deliver(&self, event: &TrackedEvent) {
        for sink in &self.sinks {
            if !sink.is_available() {
                continue;
            }
            if let Err(e) = sink.capture(event).await {
                tracing::warn!(sink = sink.name(), error = %e, "Event delivery failed");
            }
        }
    }
}
