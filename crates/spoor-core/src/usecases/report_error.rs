//! Error reporting use case
//!
//! Enriches a captured error with identity, the breadcrumb trail, and a
//! session-replay locator, appends it to the remote log store, and mirrors
//! a condensed event to the capture sink. Nothing in this pipeline may
//! throw back into application code: every failure is caught, logged, and
//! terminal at the point of catch.

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{Map, Value};

use crate::domain::{BreadcrumbTrail, CapturedError, ErrorRecord};
use crate::identity::SessionIdentityProvider;
use crate::ports::{IAnalyticsSink, IErrorStore, ISessionReplay};

/// Fixed event name for the condensed mirror of each error report.
pub const ERROR_MIRROR_EVENT: &str = "frontend_error";

/// Default replay host used when none is configured.
pub const DEFAULT_REPLAY_HOST: &str = "https://app.posthog.com";

/// Default replay project identifier.
pub const DEFAULT_REPLAY_PROJECT: &str = "default";

/// Builds the replay locator URL for a correlation id.
///
/// Returns `None` without a correlation id. A trailing slash on the host is
/// tolerated.
pub fn replay_locator(host: &str, project: &str, correlation_id: Option<&str>) -> Option<String> {
    correlation_id.map(|id| {
        format!(
            "{}/project/{}/replay/{}",
            host.trim_end_matches('/'),
            project,
            id
        )
    })
}

/// Use case for durable, non-throwing error reporting.
pub struct ErrorReporter {
    identity: Arc<SessionIdentityProvider>,
    store: Arc<dyn IErrorStore>,
    trail: Option<Arc<Mutex<BreadcrumbTrail>>>,
    mirror: Option<Arc<dyn IAnalyticsSink>>,
    replay: Option<Arc<dyn ISessionReplay>>,
    replay_host: String,
    replay_project: String,
}

impl ErrorReporter {
    /// Creates a reporter writing to the given store.
    pub fn new(identity: Arc<SessionIdentityProvider>, store: Arc<dyn IErrorStore>) -> Self {
        Self {
            identity,
            store,
            trail: None,
            mirror: None,
            replay: None,
            replay_host: DEFAULT_REPLAY_HOST.to_string(),
            replay_project: DEFAULT_REPLAY_PROJECT.to_string(),
        }
    }

    /// Attach the breadcrumb trail whose snapshot is merged into every
    /// report's context.
    pub fn with_trail(mut self, trail: Arc<Mutex<BreadcrumbTrail>>) -> Self {
        self.trail = Some(trail);
        self
    }

    /// Attach the sink receiving the condensed mirror event.
    pub fn with_mirror(mut self, sink: Arc<dyn IAnalyticsSink>) -> Self {
        self.mirror = Some(sink);
        self
    }

    /// Attach the session-replay correlation source.
    pub fn with_replay(mut self, replay: Arc<dyn ISessionReplay>) -> Self {
        self.replay = Some(replay);
        self
    }

    /// Override the replay locator host and project.
    pub fn with_replay_target(
        mut self,
        host: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        self.replay_host = host.into();
        self.replay_project = project.into();
        self
    }

    /// Report an error: enrich, append to the store, mirror.
    ///
    /// The append is awaited internally so delivery failures can be caught
    /// and logged here, but no failure escapes to the caller. The mirror is
    /// independent of the append: either side failing leaves the other
    /// untouched.
    pub async fn report(&self, error: &CapturedError, context: Map<String, Value>) {
        let user_id = self.identity.user_id();
        let session_id = self.identity.session_id();

        let correlation_id = self
            .replay
            .as_ref()
            .and_then(|replay| replay.replay_session_id());
        let locator = replay_locator(
            &self.replay_host,
            &self.replay_project,
            correlation_id.as_deref(),
        );

        let mut context = context;
        if let Some(trail) = &self.trail {
            let snapshot = trail
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .snapshot();
            match serde_json::to_value(snapshot) {
                Ok(crumbs) => {
                    context.insert("breadcrumbs".to_string(), crumbs);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to serialize breadcrumb snapshot");
                }
            }
        }

        let record = ErrorRecord::new(error, user_id.clone(), session_id)
            .with_context(context)
            .with_correlation(correlation_id.clone(), locator);

        if let Err(e) = self.store.append(&record).await {
            tracing::warn!(error = %e, message = record.message(), "Failed to log error");
        }

        self.mirror_condensed(error, correlation_id).await;
    }

    /// Fire-and-forget variant: spawns [`report`] on the runtime and
    /// returns immediately.
    ///
    /// [`report`]: ErrorReporter::report
    pub fn report_detached(self: &Arc<Self>, error: CapturedError, context: Map<String, Value>) {
        let reporter = Arc::clone(self);
        tokio::spawn(async move {
            reporter.report(&error, context).await;
        });
    }

    /// Best-effort mirror of a condensed event to the capture sink.
    async fn mirror_condensed(&self, error: &CapturedError, correlation_id: Option<String>) {
        let Some(mirror) = &self.mirror else {
            return;
        };
        if !mirror.is_available() {
            return;
        }

        let mut params = Map::new();
        params.insert("message".to_string(), Value::String(error.message.clone()));
        params.insert(
            "stack".to_string(),
            error
                .stack
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        );
        params.insert(
            "session_id".to_string(),
            correlation_id.map(Value::String).unwrap_or(Value::Null),
        );

        let event = match crate::domain::TrackedEvent::new(
            ERROR_MIRROR_EVENT,
            params,
            self.identity.user_id(),
            self.identity.session_id(),
        ) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build mirror event");
                return;
            }
        };

        if let Err(e) = mirror.capture(&event).await {
            tracing::warn!(sink = mirror.name(), error = %e, "Error mirror delivery failed");
        }
    }
}
