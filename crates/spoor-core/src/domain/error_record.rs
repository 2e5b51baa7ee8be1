//! Captured errors and the records shipped to the log store
//!
//! `CapturedError` is the payload handed to the error reporter: a message
//! plus whatever stack or cause-chain text is available. `ErrorRecord` is
//! the enriched, append-once document written to the remote log store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::newtypes::{SessionId, UserId};

/// An application error as captured at an interception point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedError {
    pub message: String,
    pub stack: Option<String>,
}

impl CapturedError {
    /// Synthesize an error from a bare message (no stack available).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    /// Attach stack or backtrace text.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Capture a `std::error::Error`, rendering its cause chain into the
    /// stack field when present.
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let message = error.to_string();

        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            message,
            stack: if chain.is_empty() {
                None
            } else {
                Some(chain.join("\n"))
            },
        }
    }
}

impl std::fmt::Display for CapturedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// One enriched error document, appended once to the remote log store.
///
/// Wire field names are camelCase to match the collection consumed by the
/// administrative listing view; there is no update or delete path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    message: String,
    stack: Option<String>,
    context: Map<String, Value>,
    user_id: UserId,
    session_id: SessionId,
    external_session_id: Option<String>,
    replay_locator: Option<String>,
    timestamp: DateTime<Utc>,
}

impl ErrorRecord {
    /// Creates a record stamped with the current time.
    pub fn new(error: &CapturedError, user_id: UserId, session_id: SessionId) -> Self {
        Self {
            message: error.message.clone(),
            stack: error.stack.clone(),
            context: Map::new(),
            user_id,
            session_id,
            external_session_id: None,
            replay_locator: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the merged reporting context (breadcrumbs, source tag, ...).
    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = context;
        self
    }

    /// Attach the session-replay correlation id and locator URL.
    pub fn with_correlation(
        mut self,
        external_session_id: Option<String>,
        replay_locator: Option<String>,
    ) -> Self {
        self.external_session_id = external_session_id;
        self.replay_locator = replay_locator;
        self
    }

    // --- Getters ---

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn external_session_id(&self) -> Option<&str> {
        self.external_session_id.as_deref()
    }

    pub fn replay_locator(&self) -> Option<&str> {
        self.replay_locator.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
