//! Session identity
//!
//! Produces the two identifiers attached to every tracked event and error
//! record: a durable anonymous user id (persisted in local storage, created
//! lazily on first access) and a session id that is regenerated once per
//! process and cached for the lifetime of the execution context.

use std::sync::{Arc, OnceLock};

use crate::domain::{SessionId, UserId};
use crate::ports::{IKeyValueStore, USER_ID_KEY};

/// Provider for the anonymous user id and the per-process session id.
///
/// `user_id()` is deliberately infallible: identity enrichment sits on the
/// hot path of every event and error report, so storage failures degrade to
/// a process-cached generated id (logged as a warning) instead of
/// propagating. With working storage the same device always yields the
/// same id until storage is cleared externally.
pub struct SessionIdentityProvider {
    storage: Arc<dyn IKeyValueStore>,
    session_id: OnceLock<SessionId>,
    generated_user_id: OnceLock<UserId>,
}

impl SessionIdentityProvider {
    /// Creates a provider backed by the given storage.
    pub fn new(storage: Arc<dyn IKeyValueStore>) -> Self {
        Self {
            storage,
            session_id: OnceLock::new(),
            generated_user_id: OnceLock::new(),
        }
    }

    /// Returns the persisted user id, creating and persisting one on first
    /// access.
    pub fn user_id(&self) -> UserId {
        match self.storage.get(USER_ID_KEY) {
            Ok(Some(stored)) => match UserId::new(stored) {
                Ok(id) => return id,
                Err(e) => {
                    tracing::warn!(error = %e, "Stored user id is invalid, regenerating");
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read user id from storage");
            }
        }

        // Cache the generated id so identity stays stable within this
        // process even when storage is unavailable.
        let id = self.generated_user_id.get_or_init(UserId::generate).clone();
        if let Err(e) = self.storage.set(USER_ID_KEY, id.as_str()) {
            tracing::warn!(error = %e, "Failed to persist user id");
        }
        id
    }

    /// Returns the session id for this process, generating it on first
    /// access. Never persisted; a new id appears on every program start.
    pub fn session_id(&self) -> SessionId {
        *self.session_id.get_or_init(SessionId::new)
    }
}
