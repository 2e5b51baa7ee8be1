//! Consent state for the tracking gate
//!
//! Tracking instrumentation must never run unless the user has explicitly
//! granted consent. The decision is persisted as a string in local storage
//! and read back on startup.

use serde::{Deserialize, Serialize};

/// The user's tracking consent decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentState {
    /// No decision recorded yet; a prompt is expected.
    Unset,
    /// Tracking instrumentation may be installed.
    Granted,
    /// Tracking instrumentation must stay inactive.
    Denied,
}

impl ConsentState {
    /// Decode a persisted value. Absent or unrecognized values are `Unset`.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("granted") => ConsentState::Granted,
            Some("denied") => ConsentState::Denied,
            _ => ConsentState::Unset,
        }
    }

    /// The string persisted to storage, `None` for `Unset`.
    pub fn as_stored(&self) -> Option<&'static str> {
        match self {
            ConsentState::Unset => None,
            ConsentState::Granted => Some("granted"),
            ConsentState::Denied => Some("denied"),
        }
    }

    /// Returns true if instrumentation is allowed to run.
    pub fn is_granted(&self) -> bool {
        matches!(self, ConsentState::Granted)
    }

    /// Returns true if no decision has been recorded.
    pub fn is_unset(&self) -> bool {
        matches!(self, ConsentState::Unset)
    }
}

impl Default for ConsentState {
    fn default() -> Self {
        ConsentState::Unset
    }
}

impl std::fmt::Display for ConsentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConsentState::Unset => "unset",
            ConsentState::Granted => "granted",
            ConsentState::Denied => "denied",
        };
        write!(f, "{}", s)
    }
}
