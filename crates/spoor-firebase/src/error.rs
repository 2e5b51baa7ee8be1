//! Error types for the Firebase adapters

use thiserror::Error;

/// Errors from Firestore or Measurement Protocol calls.
#[derive(Debug, Error)]
pub enum FirebaseError {
    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// A document could not be decoded into the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}
