//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including identifier validation and event construction failures.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// ID parsing or validation error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Tracked event name was empty or otherwise unusable
    #[error("Invalid event name: {0}")]
    InvalidEventName(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
