//! Analytics sink ports (driven/secondary ports)
//!
//! Sinks receive enriched events. Each sink advertises its own
//! availability; a sink that is not configured or not usable in the current
//! execution context reports `is_available() == false` and is silently
//! skipped by the tracker. Partial delivery across sinks is accepted
//! behavior, not an error.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because delivery errors are adapter-specific
//!   (HTTP status codes, transport failures) and don't need domain-level
//!   classification.
//! - The availability predicate is explicit so callers iterate a list of
//!   capability-checked sinks instead of branching on optional fields.

use crate::domain::TrackedEvent;

/// Port trait for structured event delivery.
#[async_trait::async_trait]
pub trait IAnalyticsSink: Send + Sync {
    /// Short sink name used in diagnostics ("ga4", "posthog", ...).
    fn name(&self) -> &'static str;

    /// Whether the sink is initialized and able to accept events.
    fn is_available(&self) -> bool;

    /// Deliver one enriched event.
    async fn capture(&self, event: &TrackedEvent) -> anyhow::Result<()>;
}

/// Port trait for session-replay correlation.
///
/// Implemented by sinks that record sessions; the reporter uses the
/// returned id to build a replay locator URL for each error record.
pub trait ISessionReplay: Send + Sync {
    /// Correlation id of the active replay session, if recording.
    fn replay_session_id(&self) -> Option<String>;
}
