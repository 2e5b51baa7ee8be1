//! Spoor PostHog adapter
//!
//! Implements the analytics sink port against the PostHog capture API and
//! the session-replay port against the client's recording session id.

pub mod sink;

pub use sink::{PosthogError, PosthogSink};
