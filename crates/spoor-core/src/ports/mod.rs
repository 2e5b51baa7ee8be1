//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IAnalyticsSink`] - Capability-checked delivery of tracked events
//! - [`ISessionReplay`] - Session-replay correlation id lookup
//! - [`IErrorStore`] - Append-only remote error log collection
//! - [`IKeyValueStore`] - Durable local key-value storage

pub mod analytics_sink;
pub mod error_store;
pub mod key_value;

pub use analytics_sink::{IAnalyticsSink, ISessionReplay};
pub use error_store::IErrorStore;
pub use key_value::{IKeyValueStore, CONSENT_KEY, USER_ID_KEY};
