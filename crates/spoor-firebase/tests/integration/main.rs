//! Integration tests for the Firebase adapters
//!
//! Runs the Firestore error store and the GA4 sink against a
//! wiremock-based mock server.

mod common;
mod test_analytics;
mod test_error_store;
