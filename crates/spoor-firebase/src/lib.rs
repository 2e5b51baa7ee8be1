//! Spoor Firebase adapters
//!
//! Implements two ports against Firebase REST APIs:
//! - `FirestoreErrorStore`: the append-only `errors` collection in
//!   Firestore (error log store port)
//! - `GaAnalyticsSink`: Google Analytics 4 via the Measurement Protocol
//!   (analytics sink port)
//!
//! The `value` module carries the codec between `serde_json` values and
//! Firestore's typed document values.

pub mod analytics;
pub mod client;
pub mod error;
pub mod store;
pub mod value;

pub use analytics::GaAnalyticsSink;
pub use client::FirestoreClient;
pub use error::FirebaseError;
pub use store::{FirestoreErrorStore, ERRORS_COLLECTION};
