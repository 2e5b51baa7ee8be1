//! Shared test helpers for the Firebase adapter integration tests

use serde_json::{Map, Value};
use wiremock::MockServer;

use spoor_core::domain::{CapturedError, ErrorRecord, SessionId, UserId};
use spoor_firebase::{value, FirestoreClient, FirestoreErrorStore};

/// Collection path used by the error store against project `demo`.
pub const ERRORS_PATH: &str = "/projects/demo/databases/(default)/documents/errors";

/// Starts a mock server and returns it with a store pointing at it.
pub async fn setup_store_mock() -> (MockServer, FirestoreErrorStore) {
    let server = MockServer::start().await;
    let client = FirestoreClient::with_base_url("demo", "test-api-key", server.uri());
    (server, FirestoreErrorStore::new(client))
}

/// Builds a representative error record.
pub fn sample_record(message: &str) -> ErrorRecord {
    let mut context = Map::new();
    context.insert(
        "source".to_string(),
        Value::String("global error handler".to_string()),
    );

    ErrorRecord::new(
        &CapturedError::new(message).with_stack("at main"),
        UserId::new("u1").unwrap(),
        SessionId::new(),
    )
    .with_context(context)
}

/// Encodes a record the way Firestore would return it in a list response.
pub fn record_as_document(record: &ErrorRecord) -> Value {
    let fields = serde_json::to_value(record).unwrap();
    serde_json::json!({
        "name": "projects/demo/databases/(default)/documents/errors/doc-1",
        "fields": value::to_fields(fields.as_object().unwrap()),
    })
}
