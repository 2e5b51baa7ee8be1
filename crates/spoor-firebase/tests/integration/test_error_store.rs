//! Integration tests for the Firestore error store
//!
//! Verifies end-to-end behavior against a wiremock mock server:
//! - Append encodes records as typed Firestore fields
//! - Listing decodes documents back into records
//! - Pagination is followed to the end
//! - Failure statuses surface as errors without panicking

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spoor_core::ports::IErrorStore;
use spoor_firebase::{FirestoreClient, FirestoreErrorStore};

use crate::common::{self, ERRORS_PATH};

#[tokio::test]
async fn test_append_posts_typed_fields() {
    let (server, store) = common::setup_store_mock().await;

    Mock::given(method("POST"))
        .and(path(ERRORS_PATH))
        .and(query_param("key", "test-api-key"))
        .and(body_partial_json(json!({
            "fields": {
                "message": { "stringValue": "boom" },
                "stack": { "stringValue": "at main" },
                "userId": { "stringValue": "u1" },
                "context": { "mapValue": { "fields": {
                    "source": { "stringValue": "global error handler" }
                }}},
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo/databases/(default)/documents/errors/doc-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    store.append(&common::sample_record("boom")).await.unwrap();
}

#[tokio::test]
async fn test_append_surfaces_failure_status() {
    let (server, store) = common::setup_store_mock().await;

    Mock::given(method("POST"))
        .and(path(ERRORS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
        .mount(&server)
        .await;

    let result = store.append(&common::sample_record("boom")).await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("403"));
}

#[tokio::test]
async fn test_list_decodes_documents() {
    let (server, store) = common::setup_store_mock().await;

    let record = common::sample_record("boom");
    Mock::given(method("GET"))
        .and(path(ERRORS_PATH))
        .and(query_param("key", "test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [common::record_as_document(&record)]
        })))
        .mount(&server)
        .await;

    let records = store.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message(), "boom");
    assert_eq!(records[0].stack(), Some("at main"));
    assert_eq!(records[0].user_id().as_str(), "u1");
}

#[tokio::test]
async fn test_list_empty_collection() {
    let (server, store) = common::setup_store_mock().await;

    Mock::given(method("GET"))
        .and(path(ERRORS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_follows_pagination() {
    let (server, store) = common::setup_store_mock().await;

    let first = common::sample_record("first");
    let second = common::sample_record("second");

    Mock::given(method("GET"))
        .and(path(ERRORS_PATH))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [common::record_as_document(&second)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(ERRORS_PATH))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [common::record_as_document(&first)],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = store.list().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].message(), "first");
    assert_eq!(records[1].message(), "second");
}

#[tokio::test]
async fn test_list_skips_undecodable_documents() {
    let (server, store) = common::setup_store_mock().await;

    let good = common::sample_record("kept");
    Mock::given(method("GET"))
        .and(path(ERRORS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                // Missing almost every field the record shape requires.
                { "name": "errors/bad", "fields": { "unrelated": { "stringValue": "x" } } },
                common::record_as_document(&good),
            ]
        })))
        .mount(&server)
        .await;

    let records = store.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message(), "kept");
}

#[tokio::test]
async fn test_wrong_project_hits_distinct_path() {
    let server = MockServer::start().await;
    let client = FirestoreClient::with_base_url("other", "k", server.uri());
    let store = FirestoreErrorStore::new(client);

    Mock::given(method("GET"))
        .and(path("/projects/other/databases/(default)/documents/errors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(store.list().await.unwrap().is_empty());
}
