//! Integration tests for the GA4 Measurement Protocol sink

use serde_json::{json, Map};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spoor_core::domain::{SessionId, TrackedEvent, UserId};
use spoor_core::ports::IAnalyticsSink;
use spoor_firebase::GaAnalyticsSink;

fn sample_event() -> TrackedEvent {
    let mut params = Map::new();
    params.insert("page_path".to_string(), json!("/checkout"));
    TrackedEvent::new(
        "page_view",
        params,
        UserId::new("u1").unwrap(),
        SessionId::new(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_capture_posts_measurement_payload() {
    let server = MockServer::start().await;
    let sink = GaAnalyticsSink::with_base_url("G-TEST", "secret", server.uri());

    Mock::given(method("POST"))
        .and(path("/mp/collect"))
        .and(query_param("measurement_id", "G-TEST"))
        .and(query_param("api_secret", "secret"))
        .and(body_partial_json(json!({
            "client_id": "u1",
            "events": [{
                "name": "page_view",
                "params": {
                    "page_path": "/checkout",
                    "userId": "u1",
                }
            }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    sink.capture(&sample_event()).await.unwrap();
}

#[tokio::test]
async fn test_capture_surfaces_failure_status() {
    let server = MockServer::start().await;
    let sink = GaAnalyticsSink::with_base_url("G-TEST", "secret", server.uri());

    Mock::given(method("POST"))
        .and(path("/mp/collect"))
        .respond_with(ResponseTemplate::new(500).set_body_string("collector down"))
        .mount(&server)
        .await;

    assert!(sink.capture(&sample_event()).await.is_err());
}
