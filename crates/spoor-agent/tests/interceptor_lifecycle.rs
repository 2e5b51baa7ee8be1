//! Integration tests for the interceptor lifecycle
//!
//! Exercises the full pipeline against in-memory fakes: consent-driven
//! activation, the five interception classes, teardown symmetry, and the
//! manual API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};

use spoor_agent::{Console, ConsentGate, ElementRef, HostSignal, Interceptor, SignalBus};
use spoor_core::domain::{
    BreadcrumbKind, BreadcrumbTrail, CapturedError, ErrorRecord, TrackedEvent,
};
use spoor_core::identity::SessionIdentityProvider;
use spoor_core::ports::{
    IAnalyticsSink, IErrorStore, IKeyValueStore, ISessionReplay, CONSENT_KEY,
};
use spoor_core::usecases::{ErrorReporter, EventTracker};

// ---------------------------------------------------------------------------
// In-memory fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryKv {
    values: Mutex<HashMap<String, String>>,
}

impl IKeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

#[derive(Default)]
struct MemoryErrorStore {
    records: Mutex<Vec<ErrorRecord>>,
}

impl MemoryErrorStore {
    fn records(&self) -> Vec<ErrorRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IErrorStore for MemoryErrorStore {
    async fn append(&self, record: &ErrorRecord) -> anyhow::Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
    async fn list(&self) -> anyhow::Result<Vec<ErrorRecord>> {
        Ok(self.records())
    }
}

#[derive(Default)]
struct RecordingSink {
    captured: Mutex<Vec<(String, Map<String, Value>)>>,
}

impl RecordingSink {
    fn captured(&self) -> Vec<(String, Map<String, Value>)> {
        self.captured.lock().unwrap().clone()
    }

    fn events_named(&self, name: &str) -> Vec<Map<String, Value>> {
        self.captured()
            .into_iter()
            .filter(|(n, _)| n == name)
            .map(|(_, params)| params)
            .collect()
    }
}

#[async_trait::async_trait]
impl IAnalyticsSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }
    fn is_available(&self) -> bool {
        true
    }
    async fn capture(&self, event: &TrackedEvent) -> anyhow::Result<()> {
        self.captured
            .lock()
            .unwrap()
            .push((event.name().to_string(), event.enriched_params()));
        Ok(())
    }
}

struct FixedReplay(Option<String>);

impl ISessionReplay for FixedReplay {
    fn replay_session_id(&self) -> Option<String> {
        self.0.clone()
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Harness {
    bus: Arc<SignalBus>,
    console: Arc<Console>,
    console_written: Arc<Mutex<Vec<Vec<Value>>>>,
    trail: Arc<Mutex<BreadcrumbTrail>>,
    storage: Arc<MemoryKv>,
    store: Arc<MemoryErrorStore>,
    sink: Arc<RecordingSink>,
    interceptor: Arc<Interceptor>,
}

impl Harness {
    fn new() -> Self {
        Self::with_replay(None)
    }

    fn with_replay(replay_id: Option<String>) -> Self {
        let storage = Arc::new(MemoryKv::default());
        let store = Arc::new(MemoryErrorStore::default());
        let sink = Arc::new(RecordingSink::default());
        let trail = Arc::new(Mutex::new(BreadcrumbTrail::new()));
        let bus = Arc::new(SignalBus::new());

        let console_written: Arc<Mutex<Vec<Vec<Value>>>> = Arc::new(Mutex::new(Vec::new()));
        let written = console_written.clone();
        let console = Arc::new(Console::with_writers(
            Box::new(move |args| written.lock().unwrap().push(args.to_vec())),
            Box::new(|_| {}),
        ));

        let identity = Arc::new(SessionIdentityProvider::new(
            storage.clone() as Arc<dyn IKeyValueStore>
        ));
        let tracker = Arc::new(EventTracker::new(
            identity.clone(),
            vec![sink.clone() as Arc<dyn IAnalyticsSink>],
        ));
        let reporter = Arc::new(
            ErrorReporter::new(identity, store.clone())
                .with_trail(trail.clone())
                .with_mirror(sink.clone())
                .with_replay(Arc::new(FixedReplay(replay_id)))
                .with_replay_target("https://replay.example", "p1"),
        );

        let interceptor = Arc::new(Interceptor::new(
            bus.clone(),
            console.clone(),
            trail.clone(),
            tracker,
            reporter,
        ));

        Self {
            bus,
            console,
            console_written,
            trail,
            storage,
            store,
            sink,
            interceptor,
        }
    }

    fn gate(&self) -> ConsentGate {
        ConsentGate::new(self.storage.clone(), self.interceptor.clone())
    }

    fn breadcrumb_kinds(&self) -> Vec<BreadcrumbKind> {
        self.trail
            .lock()
            .unwrap()
            .snapshot()
            .into_iter()
            .map(|b| b.kind)
            .collect()
    }
}

fn tagged_click(name: &str, label: Option<&str>) -> HostSignal {
    let mut el = ElementRef::new().with_attribute("data-analytics", name);
    if let Some(label) = label {
        el = el.with_attribute("data-analytics-label", label);
    }
    HostSignal::Click {
        ancestors: vec![ElementRef::new(), el],
    }
}

// ---------------------------------------------------------------------------
// Activation / teardown
// ---------------------------------------------------------------------------

#[tokio::test]
async fn activation_records_initial_navigation() {
    let h = Harness::new();
    h.interceptor.activate().await.unwrap();

    assert_eq!(h.breadcrumb_kinds(), vec![BreadcrumbKind::Navigation]);
    let page_views = h.sink.events_named("page_view");
    assert_eq!(page_views.len(), 1);
    assert_eq!(page_views[0]["page_path"], json!("/"));
}

#[tokio::test]
async fn double_activate_is_noop() {
    let h = Harness::new();
    h.interceptor.activate().await.unwrap();
    h.interceptor.activate().await.unwrap();

    assert_eq!(h.bus.handler_count(), 4);
    assert_eq!(h.sink.events_named("page_view").len(), 1);
}

#[tokio::test]
async fn teardown_is_symmetric() {
    let h = Harness::new();
    assert_eq!(h.bus.handler_count(), 0);
    assert!(!h.console.has_tap());

    h.interceptor.activate().await.unwrap();
    assert_eq!(h.bus.handler_count(), 4);
    assert!(h.console.has_tap());
    assert!(h.interceptor.is_active());

    h.interceptor.deactivate();
    assert_eq!(h.bus.handler_count(), 0);
    assert!(!h.console.has_tap());
    assert!(!h.interceptor.is_active());

    // A second teardown is a no-op.
    h.interceptor.deactivate();
    assert_eq!(h.bus.handler_count(), 0);
}

#[tokio::test]
async fn signals_after_teardown_are_ignored() {
    let h = Harness::new();
    h.interceptor.activate().await.unwrap();
    h.interceptor.deactivate();

    let before = h.sink.captured().len();
    h.bus.navigate("/after").await;
    h.bus.emit(tagged_click("buy", None)).await;
    h.console.error(&[json!("still printed")]).await;

    assert_eq!(h.sink.captured().len(), before);
    assert!(h.store.records().is_empty());
    // The original console writer keeps working after teardown.
    assert_eq!(h.console_written.lock().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Consent gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn grant_twice_activates_once() {
    let h = Harness::new();
    let gate = h.gate();

    gate.grant().await.unwrap();
    gate.grant().await.unwrap();

    assert!(h.interceptor.is_active());
    assert_eq!(h.bus.handler_count(), 4);
    assert_eq!(h.sink.events_named("page_view").len(), 1);
    assert_eq!(
        h.storage.get(CONSENT_KEY).unwrap().as_deref(),
        Some("granted")
    );
}

#[tokio::test]
async fn deny_never_activates() {
    let h = Harness::new();
    let gate = h.gate();

    gate.deny().unwrap();
    gate.init().await;

    assert!(!h.interceptor.is_active());
    h.bus.navigate("/anywhere").await;
    assert!(h.sink.captured().is_empty());
}

#[tokio::test]
async fn persisted_grant_auto_activates_on_init() {
    let h = Harness::new();
    h.storage.set(CONSENT_KEY, "granted").unwrap();

    h.gate().init().await;

    assert!(h.interceptor.is_active());
}

#[tokio::test]
async fn unset_consent_stays_inactive_on_init() {
    let h = Harness::new();
    h.gate().init().await;
    assert!(!h.interceptor.is_active());
}

#[tokio::test]
async fn deny_tears_down_active_instrumentation() {
    let h = Harness::new();
    let gate = h.gate();

    gate.grant().await.unwrap();
    assert!(h.interceptor.is_active());

    gate.deny().unwrap();
    assert!(!h.interceptor.is_active());
    assert_eq!(h.bus.handler_count(), 0);
}

// ---------------------------------------------------------------------------
// Interception classes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn navigation_is_tracked_with_breadcrumb() {
    let h = Harness::new();
    h.interceptor.activate().await.unwrap();

    h.bus.navigate("/checkout").await;

    let kinds = h.breadcrumb_kinds();
    assert_eq!(
        kinds,
        vec![BreadcrumbKind::Navigation, BreadcrumbKind::Navigation]
    );
    let page_views = h.sink.events_named("page_view");
    assert_eq!(page_views[1]["page_path"], json!("/checkout"));
}

#[tokio::test]
async fn tagged_click_is_tracked() {
    let h = Harness::new();
    h.interceptor.activate().await.unwrap();

    h.bus.emit(tagged_click("buy", Some("Buy now"))).await;

    let clicks = h.sink.events_named("ui_click");
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0]["name"], json!("buy"));
    assert_eq!(clicks[0]["label"], json!("Buy now"));
    assert!(h.breadcrumb_kinds().contains(&BreadcrumbKind::Click));
}

#[tokio::test]
async fn unmarked_click_is_ignored() {
    let h = Harness::new();
    h.interceptor.activate().await.unwrap();

    h.bus
        .emit(HostSignal::Click {
            ancestors: vec![ElementRef::new(), ElementRef::new()],
        })
        .await;

    assert!(h.sink.events_named("ui_click").is_empty());
    assert!(!h.breadcrumb_kinds().contains(&BreadcrumbKind::Click));
}

#[tokio::test]
async fn uncaught_error_reported_with_breadcrumb_trail() {
    let h = Harness::new();
    h.interceptor.activate().await.unwrap();

    // One more navigation so two breadcrumbs precede the error.
    h.bus.navigate("/form").await;

    h.bus
        .emit(HostSignal::UncaughtError {
            message: "boom".into(),
            error: None,
        })
        .await;

    let records = h.store.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.message(), "boom");
    assert_eq!(record.context()["source"], json!("global error handler"));
    assert_eq!(
        record.context()["breadcrumbs"].as_array().unwrap().len(),
        2
    );
    assert!(record.timestamp().timestamp() > 0);
}

#[tokio::test]
async fn uncaught_error_prefers_carried_error() {
    let h = Harness::new();
    h.interceptor.activate().await.unwrap();

    h.bus
        .emit(HostSignal::UncaughtError {
            message: "Script error.".into(),
            error: Some(CapturedError::new("real cause").with_stack("at handler")),
        })
        .await;

    let record = &h.store.records()[0];
    assert_eq!(record.message(), "real cause");
    assert_eq!(record.stack(), Some("at handler"));
}

#[tokio::test]
async fn unhandled_rejection_without_reason_is_synthesized() {
    let h = Harness::new();
    h.interceptor.activate().await.unwrap();

    h.bus
        .emit(HostSignal::UnhandledRejection { reason: None })
        .await;

    let record = &h.store.records()[0];
    assert_eq!(record.message(), "Unhandled promise rejection");
    assert_eq!(
        record.context()["source"],
        json!("unhandled rejection handler")
    );
}

#[tokio::test]
async fn console_error_intercepted_and_passed_through() {
    let h = Harness::new();
    h.interceptor.activate().await.unwrap();

    let args = vec![json!("x"), json!({"y": 1})];
    h.console.error(&args).await;

    // Breadcrumb carries the serialized message.
    let snapshot = h.trail.lock().unwrap().snapshot();
    let crumb = snapshot
        .iter()
        .find(|b| b.kind == BreadcrumbKind::ConsoleError)
        .unwrap();
    let message = crumb.detail["message"].as_str().unwrap();
    assert!(message.contains("x"));
    assert!(message.contains("{\"y\":1}"));

    // The original writer still ran with the original arguments.
    assert_eq!(h.console_written.lock().unwrap().as_slice(), &[args]);

    // One record reached the store, tagged with the console source.
    let records = h.store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message(), "x {\"y\":1}");
    assert_eq!(records[0].context()["source"], json!("console.error"));
}

#[tokio::test]
async fn console_warn_uses_warn_kind() {
    let h = Harness::new();
    h.interceptor.activate().await.unwrap();

    h.console.warn(&[json!("careful")]).await;

    assert!(h.breadcrumb_kinds().contains(&BreadcrumbKind::ConsoleWarn));
    let record = &h.store.records()[0];
    assert_eq!(record.context()["source"], json!("console.warn"));
}

#[tokio::test]
async fn replay_correlation_flows_into_records() {
    let h = Harness::with_replay(Some("abc".into()));
    h.interceptor.activate().await.unwrap();

    h.bus
        .emit(HostSignal::UncaughtError {
            message: "boom".into(),
            error: None,
        })
        .await;

    let record = &h.store.records()[0];
    assert_eq!(record.external_session_id(), Some("abc"));
    assert_eq!(
        record.replay_locator(),
        Some("https://replay.example/project/p1/replay/abc")
    );
}

// ---------------------------------------------------------------------------
// Manual API
// ---------------------------------------------------------------------------

#[tokio::test]
async fn manual_breadcrumb_never_triggers_delivery() {
    let h = Harness::new();

    h.interceptor
        .add_breadcrumb(BreadcrumbKind::Custom, Map::new());

    assert_eq!(h.trail.lock().unwrap().len(), 1);
    assert!(h.sink.captured().is_empty());
    assert!(h.store.records().is_empty());
}

#[tokio::test]
async fn manual_track_event_works_while_inactive() {
    let h = Harness::new();

    let mut params = Map::new();
    params.insert("plan".to_string(), json!("pro"));
    h.interceptor.track_event("upgrade", params).await;

    assert_eq!(h.breadcrumb_kinds(), vec![BreadcrumbKind::Custom]);
    let events = h.sink.events_named("upgrade");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["plan"], json!("pro"));
}

#[tokio::test]
async fn manual_log_error_merges_breadcrumbs() {
    let h = Harness::new();
    h.interceptor
        .add_breadcrumb(BreadcrumbKind::Custom, Map::new());

    let mut context = Map::new();
    context.insert("component".to_string(), json!("CheckoutForm"));
    h.interceptor
        .log_error(&CapturedError::new("manual"), context)
        .await;

    let record = &h.store.records()[0];
    assert_eq!(record.message(), "manual");
    assert_eq!(record.context()["component"], json!("CheckoutForm"));
    assert_eq!(
        record.context()["breadcrumbs"].as_array().unwrap().len(),
        1
    );
}
