//! Global event interceptor
//!
//! A two-state machine: **Inactive** (nothing installed) and **Active**
//! (four bus subscriptions plus one console tap installed). Activation
//! happens only under granted consent and is re-entrant-safe; teardown
//! removes exactly what activation installed, restoring the console to its
//! pre-activation behavior.
//!
//! While Active, five event classes are intercepted: navigation, tagged
//! clicks, uncaught errors, unhandled rejections, and console error/warn
//! calls. Each appends a breadcrumb and/or forwards through the event
//! tracker or error reporter. The manual API (`add_breadcrumb`,
//! `track_event`, `log_error`) works in either state.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use serde_json::{Map, Value};

use spoor_core::domain::{BreadcrumbKind, BreadcrumbTrail, CapturedError};
use spoor_core::usecases::{ErrorReporter, EventTracker};

use crate::bus::{ElementRef, HostSignal, ISignalHandler, SignalBus, SignalKind, SubscriptionId};
use crate::console::{serialize_args, Console, ConsoleLevel, IConsoleTap, TapToken};

/// Attribute marking an element as click-tracked.
pub const TRACKING_ATTRIBUTE: &str = "data-analytics";

/// Attribute carrying an optional human-readable label for a tracked click.
pub const TRACKING_LABEL_ATTRIBUTE: &str = "data-analytics-label";

/// Source tags attached to reported errors.
const SOURCE_GLOBAL_ERROR: &str = "global error handler";
const SOURCE_UNHANDLED_REJECTION: &str = "unhandled rejection handler";

/// The bus signals installed on activation, removed on teardown.
const INTERCEPTED_SIGNALS: [SignalKind; 4] = [
    SignalKind::Navigation,
    SignalKind::Click,
    SignalKind::UncaughtError,
    SignalKind::UnhandledRejection,
];

/// Everything a handler needs to turn a signal into breadcrumbs and
/// deliveries.
struct Pipeline {
    trail: Arc<Mutex<BreadcrumbTrail>>,
    tracker: Arc<EventTracker>,
    reporter: Arc<ErrorReporter>,
}

impl Pipeline {
    fn add_breadcrumb(&self, kind: BreadcrumbKind, detail: Map<String, Value>) {
        self.trail
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .add(kind, detail);
    }

    async fn on_navigation(&self, path: &str) {
        let mut detail = Map::new();
        detail.insert("url".to_string(), Value::String(path.to_string()));
        self.add_breadcrumb(BreadcrumbKind::Navigation, detail);

        let mut params = Map::new();
        params.insert("page_path".to_string(), Value::String(path.to_string()));
        self.tracker.track("page_view", params).await;
    }

    async fn on_click(&self, ancestors: &[ElementRef]) {
        // Only clicks on (or inside) a marked element are of interest.
        let Some((name, label)) = find_tracking_marker(ancestors) else {
            return;
        };

        let mut detail = Map::new();
        detail.insert("name".to_string(), Value::String(name.clone()));
        detail.insert(
            "label".to_string(),
            label.map(Value::String).unwrap_or(Value::Null),
        );
        self.add_breadcrumb(BreadcrumbKind::Click, detail.clone());

        self.tracker.track("ui_click", detail).await;
    }

    async fn on_uncaught_error(&self, message: &str, error: Option<&CapturedError>) {
        let error = error
            .cloned()
            .unwrap_or_else(|| CapturedError::new(message));

        let mut context = Map::new();
        context.insert(
            "source".to_string(),
            Value::String(SOURCE_GLOBAL_ERROR.to_string()),
        );
        self.reporter.report(&error, context).await;
    }

    async fn on_unhandled_rejection(&self, reason: Option<&CapturedError>) {
        let error = reason
            .cloned()
            .unwrap_or_else(|| CapturedError::new("Unhandled promise rejection"));

        let mut context = Map::new();
        context.insert(
            "source".to_string(),
            Value::String(SOURCE_UNHANDLED_REJECTION.to_string()),
        );
        self.reporter.report(&error, context).await;
    }

    async fn on_console(&self, level: ConsoleLevel, args: &[Value]) -> anyhow::Result<()> {
        let message = serialize_args(args).context("Failed to serialize console arguments")?;

        let kind = match level {
            ConsoleLevel::Error => BreadcrumbKind::ConsoleError,
            ConsoleLevel::Warn => BreadcrumbKind::ConsoleWarn,
        };
        let mut detail = Map::new();
        detail.insert("message".to_string(), Value::String(message.clone()));
        self.add_breadcrumb(kind, detail);

        let mut context = Map::new();
        context.insert("source".to_string(), Value::String(level.to_string()));
        context.insert("args".to_string(), Value::Array(args.to_vec()));
        self.reporter
            .report(&CapturedError::new(message), context)
            .await;
        Ok(())
    }
}

/// Walks the ancestor chain (target first) for the closest tracked element
/// and extracts its marker name and optional label.
fn find_tracking_marker(ancestors: &[ElementRef]) -> Option<(String, Option<String>)> {
    ancestors.iter().find_map(|el| {
        el.attribute(TRACKING_ATTRIBUTE).map(|name| {
            (
                name.to_string(),
                el.attribute(TRACKING_LABEL_ATTRIBUTE).map(str::to_string),
            )
        })
    })
}

/// Bus-facing adapter dispatching signals into the pipeline.
struct InterceptHandler {
    pipeline: Arc<Pipeline>,
}

#[async_trait::async_trait]
impl ISignalHandler for InterceptHandler {
    async fn handle(&self, signal: &HostSignal) {
        match signal {
            HostSignal::Navigation { path } => self.pipeline.on_navigation(path).await,
            HostSignal::Click { ancestors } => self.pipeline.on_click(ancestors).await,
            HostSignal::UncaughtError { message, error } => {
                self.pipeline
                    .on_uncaught_error(message, error.as_ref())
                    .await;
            }
            HostSignal::UnhandledRejection { reason } => {
                self.pipeline.on_unhandled_rejection(reason.as_ref()).await;
            }
        }
    }
}

/// Console-facing adapter dispatching taps into the pipeline.
struct ConsoleInterceptTap {
    pipeline: Arc<Pipeline>,
}

#[async_trait::async_trait]
impl IConsoleTap for ConsoleInterceptTap {
    async fn on_call(&self, level: ConsoleLevel, args: &[Value]) -> anyhow::Result<()> {
        self.pipeline.on_console(level, args).await
    }
}

/// What activation installed; teardown removes exactly this.
struct Activation {
    subscriptions: Vec<SubscriptionId>,
    console_tap: TapToken,
}

/// The interceptor state machine.
pub struct Interceptor {
    bus: Arc<SignalBus>,
    console: Arc<Console>,
    pipeline: Arc<Pipeline>,
    activation: Mutex<Option<Activation>>,
}

impl Interceptor {
    /// Creates an interceptor in the Inactive state.
    pub fn new(
        bus: Arc<SignalBus>,
        console: Arc<Console>,
        trail: Arc<Mutex<BreadcrumbTrail>>,
        tracker: Arc<EventTracker>,
        reporter: Arc<ErrorReporter>,
    ) -> Self {
        Self {
            bus,
            console,
            pipeline: Arc::new(Pipeline {
                trail,
                tracker,
                reporter,
            }),
            activation: Mutex::new(None),
        }
    }

    /// True while listeners and the console tap are installed.
    pub fn is_active(&self) -> bool {
        self.activation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Transition Inactive → Active: install all subscriptions and the
    /// console tap atomically, then record the initial location.
    ///
    /// Calling while already Active is a no-op. If the console tap cannot
    /// be installed, the subscriptions made so far are rolled back and the
    /// interceptor stays Inactive.
    pub async fn activate(&self) -> anyhow::Result<()> {
        if self.is_active() {
            return Ok(());
        }

        let handler: Arc<dyn ISignalHandler> = Arc::new(InterceptHandler {
            pipeline: Arc::clone(&self.pipeline),
        });

        let mut subscriptions = Vec::with_capacity(INTERCEPTED_SIGNALS.len());
        for kind in INTERCEPTED_SIGNALS {
            subscriptions.push(self.bus.subscribe(kind, Arc::clone(&handler)));
        }

        let tap: Arc<dyn IConsoleTap> = Arc::new(ConsoleInterceptTap {
            pipeline: Arc::clone(&self.pipeline),
        });
        let console_tap = match self.console.install_tap(tap) {
            Ok(token) => token,
            Err(e) => {
                for id in subscriptions {
                    self.bus.unsubscribe(id);
                }
                return Err(e).context("Failed to install console interception");
            }
        };

        {
            let mut slot = self
                .activation
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if slot.is_some() {
                // Lost a race with another activation; undo ours.
                for id in subscriptions {
                    self.bus.unsubscribe(id);
                }
                self.console.remove_tap(console_tap);
                return Ok(());
            }
            *slot = Some(Activation {
                subscriptions,
                console_tap,
            });
        }

        tracing::debug!("Interceptor activated");

        // Record the initial location as if a navigation just happened.
        let path = self.bus.location();
        self.pipeline.on_navigation(&path).await;

        Ok(())
    }

    /// Transition Active → Inactive, reversing every side effect of
    /// activation. A no-op when already Inactive.
    pub fn deactivate(&self) {
        let activation = self
            .activation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(activation) = activation else {
            return;
        };

        for id in activation.subscriptions {
            self.bus.unsubscribe(id);
        }
        self.console.remove_tap(activation.console_tap);
        tracing::debug!("Interceptor deactivated");
    }

    // --- Manual API (usable in either state) ---

    /// Records a breadcrumb without forwarding anything to sinks.
    pub fn add_breadcrumb(&self, kind: BreadcrumbKind, detail: Map<String, Value>) {
        self.pipeline.add_breadcrumb(kind, detail);
    }

    /// Records a `custom` breadcrumb and forwards the event to the sinks.
    pub async fn track_event(&self, name: &str, params: Map<String, Value>) {
        let mut detail = Map::new();
        detail.insert("name".to_string(), Value::String(name.to_string()));
        detail.insert("params".to_string(), Value::Object(params.clone()));
        self.pipeline.add_breadcrumb(BreadcrumbKind::Custom, detail);

        self.pipeline.tracker.track(name, params).await;
    }

    /// Reports an error with the supplied context; the current breadcrumb
    /// snapshot is merged in by the reporter.
    pub async fn log_error(&self, error: &CapturedError, context: Map<String, Value>) {
        self.pipeline.reporter.report(error, context).await;
    }
}
