//! Host signal bus
//!
//! The host application delivers its runtime events (location changes,
//! clicks, uncaught errors, unhandled rejections) into the bus; interested
//! components register handlers per signal kind and receive them in
//! registration order. Registration is declarative: a subscription is a
//! (kind, handler) pair identified by a [`SubscriptionId`], so an installer
//! can remove exactly what it installed.
//!
//! ## Design Notes
//!
//! - Dispatch is sequential and awaited: signals are processed one at a
//!   time in event order, matching a cooperative single-dispatch model.
//! - The bus tracks the current location so a late subscriber can record
//!   the initial path without waiting for the next navigation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use spoor_core::domain::CapturedError;

/// The signal classes a handler can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// Location change within the host application
    Navigation,
    /// Pointer click, delivered with the target's ancestor chain
    Click,
    /// Uncaught error surfaced by the host
    UncaughtError,
    /// Rejected async operation nobody handled
    UnhandledRejection,
}

/// A node in a click's ancestor chain, carrying its attributes.
///
/// The chain is ordered target-first so handlers can walk outward to find
/// the closest element carrying a marker attribute.
#[derive(Debug, Clone, Default)]
pub struct ElementRef {
    attributes: HashMap<String, String>,
}

impl ElementRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an attribute (builder style).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// A host runtime event delivered through the bus.
#[derive(Debug, Clone)]
pub enum HostSignal {
    /// The application moved to `path`.
    Navigation { path: String },
    /// A click; `ancestors` is the chain from the clicked element outward.
    Click { ancestors: Vec<ElementRef> },
    /// An uncaught error; `error` is `None` when the host only has a message.
    UncaughtError {
        message: String,
        error: Option<CapturedError>,
    },
    /// An unhandled rejection; `reason` is `None` when no value is attached.
    UnhandledRejection { reason: Option<CapturedError> },
}

impl HostSignal {
    /// The kind used for subscription matching.
    pub fn kind(&self) -> SignalKind {
        match self {
            HostSignal::Navigation { .. } => SignalKind::Navigation,
            HostSignal::Click { .. } => SignalKind::Click,
            HostSignal::UncaughtError { .. } => SignalKind::UncaughtError,
            HostSignal::UnhandledRejection { .. } => SignalKind::UnhandledRejection,
        }
    }
}

/// Handler for host signals.
#[async_trait::async_trait]
pub trait ISignalHandler: Send + Sync {
    async fn handle(&self, signal: &HostSignal);
}

/// Identifies one (kind, handler) registration for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Registration {
    id: SubscriptionId,
    kind: SignalKind,
    handler: Arc<dyn ISignalHandler>,
}

/// Dispatches host signals to registered handlers.
pub struct SignalBus {
    registrations: Mutex<Vec<Registration>>,
    next_id: AtomicU64,
    location: Mutex<String>,
}

impl SignalBus {
    /// Creates a bus with the location initialized to `/`.
    pub fn new() -> Self {
        Self::with_location("/")
    }

    /// Creates a bus with an explicit initial location.
    pub fn with_location(path: impl Into<String>) -> Self {
        Self {
            registrations: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            location: Mutex::new(path.into()),
        }
    }

    /// Registers a handler for one signal kind.
    pub fn subscribe(&self, kind: SignalKind, handler: Arc<dyn ISignalHandler>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Registration { id, kind, handler });
        id
    }

    /// Removes a registration. Returns false if the id was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registrations = self
            .registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = registrations.len();
        registrations.retain(|r| r.id != id);
        registrations.len() < before
    }

    /// Number of live registrations (used to verify teardown symmetry).
    pub fn handler_count(&self) -> usize {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The current application location.
    pub fn location(&self) -> String {
        self.location
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Moves to `path` and emits the corresponding navigation signal.
    pub async fn navigate(&self, path: impl Into<String>) {
        let path = path.into();
        self.emit(HostSignal::Navigation { path }).await;
    }

    /// Delivers a signal to every matching handler, in registration order,
    /// one at a time. Navigation signals also update the tracked location.
    pub async fn emit(&self, signal: HostSignal) {
        if let HostSignal::Navigation { path } = &signal {
            *self
                .location
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = path.clone();
        }

        let matching: Vec<Arc<dyn ISignalHandler>> = {
            let registrations = self
                .registrations
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            registrations
                .iter()
                .filter(|r| r.kind == signal.kind())
                .map(|r| Arc::clone(&r.handler))
                .collect()
        };

        for handler in matching {
            handler.handle(&signal).await;
        }
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}
