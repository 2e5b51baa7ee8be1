//! Breadcrumbs and the bounded breadcrumb trail
//!
//! A breadcrumb is a timestamped record of a recent user or system action,
//! kept in bounded history so error reports can carry the actions that led
//! up to a failure. The trail is a strict FIFO ring: once it holds
//! [`MAX_BREADCRUMBS`] entries, every insertion evicts the oldest one.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Maximum number of breadcrumbs retained by a trail.
pub const MAX_BREADCRUMBS: usize = 50;

/// Category of a recorded action.
///
/// The serialized forms (`console.error`, `console.warn`) match the wire
/// format consumed by the error log store and dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreadcrumbKind {
    /// A location change within the host application
    #[serde(rename = "navigation")]
    Navigation,
    /// A click on an element tagged for tracking
    #[serde(rename = "click")]
    Click,
    /// An intercepted `console.error` call
    #[serde(rename = "console.error")]
    ConsoleError,
    /// An intercepted `console.warn` call
    #[serde(rename = "console.warn")]
    ConsoleWarn,
    /// A manually recorded application action
    #[serde(rename = "custom")]
    Custom,
}

impl std::fmt::Display for BreadcrumbKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BreadcrumbKind::Navigation => "navigation",
            BreadcrumbKind::Click => "click",
            BreadcrumbKind::ConsoleError => "console.error",
            BreadcrumbKind::ConsoleWarn => "console.warn",
            BreadcrumbKind::Custom => "custom",
        };
        write!(f, "{}", s)
    }
}

/// A single recorded action with structured detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub kind: BreadcrumbKind,
    pub detail: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl Breadcrumb {
    /// Create a breadcrumb stamped with the current time.
    pub fn new(kind: BreadcrumbKind, detail: Map<String, Value>) -> Self {
        Self {
            kind,
            detail,
            timestamp: Utc::now(),
        }
    }
}

/// Fixed-capacity, insertion-ordered log of recent actions.
///
/// The trail is owned by a single interceptor instance and cleared only by
/// process restart. Readers get defensive copies via [`snapshot`]; the
/// stored entries are never handed out mutably.
///
/// [`snapshot`]: BreadcrumbTrail::snapshot
#[derive(Debug, Default)]
pub struct BreadcrumbTrail {
    entries: VecDeque<Breadcrumb>,
}

impl BreadcrumbTrail {
    /// Creates an empty trail with the standard capacity.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_BREADCRUMBS),
        }
    }

    /// Appends an action, evicting the oldest entry when full.
    ///
    /// The capacity invariant holds after every call: `len() <= MAX_BREADCRUMBS`.
    pub fn add(&mut self, kind: BreadcrumbKind, detail: Map<String, Value>) {
        self.push(Breadcrumb::new(kind, detail));
    }

    /// Appends an already-constructed breadcrumb (same eviction rules).
    pub fn push(&mut self, breadcrumb: Breadcrumb) {
        self.entries.push_back(breadcrumb);
        while self.entries.len() > MAX_BREADCRUMBS {
            self.entries.pop_front();
        }
    }

    /// Returns a copy of the current contents in insertion order.
    pub fn snapshot(&self) -> Vec<Breadcrumb> {
        self.entries.iter().cloned().collect()
    }

    /// Number of retained breadcrumbs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no breadcrumbs have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
