//! Console facade with reversible interception
//!
//! Rather than mutating an ambient global, the console is an explicit
//! object that owns the original writer functions. Interception installs a
//! single removable tap identified by a [`TapToken`]; removal restores the
//! pre-installation behavior exactly. The original writer always runs
//! after the tap, whatever the tap did — interception must never swallow
//! console output.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

/// Writer invoked with the original, unmodified arguments.
pub type ConsoleWriter = Box<dyn Fn(&[Value]) + Send + Sync>;

/// Severity of a console call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Error,
    Warn,
}

impl std::fmt::Display for ConsoleLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsoleLevel::Error => write!(f, "console.error"),
            ConsoleLevel::Warn => write!(f, "console.warn"),
        }
    }
}

/// Observer of console calls while interception is installed.
///
/// A failing tap is logged and ignored; it cannot prevent the original
/// writer from running.
#[async_trait::async_trait]
pub trait IConsoleTap: Send + Sync {
    async fn on_call(&self, level: ConsoleLevel, args: &[Value]) -> anyhow::Result<()>;
}

/// Identifies an installed tap so only its installer can remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapToken(u64);

/// Console facade holding the original error/warn writers.
pub struct Console {
    write_error: ConsoleWriter,
    write_warn: ConsoleWriter,
    tap: Mutex<Option<(TapToken, Arc<dyn IConsoleTap>)>>,
    next_token: AtomicU64,
}

impl Console {
    /// Creates a console whose original writers log through `tracing`.
    pub fn new() -> Self {
        Self::with_writers(
            Box::new(|args| tracing::error!(target: "console", "{}", join_for_display(args))),
            Box::new(|args| tracing::warn!(target: "console", "{}", join_for_display(args))),
        )
    }

    /// Creates a console with caller-supplied original writers.
    pub fn with_writers(write_error: ConsoleWriter, write_warn: ConsoleWriter) -> Self {
        Self {
            write_error,
            write_warn,
            tap: Mutex::new(None),
            next_token: AtomicU64::new(1),
        }
    }

    /// Reports an error through the console.
    pub async fn error(&self, args: &[Value]) {
        self.call(ConsoleLevel::Error, args).await;
    }

    /// Reports a warning through the console.
    pub async fn warn(&self, args: &[Value]) {
        self.call(ConsoleLevel::Warn, args).await;
    }

    async fn call(&self, level: ConsoleLevel, args: &[Value]) {
        let tap = self
            .tap
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(_, tap)| Arc::clone(tap));

        if let Some(tap) = tap {
            if let Err(e) = tap.on_call(level, args).await {
                tracing::warn!(error = %e, %level, "Console tap failed");
            }
        }

        // The original writer runs last, regardless of the tap's outcome.
        match level {
            ConsoleLevel::Error => (self.write_error)(args),
            ConsoleLevel::Warn => (self.write_warn)(args),
        }
    }

    /// Installs the tap. Fails if another tap is already installed.
    pub fn install_tap(&self, tap: Arc<dyn IConsoleTap>) -> anyhow::Result<TapToken> {
        let mut slot = self.tap.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            anyhow::bail!("a console tap is already installed");
        }
        let token = TapToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        *slot = Some((token, tap));
        Ok(token)
    }

    /// Removes the tap identified by `token`. Returns false if a different
    /// tap (or none) is installed.
    pub fn remove_tap(&self, token: TapToken) -> bool {
        let mut slot = self.tap.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some((installed, _)) if *installed == token => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// True while a tap is installed.
    pub fn has_tap(&self) -> bool {
        self.tap
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes console arguments to a single string: objects and arrays are
/// JSON-serialized, everything else is stringified, joined with spaces.
pub fn serialize_args(args: &[Value]) -> anyhow::Result<String> {
    let mut parts = Vec::with_capacity(args.len());
    for arg in args {
        let part = match arg {
            Value::String(s) => s.clone(),
            Value::Object(_) | Value::Array(_) => serde_json::to_string(arg)?,
            other => other.to_string(),
        };
        parts.push(part);
    }
    Ok(parts.join(" "))
}

fn join_for_display(args: &[Value]) -> String {
    serialize_args(args).unwrap_or_else(|_| format!("{args:?}"))
}
