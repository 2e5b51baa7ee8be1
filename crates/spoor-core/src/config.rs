//! Configuration module for Spoor.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, defaults, and a builder pattern for
//! programmatic use. Sink credentials live here; a section left
//! unconfigured makes the corresponding sink unavailable rather than
//! producing an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for Spoor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub firebase: FirebaseConfig,
    pub posthog: PosthogConfig,
    pub logging: LoggingConfig,
}

/// Local durable storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the local state file (consent, anonymous user id).
    pub data_dir: PathBuf,
}

/// Firebase settings: the Firestore error log and the GA4 analytics sink.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    /// Firebase/GCP project identifier. `None` disables the error store.
    pub project_id: Option<String>,
    /// Web API key used for Firestore REST access.
    pub api_key: Option<String>,
    /// GA4 measurement id (e.g. `G-XXXXXXX`). `None` disables the sink.
    pub measurement_id: Option<String>,
    /// GA4 Measurement Protocol API secret.
    pub api_secret: Option<String>,
}

impl FirebaseConfig {
    /// True when the Firestore error store can be constructed.
    pub fn firestore_configured(&self) -> bool {
        self.project_id.is_some() && self.api_key.is_some()
    }

    /// True when the GA4 analytics sink can be constructed.
    pub fn analytics_configured(&self) -> bool {
        self.measurement_id.is_some() && self.api_secret.is_some()
    }
}

/// PostHog settings: event capture and session-replay correlation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PosthogConfig {
    /// Project API key. `None` disables the sink.
    pub api_key: Option<String>,
    /// Instance host used for capture and for replay locator URLs.
    pub host: String,
    /// Project identifier used in replay locator URLs.
    pub project_id: String,
    /// Whether session recording is on; off means no replay correlation.
    pub session_recording: bool,
}

impl PosthogConfig {
    /// True when the capture sink can be constructed.
    pub fn configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/spoor/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("spoor")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

// Config derives Default because all its fields implement Default.

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                .join("spoor"),
        }
    }
}

impl Default for PosthogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            host: "https://app.posthog.com".to_string(),
            project_id: "default".to_string(),
            session_recording: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"posthog.host"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!("must be one of {}", VALID_LOG_LEVELS.join(", ")),
            });
        }

        if self.posthog.host.trim().is_empty() {
            errors.push(ValidationError {
                field: "posthog.host".into(),
                message: "must not be empty".into(),
            });
        } else if !self.posthog.host.starts_with("http://")
            && !self.posthog.host.starts_with("https://")
        {
            errors.push(ValidationError {
                field: "posthog.host".into(),
                message: "must be an http(s) URL".into(),
            });
        }

        if self.posthog.project_id.trim().is_empty() {
            errors.push(ValidationError {
                field: "posthog.project_id".into(),
                message: "must not be empty".into(),
            });
        }

        if self.storage.data_dir.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "storage.data_dir".into(),
                message: "must not be empty".into(),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- storage ---

    pub fn storage_data_dir(mut self, dir: PathBuf) -> Self {
        self.config.storage.data_dir = dir;
        self
    }

    // --- firebase ---

    pub fn firebase_project_id(mut self, id: impl Into<String>) -> Self {
        self.config.firebase.project_id = Some(id.into());
        self
    }

    pub fn firebase_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.firebase.api_key = Some(key.into());
        self
    }

    pub fn firebase_measurement_id(mut self, id: impl Into<String>) -> Self {
        self.config.firebase.measurement_id = Some(id.into());
        self
    }

    pub fn firebase_api_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.firebase.api_secret = Some(secret.into());
        self
    }

    // --- posthog ---

    pub fn posthog_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.posthog.api_key = Some(key.into());
        self
    }

    pub fn posthog_host(mut self, host: impl Into<String>) -> Self {
        self.config.posthog.host = host.into();
        self
    }

    pub fn posthog_project_id(mut self, id: impl Into<String>) -> Self {
        self.config.posthog.project_id = id.into();
        self
    }

    pub fn posthog_session_recording(mut self, enabled: bool) -> Self {
        self.config.posthog.session_recording = enabled;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Finish building and return the configuration.
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
