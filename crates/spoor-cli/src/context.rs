//! Composition root for the CLI
//!
//! Wires configuration, local storage, identity, sinks, and the
//! interceptor into one application context. Commands build the context,
//! run the startup consent check, and then drive the pipeline.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing::info;

use spoor_agent::{Console, ConsentGate, Interceptor, SignalBus};
use spoor_core::config::Config;
use spoor_core::domain::{BreadcrumbTrail, ErrorRecord};
use spoor_core::identity::SessionIdentityProvider;
use spoor_core::ports::{IAnalyticsSink, IErrorStore, IKeyValueStore, ISessionReplay};
use spoor_core::usecases::{ErrorReporter, EventTracker};
use spoor_firebase::{FirestoreClient, FirestoreErrorStore, GaAnalyticsSink};
use spoor_posthog::PosthogSink;
use spoor_storage::FileKeyValueStore;

/// Error store stand-in used while Firestore is not configured.
///
/// Every append fails, which the reporter catches and logs, matching the
/// behavior of an unreachable remote store.
struct DisabledErrorStore;

#[async_trait::async_trait]
impl IErrorStore for DisabledErrorStore {
    async fn append(&self, _record: &ErrorRecord) -> Result<()> {
        anyhow::bail!("Firestore error store is not configured")
    }

    async fn list(&self) -> Result<Vec<ErrorRecord>> {
        anyhow::bail!("Firestore error store is not configured")
    }
}

/// Fully wired pipeline plus the pieces commands need directly.
pub struct AppContext {
    pub config: Config,
    pub storage: Arc<FileKeyValueStore>,
    pub identity: Arc<SessionIdentityProvider>,
    pub interceptor: Arc<Interceptor>,
    pub store: Arc<dyn IErrorStore>,
    pub sinks: Vec<Arc<dyn IAnalyticsSink>>,
    firestore_configured: bool,
}

impl AppContext {
    /// Loads configuration (explicit path, else the default location) and
    /// wires the pipeline. Does not touch consent; call [`consent_gate`]
    /// and `init` for the startup auto-activation.
    ///
    /// [`consent_gate`]: AppContext::consent_gate
    pub fn load(config_override: Option<&Path>) -> Result<Self> {
        let config_path = config_override
            .map(Path::to_path_buf)
            .unwrap_or_else(Config::default_path);
        let config = Config::load_or_default(&config_path);

        for error in config.validate() {
            tracing::warn!(%error, "Configuration problem");
        }

        let storage = Arc::new(FileKeyValueStore::in_dir(&config.storage.data_dir));
        let identity = Arc::new(SessionIdentityProvider::new(
            storage.clone() as Arc<dyn IKeyValueStore>
        ));

        // Sinks: GA4 and PostHog, each unavailable when unconfigured.
        let ga = Arc::new(GaAnalyticsSink::from_config(&config.firebase));
        let posthog = Arc::new(PosthogSink::from_config(&config.posthog));
        let sinks: Vec<Arc<dyn IAnalyticsSink>> = vec![ga, posthog.clone()];

        let firestore_configured = config.firebase.firestore_configured();
        let store: Arc<dyn IErrorStore> = match (&config.firebase.project_id, &config.firebase.api_key)
        {
            (Some(project_id), Some(api_key)) => Arc::new(FirestoreErrorStore::new(
                FirestoreClient::new(project_id.as_str(), api_key.as_str()),
            )),
            _ => Arc::new(DisabledErrorStore),
        };

        let trail = Arc::new(Mutex::new(BreadcrumbTrail::new()));
        let tracker = Arc::new(EventTracker::new(identity.clone(), sinks.clone()));
        let reporter = Arc::new(
            ErrorReporter::new(identity.clone(), store.clone())
                .with_trail(trail.clone())
                .with_mirror(posthog.clone() as Arc<dyn IAnalyticsSink>)
                .with_replay(posthog as Arc<dyn ISessionReplay>)
                .with_replay_target(config.posthog.host.as_str(), config.posthog.project_id.as_str()),
        );

        let bus = Arc::new(SignalBus::new());
        let console = Arc::new(Console::new());
        let interceptor = Arc::new(Interceptor::new(bus, console, trail, tracker, reporter));

        info!(config_path = %config_path.display(), "Loaded configuration");

        Ok(Self {
            config,
            storage,
            identity,
            interceptor,
            store,
            sinks,
            firestore_configured,
        })
    }

    /// The consent gate over this context's storage and interceptor.
    pub fn consent_gate(&self) -> ConsentGate {
        ConsentGate::new(
            self.storage.clone() as Arc<dyn IKeyValueStore>,
            self.interceptor.clone(),
        )
    }

    /// True when the remote error store is configured.
    pub fn firestore_configured(&self) -> bool {
        self.firestore_configured
    }
}
