//! Application state: the durable store, the catalog client, and the
//! configuration resolved at startup.

use tracing::{info, instrument};

use crate::codeforces::CodeforcesClient;
use crate::config::{load_service_config_from_env, ServiceConfig};
use crate::domain::MissionSettings;
use crate::error::MissionsError;
use crate::store::MissionStore;

pub struct AppState {
    pub store: MissionStore,
    pub catalog: CodeforcesClient,
    pub config: ServiceConfig,
    /// Used whenever the store has no saved settings yet. This is the single
    /// home of the hardcoded defaults.
    pub fallback_settings: MissionSettings,
}

impl AppState {
    /// Build state from env: load config (if any), open the store, build the
    /// catalog client.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, MissionsError> {
        let config = load_service_config_from_env().unwrap_or_default();
        let fallback_settings = config.defaults.clone().unwrap_or_default();
        let store = MissionStore::open(config.storage.path.clone());
        let catalog = CodeforcesClient::new(&config.catalog.api_base)?;

        info!(
            target: "missiondeck_backend",
            api_base = %config.catalog.api_base,
            store = %store.path().display(),
            count = fallback_settings.max_problems,
            min = fallback_settings.min_rating,
            max = fallback_settings.max_rating,
            "Application state ready"
        );

        Ok(Self {
            store,
            catalog,
            config,
            fallback_settings,
        })
    }
}
