//! Loading service configuration (catalog endpoints, storage location, and
//! default deck settings) from TOML.
//!
//! Everything is optional: with no config file the service talks to the
//! public catalog and stores its state in the platform data directory.
//! Settings keys use the same spelling as the persisted shape
//! (`maxProblems`, `minRating`, `maxRating`).

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::MissionSettings;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ServiceConfig {
  #[serde(default)]
  pub catalog: CatalogConfig,
  #[serde(default)]
  pub storage: StorageConfig,
  /// Fallback deck settings used while the store has none saved.
  #[serde(default)]
  pub defaults: Option<MissionSettings>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CatalogConfig {
  /// API root, e.g. "https://codeforces.com/api".
  #[serde(default = "default_api_base")]
  pub api_base: String,
  /// Base of the user-facing problem pages the views link to.
  #[serde(default = "default_problem_base")]
  pub problem_base: String,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    Self {
      api_base: default_api_base(),
      problem_base: default_problem_base(),
    }
  }
}

fn default_api_base() -> String {
  "https://codeforces.com/api".into()
}

fn default_problem_base() -> String {
  "https://codeforces.com/problemset/problem".into()
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct StorageConfig {
  /// Overrides the platform-default store file location.
  #[serde(default)]
  pub path: Option<PathBuf>,
}

/// Attempt to load `ServiceConfig` from MISSIONS_CONFIG_PATH. On any
/// parsing/IO error, returns None and the caller falls back to defaults.
pub fn load_service_config_from_env() -> Option<ServiceConfig> {
  let path = std::env::var("MISSIONS_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<ServiceConfig>(&s) {
      Ok(cfg) => {
        info!(target: "missiondeck_backend", %path, "Loaded service config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "missiondeck_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "missiondeck_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
