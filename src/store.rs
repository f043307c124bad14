//! Durable mission store: the four persisted keys behind one JSON document.
//!
//! The store is the single owner of the handle, the settings, the mission
//! deck, and its date stamp. A logical operation takes the write guard,
//! mutates, and flushes while the guard is still held, so overlapping
//! operations serialize instead of interleaving their reads and writes.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

use crate::domain::{Mission, MissionSettings};
use crate::error::MissionsError;

const STORE_FILE: &str = "store.json";

/// Everything the service persists, in the key spelling of the wire shape.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreData {
    #[serde(default)]
    pub missions: Vec<Mission>,
    #[serde(default, rename = "missionsDate", skip_serializing_if = "Option::is_none")]
    pub missions_date: Option<String>,
    #[serde(default, rename = "userHandle", skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<MissionSettings>,
}

impl StoreData {
    /// Settings used for generation: stored if present, fallback otherwise.
    pub fn effective_settings(&self, fallback: &MissionSettings) -> MissionSettings {
        self.settings.clone().unwrap_or_else(|| fallback.clone())
    }
}

pub struct MissionStore {
    path: PathBuf,
    data: RwLock<StoreData>,
}

impl MissionStore {
    /// Open the store at `path`, or at the platform data directory when no
    /// override is configured. A missing or malformed file loads as the
    /// empty default; there is no migration of stored shapes.
    pub fn open(path: Option<PathBuf>) -> Self {
        let path = path.unwrap_or_else(default_store_path);
        let data = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(
                    target: "missiondeck_backend",
                    path = %path.display(),
                    error = %e,
                    "Malformed store file; starting from defaults"
                );
                StoreData::default()
            }),
            Err(_) => StoreData::default(),
        };
        info!(
            target: "missiondeck_backend",
            path = %path.display(),
            missions = data.missions.len(),
            has_handle = data.user_handle.is_some(),
            "Mission store opened"
        );
        Self {
            path,
            data: RwLock::new(data),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, StoreData> {
        self.data.read().await
    }

    /// Write guard for a logical read-modify-write span. Call `flush` with
    /// the guard still held to make the mutation durable before releasing it.
    pub async fn write(&self) -> RwLockWriteGuard<'_, StoreData> {
        self.data.write().await
    }

    pub fn flush(&self, data: &StoreData) -> Result<(), MissionsError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| MissionsError::io(dir, e))?;
        }
        let mut payload = serde_json::to_vec_pretty(data)?;
        payload.push(b'\n');
        std::fs::write(&self.path, payload).map_err(|e| MissionsError::io(&self.path, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn default_store_path() -> PathBuf {
    match ProjectDirs::from("", "", "missiondeck") {
        Some(dirs) => dirs.data_dir().join(STORE_FILE),
        None => PathBuf::from(STORE_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> MissionStore {
        MissionStore::open(Some(dir.join("store.json")))
    }

    #[tokio::test]
    async fn missing_file_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert_eq!(*store.read().await, StoreData::default());
    }

    #[tokio::test]
    async fn settings_round_trip_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let saved = MissionSettings {
            max_problems: 7,
            min_rating: 1000,
            max_rating: 1400,
        };

        {
            let store = store_in(dir.path());
            let mut data = store.write().await;
            data.settings = Some(saved.clone());
            store.flush(&data).unwrap();
        }

        let reopened = store_in(dir.path());
        assert_eq!(reopened.read().await.settings, Some(saved));
    }

    #[tokio::test]
    async fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = MissionStore::open(Some(path));
        assert_eq!(*store.read().await, StoreData::default());
    }

    #[tokio::test]
    async fn stored_keys_use_the_original_spelling() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        {
            let mut data = store.write().await;
            data.user_handle = Some("tourist".into());
            data.missions_date = Some("2026-08-07".into());
            store.flush(&data).unwrap();
        }

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"userHandle\""));
        assert!(raw.contains("\"missionsDate\""));
    }

    #[test]
    fn effective_settings_prefers_the_stored_value() {
        let fallback = MissionSettings::default();
        let mut data = StoreData::default();
        assert_eq!(data.effective_settings(&fallback), fallback);

        let saved = MissionSettings {
            max_problems: 2,
            min_rating: 1500,
            max_rating: 1700,
        };
        data.settings = Some(saved.clone());
        assert_eq!(data.effective_settings(&fallback), saved);
    }
}
