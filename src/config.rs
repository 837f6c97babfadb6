//! Runtime configuration.

use crate::catalog::StaticCatalog;
use crate::core::constants::DEFAULT_MAX_CATCH_UP_MS;
use crate::store::{JsonPlayerStore, PlayerStore, SnapshotPlayerStore, StoreError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("I/O error reading {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Which persistence backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    #[default]
    Json,
    Snapshot,
}

/// Configuration for a game instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Where player saves live (None = the store's platform default)
    pub data_dir: Option<PathBuf>,

    /// Persistence backend
    pub store: StoreKind,

    /// Longest absence simulated by one advance (None = unbounded)
    pub max_catch_up_ms: Option<i64>,

    /// Content file replacing the built-in catalog
    pub catalog_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            store: StoreKind::Json,
            max_catch_up_ms: Some(DEFAULT_MAX_CATCH_UP_MS),
            catalog_path: None,
        }
    }
}

impl GameConfig {
    /// JSON saves in a specific directory
    pub fn json_in(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(dir.into()),
            store: StoreKind::Json,
            ..Default::default()
        }
    }

    /// Binary snapshots in a specific directory
    pub fn snapshot_in(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(dir.into()),
            store: StoreKind::Snapshot,
            ..Default::default()
        }
    }

    /// No limit on how much offline time is simulated
    pub fn uncapped(self) -> Self {
        Self {
            max_catch_up_ms: None,
            ..self
        }
    }

    /// Path of the config file in the platform config directory.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let project_dirs =
            ProjectDirs::from("", "", "skillbound").ok_or(ConfigError::NoConfigDir)?;
        Ok(project_dirs.config_dir().join(CONFIG_FILE))
    }

    /// Loads the platform config file, falling back to defaults when absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Opens the configured store.
    pub fn open_store(&self) -> Result<Box<dyn PlayerStore>, ConfigError> {
        let store: Box<dyn PlayerStore> = match (self.store, &self.data_dir) {
            (StoreKind::Json, Some(dir)) => Box::new(JsonPlayerStore::with_dir(dir)?),
            (StoreKind::Json, None) => Box::new(JsonPlayerStore::new()?),
            (StoreKind::Snapshot, Some(dir)) => Box::new(SnapshotPlayerStore::with_dir(dir)?),
            (StoreKind::Snapshot, None) => Box::new(SnapshotPlayerStore::new()?),
        };
        Ok(store)
    }

    /// The configured content, or the built-in set.
    pub fn load_catalog(&self) -> Result<StaticCatalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => StaticCatalog::load(path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            }),
            None => Ok(StaticCatalog::standard()),
        }
    }
}
