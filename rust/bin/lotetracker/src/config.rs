//! Tracker configuration.
//!
//! Reads/writes `~/.lotetracker/config.toml`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use lote::DEFAULT_QR_SIZE;
use lote_kv::{JsonFileStore, KVStore, MemoryStore, RedbStore};

/// Where tracker state lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON document, local-storage style.
    Json,
    /// Embedded redb database.
    Redb,
    /// Nothing persists past the process.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: Backend,
    /// Directory holding the store file.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Json,
            data_dir: home_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory downloaded QR images are written to.
    pub dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    /// Edge length of exported images in pixels.
    pub size: u32,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_QR_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub storage: StorageConfig,
    pub export: ExportConfig,
    pub qr: QrConfig,
}

impl TrackerConfig {
    /// Default config file path: ~/.lotetracker/config.toml.
    pub fn default_path() -> PathBuf {
        home_dir().join("config.toml")
    }

    /// Load config from disk, or return defaults if the file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: TrackerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Store file for the configured backend.
    pub fn store_path(&self) -> PathBuf {
        let file = match self.storage.backend {
            Backend::Redb => "lotetracker.redb",
            Backend::Json | Backend::Memory => "lotetracker.json",
        };
        self.storage.data_dir.join(file)
    }

    /// Open the configured KV backend.
    pub fn open_store(&self) -> anyhow::Result<Arc<dyn KVStore>> {
        let store: Arc<dyn KVStore> = match self.storage.backend {
            Backend::Json => Arc::new(
                JsonFileStore::open(&self.store_path())
                    .map_err(|e| anyhow::anyhow!("failed to open JSON store: {}", e))?,
            ),
            Backend::Redb => Arc::new(
                RedbStore::open(&self.store_path())
                    .map_err(|e| anyhow::anyhow!("failed to open redb store: {}", e))?,
            ),
            Backend::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(store)
    }
}

/// Return the tracker directory (~/.lotetracker).
fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".lotetracker")
}
