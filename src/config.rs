use crate::{
    domain::BoardConfig,
    error::{Result, TriageError},
    storage::{MemoryStorage, Storage},
};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, sync::Arc};
use tokio::fs;
use tracing::debug;

/// Which persistence backend the dashboard talks to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Process-local state, reseeded on every start
    Memory,
    /// JSON documents under `<root>/.triage`
    File { root: PathBuf },
    /// Key-value table in a SQLite database
    Sqlite { path: PathBuf },
    /// Remote ticket API
    Http {
        base_url: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::File {
            root: PathBuf::from("."),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    pub board: BoardConfig,
    pub backend: BackendConfig,
}

impl TriageConfig {
    /// Loads configuration from a JSON file; a missing file yields the defaults
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).await?;
        serde_json::from_str(&contents)
            .map_err(|e| TriageError::ConfigError(format!("{}: {e}", path.display())))
    }

    /// Writes configuration as pretty JSON
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?).await?;
        Ok(())
    }

    /// Builds the configured storage backend
    pub fn open_storage(&self) -> Result<Arc<dyn Storage>> {
        match &self.backend {
            BackendConfig::Memory => Ok(Arc::new(MemoryStorage::new())),

            #[cfg(feature = "file-storage")]
            BackendConfig::File { root } => Ok(Arc::new(crate::storage::FileStorage::new(root))),

            #[cfg(feature = "sqlite-storage")]
            BackendConfig::Sqlite { path } => {
                Ok(Arc::new(crate::storage::SqliteStorage::new(path)?))
            }

            #[cfg(feature = "http-storage")]
            BackendConfig::Http {
                base_url,
                timeout_secs,
            } => Ok(Arc::new(crate::storage::HttpStorage::with_timeout(
                base_url.clone(),
                std::time::Duration::from_secs(*timeout_secs),
            )?)),

            #[allow(unreachable_patterns)]
            other => Err(TriageError::ConfigError(format!(
                "storage backend {other:?} is not enabled in this build"
            ))),
        }
    }
}
