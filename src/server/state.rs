//! Server state and configuration.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

use crate::config::EngineConfig;
use crate::design::AssetSlot;
use crate::error::InsigniaError;
use crate::ingest::{AssetGuard, Ticket};
use crate::persistence::{DesignRepository, FileRepository};
use crate::render::ComposeOptions;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:8080")
    pub listen_addr: String,
    /// Directory holding `<key>.json` design files
    pub design_dir: PathBuf,
    pub engine: EngineConfig,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub repository: Arc<dyn DesignRepository>,
    pub options: ComposeOptions,
    /// One write lock per design key; load-modify-save runs under it.
    key_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    /// Upload generations per design key.
    uploads: Mutex<HashMap<String, AssetGuard>>,
}

impl AppState {
    /// State backed by the configured design directory.
    pub fn new(config: ServerConfig) -> Result<Self, InsigniaError> {
        let repository = FileRepository::open(&config.design_dir)?;
        Ok(Self::with_repository(config, Arc::new(repository)))
    }

    pub fn with_repository(config: ServerConfig, repository: Arc<dyn DesignRepository>) -> Self {
        Self {
            options: ComposeOptions::from(&config.engine),
            config,
            repository,
            key_locks: Mutex::new(HashMap::new()),
            uploads: Mutex::new(HashMap::new()),
        }
    }

    /// Wait for exclusive write access to the design stored under `key`.
    pub async fn lock_key(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.key_locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(key.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Start an upload into `slot` of `key`, superseding any upload still in flight.
    pub fn begin_upload(&self, key: &str, slot: AssetSlot) -> Ticket {
        let mut uploads = self.uploads.lock().unwrap_or_else(PoisonError::into_inner);
        uploads.entry(key.to_string()).or_default().begin(slot)
    }

    /// Whether `ticket` is still the newest upload for its slot.
    pub fn upload_is_current(&self, key: &str, ticket: Ticket) -> bool {
        let uploads = self.uploads.lock().unwrap_or_else(PoisonError::into_inner);
        uploads.get(key).is_some_and(|guard| guard.complete(ticket))
    }
}
