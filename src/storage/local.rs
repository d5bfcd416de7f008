//! Local filesystem storage implementation.
//!
//! Keeps the published event store as a pretty-printed JSON array. Writes go
//! to a temporary sibling file that is then renamed over the original, so a
//! crash mid-write leaves the previous store intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{CorruptStorePolicy, StorageConfig};
use crate::storage::{EventStore, PublishedEventStore};

/// JSON file backend for the published event store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    on_corrupt: CorruptStorePolicy,
}

impl JsonFileStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            on_corrupt: CorruptStorePolicy::Fail,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.store_path).with_corrupt_policy(config.on_corrupt)
    }

    pub fn with_corrupt_policy(mut self, on_corrupt: CorruptStorePolicy) -> Self {
        self.on_corrupt = on_corrupt;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::storage(self.path.display(), e)),
        }
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await
    }

    async fn read_store(&self) -> Result<PublishedEventStore> {
        match self.read_bytes().await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| AppError::storage(self.path.display(), e)),
            None => {
                log::info!(
                    "No store found at {}, starting empty",
                    self.path.display()
                );
                Ok(PublishedEventStore::default())
            }
        }
    }
}

#[async_trait]
impl EventStore for JsonFileStore {
    async fn load(&self) -> Result<PublishedEventStore> {
        match self.read_store().await {
            Ok(store) => {
                log::debug!(
                    "Loaded {} published events from {}",
                    store.len(),
                    self.path.display()
                );
                Ok(store)
            }
            Err(e) if self.on_corrupt == CorruptStorePolicy::Reset => {
                log::error!("{e}. Continuing with an empty store.");
                Ok(PublishedEventStore::default())
            }
            Err(e) => Err(e),
        }
    }

    async fn save(&self, store: &PublishedEventStore) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(store)
            .map_err(|e| AppError::storage(self.path.display(), e))?;
        self.write_bytes(&bytes)
            .await
            .map_err(|e| AppError::storage(self.path.display(), e))?;
        log::debug!(
            "Saved {} published events to {}",
            store.len(),
            self.path.display()
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
