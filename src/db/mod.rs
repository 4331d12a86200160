use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tower_sessions::Session;
use tracing::{info, warn};

pub mod backend;
pub mod repositories;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend, SessionBackend};
pub use repositories::{Repository, StoreRepository};

/// Storage keys, named as the site has always stored them.
pub mod keys {
    pub const PROFILES: &str = "profiles";
    pub const INQUIRIES: &str = "inquiries";
    pub const ADMIN_USER: &str = "adminUser";
    pub const IS_ADMIN: &str = "isAdmin";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage quota exceeded writing '{key}': {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    #[error("Session error: {0}")]
    Session(String),
}

/// Typed access to a key-value backend. Values are JSON text.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValueBackend>,
}

impl Store {
    pub fn new(backend: impl KeyValueBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    #[must_use]
    pub fn for_session(session: Session) -> Self {
        Self::new(SessionBackend::new(session))
    }

    /// Opens the store at `data_path`; `:memory:` gives a process-local store.
    pub async fn open(data_path: &str, quota_bytes: usize) -> anyhow::Result<Self> {
        if data_path == ":memory:" {
            info!("Using in-memory storage");
            return Ok(Self::new(MemoryBackend::with_quota(quota_bytes)));
        }

        let backend = FileBackend::open(data_path, quota_bytes)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open storage at {data_path}: {e}"))?;
        info!("Storage opened at {}", backend.path().display());
        Ok(Self::new(backend))
    }

    /// Reads and decodes `key`. Absent and undecodable values both come back
    /// as `None`; only backend failures are errors.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.backend.get_item(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, "Ignoring malformed stored value: {e}");
                Ok(None)
            }
        }
    }

    pub async fn read_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &str,
    ) -> Result<T, StorageError> {
        Ok(self.read(key).await?.unwrap_or_default())
    }

    /// Replaces the whole value under `key`.
    pub async fn write<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set_item(key, raw).await
    }

    pub async fn read_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend.get_item(key).await
    }

    pub async fn write_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend.set_item(key, value.to_string()).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove_item(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Profile, sample_profiles};

    #[tokio::test]
    async fn test_missing_key_reads_default() {
        let store = Store::in_memory();
        let profiles: Vec<Profile> = store.read_or_default(keys::PROFILES).await.unwrap();
        assert!(profiles.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_value_reads_as_absent() {
        let store = Store::in_memory();
        store.write_raw(keys::PROFILES, "[{broken").await.unwrap();

        let profiles: Option<Vec<Profile>> = store.read(keys::PROFILES).await.unwrap();
        assert!(profiles.is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_is_equal() {
        let store = Store::in_memory();
        let profiles = sample_profiles();
        store.write(keys::PROFILES, &profiles).await.unwrap();

        let back: Vec<Profile> = store.read_or_default(keys::PROFILES).await.unwrap();
        assert_eq!(back, profiles);
    }
}
