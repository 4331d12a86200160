//! Raw string key-value backends behind [`Store`](super::Store).
//!
//! Values are opaque text here; JSON encoding happens one layer up.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tower_sessions::Session;
use tracing::{debug, warn};

use super::StorageError;

#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;

    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Bytes a map would occupy once `key` holds a value of `value_len` bytes.
fn usage_after(items: &BTreeMap<String, String>, key: &str, value_len: usize) -> usize {
    let current: usize = items.iter().map(|(k, v)| k.len() + v.len()).sum();
    let replaced = items.get(key).map_or(0, |v| key.len() + v.len());
    current - replaced + key.len() + value_len
}

fn check_quota(
    items: &BTreeMap<String, String>,
    key: &str,
    value: &str,
    quota_bytes: usize,
) -> Result<(), StorageError> {
    if quota_bytes == 0 {
        return Ok(());
    }

    let needed = usage_after(items, key, value.len());
    if needed > quota_bytes {
        return Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            needed,
            quota: quota_bytes,
        });
    }
    Ok(())
}

/// In-process map. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryBackend {
    items: RwLock<BTreeMap<String, String>>,
    quota_bytes: usize,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: RwLock::default(),
            quota_bytes,
        }
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut items = self.items.write().await;
        check_quota(&items, key, &value, self.quota_bytes)?;
        items.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.write().await.remove(key);
        Ok(())
    }
}

/// All keys in one JSON object file, rewritten atomically on each change.
pub struct FileBackend {
    path: PathBuf,
    quota_bytes: usize,
    items: RwLock<BTreeMap<String, String>>,
}

impl FileBackend {
    pub async fn open(path: impl Into<PathBuf>, quota_bytes: usize) -> Result<Self, StorageError> {
        let path = path.into();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let items = if tokio::fs::try_exists(&path).await? {
            let content = tokio::fs::read_to_string(&path).await?;
            match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(items) => items,
                Err(e) => {
                    let backup = corrupt_backup_path(&path);
                    warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        "Storage file is not a key-value object ({e}), starting empty"
                    );
                    tokio::fs::rename(&path, &backup).await?;
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), keys = items.len(), "Opened storage file");

        Ok(Self {
            path,
            quota_bytes,
            items: RwLock::new(items),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_vec_pretty(items)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn corrupt_backup_path(path: &Path) -> PathBuf {
    let stamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".corrupt-{stamp}"));
    path.with_file_name(name)
}

#[async_trait]
impl KeyValueBackend for FileBackend {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut items = self.items.write().await;
        check_quota(&items, key, &value, self.quota_bytes)?;

        let previous = items.insert(key.to_string(), value);
        if let Err(e) = self.persist(&items).await {
            match previous {
                Some(old) => items.insert(key.to_string(), old),
                None => items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().await;
        let Some(previous) = items.remove(key) else {
            return Ok(());
        };

        if let Err(e) = self.persist(&items).await {
            items.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}

/// Keys scoped to one visitor's cookie session.
#[derive(Clone)]
pub struct SessionBackend {
    session: Session,
}

impl SessionBackend {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl KeyValueBackend for SessionBackend {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.session
            .get::<String>(key)
            .await
            .map_err(|e| StorageError::Session(e.to_string()))
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.session
            .insert(key, value)
            .await
            .map_err(|e| StorageError::Session(e.to_string()))
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.session
            .remove::<String>(key)
            .await
            .map(|_| ())
            .map_err(|e| StorageError::Session(e.to_string()))
    }
}
