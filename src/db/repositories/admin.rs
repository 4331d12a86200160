use tracing::info;

use crate::db::{Store, StorageError, keys};
use crate::models::AdminUser;

const SESSION_FLAG_VALUE: &str = "true";

pub struct AdminRepository {
    store: Store,
}

impl AdminRepository {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Loads the admin record, writing `seed` first if none is stored.
    pub async fn get_or_seed(&self, seed: &AdminUser) -> Result<AdminUser, StorageError> {
        if let Some(admin) = self.store.read::<AdminUser>(keys::ADMIN_USER).await? {
            return Ok(admin);
        }

        info!(email = %seed.email, "Seeding admin user");
        self.store.write(keys::ADMIN_USER, seed).await?;
        Ok(seed.clone())
    }

    pub async fn save(&self, admin: &AdminUser) -> Result<(), StorageError> {
        self.store.write(keys::ADMIN_USER, admin).await
    }
}

/// The `isAdmin` marker. Its presence alone grants console access.
pub struct SessionFlagRepository {
    store: Store,
}

impl SessionFlagRepository {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn is_set(&self) -> Result<bool, StorageError> {
        Ok(self.store.read_raw(keys::IS_ADMIN).await?.as_deref() == Some(SESSION_FLAG_VALUE))
    }

    pub async fn set(&self, active: bool) -> Result<(), StorageError> {
        if active {
            self.store.write_raw(keys::IS_ADMIN, SESSION_FLAG_VALUE).await
        } else {
            self.store.remove(keys::IS_ADMIN).await
        }
    }
}
