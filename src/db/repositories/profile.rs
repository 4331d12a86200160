use crate::db::{Store, StorageError, keys};
use crate::models::Profile;

pub struct ProfileRepository {
    store: Store,
}

impl ProfileRepository {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Stored listings in storage order, `[]` when nothing usable is stored.
    pub async fn list(&self) -> Result<Vec<Profile>, StorageError> {
        self.store.read_or_default(keys::PROFILES).await
    }

    pub async fn save_all(&self, profiles: &[Profile]) -> Result<(), StorageError> {
        self.store.write(keys::PROFILES, profiles).await
    }
}
