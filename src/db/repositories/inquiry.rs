use crate::db::{Store, StorageError, keys};
use crate::models::Inquiry;

pub struct InquiryRepository {
    store: Store,
}

impl InquiryRepository {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Stored inquiries, newest first.
    pub async fn list(&self) -> Result<Vec<Inquiry>, StorageError> {
        self.store.read_or_default(keys::INQUIRIES).await
    }

    pub async fn save_all(&self, inquiries: &[Inquiry]) -> Result<(), StorageError> {
        self.store.write(keys::INQUIRIES, inquiries).await
    }
}
