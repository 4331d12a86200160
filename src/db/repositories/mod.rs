//! The one seam between services and storage.

use async_trait::async_trait;

use super::{StorageError, Store};
use crate::models::{AdminUser, Inquiry, Profile};

pub mod admin;
pub mod inquiry;
pub mod profile;

use admin::{AdminRepository, SessionFlagRepository};
use inquiry::InquiryRepository;
use profile::ProfileRepository;

#[async_trait]
pub trait Repository: Send + Sync {
    async fn profiles(&self) -> Result<Vec<Profile>, StorageError>;

    async fn save_profiles(&self, profiles: &[Profile]) -> Result<(), StorageError>;

    async fn inquiries(&self) -> Result<Vec<Inquiry>, StorageError>;

    async fn save_inquiries(&self, inquiries: &[Inquiry]) -> Result<(), StorageError>;

    /// The admin record, seeded on first access.
    async fn admin_user(&self) -> Result<AdminUser, StorageError>;

    async fn save_admin_user(&self, admin: &AdminUser) -> Result<(), StorageError>;

    async fn session_flag(&self) -> Result<bool, StorageError>;

    async fn set_session_flag(&self, active: bool) -> Result<(), StorageError>;
}

/// [`Repository`] over a shared store for collections and a separate store for
/// the session flag. Both may be the same store.
#[derive(Clone)]
pub struct StoreRepository {
    shared: Store,
    session: Store,
    admin_seed: AdminUser,
}

impl StoreRepository {
    #[must_use]
    pub const fn new(shared: Store, session: Store, admin_seed: AdminUser) -> Self {
        Self {
            shared,
            session,
            admin_seed,
        }
    }

    /// Collections and session flag in the same store.
    #[must_use]
    pub fn single(store: Store, admin_seed: AdminUser) -> Self {
        Self::new(store.clone(), store, admin_seed)
    }

    /// Same collections, session flag read from `session`.
    #[must_use]
    pub fn with_session(&self, session: Store) -> Self {
        Self::new(self.shared.clone(), session, self.admin_seed.clone())
    }

    fn profile_repo(&self) -> ProfileRepository {
        ProfileRepository::new(self.shared.clone())
    }

    fn inquiry_repo(&self) -> InquiryRepository {
        InquiryRepository::new(self.shared.clone())
    }

    fn admin_repo(&self) -> AdminRepository {
        AdminRepository::new(self.shared.clone())
    }

    fn session_repo(&self) -> SessionFlagRepository {
        SessionFlagRepository::new(self.session.clone())
    }
}

#[async_trait]
impl Repository for StoreRepository {
    async fn profiles(&self) -> Result<Vec<Profile>, StorageError> {
        self.profile_repo().list().await
    }

    async fn save_profiles(&self, profiles: &[Profile]) -> Result<(), StorageError> {
        self.profile_repo().save_all(profiles).await
    }

    async fn inquiries(&self) -> Result<Vec<Inquiry>, StorageError> {
        self.inquiry_repo().list().await
    }

    async fn save_inquiries(&self, inquiries: &[Inquiry]) -> Result<(), StorageError> {
        self.inquiry_repo().save_all(inquiries).await
    }

    async fn admin_user(&self) -> Result<AdminUser, StorageError> {
        self.admin_repo().get_or_seed(&self.admin_seed).await
    }

    async fn save_admin_user(&self, admin: &AdminUser) -> Result<(), StorageError> {
        self.admin_repo().save(admin).await
    }

    async fn session_flag(&self) -> Result<bool, StorageError> {
        self.session_repo().is_set().await
    }

    async fn set_session_flag(&self, active: bool) -> Result<(), StorageError> {
        self.session_repo().set(active).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use crate::db::keys;

    fn seed() -> AdminUser {
        AdminUser::seed(&AdminConfig::default(), "123456".to_string())
    }

    #[tokio::test]
    async fn test_admin_seeded_once() {
        let store = Store::in_memory();
        let repo = StoreRepository::single(store.clone(), seed());

        let admin = repo.admin_user().await.unwrap();
        assert_eq!(admin.email, "admin@gmail.com");

        let mut renamed = admin.clone();
        renamed.name = "Owner".to_string();
        repo.save_admin_user(&renamed).await.unwrap();

        assert_eq!(repo.admin_user().await.unwrap().name, "Owner");
    }

    #[tokio::test]
    async fn test_session_flag_is_raw_true() {
        let store = Store::in_memory();
        let repo = StoreRepository::single(store.clone(), seed());

        assert!(!repo.session_flag().await.unwrap());
        repo.set_session_flag(true).await.unwrap();
        assert_eq!(
            store.read_raw(keys::IS_ADMIN).await.unwrap().as_deref(),
            Some("true")
        );

        repo.set_session_flag(false).await.unwrap();
        assert_eq!(store.read_raw(keys::IS_ADMIN).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_session_scope_is_separate() {
        let shared = Store::in_memory();
        let repo = StoreRepository::single(shared.clone(), seed());
        let visitor = repo.with_session(Store::in_memory());

        visitor.set_session_flag(true).await.unwrap();
        assert!(visitor.session_flag().await.unwrap());
        assert!(!repo.session_flag().await.unwrap());
    }
}
