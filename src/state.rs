use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::{Repository, Store, StoreRepository};
use crate::models::AdminUser;
use crate::services::{
    AuthService, CatalogService, CredentialVerifier, DefaultAuthService, DefaultInquiryService,
    DefaultProfileService, ImageService, InquiryService, ProfileService, verifier_for,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub repository: StoreRepository,

    pub verifier: Arc<dyn CredentialVerifier>,

    pub profile_service: Arc<dyn ProfileService>,

    pub inquiry_service: Arc<dyn InquiryService>,

    pub catalog_service: Arc<CatalogService>,

    pub image_service: Arc<ImageService>,

    /// Held while the admin record is rewritten.
    admin_lock: Arc<Mutex<()>>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::open(&config.general.data_path, config.storage.quota_bytes).await?;
        Self::with_store(config, store).await
    }

    /// Builds the services over an already opened store and seeds the admin
    /// record if the store has none.
    pub async fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let verifier = verifier_for(config.admin.credential_backend);

        let seed_password = verifier
            .prepare(&config.admin.password)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to prepare admin seed password: {e}"))?;
        let repository =
            StoreRepository::single(store.clone(), AdminUser::seed(&config.admin, seed_password));

        repository
            .admin_user()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed admin record: {e}"))?;

        let repo: Arc<dyn Repository> = Arc::new(repository.clone());

        let profile_service =
            Arc::new(DefaultProfileService::new(repo.clone())) as Arc<dyn ProfileService>;
        let inquiry_service = Arc::new(DefaultInquiryService::new(
            repo.clone(),
            config.inquiry.default_country.clone(),
        )) as Arc<dyn InquiryService>;
        let catalog_service = Arc::new(CatalogService::new(repo));

        Ok(Self {
            config: Arc::new(config),
            store,
            repository,
            verifier,
            profile_service,
            inquiry_service,
            catalog_service,
            image_service: Arc::new(ImageService::new()),
            admin_lock: Arc::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Auth service whose logged-in flag lives in `session`.
    #[must_use]
    pub fn auth_service(&self, session: Store) -> Arc<dyn AuthService> {
        Arc::new(DefaultAuthService::new(
            Arc::new(self.repository.with_session(session)),
            self.verifier.clone(),
            self.admin_lock.clone(),
        ))
    }

    /// Auth service for local operator commands, with no browser session.
    #[must_use]
    pub fn operator_auth_service(&self) -> Arc<dyn AuthService> {
        self.auth_service(Store::in_memory())
    }
}
