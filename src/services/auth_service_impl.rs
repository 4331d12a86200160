//! [`Repository`]-backed implementation of the `AuthService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::db::Repository;
use crate::models::{AdminInfo, AdminUser};
use crate::services::auth_service::{AuthError, AuthService, AuthState, CredentialVerifier};

pub struct DefaultAuthService {
    repo: Arc<dyn Repository>,
    verifier: Arc<dyn CredentialVerifier>,
    /// Serializes read-modify-write of the admin record. Shared by every
    /// instance built over the same store, since one is built per request.
    admin_lock: Arc<Mutex<()>>,
}

impl DefaultAuthService {
    #[must_use]
    pub fn new(
        repo: Arc<dyn Repository>,
        verifier: Arc<dyn CredentialVerifier>,
        admin_lock: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            repo,
            verifier,
            admin_lock,
        }
    }

    /// Callers hold `admin_lock`.
    async fn replace_password(&self, mut admin: AdminUser, new: &str) -> Result<(), AuthError> {
        admin.password = self.verifier.prepare(new).await?;
        self.repo.save_admin_user(&admin).await?;

        info!(email = %admin.email, "Admin password changed");
        Ok(())
    }
}

#[async_trait]
impl AuthService for DefaultAuthService {
    async fn state(&self) -> Result<AuthState, AuthError> {
        if self.repo.session_flag().await? {
            Ok(AuthState::LoggedIn)
        } else {
            Ok(AuthState::LoggedOut)
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<AdminInfo, AuthError> {
        let admin = self.repo.admin_user().await?;

        let email_matches = admin.email == email;
        let password_matches = self.verifier.verify(&admin.password, password).await?;

        if !(email_matches && password_matches) {
            warn!(email = %email, "Failed admin login");
            return Err(AuthError::InvalidCredentials);
        }

        self.repo.set_session_flag(true).await?;
        info!(email = %admin.email, "Admin logged in");
        Ok(admin.public_info())
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.repo.set_session_flag(false).await?;
        info!("Admin logged out");
        Ok(())
    }

    async fn current_admin(&self) -> Result<AdminInfo, AuthError> {
        Ok(self.repo.admin_user().await?.public_info())
    }

    async fn change_password(&self, current: &str, new: &str) -> Result<(), AuthError> {
        if new.is_empty() {
            return Err(AuthError::Validation(
                "New password must not be empty".to_string(),
            ));
        }

        if current == new {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let _guard = self.admin_lock.lock().await;
        let admin = self.repo.admin_user().await?;
        if !self.verifier.verify(&admin.password, current).await? {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        self.replace_password(admin, new).await
    }

    async fn set_password(&self, new: &str) -> Result<(), AuthError> {
        if new.is_empty() {
            return Err(AuthError::Validation(
                "New password must not be empty".to_string(),
            ));
        }

        let _guard = self.admin_lock.lock().await;
        let admin = self.repo.admin_user().await?;
        self.replace_password(admin, new).await
    }
}
