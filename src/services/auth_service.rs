//! Domain service for the admin console login.
//!
//! Handles login, logout, the logged-in check and password changes for the
//! single admin record.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::task;

use crate::config::CredentialBackend;
use crate::db::StorageError;
use crate::models::AdminInfo;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthState {
    LoggedOut,
    LoggedIn,
}

/// Compares a supplied password against the stored one, and prepares
/// passwords for storage.
#[async_trait::async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, stored: &str, supplied: &str) -> Result<bool, AuthError>;

    /// Turns a plain password into the form kept in the admin record.
    async fn prepare(&self, password: &str) -> Result<String, AuthError>;
}

/// Stored password is the password.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextVerifier;

#[async_trait::async_trait]
impl CredentialVerifier for PlainTextVerifier {
    async fn verify(&self, stored: &str, supplied: &str) -> Result<bool, AuthError> {
        Ok(stored == supplied)
    }

    async fn prepare(&self, password: &str) -> Result<String, AuthError> {
        Ok(password.to_string())
    }
}

/// Stored password is an Argon2id PHC string.
///
/// Hashing is CPU-bound, so both operations run on the blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Verifier;

#[async_trait::async_trait]
impl CredentialVerifier for Argon2Verifier {
    async fn verify(&self, stored: &str, supplied: &str) -> Result<bool, AuthError> {
        let stored = stored.to_string();
        let supplied = supplied.to_string();

        task::spawn_blocking(move || {
            let Ok(parsed) = PasswordHash::new(&stored) else {
                // A plain value left over from before the switch never matches.
                return false;
            };
            Argon2::default()
                .verify_password(supplied.as_bytes(), &parsed)
                .is_ok()
        })
        .await
        .map_err(|e| AuthError::Hashing(format!("verification task panicked: {e}")))
    }

    async fn prepare(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_string();

        task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AuthError::Hashing(e.to_string()))
        })
        .await
        .map_err(|e| AuthError::Hashing(format!("hashing task panicked: {e}")))?
    }
}

#[must_use]
pub fn verifier_for(backend: CredentialBackend) -> Arc<dyn CredentialVerifier> {
    match backend {
        CredentialBackend::Plain => Arc::new(PlainTextVerifier),
        CredentialBackend::Argon2 => Arc::new(Argon2Verifier),
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn state(&self) -> Result<AuthState, AuthError>;

    /// Checks the credentials against the stored admin record and sets the
    /// session flag on success.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] and leaves the session
    /// logged out on any mismatch.
    async fn login(&self, email: &str, password: &str) -> Result<AdminInfo, AuthError>;

    async fn logout(&self) -> Result<(), AuthError>;

    /// The admin record without its password.
    async fn current_admin(&self) -> Result<AdminInfo, AuthError>;

    /// Replaces the password after checking the current one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the current password is wrong, or
    /// the new one is empty or unchanged.
    async fn change_password(&self, current: &str, new: &str) -> Result<(), AuthError>;

    /// Replaces the password without checking the current one.
    async fn set_password(&self, new: &str) -> Result<(), AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_verifier_exact_compare() {
        let verifier = PlainTextVerifier;
        assert!(verifier.verify("123456", "123456").await.unwrap());
        assert!(!verifier.verify("123456", "123456 ").await.unwrap());
        assert_eq!(verifier.prepare("abc").await.unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_argon2_verifier_roundtrip() {
        let verifier = Argon2Verifier;
        let stored = verifier.prepare("123456").await.unwrap();

        assert!(stored.starts_with("$argon2"));
        assert!(verifier.verify(&stored, "123456").await.unwrap());
        assert!(!verifier.verify(&stored, "654321").await.unwrap());
    }

    #[tokio::test]
    async fn test_argon2_rejects_plain_stored_value() {
        assert!(!Argon2Verifier.verify("123456", "123456").await.unwrap());
    }
}
