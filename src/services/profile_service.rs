//! Domain service for managing published profiles.
//!
//! Create, edit and delete listings shown on the public catalog.

use thiserror::Error;

use crate::db::StorageError;
use crate::models::{Profile, ProfileId, ProfileInput};

/// Errors specific to profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile {0} not found")]
    NotFound(ProfileId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Deleting profile {0} must be confirmed")]
    ConfirmationRequired(ProfileId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Answer to the "really delete?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteConfirmation {
    Confirmed,
    Unconfirmed,
}

impl From<bool> for DeleteConfirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Unconfirmed
        }
    }
}

/// Domain service trait for profiles.
#[async_trait::async_trait]
pub trait ProfileService: Send + Sync {
    /// Lists stored profiles in storage order.
    async fn list_profiles(&self) -> Result<Vec<Profile>, ProfileError>;

    async fn get_profile(&self, id: &ProfileId) -> Result<Profile, ProfileError>;

    /// Creates a profile with a freshly generated id and appends it.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Validation`] if a required field is blank.
    async fn create_profile(&self, input: ProfileInput) -> Result<Profile, ProfileError>;

    /// Replaces the fields of an existing profile in place, keeping its id.
    async fn update_profile(
        &self,
        id: &ProfileId,
        input: ProfileInput,
    ) -> Result<Profile, ProfileError>;

    /// Removes the profile with `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::ConfirmationRequired`] and removes nothing
    /// unless `confirmation` is [`DeleteConfirmation::Confirmed`].
    async fn delete_profile(
        &self,
        id: &ProfileId,
        confirmation: DeleteConfirmation,
    ) -> Result<Profile, ProfileError>;
}
