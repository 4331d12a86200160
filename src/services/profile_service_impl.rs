//! [`Repository`]-backed implementation of the `ProfileService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::db::Repository;
use crate::models::{Profile, ProfileId, ProfileInput};
use crate::services::profile_service::{DeleteConfirmation, ProfileError, ProfileService};

pub struct DefaultProfileService {
    repo: Arc<dyn Repository>,
    write_lock: Mutex<()>,
}

impl DefaultProfileService {
    #[must_use]
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self {
            repo,
            write_lock: Mutex::new(()),
        }
    }

    fn validate_input(input: &ProfileInput) -> Result<(), ProfileError> {
        let missing = input.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ProfileError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

#[async_trait]
impl ProfileService for DefaultProfileService {
    async fn list_profiles(&self) -> Result<Vec<Profile>, ProfileError> {
        Ok(self.repo.profiles().await?)
    }

    async fn get_profile(&self, id: &ProfileId) -> Result<Profile, ProfileError> {
        self.repo
            .profiles()
            .await?
            .into_iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| ProfileError::NotFound(id.clone()))
    }

    async fn create_profile(&self, input: ProfileInput) -> Result<Profile, ProfileError> {
        Self::validate_input(&input)?;

        let _guard = self.write_lock.lock().await;
        let mut profiles = self.repo.profiles().await?;

        let id = ProfileId::generate(&profiles, &mut rand::rng());
        let profile = Profile::from_input(id, input);
        profiles.push(profile.clone());
        self.repo.save_profiles(&profiles).await?;

        info!(id = %profile.id, title = %profile.title, "Profile created");
        Ok(profile)
    }

    async fn update_profile(
        &self,
        id: &ProfileId,
        input: ProfileInput,
    ) -> Result<Profile, ProfileError> {
        Self::validate_input(&input)?;

        let _guard = self.write_lock.lock().await;
        let mut profiles = self.repo.profiles().await?;

        let profile = profiles
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| ProfileError::NotFound(id.clone()))?;
        profile.apply(input);
        let updated = profile.clone();

        self.repo.save_profiles(&profiles).await?;

        info!(id = %updated.id, "Profile updated");
        Ok(updated)
    }

    async fn delete_profile(
        &self,
        id: &ProfileId,
        confirmation: DeleteConfirmation,
    ) -> Result<Profile, ProfileError> {
        let _guard = self.write_lock.lock().await;
        let mut profiles = self.repo.profiles().await?;

        let index = profiles
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| ProfileError::NotFound(id.clone()))?;

        if confirmation != DeleteConfirmation::Confirmed {
            return Err(ProfileError::ConfirmationRequired(id.clone()));
        }

        let removed = profiles.remove(index);
        self.repo.save_profiles(&profiles).await?;

        info!(id = %removed.id, "Profile deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use crate::db::{Store, StoreRepository};
    use crate::models::{Age, AdminUser, Gender, MaritalStatus};

    fn service() -> (DefaultProfileService, Arc<StoreRepository>) {
        let repo = Arc::new(StoreRepository::single(
            Store::in_memory(),
            AdminUser::seed(&AdminConfig::default(), "123456".to_string()),
        ));
        (DefaultProfileService::new(repo.clone()), repo)
    }

    fn input(title: &str) -> ProfileInput {
        ProfileInput {
            title: title.to_string(),
            age: Age::Text("27".to_string()),
            status: MaritalStatus::Single,
            gender: Gender::Female,
            city: "Lahore".to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_persisted_list_tracks_every_step() {
        let (service, repo) = service();

        let a = service.create_profile(input("Doctor")).await.unwrap();
        let b = service.create_profile(input("Banker")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(repo.profiles().await.unwrap(), vec![a.clone(), b.clone()]);

        let b2 = service
            .update_profile(&b.id, input("Senior Banker"))
            .await
            .unwrap();
        assert_eq!(b2.id, b.id);
        assert_eq!(repo.profiles().await.unwrap(), vec![a.clone(), b2.clone()]);

        service
            .delete_profile(&a.id, DeleteConfirmation::Confirmed)
            .await
            .unwrap();
        assert_eq!(repo.profiles().await.unwrap(), vec![b2]);
    }

    #[tokio::test]
    async fn test_delete_removes_only_matching_id() {
        let (service, repo) = service();
        let mut created = Vec::new();
        for title in ["One", "Two", "Three", "Four"] {
            created.push(service.create_profile(input(title)).await.unwrap());
        }

        service
            .delete_profile(&created[2].id, DeleteConfirmation::Confirmed)
            .await
            .unwrap();

        let remaining = repo.profiles().await.unwrap();
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().all(|p| p.id != created[2].id));
        assert_eq!(remaining[2].title, "Four");
    }

    #[tokio::test]
    async fn test_unconfirmed_delete_keeps_profile() {
        let (service, repo) = service();
        let profile = service.create_profile(input("Pilot")).await.unwrap();

        let err = service
            .delete_profile(&profile.id, DeleteConfirmation::Unconfirmed)
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::ConfirmationRequired(_)));
        assert_eq!(repo.profiles().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_required_fields() {
        let (service, repo) = service();
        let mut blank = input("");
        blank.city = String::new();

        let err = service.create_profile(blank).await.unwrap_err();
        assert!(matches!(err, ProfileError::Validation(msg) if msg.contains("title, city")));
        assert!(repo.profiles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let (service, _) = service();
        let err = service
            .update_profile(&ProfileId::from("SMB-000"), input("Ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::NotFound(_)));
    }
}
