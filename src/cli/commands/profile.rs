use crate::cli::ProfileArgs;
use crate::models::{Age, Profile, ProfileId, ProfileInput};
use crate::services::{DeleteConfirmation, ProfileError};
use crate::state::SharedState;

pub async fn cmd_profile_list(state: &SharedState) -> anyhow::Result<()> {
    let profiles = state.profile_service.list_profiles().await?;

    if profiles.is_empty() {
        println!("No profiles stored. The catalog is showing the built-in samples.");
        println!("Use 'matchcrm profile add --title ... --age ... --city ...' to publish one.");
        return Ok(());
    }

    println!("Profiles ({}):", profiles.len());
    println!("{:-<70}", "");
    for profile in &profiles {
        println!(
            "{:<9} {:<24} {:>3}  {:<8} {:<6}  {}",
            profile.id.as_str(),
            profile.title,
            profile.age.to_string(),
            profile.status.as_str(),
            profile.gender.as_str(),
            profile.city
        );
    }

    println!();
    println!("Use 'matchcrm profile show <id>' for details");
    Ok(())
}

pub async fn cmd_profile_show(state: &SharedState, id: &str) -> anyhow::Result<()> {
    let profile = state
        .profile_service
        .get_profile(&ProfileId::from(id))
        .await?;
    print_profile(&profile);
    Ok(())
}

pub async fn cmd_profile_add(state: &SharedState, args: ProfileArgs) -> anyhow::Result<()> {
    let image = resolve_image(state, &args).await?;

    let input = ProfileInput {
        title: args.title.unwrap_or_default(),
        age: Age::Text(args.age.unwrap_or_default()),
        status: args.status.unwrap_or_default(),
        gender: args.gender.unwrap_or_default(),
        city: args.city.unwrap_or_default(),
        image,
    };

    match state.profile_service.create_profile(input).await {
        Ok(profile) => {
            println!("✓ Published {}", profile.id);
            print_profile(&profile);
            Ok(())
        }
        Err(ProfileError::Validation(msg)) => {
            println!("{msg}");
            println!("Required: --title, --age, --city");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn cmd_profile_edit(
    state: &SharedState,
    id: &str,
    args: ProfileArgs,
) -> anyhow::Result<()> {
    let id = ProfileId::from(id);
    let current = state.profile_service.get_profile(&id).await?;
    let image = resolve_image(state, &args).await?;

    let input = ProfileInput {
        title: args.title.unwrap_or(current.title),
        age: args.age.map_or(current.age, Age::Text),
        status: args.status.unwrap_or(current.status),
        gender: args.gender.unwrap_or(current.gender),
        city: args.city.unwrap_or(current.city),
        image,
    };

    let profile = state.profile_service.update_profile(&id, input).await?;
    println!("✓ Updated {}", profile.id);
    print_profile(&profile);
    Ok(())
}

pub async fn cmd_profile_remove(state: &SharedState, id: &str, yes: bool) -> anyhow::Result<()> {
    let id = ProfileId::from(id);

    let profile = match state.profile_service.get_profile(&id).await {
        Ok(profile) => profile,
        Err(ProfileError::NotFound(_)) => {
            println!("Profile {id} not found.");
            println!("Use 'matchcrm profile list' to see profile IDs.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let confirmed = if yes {
        true
    } else {
        println!("Delete '{}' ({})?", profile.title, profile.id);
        println!("Enter 'y' to confirm, anything else to cancel:");

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        input.trim().eq_ignore_ascii_case("y")
    };

    match state
        .profile_service
        .delete_profile(&id, DeleteConfirmation::from(confirmed))
        .await
    {
        Ok(removed) => println!("✓ Removed: {} ({})", removed.title, removed.id),
        Err(ProfileError::ConfirmationRequired(_)) => println!("Cancelled."),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

async fn resolve_image(state: &SharedState, args: &ProfileArgs) -> anyhow::Result<Option<String>> {
    if let Some(path) = &args.image_file {
        return Ok(Some(state.image_service.encode_file(path).await?));
    }
    Ok(args.image.clone())
}

fn print_profile(profile: &Profile) {
    println!("Profile: {}", profile.id);
    println!("{:-<70}", "");
    println!("Title:  {}", profile.title);
    println!("Age:    {}", profile.age);
    println!("Status: {}", profile.status);
    println!("Gender: {}", profile.gender);
    println!("City:   {}", profile.city);

    let image = profile.image_or_placeholder();
    if image.starts_with("data:") {
        println!("Image:  inline upload ({} bytes)", image.len());
    } else {
        println!("Image:  {image}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::{KeyValueBackend, MemoryBackend, StorageError, Store, keys};
    use async_trait::async_trait;

    /// Memory store whose profile list cannot be read.
    #[derive(Default)]
    struct UnreadableProfiles(MemoryBackend);

    #[async_trait]
    impl KeyValueBackend for UnreadableProfiles {
        async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            if key == keys::PROFILES {
                return Err(StorageError::Io(std::io::Error::other("disk unplugged")));
            }
            self.0.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
            self.0.set_item(key, value).await
        }

        async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.0.remove_item(key).await
        }
    }

    #[tokio::test]
    async fn test_remove_unknown_profile_is_not_an_error() {
        let state = SharedState::with_store(Config::default(), Store::in_memory())
            .await
            .unwrap();
        assert!(cmd_profile_remove(&state, "SMB-404", true).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_reports_storage_failure() {
        let store = Store::new(UnreadableProfiles::default());
        let state = SharedState::with_store(Config::default(), store)
            .await
            .unwrap();

        let err = cmd_profile_remove(&state, "SMB-404", true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("disk unplugged"));
    }
}
