use uuid::Uuid;

use super::ApiError;
use crate::models::profile::PROFILE_ID_PREFIX;
use crate::models::{InquiryId, ProfileId};

pub fn validate_profile_id(id: &str) -> Result<ProfileId, ApiError> {
    let valid = id
        .strip_prefix(PROFILE_ID_PREFIX)
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()));

    if !valid {
        return Err(ApiError::validation(format!(
            "Invalid profile ID: {}. Expected {}<number>",
            id, PROFILE_ID_PREFIX
        )));
    }
    Ok(ProfileId::from(id))
}

pub fn validate_inquiry_id(id: &str) -> Result<InquiryId, ApiError> {
    if Uuid::parse_str(id).is_err() {
        return Err(ApiError::validation(format!(
            "Invalid inquiry ID: {}",
            id
        )));
    }
    Ok(InquiryId::new(id))
}
