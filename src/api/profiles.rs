use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, DeleteQuery, DeletedProfileDto, ImageUploadDto,
};
use crate::api::validation::validate_profile_id;
use crate::models::{Profile, ProfileInput};
use crate::services::{DeleteConfirmation, ProfileError};

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound(id) => Self::not_found("Profile", id),
            ProfileError::Validation(msg) => Self::validation(msg),
            ProfileError::ConfirmationRequired(id) => Self::Conflict(format!(
                "Deleting profile {id} must be confirmed with ?confirm=true"
            )),
            ProfileError::Storage(e) => e.into(),
        }
    }
}

/// GET /api/admin/profiles
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Profile>>>, ApiError> {
    let profiles = state.profile_service().list_profiles().await?;
    Ok(Json(ApiResponse::success(profiles)))
}

/// GET /api/admin/profiles/{id}
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    let id = validate_profile_id(&id)?;
    let profile = state.profile_service().get_profile(&id).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// POST /api/admin/profiles
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProfileInput>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    let profile = state.profile_service().create_profile(payload).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// PUT /api/admin/profiles/{id}
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<ProfileInput>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    let id = validate_profile_id(&id)?;
    let profile = state.profile_service().update_profile(&id, payload).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// DELETE /api/admin/profiles/{id}?confirm=true
///
/// Without `confirm=true` nothing is removed and 409 is returned.
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<ApiResponse<DeletedProfileDto>>, ApiError> {
    let id = validate_profile_id(&id)?;
    let removed = state
        .profile_service()
        .delete_profile(&id, DeleteConfirmation::from(query.confirm))
        .await?;

    Ok(Json(ApiResponse::success(DeletedProfileDto { id: removed.id })))
}

/// POST /api/admin/images
///
/// Encodes the first uploaded file as a data-URI for a profile's `image`.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ImageUploadDto>>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart body: {e}")))?
    {
        if field.file_name().is_none() && field.name() != Some("image") {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read upload: {e}")))?;

        let data_uri = state.image_service().encode_data_uri(
            &bytes,
            content_type.as_deref(),
            file_name.as_deref(),
        );

        return Ok(Json(ApiResponse::success(ImageUploadDto {
            data_uri,
            size: bytes.len(),
        })));
    }

    Err(ApiError::validation("No image file in upload"))
}
