use serde::{Deserialize, Serialize};

use crate::models::{AdminInfo, Inquiry, InquiryId, ProfileId};
use crate::services::SubmissionStatus;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub admin: AdminInfo,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardDto {
    pub welcome: String,
    pub admin: AdminInfo,
    pub profile_count: usize,
    pub inquiry_count: usize,
}

#[derive(Debug, Serialize)]
pub struct DeletedProfileDto {
    pub id: ProfileId,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct ImageUploadDto {
    pub data_uri: String,
    pub size: usize,
}

#[derive(Debug, Serialize)]
pub struct SubmissionDto {
    pub status: SubmissionStatus,
    pub message: String,
    pub inquiry: Inquiry,
}

#[derive(Debug, Serialize)]
pub struct InquiryListDto {
    pub inquiries: Vec<Inquiry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedInquiryDto {
    pub id: InquiryId,
}
