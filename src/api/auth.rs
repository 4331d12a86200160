use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{
    ApiError, ApiResponse, AppState, ChangePasswordRequest, DashboardDto, LoginRequest,
    LoginResponse, MessageResponse,
};
use crate::models::AdminInfo;
use crate::services::auth_service::INVALID_CREDENTIALS_MESSAGE;
use crate::services::{AuthError, AuthState};

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::unauthorized(INVALID_CREDENTIALS_MESSAGE),
            AuthError::Unauthorized => Self::unauthorized("Not authenticated"),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Hashing(msg) => Self::internal(msg),
            AuthError::Storage(e) => e.into(),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Lets the request through only when this browser's session carries the
/// admin flag.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match state.auth_service(session).state().await? {
        AuthState::LoggedIn => Ok(next.run(request).await),
        AuthState::LoggedOut => Err(ApiError::unauthorized("Not authenticated")),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/admin/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let admin = state
        .auth_service(session.clone())
        .login(payload.email.trim(), &payload.password)
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;

    Ok(Json(ApiResponse::success(LoginResponse { admin })))
}

/// POST /api/admin/logout
/// Clears the flag and drops the whole session.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.auth_service(session.clone()).logout().await?;

    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to end session: {e}")))?;

    Ok(Json(ApiResponse::success(MessageResponse::new("Logged out"))))
}

/// GET /api/admin/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<AdminInfo>>, ApiError> {
    let admin = state.auth_service(session).current_admin().await?;
    Ok(Json(ApiResponse::success(admin)))
}

/// PUT /api/admin/password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .auth_service(session)
        .change_password(&payload.current_password, &payload.new_password)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Password updated successfully",
    ))))
}

/// GET /api/admin/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<DashboardDto>>, ApiError> {
    let admin = state.auth_service(session).current_admin().await?;
    let profile_count = state.profile_service().list_profiles().await?.len();
    let inquiry_count = state.inquiry_service().list_inquiries().await?.len();

    Ok(Json(ApiResponse::success(DashboardDto {
        welcome: format!("Welcome, {}", admin.name),
        admin,
        profile_count,
        inquiry_count,
    })))
}
