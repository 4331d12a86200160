use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Duration;
use tower_sessions::Session;

use super::{
    ApiError, ApiResponse, AppState, DeletedInquiryDto, InquiryListDto, SubmissionDto,
};
use crate::api::validation::{validate_inquiry_id, validate_profile_id};
use crate::models::{Inquiry, InquiryForm, ProfileId};
use crate::services::catalog::{render_inquiry_form, render_submission_done};
use crate::services::inquiry_service::{EMPTY_INQUIRIES_MESSAGE, SUBMISSION_ACKNOWLEDGEMENT};
use crate::services::{InquiryError, SubmissionFlow, SubmissionStatus};

/// Session key holding this visitor's [`SubmissionFlow`].
const SUBMISSION_FLOW_KEY: &str = "submissionFlow";

impl From<InquiryError> for ApiError {
    fn from(err: InquiryError) -> Self {
        match err {
            InquiryError::NotFound(id) => Self::not_found("Inquiry", id),
            InquiryError::MissingFields(_) => Self::validation(err.to_string()),
            InquiryError::AlreadySubmitting => Self::Conflict(err.to_string()),
            InquiryError::Storage(e) => e.into(),
        }
    }
}

fn session_error(e: tower_sessions::session::Error) -> ApiError {
    ApiError::internal(format!("Session error: {e}"))
}

async fn save_flow(session: &Session, flow: &SubmissionFlow) -> Result<(), ApiError> {
    session
        .insert(SUBMISSION_FLOW_KEY, flow)
        .await
        .map_err(session_error)
}

/// Stores one inquiry for this visitor and waits out the acknowledgement
/// delay. The Submitting state is saved to the session before the write so
/// that an overlapping submit from the same visitor is refused.
async fn run_submission(
    state: &AppState,
    session: &Session,
    profile_id: ProfileId,
    form: InquiryForm,
) -> Result<(SubmissionStatus, Inquiry), ApiError> {
    let ack_delay = Duration::from_millis(state.config().inquiry.ack_delay_ms);
    let mut flow = session
        .get::<SubmissionFlow>(SUBMISSION_FLOW_KEY)
        .await
        .map_err(session_error)?
        .unwrap_or_default()
        .with_ack_delay(ack_delay);

    flow.begin()?;
    save_flow(session, &flow).await?;
    session.save().await.map_err(session_error)?;

    let inquiry = match state.inquiry_service().submit(profile_id, form).await {
        Ok(inquiry) => inquiry,
        Err(e) => {
            flow.reset();
            save_flow(session, &flow).await?;
            return Err(e.into());
        }
    };

    flow.acknowledge().await;
    save_flow(session, &flow).await?;

    Ok((flow.status(), inquiry))
}

/// POST /api/catalog/{profile_id}/inquiries
///
/// The inquiry is stored before the acknowledgement delay starts.
pub async fn submit_inquiry(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(profile_id): Path<String>,
    Json(form): Json<InquiryForm>,
) -> Result<Json<ApiResponse<SubmissionDto>>, ApiError> {
    let profile_id = validate_profile_id(&profile_id)?;
    let (status, inquiry) = run_submission(&state, &session, profile_id, form).await?;

    Ok(Json(ApiResponse::success(SubmissionDto {
        status,
        message: SUBMISSION_ACKNOWLEDGEMENT.to_string(),
        inquiry,
    })))
}

/// GET /catalog/{profile_id}/inquiry
pub async fn inquiry_form_page(Path(profile_id): Path<String>) -> Result<Html<String>, ApiError> {
    let profile_id = validate_profile_id(&profile_id)?;
    Ok(Html(render_inquiry_form(&profile_id, None)))
}

/// POST /catalog/{profile_id}/inquiry
///
/// Form-encoded twin of [`submit_inquiry`]. Missing fields re-render the
/// form with the error.
pub async fn submit_inquiry_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(profile_id): Path<String>,
    Form(form): Form<InquiryForm>,
) -> Result<Response, ApiError> {
    let profile_id = validate_profile_id(&profile_id)?;

    match run_submission(&state, &session, profile_id.clone(), form).await {
        Ok(_) => Ok(Html(render_submission_done(SUBMISSION_ACKNOWLEDGEMENT)).into_response()),
        Err(ApiError::ValidationError(message)) => Ok((
            StatusCode::BAD_REQUEST,
            Html(render_inquiry_form(&profile_id, Some(&message))),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

/// GET /api/admin/inquiries
pub async fn list_inquiries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<InquiryListDto>>, ApiError> {
    let inquiries = state.inquiry_service().list_inquiries().await?;
    let message = inquiries
        .is_empty()
        .then(|| EMPTY_INQUIRIES_MESSAGE.to_string());

    Ok(Json(ApiResponse::success(InquiryListDto { inquiries, message })))
}

/// DELETE /api/admin/inquiries/{id}
pub async fn delete_inquiry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedInquiryDto>>, ApiError> {
    let id = validate_inquiry_id(&id)?;
    let removed = state.inquiry_service().delete_inquiry(&id).await?;
    Ok(Json(ApiResponse::success(DeletedInquiryDto { id: removed.id })))
}
