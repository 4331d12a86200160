use axum::{
    Json,
    extract::State,
    response::Html,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::Catalog;
use crate::services::catalog::render_html;

/// GET /api/catalog
pub async fn get_catalog(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Catalog>>, ApiError> {
    let catalog = state.catalog_service().featured().await?;
    Ok(Json(ApiResponse::success(catalog)))
}

/// GET /
pub async fn catalog_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let catalog = state.catalog_service().featured().await?;
    Ok(Html(render_html(&catalog)))
}
