use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CatalogService, ImageService, InquiryService, ProfileService,
};
use crate::state::SharedState;

pub mod auth;
mod catalog;
mod error;
mod inquiries;
mod profiles;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        self.shared.config()
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    /// Auth service bound to this request's browser session.
    #[must_use]
    pub fn auth_service(&self, session: Session) -> Arc<dyn AuthService> {
        self.shared.auth_service(Store::for_session(session))
    }

    #[must_use]
    pub fn profile_service(&self) -> &Arc<dyn ProfileService> {
        &self.shared.profile_service
    }

    #[must_use]
    pub fn inquiry_service(&self) -> &Arc<dyn InquiryService> {
        &self.shared.inquiry_service
    }

    #[must_use]
    pub fn catalog_service(&self) -> &Arc<CatalogService> {
        &self.shared.catalog_service
    }

    #[must_use]
    pub fn image_service(&self) -> &Arc<ImageService> {
        &self.shared.image_service
    }
}

#[must_use]
pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
    })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = state.config().server.clone();
    let public_path = state.config().general.public_path.clone();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_idle_minutes,
        )));

    let admin_router = Router::new()
        .merge(create_protected_router(state.clone()))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout));

    let api_router = Router::new()
        .nest("/admin", admin_router)
        .route("/catalog", get(catalog::get_catalog))
        .route(
            "/catalog/{profile_id}/inquiries",
            post(inquiries::submit_inquiry),
        )
        .with_state(state.clone());

    let cors_layer = if server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/", get(catalog::catalog_page))
        .route(
            "/catalog/{profile_id}/inquiry",
            get(inquiries::inquiry_form_page).post(inquiries::submit_inquiry_page),
        )
        .with_state(state)
        .nest("/api", api_router)
        .layer(session_layer)
        .fallback_service(ServeDir::new(public_path))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(auth::me))
        .route("/password", put(auth::change_password))
        .route("/dashboard", get(auth::dashboard))
        .route("/profiles", get(profiles::list_profiles))
        .route("/profiles", post(profiles::create_profile))
        .route("/profiles/{id}", get(profiles::get_profile))
        .route("/profiles/{id}", put(profiles::update_profile))
        .route("/profiles/{id}", delete(profiles::delete_profile))
        .route("/images", post(profiles::upload_image))
        .route("/inquiries", get(inquiries::list_inquiries))
        .route("/inquiries/{id}", delete(inquiries::delete_inquiry))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
