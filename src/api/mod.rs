//! REST API for Google Analytics data
//!
//! `router` binds the route table; handlers share one immutable [`AppState`].

pub mod handlers;
pub mod responses;
pub mod service;

use axum::{
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::EnvironmentSnapshot;
use crate::credentials::CredentialsState;

pub use service::AnalyticsService;

/// Everything a handler may read. Built once at startup, never mutated.
pub struct ApiContext {
    pub service: Arc<AnalyticsService>,
    pub credentials: CredentialsState,
    /// Why the Google client could not be built, when it could not.
    pub client_error: Option<String>,
    pub credentials_path: PathBuf,
    pub environment: EnvironmentSnapshot,
}

pub type AppState = Arc<ApiContext>;

pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/test", get(handlers::test_endpoint))
        .route("/debug", get(handlers::debug_endpoint))
        // Accounts & properties
        .route("/accounts", get(handlers::get_account_summaries))
        .route("/properties", get(handlers::list_all_properties))
        .route("/properties/summary", get(handlers::get_properties_summary))
        .route("/property/:id", get(handlers::get_property_details))
        .route("/ads-links/:id", get(handlers::list_google_ads_links))
        .route(
            "/custom-dimensions-metrics/:id",
            get(handlers::get_custom_dimensions_and_metrics),
        )
        // Reports
        .route("/report", post(handlers::run_report))
        .route("/realtime-report/:id", post(handlers::run_realtime_report))
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
