//! REST API handlers
//!
//! Data handlers delegate to the shared `AnalyticsService`; status handlers
//! only read the startup state and never call Google.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::responses::*;
use super::AppState;
use crate::error::AnalyticsError;
use crate::mcp::tools::TOOL_NAMES;
use crate::models::ReportRequest;

pub type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn api_error(e: AnalyticsError) -> ApiError {
    (e.status_code(), Json(ErrorResponse { detail: e.to_string() }))
}

const VERSION: &str = env!("CARGO_PKG_VERSION");

const AVAILABLE_ENDPOINTS: &[&str] = &[
    "GET /accounts - get_account_summaries",
    "GET /property/{property_id} - get_property_details",
    "GET /ads-links/{property_id} - list_google_ads_links",
    "POST /report - run_report",
    "POST /realtime-report/{property_id} - run_realtime_report",
    "GET /custom-dimensions-metrics/{property_id} - get_custom_dimensions_and_metrics",
    "GET /properties - list_all_properties",
    "GET /properties/summary - get_properties_summary",
];

// ============================================================================
// Status
// ============================================================================

/// GET /
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": "Google Analytics Full MCP API",
        "version": VERSION,
        "status": "running",
        "ga_available": state.service.is_available(),
        "ga_error": state.client_error,
        "credentials_set": state.credentials.success,
        "credentials_message": state.credentials.message,
        "mcp_tools": TOOL_NAMES,
    }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "ga-full-mcp-api",
        "google_analytics": state.service.is_available(),
    }))
}

/// GET /test
pub async fn test_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let env = &state.environment;
    Json(json!({
        "message": "Full MCP API Test endpoint working!",
        "environment": {
            "GOOGLE_APPLICATION_CREDENTIALS": env.application_credentials.is_some(),
            "GOOGLE_PROJECT_ID": env.project_id.as_deref().unwrap_or("not_set"),
            "GOOGLE_CREDENTIALS_BASE64": env.credentials_base64_len > 0,
            "PORT": env.port.to_string(),
        },
        "available_endpoints": AVAILABLE_ENDPOINTS,
    }))
}

/// GET /debug
///
/// Reports file presence and size only; the key contents are never echoed.
pub async fn debug_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let metadata = tokio::fs::metadata(&state.credentials_path).await.ok();
    let ga_ready = state.service.is_available();

    Json(json!({
        "credentials_setup": {
            "success": state.credentials.success,
            "message": state.credentials.message,
        },
        "file_status": {
            "exists": metadata.is_some(),
            "size": metadata.map(|m| m.len()).unwrap_or(0),
        },
        "environment": {
            "GOOGLE_APPLICATION_CREDENTIALS": state.environment.application_credentials,
            "GOOGLE_CREDENTIALS_BASE64_LENGTH": state.environment.credentials_base64_len,
        },
        "mcp_tools_status": {
            "ga_libraries_available": ga_ready,
            "client_error": state.client_error,
            "credentials_configured": state.credentials.success,
            "all_tools_ready": ga_ready && state.credentials.success,
        },
    }))
}

// ============================================================================
// Accounts & Properties
// ============================================================================

/// GET /accounts
pub async fn get_account_summaries(State(state): State<AppState>) -> ApiResult<AccountsResponse> {
    state.service.account_summaries().await.map(Json).map_err(api_error)
}

/// GET /property/:id
pub async fn get_property_details(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> ApiResult<PropertyDetailsResponse> {
    state
        .service
        .property_details(&property_id)
        .await
        .map(Json)
        .map_err(api_error)
}

/// GET /ads-links/:id
pub async fn list_google_ads_links(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> ApiResult<AdsLinksResponse> {
    state.service.ads_links(&property_id).await.map(Json).map_err(api_error)
}

/// GET /custom-dimensions-metrics/:id
pub async fn get_custom_dimensions_and_metrics(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> ApiResult<CustomDefinitionsResponse> {
    state
        .service
        .custom_definitions(&property_id)
        .await
        .map(Json)
        .map_err(api_error)
}

/// GET /properties
pub async fn list_all_properties(State(state): State<AppState>) -> ApiResult<PropertiesResponse> {
    state.service.all_properties().await.map(Json).map_err(api_error)
}

/// GET /properties/summary
pub async fn get_properties_summary(
    State(state): State<AppState>,
) -> ApiResult<PropertiesSummaryResponse> {
    state.service.properties_summary().await.map(Json).map_err(api_error)
}

// ============================================================================
// Reports
// ============================================================================

/// POST /report
///
/// Body errors are answered with 422 before Google is contacted.
pub async fn run_report(
    State(state): State<AppState>,
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> ApiResult<ReportResponse> {
    let Json(request) = body.map_err(|rejection| {
        api_error(AnalyticsError::Validation(rejection.body_text()))
    })?;
    state.service.run_report(&request).await.map(Json).map_err(api_error)
}

/// POST /realtime-report/:id
pub async fn run_realtime_report(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> ApiResult<ReportResponse> {
    state
        .service
        .realtime_report(&property_id)
        .await
        .map(Json)
        .map_err(api_error)
}
