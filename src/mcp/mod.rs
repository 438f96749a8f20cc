//! MCP tool bridge over HTTP
//!
//! A stateless subset of the Model Context Protocol: `initialize`,
//! `tools/list` and `tools/call`, answered per request with no session.

pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod tools;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use registry::{Tool, ToolDescriptor, ToolRegistry};

pub type McpState = Arc<ToolRegistry>;

pub fn router(registry: McpState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/message", post(handlers::message))
        .route("/sse", post(handlers::sse))
        .route("/mcp", post(handlers::json_rpc))
        .with_state(registry)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
