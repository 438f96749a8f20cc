//! HTTP handlers for the MCP bridge
//!
//! Tool failures, unknown tools and unknown methods are reported in-band in
//! a 200 body (`isError: true`); only unreadable request bodies get an
//! error status.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    Json,
};
use serde_json::{json, Value};
use std::convert::Infallible;
use tracing::{debug, warn};

use super::protocol::*;
use super::registry::ToolRegistry;
use super::McpState;
use crate::error::AnalyticsError;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// MCP Protocol Handlers
// ============================================================================

fn server_info() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": VERSION
        }
    })
}

fn tools_list(registry: &ToolRegistry) -> Value {
    json!({ "tools": registry.descriptors() })
}

async fn tools_call(registry: &ToolRegistry, params: Option<&Value>) -> Value {
    let name = params
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let arguments = params
        .and_then(|p| p.get("arguments"))
        .filter(|a| !a.is_null())
        .cloned()
        .unwrap_or_else(|| json!({}));

    debug!("tools/call {}", name);
    match registry.call(name, arguments).await {
        Ok(result) => json!({
            "content": [{
                "type": "text",
                "text": serde_json::to_string_pretty(&result).unwrap_or_default()
            }]
        }),
        Err(e @ AnalyticsError::ToolNotFound(_)) => json!({
            "error": e.to_string(),
            "isError": true
        }),
        Err(e) => {
            warn!("tool {} failed: {}", name, e);
            json!({
                "content": [{
                    "type": "text",
                    "text": format!("Error calling tool: {}", e)
                }],
                "isError": true
            })
        }
    }
}

/// `None` when the method is not one the bridge understands.
async fn dispatch(registry: &ToolRegistry, request: &McpRequest) -> Option<Value> {
    match request.method.as_deref() {
        Some("initialize") => Some(server_info()),
        Some("tools/list") => Some(tools_list(registry)),
        Some("tools/call") => Some(tools_call(registry, request.params.as_ref()).await),
        _ => None,
    }
}

/// Process one bare MCP request; unknown methods are reported in-band.
pub async fn process_request(registry: &ToolRegistry, request: &McpRequest) -> Value {
    match dispatch(registry, request).await {
        Some(result) => result,
        None => json!({
            "error": format!("Unknown method: {}", request.method.as_deref().unwrap_or_default()),
            "isError": true
        }),
    }
}

fn body_error(rejection: &JsonRejection) -> Value {
    let err = AnalyticsError::Validation(rejection.body_text());
    json!({
        "error": err.to_string(),
        "type": err.kind()
    })
}

// ============================================================================
// HTTP Handlers
// ============================================================================

/// GET /
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "server": SERVER_NAME,
        "version": VERSION,
        "transport": "http"
    }))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

/// POST /message
pub async fn message(
    State(registry): State<McpState>,
    body: Result<Json<McpRequest>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(request)) => Json(process_request(&registry, &request).await).into_response(),
        Err(rejection) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body_error(&rejection))).into_response()
        }
    }
}

/// POST /sse
///
/// Answers with exactly one event carrying the full result, then closes.
pub async fn sse(
    State(registry): State<McpState>,
    body: Result<Json<McpRequest>, JsonRejection>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let result = match body {
        Ok(Json(request)) => process_request(&registry, &request).await,
        Err(rejection) => body_error(&rejection),
    };

    let event = Event::default().data(result.to_string());
    Sse::new(tokio_stream::once(Ok::<_, Infallible>(event)))
}

/// POST /mcp
///
/// JSON-RPC 2.0 framing of the same methods.
pub async fn json_rpc(
    State(registry): State<McpState>,
    body: Result<Json<McpRequest>, JsonRejection>,
) -> Json<JsonRpcResponse> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return Json(JsonRpcResponse::failure(
                None,
                PARSE_ERROR,
                format!("Parse error: {}", rejection.body_text()),
            ))
        }
    };

    let id = request.id.clone();
    let response = match dispatch(&registry, &request).await {
        Some(result) => JsonRpcResponse::success(id, result),
        None => JsonRpcResponse::failure(id, METHOD_NOT_FOUND, "Method not found"),
    };
    Json(response)
}
