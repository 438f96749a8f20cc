//! MCP wire types

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "Google Analytics MCP Server";

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;

/// An inbound message. Every field is optional: `/message` and `/sse`
/// accept bare `{method, params}` bodies, `/mcp` expects a JSON-RPC 2.0
/// envelope around the same fields.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct McpRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_request_parses_without_envelope() {
        let req: McpRequest = serde_json::from_value(json!({"method": "tools/list"})).unwrap();
        assert_eq!(req.method.as_deref(), Some("tools/list"));
        assert!(req.jsonrpc.is_none());
        assert!(req.id.is_none());
    }

    #[test]
    fn failure_omits_result() {
        let body = serde_json::to_value(JsonRpcResponse::failure(Some(json!(3)), METHOD_NOT_FOUND, "Method not found")).unwrap();
        assert_eq!(body, json!({
            "jsonrpc": "2.0",
            "id": 3,
            "error": {"code": -32601, "message": "Method not found"}
        }));
    }
}
