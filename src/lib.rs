//! Google Analytics account, property and reporting data over HTTP.
//!
//! Two surfaces share one adapter layer:
//! - a REST API (`api`) served by the `api_server` binary
//! - an MCP tool bridge (`mcp`) served by the `mcp_server_http` binary

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod ga;
pub mod mcp;
pub mod models;
