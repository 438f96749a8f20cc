//! HTTP-based MCP Server for Google Analytics
//!
//! Exposes the Google Analytics tools via a stateless subset of the Model
//! Context Protocol over HTTP.
//!
//! Run: ./target/release/mcp_server_http --port 9000
//!
//! Environment variables:
//!   GOOGLE_CREDENTIALS_BASE64 - Base64 service-account key (required)
//!   PORT                      - Port to listen on (default: 9000)
//!
//! Unlike `api_server`, this binary refuses to start without valid
//! credentials and exits with status 1.
//!
//! Endpoints:
//!   POST /message - MCP request, JSON result
//!   POST /sse     - MCP request, result as a single server-sent event
//!   POST /mcp     - JSON-RPC 2.0 requests
//!   GET  /health  - Health check

use anyhow::{bail, Result};
use clap::Parser;
use ga_analytics_api::{
    api::AnalyticsService,
    config::ServerConfig,
    credentials,
    ga::GoogleAnalyticsClient,
    mcp::{self, tools::register_analytics_tools, ToolRegistry},
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "mcp_server_http")]
#[command(about = "HTTP-based MCP server for Google Analytics")]
struct Args {
    #[command(flatten)]
    server: ServerConfig,
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = Args::parse();
    let config = args.server;

    info!("Google Analytics MCP Server (HTTP)");
    info!("Port: {}", config.port);

    let credentials = credentials::bootstrap_from_env(&config.credentials_path);
    if !credentials.success {
        error!("Cannot start MCP server without valid credentials");
        bail!(credentials.message);
    }

    let client = GoogleAnalyticsClient::from_credentials_file(
        &config.credentials_path,
        config.upstream_timeout(),
    )?;
    let service = Arc::new(AnalyticsService::new(
        Arc::new(client),
        config.upstream_timeout(),
    ));

    let mut registry = ToolRegistry::new();
    register_analytics_tools(&mut registry, service)?;
    info!("Registered {} tools", registry.len());

    warn!("No authentication is enforced on these endpoints; restrict access at the network layer");

    let app = mcp::router(Arc::new(registry));

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
