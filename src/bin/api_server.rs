//! REST API Server for Google Analytics
//!
//! Usage:
//!   ./target/release/api_server [--port PORT] [--credentials-path PATH]
//!
//! Environment variables:
//!   PORT                       - Port to listen on (default: 9000)
//!   GOOGLE_CREDENTIALS_BASE64  - Base64 service-account key, decoded at startup
//!   GOOGLE_PROJECT_ID          - Reported by /test
//!   GA_UPSTREAM_TIMEOUT_SECS   - Bound for every Google API call (default: 30)
//!
//! A missing or broken key does not stop the server: data endpoints answer
//! 500 and `/`, `/health` and `/debug` report the credential state.

use anyhow::Result;
use clap::Parser;
use ga_analytics_api::{
    api::{self, AnalyticsService, ApiContext},
    config::{EnvironmentSnapshot, ServerConfig},
    credentials,
    ga::GoogleAnalyticsClient,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "api_server")]
#[command(about = "HTTP API for Google Analytics accounts, properties and reports")]
struct Args {
    #[command(flatten)]
    server: ServerConfig,
}

fn print_banner(port: u16) {
    println!("============================================================");
    println!("         GOOGLE ANALYTICS API SERVER");
    println!("============================================================");
    println!();
    println!("  Port:     {}", port);
    println!("  REST:     http://localhost:{}/", port);
    println!();
    println!("Endpoints:");
    println!("  GET  /                                Status");
    println!("  GET  /health                          Health check");
    println!("  GET  /accounts                        Accounts + properties");
    println!("  GET  /property/:id                    Property details");
    println!("  GET  /ads-links/:id                   Google Ads links");
    println!("  POST /report                          Run report");
    println!("  POST /realtime-report/:id             Realtime report");
    println!("  GET  /custom-dimensions-metrics/:id   Custom definitions");
    println!("  GET  /properties                      All properties");
    println!("  GET  /properties/summary              Property summary");
    println!("  GET  /test                            Environment check");
    println!("  GET  /debug                           Credential status");
    println!();
    println!("============================================================");
}

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

    print_banner(config.port);

    // Credential failures are reported, not fatal, for the REST surface
    let credentials = credentials::bootstrap_from_env(&config.credentials_path);
    info!(
        "Credential setup: success={} message={}",
        credentials.success, credentials.message
    );

    let (service, client_error) = match GoogleAnalyticsClient::from_env(config.upstream_timeout()) {
        Ok(client) => (
            AnalyticsService::new(Arc::new(client), config.upstream_timeout()),
            None,
        ),
        Err(e) => {
            warn!("Google Analytics client unavailable: {}", e);
            (AnalyticsService::unavailable(), Some(e.to_string()))
        }
    };

    let state = Arc::new(ApiContext {
        service: Arc::new(service),
        credentials,
        client_error,
        credentials_path: config.credentials_path.clone(),
        environment: EnvironmentSnapshot::capture(config.port),
    });

    warn!("No authentication is enforced on these endpoints; restrict access at the network layer");

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let app = api::router(state);
    info!("Starting REST server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
