//! Startup configuration shared by both binaries.
//!
//! Everything here is read once before the router is built and is
//! immutable afterwards.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

pub const CREDENTIALS_BASE64_VAR: &str = "GOOGLE_CREDENTIALS_BASE64";
pub const APPLICATION_CREDENTIALS_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const PROJECT_ID_VAR: &str = "GOOGLE_PROJECT_ID";

#[derive(Args, Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 9000)]
    pub port: u16,

    /// Where the decoded service-account key is written
    #[arg(long, env = "GA_CREDENTIALS_PATH", default_value = "/app/credentials.json")]
    pub credentials_path: PathBuf,

    /// Upper bound for every Google Analytics API call, in seconds
    #[arg(
        long,
        env = "GA_UPSTREAM_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub upstream_timeout_secs: u64,
}

impl ServerConfig {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 9000,
            credentials_path: PathBuf::from("/app/credentials.json"),
            upstream_timeout_secs: 30,
        }
    }
}

/// Environment as observed at startup, after credential bootstrapping.
///
/// The base64 key itself is never kept, only its length.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnvironmentSnapshot {
    pub project_id: Option<String>,
    pub credentials_base64_len: usize,
    pub application_credentials: Option<String>,
    pub port: u16,
}

impl EnvironmentSnapshot {
    pub fn capture(port: u16) -> Self {
        Self {
            project_id: std::env::var(PROJECT_ID_VAR).ok(),
            credentials_base64_len: std::env::var(CREDENTIALS_BASE64_VAR)
                .map(|v| v.len())
                .unwrap_or(0),
            application_credentials: std::env::var(APPLICATION_CREDENTIALS_VAR).ok(),
            port,
        }
    }
}
