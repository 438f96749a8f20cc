//! Error taxonomy shared by the REST API and the MCP bridge.

use axum::http::StatusCode;
use thiserror::Error;

/// Failures surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The Google Analytics client could not be constructed at startup.
    #[error("Google Analytics client not available")]
    ClientUnavailable,

    /// Any failed call into the Google Analytics APIs (auth, quota, network, not found).
    #[error("{0}")]
    Upstream(String),

    /// Request body or tool arguments did not match the expected schema.
    #[error("{0}")]
    Validation(String),

    /// `tools/call` named a tool that was never registered.
    #[error("Tool '{0}' not found")]
    ToolNotFound(String),

    /// The service-account key could not be loaded locally.
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
}

impl AnalyticsError {
    pub fn upstream(cause: impl std::fmt::Display) -> Self {
        Self::Upstream(cause.to_string())
    }

    /// Prefix an upstream message with the operation that failed.
    pub fn context(self, operation: &str) -> Self {
        match self {
            Self::Upstream(cause) => Self::Upstream(format!("Error {}: {}", operation, cause)),
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ClientUnavailable | Self::Upstream(_) | Self::Credentials(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ToolNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Short type name used in MCP error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClientUnavailable => "ClientUnavailable",
            Self::Upstream(_) => "UpstreamError",
            Self::Validation(_) => "ValidationError",
            Self::ToolNotFound(_) => "ToolNotFound",
            Self::Credentials(_) => "CredentialsError",
        }
    }
}

impl From<reqwest::Error> for AnalyticsError {
    fn from(e: reqwest::Error) -> Self {
        Self::Upstream(e.to_string())
    }
}

/// Failures while materializing the service-account key file.
///
/// Messages never include the decoded key material.
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("GOOGLE_CREDENTIALS_BASE64 not set")]
    NotConfigured,

    #[error("Error setting up credentials: invalid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Error setting up credentials: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error setting up credentials: invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The key file exists but cannot be used to build a client.
    #[error("Error loading service account key: {0}")]
    KeyFile(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_context_prefixes_message() {
        let err = AnalyticsError::upstream("403 Forbidden: permission denied").context("fetching accounts");
        assert_eq!(err.to_string(), "Error fetching accounts: 403 Forbidden: permission denied");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn context_leaves_other_variants_alone() {
        let err = AnalyticsError::ClientUnavailable.context("running report");
        assert_eq!(err.to_string(), "Google Analytics client not available");
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            AnalyticsError::Validation("bad".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AnalyticsError::ToolNotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn key_file_failures_are_credentials_errors() {
        let err = AnalyticsError::from(CredentialsError::KeyFile("invalid private key".into()));
        assert_eq!(err.kind(), "CredentialsError");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Error loading service account key: invalid private key");
        assert_eq!(
            err.context("running report").to_string(),
            "Error loading service account key: invalid private key"
        );
    }

    #[test]
    fn not_configured_message() {
        assert_eq!(CredentialsError::NotConfigured.to_string(), "GOOGLE_CREDENTIALS_BASE64 not set");
    }
}
