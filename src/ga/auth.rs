//! OAuth access tokens for the Google Analytics APIs.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{AnalyticsError, CredentialsError};

pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
// refresh a little before Google says the token expires
const EXPIRY_MARGIN_SECS: i64 = 60;

#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, AnalyticsError>;
}

/// A fixed bearer token.
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, AnalyticsError> {
        Ok(self.0.clone())
    }
}

/// The fields of a service-account key file that matter for token exchange.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, CredentialsError> {
        let raw = std::fs::read(path).map_err(|e| {
            CredentialsError::KeyFile(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_slice(&raw)
            .map_err(|e| CredentialsError::KeyFile(format!("{}: {}", path.display(), e)))
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(key: &ServiceAccountKey, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: key.client_email.clone(),
            scope: ANALYTICS_READONLY_SCOPE.to_string(),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Exchanges a signed JWT assertion for an access token and reuses it until
/// it is about to expire.
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    http: reqwest::Client,
    cached: RwLock<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Result<Self, CredentialsError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| CredentialsError::KeyFile(format!("invalid private key: {}", e)))?;
        Ok(Self {
            key,
            encoding_key,
            http,
            cached: RwLock::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, AnalyticsError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        let claims = AssertionClaims::new(&self.key, now);
        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AnalyticsError::upstream(format!("failed to sign token request: {}", e)))
    }

    async fn exchange(&self) -> Result<CachedToken, AnalyticsError> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AnalyticsError::upstream(format!(
                "token exchange failed: {} - {}",
                status, text
            )));
        }

        let token: TokenResponse = response.json().await?;
        debug!("obtained access token for {}", self.key.client_email);
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in - EXPIRY_MARGIN_SECS),
        })
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String, AnalyticsError> {
        {
            let cache = self.cached.read().await;
            if let Some(token) = cache.as_ref() {
                if token.expires_at > Utc::now() {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let fresh = self.exchange().await?;
        let access_token = fresh.access_token.clone();
        *self.cached.write().await = Some(fresh);
        Ok(access_token)
    }
}
