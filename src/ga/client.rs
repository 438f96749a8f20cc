//! REST client for the Google Analytics Admin and Data APIs (v1beta).

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::auth::{ServiceAccountKey, ServiceAccountTokenSource, TokenSource};
use super::types::*;
use super::AnalyticsBackend;
use crate::config::APPLICATION_CREDENTIALS_VAR;
use crate::error::{AnalyticsError, CredentialsError};
use crate::models::{property_resource_name, ReportRequest, REALTIME_DIMENSION, REALTIME_METRIC};

pub const ADMIN_API_BASE: &str = "https://analyticsadmin.googleapis.com/v1beta";
pub const DATA_API_BASE: &str = "https://analyticsdata.googleapis.com/v1beta";
const PAGE_SIZE: &str = "200";

pub struct GoogleAnalyticsClient {
    http: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
    admin_base: String,
    data_base: String,
}

impl GoogleAnalyticsClient {
    pub fn new(tokens: Arc<dyn TokenSource>, timeout: Duration) -> Result<Self, AnalyticsError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http(tokens, http))
    }

    fn with_http(tokens: Arc<dyn TokenSource>, http: reqwest::Client) -> Self {
        Self {
            http,
            tokens,
            admin_base: ADMIN_API_BASE.to_string(),
            data_base: DATA_API_BASE.to_string(),
        }
    }

    /// Build a client authenticated with the service-account key at `path`.
    pub fn from_credentials_file(path: &Path, timeout: Duration) -> Result<Self, AnalyticsError> {
        let key = ServiceAccountKey::from_file(path)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let tokens = ServiceAccountTokenSource::new(key, http.clone())?;
        info!("Google Analytics client ready for {}", tokens.client_email());
        Ok(Self::with_http(Arc::new(tokens), http))
    }

    /// Build a client from the key file named by `GOOGLE_APPLICATION_CREDENTIALS`.
    pub fn from_env(timeout: Duration) -> Result<Self, AnalyticsError> {
        let path = std::env::var(APPLICATION_CREDENTIALS_VAR).map_err(|_| {
            CredentialsError::KeyFile(format!("{} not set", APPLICATION_CREDENTIALS_VAR))
        })?;
        Self::from_credentials_file(Path::new(&path), timeout)
    }

    /// Point the client somewhere other than googleapis.com.
    pub fn with_base_urls(mut self, admin_base: impl Into<String>, data_base: impl Into<String>) -> Self {
        self.admin_base = admin_base.into();
        self.data_base = data_base.into();
        self
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, AnalyticsError> {
        let token = self.tokens.access_token().await?;
        debug!("GET {}", url);
        let response = self.http.get(url).bearer_auth(token).query(query).send().await?;
        read_body(response).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, AnalyticsError> {
        let token = self.tokens.access_token().await?;
        debug!("POST {}", url);
        let response = self.http.post(url).bearer_auth(token).json(body).send().await?;
        read_body(response).await
    }

    /// Follow `nextPageToken` until exhausted, collecting `field` from every page.
    async fn list_all<T: DeserializeOwned>(
        &self,
        url: &str,
        field: &str,
        extra_query: &[(&str, String)],
    ) -> Result<Vec<T>, AnalyticsError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = extra_query.to_vec();
            query.push(("pageSize", PAGE_SIZE.to_string()));
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let mut page = self.get_json(url, &query).await?;
            if let Some(list) = page.get_mut(field).map(Value::take) {
                let batch: Vec<T> = serde_json::from_value(list).map_err(|e| {
                    AnalyticsError::upstream(format!("unexpected {} payload: {}", field, e))
                })?;
                items.extend(batch);
            }

            page_token = page
                .get("nextPageToken")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            if page_token.is_none() {
                break;
            }
        }

        Ok(items)
    }

    fn admin_url(&self, path: &str) -> String {
        format!("{}/{}", self.admin_base, path)
    }

    fn data_url(&self, path: &str) -> String {
        format!("{}/{}", self.data_base, path)
    }
}

/// Turn a non-2xx response into `Upstream` with Google's own message.
async fn read_body(response: reqwest::Response) -> Result<Value, AnalyticsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or(text);
    Err(AnalyticsError::upstream(format!("{} - {}", status, message)))
}

fn parse<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, AnalyticsError> {
    serde_json::from_value(value)
        .map_err(|e| AnalyticsError::upstream(format!("unexpected {} payload: {}", what, e)))
}

#[async_trait]
impl AnalyticsBackend for GoogleAnalyticsClient {
    async fn list_accounts(&self) -> Result<Vec<AccountRecord>, AnalyticsError> {
        self.list_all(&self.admin_url("accounts"), "accounts", &[]).await
    }

    async fn list_properties(&self, account_name: &str) -> Result<Vec<PropertyRecord>, AnalyticsError> {
        let filter = format!("parent:{}", account_name);
        self.list_all(&self.admin_url("properties"), "properties", &[("filter", filter)])
            .await
    }

    async fn get_property(&self, property_id: &str) -> Result<PropertyRecord, AnalyticsError> {
        let body = self
            .get_json(&self.admin_url(&property_resource_name(property_id)?), &[])
            .await?;
        parse(body, "property")
    }

    async fn list_ads_links(&self, property_id: &str) -> Result<Vec<AdsLinkRecord>, AnalyticsError> {
        let url = self.admin_url(&format!("{}/googleAdsLinks", property_resource_name(property_id)?));
        self.list_all(&url, "googleAdsLinks", &[]).await
    }

    async fn list_custom_dimensions(
        &self,
        property_id: &str,
    ) -> Result<Vec<CustomDimensionRecord>, AnalyticsError> {
        let url = self.admin_url(&format!("{}/customDimensions", property_resource_name(property_id)?));
        self.list_all(&url, "customDimensions", &[]).await
    }

    async fn list_custom_metrics(
        &self,
        property_id: &str,
    ) -> Result<Vec<CustomMetricRecord>, AnalyticsError> {
        let url = self.admin_url(&format!("{}/customMetrics", property_resource_name(property_id)?));
        self.list_all(&url, "customMetrics", &[]).await
    }

    async fn run_report(&self, request: &ReportRequest) -> Result<ReportRecord, AnalyticsError> {
        let url = self.data_url(&format!("{}:runReport", property_resource_name(&request.property_id)?));
        let body = json!({
            "dateRanges": [{
                "startDate": request.start_date,
                "endDate": request.end_date
            }],
            "dimensions": request.dimensions.iter().map(|d| json!({ "name": d })).collect::<Vec<_>>(),
            "metrics": request.metrics.iter().map(|m| json!({ "name": m })).collect::<Vec<_>>(),
        });
        parse(self.post_json(&url, &body).await?, "report")
    }

    async fn run_realtime_report(&self, property_id: &str) -> Result<ReportRecord, AnalyticsError> {
        let url = self.data_url(&format!("{}:runRealtimeReport", property_resource_name(property_id)?));
        let body = json!({
            "dimensions": [{ "name": REALTIME_DIMENSION }],
            "metrics": [{ "name": REALTIME_METRIC }],
        });
        parse(self.post_json(&url, &body).await?, "realtime report")
    }
}
