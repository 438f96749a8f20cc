//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use ga_analytics_api::{
    api::{AnalyticsService, ApiContext, AppState},
    config::EnvironmentSnapshot,
    credentials::CredentialsState,
    error::AnalyticsError,
    ga::{
        AccountRecord, AdsLinkRecord, AnalyticsBackend, CustomDimensionRecord, CustomMetricRecord,
        PropertyRecord, ReportRecord,
    },
    models::ReportRequest,
};
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// In-memory backend. Accounts listed in `failing_accounts` fail their
/// property listing; `fail_dimensions` and `fail_reports` fail those calls.
/// `report_delay` stalls `run_report` before answering.
#[derive(Default)]
pub struct FakeBackend {
    pub accounts: Vec<AccountRecord>,
    pub properties: Vec<PropertyRecord>,
    pub failing_accounts: HashSet<String>,
    pub fail_dimensions: bool,
    pub fail_reports: bool,
    pub report_delay: Option<Duration>,
    pub report_requests: Mutex<Vec<ReportRequest>>,
    pub calls: Mutex<Vec<String>>,
}

pub fn account(id: &str, display_name: &str) -> AccountRecord {
    AccountRecord {
        name: format!("accounts/{}", id),
        display_name: display_name.to_string(),
        ..Default::default()
    }
}

pub fn property(id: &str, account_id: &str, display_name: &str) -> PropertyRecord {
    PropertyRecord {
        name: format!("properties/{}", id),
        display_name: display_name.to_string(),
        parent: Some(format!("accounts/{}", account_id)),
        time_zone: "Europe/Stockholm".to_string(),
        currency_code: "SEK".to_string(),
        ..Default::default()
    }
}

impl FakeBackend {
    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn sample() -> Self {
        Self {
            accounts: vec![account("1", "Main"), account("2", "Side")],
            properties: vec![
                property("100", "1", "Shop"),
                property("101", "1", "Blog"),
                property("200", "2", "Docs"),
            ],
            ..Default::default()
        }
    }
}

#[async_trait]
impl AnalyticsBackend for FakeBackend {
    async fn list_accounts(&self) -> Result<Vec<AccountRecord>, AnalyticsError> {
        self.record("list_accounts".to_string());
        Ok(self.accounts.clone())
    }

    async fn list_properties(&self, account_name: &str) -> Result<Vec<PropertyRecord>, AnalyticsError> {
        self.record(format!("list_properties {}", account_name));
        if self.failing_accounts.contains(account_name) {
            return Err(AnalyticsError::upstream("403 Forbidden - permission denied"));
        }
        Ok(self
            .properties
            .iter()
            .filter(|p| p.parent.as_deref() == Some(account_name))
            .cloned()
            .collect())
    }

    async fn get_property(&self, property_id: &str) -> Result<PropertyRecord, AnalyticsError> {
        self.record(format!("get_property {}", property_id));
        let name = format!("properties/{}", property_id);
        self.properties
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| AnalyticsError::upstream("404 Not Found - property not found"))
    }

    async fn list_ads_links(&self, property_id: &str) -> Result<Vec<AdsLinkRecord>, AnalyticsError> {
        self.record(format!("list_ads_links {}", property_id));
        Ok(vec![AdsLinkRecord {
            name: format!("properties/{}/googleAdsLinks/7", property_id),
            customer_id: "1234567890".to_string(),
            ads_personalization_enabled: Some(true),
            ..Default::default()
        }])
    }

    async fn list_custom_dimensions(
        &self,
        property_id: &str,
    ) -> Result<Vec<CustomDimensionRecord>, AnalyticsError> {
        self.record(format!("list_custom_dimensions {}", property_id));
        if self.fail_dimensions {
            return Err(AnalyticsError::upstream("500 Internal Server Error - boom"));
        }
        Ok(vec![CustomDimensionRecord {
            name: format!("properties/{}/customDimensions/3", property_id),
            display_name: "Plan".to_string(),
            parameter_name: "plan".to_string(),
            scope: Some("USER".to_string()),
            ..Default::default()
        }])
    }

    async fn list_custom_metrics(
        &self,
        property_id: &str,
    ) -> Result<Vec<CustomMetricRecord>, AnalyticsError> {
        self.record(format!("list_custom_metrics {}", property_id));
        Ok(vec![CustomMetricRecord {
            name: format!("properties/{}/customMetrics/4", property_id),
            display_name: "Basket size".to_string(),
            parameter_name: "basket_size".to_string(),
            measurement_unit: Some("STANDARD".to_string()),
            scope: Some("EVENT".to_string()),
            ..Default::default()
        }])
    }

    async fn run_report(&self, request: &ReportRequest) -> Result<ReportRecord, AnalyticsError> {
        self.record(format!("run_report {}", request.property_id));
        if let Some(delay) = self.report_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_reports {
            return Err(AnalyticsError::upstream("400 Bad Request - invalid metric"));
        }
        if let Ok(mut seen) = self.report_requests.lock() {
            seen.push(request.clone());
        }
        Ok(ReportRecord::from_rows(
            &["country"],
            &["sessions"],
            vec![(vec!["US"], vec!["42"])],
        ))
    }

    async fn run_realtime_report(&self, property_id: &str) -> Result<ReportRecord, AnalyticsError> {
        self.record(format!("run_realtime_report {}", property_id));
        if self.fail_reports {
            return Err(AnalyticsError::upstream("400 Bad Request - invalid property"));
        }
        Ok(ReportRecord::from_rows(
            &["country"],
            &["activeUsers"],
            vec![(vec!["SE"], vec!["5"]), (vec!["US"], vec!["3"])],
        ))
    }
}

pub fn service(backend: FakeBackend) -> Arc<AnalyticsService> {
    Arc::new(AnalyticsService::new(Arc::new(backend), Duration::from_secs(5)))
}

/// Service over a shared backend, so a test can inspect it afterwards.
pub fn shared_service(backend: &Arc<FakeBackend>, timeout: Duration) -> Arc<AnalyticsService> {
    Arc::new(AnalyticsService::new(backend.clone(), timeout))
}

pub fn api_state(service: Arc<AnalyticsService>, credentials: CredentialsState) -> AppState {
    Arc::new(ApiContext {
        service,
        credentials,
        client_error: None,
        credentials_path: PathBuf::from("/nonexistent/credentials.json"),
        environment: EnvironmentSnapshot {
            port: 9000,
            ..Default::default()
        },
    })
}

pub fn ok_credentials() -> CredentialsState {
    CredentialsState {
        success: true,
        message: "Credentials successfully set up".to_string(),
    }
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    post_raw(app, uri, &body.to_string()).await
}

pub async fn post_raw(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
