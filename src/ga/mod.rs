//! Google Analytics client adapter
//!
//! [`AnalyticsBackend`] is the seam between the HTTP surfaces and Google:
//! one method per upstream call, typed records out, no retries.

pub mod auth;
pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::AnalyticsError;
use crate::models::ReportRequest;

pub use auth::{ServiceAccountKey, ServiceAccountTokenSource, StaticToken, TokenSource};
pub use client::GoogleAnalyticsClient;
pub use types::{
    AccountRecord, AdsLinkRecord, CustomDimensionRecord, CustomMetricRecord, PropertyRecord,
    ReportRecord,
};

#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    async fn list_accounts(&self) -> Result<Vec<AccountRecord>, AnalyticsError>;

    /// Properties whose parent is `account_name` (`accounts/123`).
    async fn list_properties(&self, account_name: &str) -> Result<Vec<PropertyRecord>, AnalyticsError>;

    async fn get_property(&self, property_id: &str) -> Result<PropertyRecord, AnalyticsError>;

    async fn list_ads_links(&self, property_id: &str) -> Result<Vec<AdsLinkRecord>, AnalyticsError>;

    async fn list_custom_dimensions(
        &self,
        property_id: &str,
    ) -> Result<Vec<CustomDimensionRecord>, AnalyticsError>;

    async fn list_custom_metrics(
        &self,
        property_id: &str,
    ) -> Result<Vec<CustomMetricRecord>, AnalyticsError>;

    async fn run_report(&self, request: &ReportRequest) -> Result<ReportRecord, AnalyticsError>;

    /// Active users by country over the realtime window.
    async fn run_realtime_report(&self, property_id: &str) -> Result<ReportRecord, AnalyticsError>;
}
