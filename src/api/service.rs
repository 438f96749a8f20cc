//! Shared business logic for the analytics API
//!
//! This service layer is used by both the REST handlers and the MCP tools.
//! It owns the upstream timeout and the partial-failure rules; shaping into
//! response types lives in `responses`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use super::responses::*;
use crate::error::AnalyticsError;
use crate::ga::AnalyticsBackend;
use crate::models::{parse_property_id, ReportRequest};

pub struct AnalyticsService {
    backend: Option<Arc<dyn AnalyticsBackend>>,
    timeout: Duration,
}

impl AnalyticsService {
    pub fn new(backend: Arc<dyn AnalyticsBackend>, timeout: Duration) -> Self {
        Self {
            backend: Some(backend),
            timeout,
        }
    }

    /// A service whose every call fails with `ClientUnavailable`.
    pub fn unavailable() -> Self {
        Self {
            backend: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    fn backend(&self) -> Result<&dyn AnalyticsBackend, AnalyticsError> {
        self.backend.as_deref().ok_or(AnalyticsError::ClientUnavailable)
    }

    /// Bound one upstream call by the configured timeout.
    async fn call<T>(
        &self,
        fut: impl Future<Output = Result<T, AnalyticsError>>,
    ) -> Result<T, AnalyticsError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AnalyticsError::upstream(format!(
                "upstream call timed out after {:?}",
                self.timeout
            ))),
        }
    }

    /// Accounts with their properties nested. An account whose property
    /// listing fails is still returned, with no properties.
    pub async fn account_summaries(&self) -> Result<AccountsResponse, AnalyticsError> {
        let backend = self.backend()?;
        let accounts = self
            .call(backend.list_accounts())
            .await
            .map_err(|e| e.context("fetching accounts"))?;

        let mut result = Vec::with_capacity(accounts.len());
        for account in accounts {
            let properties = match self.call(backend.list_properties(&account.name)).await {
                Ok(props) => props.into_iter().map(PropertyResponse::from).collect(),
                Err(e) => {
                    warn!("Error fetching properties for account {}: {}", account.name, e);
                    Vec::new()
                }
            };
            result.push(AccountResponse::new(account, properties));
        }

        Ok(AccountsResponse { accounts: result })
    }

    pub async fn property_details(
        &self,
        property_id: &str,
    ) -> Result<PropertyDetailsResponse, AnalyticsError> {
        let property_id = parse_property_id(property_id)?;
        let backend = self.backend()?;
        let property = self
            .call(backend.get_property(&property_id))
            .await
            .map_err(|e| e.context("fetching property details"))?;
        Ok(PropertyDetailsResponse::new(property, &property_id))
    }

    pub async fn ads_links(&self, property_id: &str) -> Result<AdsLinksResponse, AnalyticsError> {
        let property_id = parse_property_id(property_id)?;
        let backend = self.backend()?;
        let links = self
            .call(backend.list_ads_links(&property_id))
            .await
            .map_err(|e| e.context("fetching Google Ads links"))?;
        Ok(AdsLinksResponse {
            links: links.into_iter().map(AdsLinkResponse::from).collect(),
        })
    }

    pub async fn run_report(&self, request: &ReportRequest) -> Result<ReportResponse, AnalyticsError> {
        let request = ReportRequest {
            property_id: parse_property_id(&request.property_id)?,
            ..request.clone()
        };
        let backend = self.backend()?;
        let report = self
            .call(backend.run_report(&request))
            .await
            .map_err(|e| e.context("running report"))?;
        Ok(ReportResponse::from(report))
    }

    pub async fn realtime_report(&self, property_id: &str) -> Result<ReportResponse, AnalyticsError> {
        let property_id = parse_property_id(property_id)?;
        let backend = self.backend()?;
        let report = self
            .call(backend.run_realtime_report(&property_id))
            .await
            .map_err(|e| e.context("running realtime report"))?;
        Ok(ReportResponse::from(report))
    }

    /// Custom dimensions and metrics; either list comes back empty if its
    /// own fetch fails.
    pub async fn custom_definitions(
        &self,
        property_id: &str,
    ) -> Result<CustomDefinitionsResponse, AnalyticsError> {
        let property_id = parse_property_id(property_id)?;
        let backend = self.backend()?;

        let custom_dimensions = match self.call(backend.list_custom_dimensions(&property_id)).await {
            Ok(dims) => dims.into_iter().map(CustomDimensionResponse::from).collect(),
            Err(e) => {
                warn!("Error fetching custom dimensions for {}: {}", property_id, e);
                Vec::new()
            }
        };

        let custom_metrics = match self.call(backend.list_custom_metrics(&property_id)).await {
            Ok(metrics) => metrics.into_iter().map(CustomMetricResponse::from).collect(),
            Err(e) => {
                warn!("Error fetching custom metrics for {}: {}", property_id, e);
                Vec::new()
            }
        };

        Ok(CustomDefinitionsResponse {
            property_id,
            custom_dimensions,
            custom_metrics,
        })
    }

    /// Every property across every account. Accounts whose listing fails are skipped.
    pub async fn all_properties(&self) -> Result<PropertiesResponse, AnalyticsError> {
        let backend = self.backend()?;
        let accounts = self
            .call(backend.list_accounts())
            .await
            .map_err(|e| e.context("fetching properties"))?;

        let mut properties = Vec::new();
        for account in &accounts {
            match self.call(backend.list_properties(&account.name)).await {
                Ok(props) => properties.extend(
                    props
                        .into_iter()
                        .map(|p| PropertyListingResponse::new(account, p)),
                ),
                Err(e) => warn!("Error fetching properties for account {}: {}", account.name, e),
            }
        }

        Ok(PropertiesResponse {
            total_count: properties.len(),
            properties,
        })
    }

    pub async fn properties_summary(&self) -> Result<PropertiesSummaryResponse, AnalyticsError> {
        let backend = self.backend()?;
        let accounts = self
            .call(backend.list_accounts())
            .await
            .map_err(|e| e.context("fetching properties"))?;

        let mut properties = Vec::new();
        for account in &accounts {
            match self.call(backend.list_properties(&account.name)).await {
                Ok(props) => properties.extend(
                    props
                        .into_iter()
                        .map(|p| PropertySummaryResponse::new(account, p)),
                ),
                Err(e) => warn!("Error fetching properties for account {}: {}", account.name, e),
            }
        }

        Ok(PropertiesSummaryResponse { properties })
    }
}
