//! JSON response shapes
//!
//! Every field is always present: missing vendor values become `""`, `false`,
//! `[]` or `null`, never an omitted key.

use serde::{Deserialize, Serialize};

use crate::ga::types::*;
use crate::models::resource_id;

const DEFAULT_ACCOUNT_TYPE: &str = "STANDARD";
const DEFAULT_PROPERTY_TYPE: &str = "STANDARD";

// ============================================================================
// Accounts & Properties
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyResponse {
    pub name: String,
    pub display_name: String,
    pub property_id: String,
    pub create_time: Option<String>,
    pub website_url: String,
    pub time_zone: String,
    pub currency_code: String,
    pub property_type: Option<String>,
}

impl From<PropertyRecord> for PropertyResponse {
    fn from(p: PropertyRecord) -> Self {
        Self {
            property_id: resource_id(&p.name).unwrap_or_default().to_string(),
            name: p.name,
            display_name: p.display_name,
            create_time: p.create_time,
            website_url: p.website_url,
            time_zone: p.time_zone,
            currency_code: p.currency_code,
            property_type: p.property_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub name: String,
    pub display_name: String,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub account_type: String,
    pub properties: Vec<PropertyResponse>,
}

impl AccountResponse {
    pub fn new(a: AccountRecord, properties: Vec<PropertyResponse>) -> Self {
        Self {
            name: a.name,
            display_name: a.display_name,
            create_time: a.create_time,
            update_time: a.update_time,
            account_type: a
                .account_type
                .unwrap_or_else(|| DEFAULT_ACCOUNT_TYPE.to_string()),
            properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountsResponse {
    pub accounts: Vec<AccountResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDetailsResponse {
    pub name: String,
    pub display_name: String,
    pub property_id: String,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub website_url: String,
    pub time_zone: String,
    pub currency_code: String,
    pub industry_category: Option<String>,
    pub service_level: Option<String>,
    pub property_type: Option<String>,
}

impl PropertyDetailsResponse {
    /// `property_id` is echoed back as requested rather than re-derived.
    pub fn new(p: PropertyRecord, property_id: &str) -> Self {
        Self {
            name: p.name,
            display_name: p.display_name,
            property_id: property_id.to_string(),
            create_time: p.create_time,
            update_time: p.update_time,
            website_url: p.website_url,
            time_zone: p.time_zone,
            currency_code: p.currency_code,
            industry_category: p.industry_category,
            service_level: p.service_level,
            property_type: p.property_type,
        }
    }
}

/// One row of `GET /properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyListingResponse {
    pub property_id: String,
    pub name: String,
    pub display_name: String,
    pub account_name: String,
    pub account_id: String,
    pub website_url: String,
    pub time_zone: String,
    pub currency_code: String,
    pub create_time: Option<String>,
    pub property_type: String,
}

impl PropertyListingResponse {
    pub fn new(account: &AccountRecord, p: PropertyRecord) -> Self {
        Self {
            property_id: resource_id(&p.name).unwrap_or("unknown").to_string(),
            name: p.name,
            display_name: p.display_name,
            account_name: account.display_name.clone(),
            account_id: account.name.clone(),
            website_url: p.website_url,
            time_zone: p.time_zone,
            currency_code: p.currency_code,
            create_time: p.create_time,
            property_type: p
                .property_type
                .unwrap_or_else(|| DEFAULT_PROPERTY_TYPE.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertiesResponse {
    pub properties: Vec<PropertyListingResponse>,
    pub total_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySummaryResponse {
    pub property_id: String,
    pub display_name: String,
    pub account: String,
}

impl PropertySummaryResponse {
    pub fn new(account: &AccountRecord, p: PropertyRecord) -> Self {
        Self {
            property_id: resource_id(&p.name).unwrap_or("unknown").to_string(),
            display_name: p.display_name,
            account: account.display_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertiesSummaryResponse {
    pub properties: Vec<PropertySummaryResponse>,
}

// ============================================================================
// Ads links & custom definitions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdsLinkResponse {
    pub name: String,
    pub display_name: String,
    pub customer_id: String,
    pub ads_personalization_enabled: bool,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub link_id: Option<String>,
}

impl From<AdsLinkRecord> for AdsLinkResponse {
    fn from(l: AdsLinkRecord) -> Self {
        Self {
            link_id: resource_id(&l.name).map(str::to_string),
            name: l.name,
            display_name: l.display_name,
            customer_id: l.customer_id,
            ads_personalization_enabled: l.ads_personalization_enabled.unwrap_or(false),
            create_time: l.create_time,
            update_time: l.update_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdsLinksResponse {
    pub links: Vec<AdsLinkResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomDimensionResponse {
    pub name: String,
    pub display_name: String,
    pub parameter_name: String,
    pub dimension_id: Option<String>,
    pub scope: Option<String>,
    pub description: String,
    pub disallow_ads_personalization: bool,
}

impl From<CustomDimensionRecord> for CustomDimensionResponse {
    fn from(d: CustomDimensionRecord) -> Self {
        Self {
            dimension_id: resource_id(&d.name).map(str::to_string),
            name: d.name,
            display_name: d.display_name,
            parameter_name: d.parameter_name,
            scope: d.scope,
            description: d.description,
            disallow_ads_personalization: d.disallow_ads_personalization,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomMetricResponse {
    pub name: String,
    pub display_name: String,
    pub parameter_name: String,
    pub metric_id: Option<String>,
    pub measurement_unit: Option<String>,
    pub scope: Option<String>,
    pub description: String,
    pub restricted_metric_type: Vec<String>,
}

impl From<CustomMetricRecord> for CustomMetricResponse {
    fn from(m: CustomMetricRecord) -> Self {
        Self {
            metric_id: resource_id(&m.name).map(str::to_string),
            name: m.name,
            display_name: m.display_name,
            parameter_name: m.parameter_name,
            measurement_unit: m.measurement_unit,
            scope: m.scope,
            description: m.description,
            restricted_metric_type: m.restricted_metric_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomDefinitionsResponse {
    pub property_id: String,
    pub custom_dimensions: Vec<CustomDimensionResponse>,
    pub custom_metrics: Vec<CustomMetricResponse>,
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
}

/// Header and row order is exactly the order Google returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub dimension_headers: Vec<String>,
    pub metric_headers: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl From<ReportRecord> for ReportResponse {
    fn from(r: ReportRecord) -> Self {
        Self {
            dimension_headers: r.dimension_headers.into_iter().map(|h| h.name).collect(),
            metric_headers: r.metric_headers.into_iter().map(|h| h.name).collect(),
            rows: r
                .rows
                .into_iter()
                .map(|row| ReportRow {
                    dimensions: row.dimension_values.into_iter().map(|c| c.value).collect(),
                    metrics: row.metric_values.into_iter().map(|c| c.value).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_keeps_vendor_order() {
        let record = ReportRecord::from_rows(
            &["country", "city"],
            &["sessions"],
            vec![(vec!["US", "Austin"], vec!["42"]), (vec!["FR", "Paris"], vec!["7"])],
        );
        let report = ReportResponse::from(record);
        assert_eq!(report.dimension_headers, vec!["country", "city"]);
        assert_eq!(report.rows[0].dimensions, vec!["US", "Austin"]);
        assert_eq!(report.rows[1].metrics, vec!["7"]);
    }

    #[test]
    fn single_row_report_matches_documented_shape() {
        let record = ReportRecord::from_rows(&["country"], &["sessions"], vec![(vec!["US"], vec!["42"])]);
        let body = serde_json::to_value(ReportResponse::from(record)).unwrap();
        assert_eq!(
            body,
            json!({
                "dimension_headers": ["country"],
                "metric_headers": ["sessions"],
                "rows": [{"dimensions": ["US"], "metrics": ["42"]}]
            })
        );
    }

    #[test]
    fn property_missing_fields_are_not_omitted() {
        let record = PropertyRecord {
            name: "properties/123".into(),
            display_name: "Shop".into(),
            ..Default::default()
        };
        let body = serde_json::to_value(PropertyResponse::from(record)).unwrap();
        assert_eq!(body["property_id"], "123");
        assert_eq!(body["website_url"], "");
        assert!(body["create_time"].is_null());
        assert!(body.as_object().unwrap().contains_key("property_type"));
    }

    #[test]
    fn account_type_defaults_to_standard() {
        let account = AccountResponse::new(
            AccountRecord {
                name: "accounts/1".into(),
                ..Default::default()
            },
            vec![],
        );
        assert_eq!(account.account_type, "STANDARD");
        assert!(account.create_time.is_none());
    }

    #[test]
    fn listing_uses_unknown_for_nameless_property() {
        let account = AccountRecord {
            name: "accounts/1".into(),
            display_name: "Acme".into(),
            ..Default::default()
        };
        let listing = PropertyListingResponse::new(&account, PropertyRecord::default());
        assert_eq!(listing.property_id, "unknown");
        assert_eq!(listing.account_name, "Acme");
        assert_eq!(listing.account_id, "accounts/1");
        assert_eq!(listing.property_type, "STANDARD");
    }

    #[test]
    fn ads_link_defaults() {
        let link = AdsLinkResponse::from(AdsLinkRecord {
            name: "properties/1/googleAdsLinks/55".into(),
            customer_id: "1234567890".into(),
            ..Default::default()
        });
        assert_eq!(link.link_id.as_deref(), Some("55"));
        assert!(!link.ads_personalization_enabled);
        assert_eq!(link.display_name, "");
    }

    #[test]
    fn custom_definition_ids() {
        let dim = CustomDimensionResponse::from(CustomDimensionRecord {
            name: "properties/1/customDimensions/2".into(),
            ..Default::default()
        });
        let metric = CustomMetricResponse::from(CustomMetricRecord::default());
        assert_eq!(dim.dimension_id.as_deref(), Some("2"));
        assert!(metric.metric_id.is_none());
        assert!(metric.restricted_metric_type.is_empty());
    }
}
