//! Typed records returned by the Google Analytics REST APIs.
//!
//! Optional vendor fields default here, once, so nothing downstream has to
//! probe for missing attributes.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountRecord {
    pub name: String,
    pub display_name: String,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub region_code: Option<String>,
    pub account_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyRecord {
    pub name: String,
    pub display_name: String,
    pub parent: Option<String>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub website_url: String,
    pub time_zone: String,
    pub currency_code: String,
    pub industry_category: Option<String>,
    pub service_level: Option<String>,
    pub property_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdsLinkRecord {
    pub name: String,
    pub display_name: String,
    pub customer_id: String,
    pub ads_personalization_enabled: Option<bool>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomDimensionRecord {
    pub name: String,
    pub display_name: String,
    pub parameter_name: String,
    pub scope: Option<String>,
    pub description: String,
    pub disallow_ads_personalization: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomMetricRecord {
    pub name: String,
    pub display_name: String,
    pub parameter_name: String,
    pub measurement_unit: Option<String>,
    pub scope: Option<String>,
    pub description: String,
    pub restricted_metric_type: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderRecord {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellRecord {
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RowRecord {
    pub dimension_values: Vec<CellRecord>,
    pub metric_values: Vec<CellRecord>,
}

/// Response of `runReport` and `runRealtimeReport`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportRecord {
    pub dimension_headers: Vec<HeaderRecord>,
    pub metric_headers: Vec<HeaderRecord>,
    pub rows: Vec<RowRecord>,
    pub row_count: Option<i64>,
}

impl ReportRecord {
    /// Build a record from plain strings; handy for fakes.
    pub fn from_rows(
        dimension_headers: &[&str],
        metric_headers: &[&str],
        rows: Vec<(Vec<&str>, Vec<&str>)>,
    ) -> Self {
        let cells = |values: Vec<&str>| {
            values
                .into_iter()
                .map(|v| CellRecord { value: v.to_string() })
                .collect()
        };
        Self {
            dimension_headers: dimension_headers
                .iter()
                .map(|n| HeaderRecord { name: n.to_string() })
                .collect(),
            metric_headers: metric_headers
                .iter()
                .map(|n| HeaderRecord { name: n.to_string() })
                .collect(),
            row_count: Some(rows.len() as i64),
            rows: rows
                .into_iter()
                .map(|(dims, mets)| RowRecord {
                    dimension_values: cells(dims),
                    metric_values: cells(mets),
                })
                .collect(),
        }
    }
}
