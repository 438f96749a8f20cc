use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Body of `POST /report` and arguments of the `run_report` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub property_id: String,
    #[serde(default = "default_start_date")]
    pub start_date: String,
    #[serde(default = "default_end_date")]
    pub end_date: String,
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,
    #[serde(default = "default_dimensions")]
    pub dimensions: Vec<String>,
}

fn default_start_date() -> String {
    "7daysAgo".to_string()
}

fn default_end_date() -> String {
    "today".to_string()
}

fn default_metrics() -> Vec<String> {
    vec!["sessions".to_string(), "users".to_string()]
}

fn default_dimensions() -> Vec<String> {
    vec!["country".to_string()]
}

impl ReportRequest {
    pub fn new(property_id: impl Into<String>) -> Self {
        Self {
            property_id: property_id.into(),
            start_date: default_start_date(),
            end_date: default_end_date(),
            metrics: default_metrics(),
            dimensions: default_dimensions(),
        }
    }
}

/// Realtime reports are fixed to one dimension and one metric.
pub const REALTIME_DIMENSION: &str = "country";
pub const REALTIME_METRIC: &str = "activeUsers";

/// Last path segment of a resource name (`properties/123` -> `123`).
pub fn resource_id(name: &str) -> Option<&str> {
    if name.is_empty() {
        return None;
    }
    name.rsplit('/').next().filter(|s| !s.is_empty())
}

/// Accept `123` or `properties/123`, return `123`.
///
/// Anything but ASCII digits is rejected: the id ends up in an upstream URL
/// path, so `/`, `?`, `#` or `..` must never get through.
pub fn parse_property_id(raw: &str) -> Result<String, AnalyticsError> {
    let trimmed = raw.trim();
    let id = trimmed.strip_prefix("properties/").unwrap_or(trimmed);
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AnalyticsError::Validation(format!(
            "invalid property id '{}': expected digits, optionally prefixed with 'properties/'",
            raw
        )));
    }
    Ok(id.to_string())
}

pub fn property_resource_name(property_id: &str) -> Result<String, AnalyticsError> {
    Ok(format!("properties/{}", parse_property_id(property_id)?))
}
