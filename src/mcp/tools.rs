//! Google Analytics tools exposed over MCP
//!
//! Each tool is a thin wrapper over one `AnalyticsService` operation, so the
//! MCP bridge and the REST API return the same shapes.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use super::registry::{RegistryError, Tool, ToolDescriptor, ToolRegistry};
use crate::api::AnalyticsService;
use crate::error::AnalyticsError;
use crate::models::{parse_property_id, ReportRequest};

pub const TOOL_NAMES: &[&str] = &[
    "get_account_summaries",
    "list_properties",
    "get_property_details",
    "list_google_ads_links",
    "run_report",
    "run_realtime_report",
    "get_custom_dimensions_and_metrics",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    AccountSummaries,
    ListProperties,
    PropertyDetails,
    AdsLinks,
    RunReport,
    RealtimeReport,
    CustomDefinitions,
}

pub struct AnalyticsTool {
    descriptor: ToolDescriptor,
    operation: Operation,
    service: Arc<AnalyticsService>,
}

fn property_id_schema() -> Value {
    json!({
        "type": ["string", "integer"],
        "description": "Google Analytics property ID, e.g. '123456' or 'properties/123456'"
    })
}

fn no_arguments() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

fn property_only() -> Value {
    json!({
        "type": "object",
        "properties": { "property_id": property_id_schema() },
        "required": ["property_id"]
    })
}

fn report_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "property_id": property_id_schema(),
            "start_date": {
                "type": "string",
                "description": "Start date, YYYY-MM-DD or relative such as '7daysAgo' (default '7daysAgo')"
            },
            "end_date": {
                "type": "string",
                "description": "End date, YYYY-MM-DD or relative such as 'today' (default 'today')"
            },
            "metrics": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Metric names (default ['sessions', 'users'])"
            },
            "dimensions": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Dimension names (default ['country'])"
            }
        },
        "required": ["property_id"]
    })
}

impl AnalyticsTool {
    fn new(
        name: &str,
        description: &str,
        input_schema: Value,
        operation: Operation,
        service: &Arc<AnalyticsService>,
    ) -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: name.to_string(),
                description: description.to_string(),
                input_schema,
            },
            operation,
            service: Arc::clone(service),
        }
    }
}

/// Register every Google Analytics tool, in the order of [`TOOL_NAMES`].
pub fn register_analytics_tools(
    registry: &mut ToolRegistry,
    service: Arc<AnalyticsService>,
) -> Result<(), RegistryError> {
    let tools = [
        AnalyticsTool::new(
            "get_account_summaries",
            "Retrieves the Google Analytics accounts the service account can access, with their properties.",
            no_arguments(),
            Operation::AccountSummaries,
            &service,
        ),
        AnalyticsTool::new(
            "list_properties",
            "Lists every Google Analytics property across all accessible accounts.",
            no_arguments(),
            Operation::ListProperties,
            &service,
        ),
        AnalyticsTool::new(
            "get_property_details",
            "Returns details about a Google Analytics property.",
            property_only(),
            Operation::PropertyDetails,
            &service,
        ),
        AnalyticsTool::new(
            "list_google_ads_links",
            "Returns the Google Ads account links for a property.",
            property_only(),
            Operation::AdsLinks,
            &service,
        ),
        AnalyticsTool::new(
            "run_report",
            "Runs a Google Analytics Data API report over a date range.",
            report_schema(),
            Operation::RunReport,
            &service,
        ),
        AnalyticsTool::new(
            "run_realtime_report",
            "Runs a realtime report of active users by country.",
            property_only(),
            Operation::RealtimeReport,
            &service,
        ),
        AnalyticsTool::new(
            "get_custom_dimensions_and_metrics",
            "Returns the property's custom dimensions and custom metrics.",
            property_only(),
            Operation::CustomDefinitions,
            &service,
        ),
    ];

    for tool in tools {
        registry.register(tool)?;
    }
    Ok(())
}

fn to_json<T: Serialize>(value: T) -> Result<Value, AnalyticsError> {
    serde_json::to_value(value).map_err(AnalyticsError::upstream)
}

fn property_id_arg(arguments: &Value) -> Result<String, AnalyticsError> {
    match arguments.get("property_id") {
        Some(Value::String(s)) if !s.trim().is_empty() => parse_property_id(s),
        Some(Value::Number(n)) => parse_property_id(&n.to_string()),
        _ => Err(AnalyticsError::Validation(
            "missing required argument: property_id".to_string(),
        )),
    }
}

fn report_request_arg(arguments: Value) -> Result<ReportRequest, AnalyticsError> {
    let mut map = match arguments {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        _ => {
            return Err(AnalyticsError::Validation(
                "arguments must be an object".to_string(),
            ))
        }
    };
    if let Some(Value::Number(n)) = map.get("property_id") {
        let id = n.to_string();
        map.insert("property_id".to_string(), Value::String(id));
    }
    serde_json::from_value(Value::Object(map))
        .map_err(|e| AnalyticsError::Validation(format!("invalid run_report arguments: {}", e)))
}

#[async_trait]
impl Tool for AnalyticsTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, arguments: Value) -> Result<Value, AnalyticsError> {
        let service = &self.service;
        match self.operation {
            Operation::AccountSummaries => to_json(service.account_summaries().await?),
            Operation::ListProperties => to_json(service.all_properties().await?),
            Operation::PropertyDetails => {
                to_json(service.property_details(&property_id_arg(&arguments)?).await?)
            }
            Operation::AdsLinks => to_json(service.ads_links(&property_id_arg(&arguments)?).await?),
            Operation::RunReport => {
                let request = report_request_arg(arguments)?;
                to_json(service.run_report(&request).await?)
            }
            Operation::RealtimeReport => {
                to_json(service.realtime_report(&property_id_arg(&arguments)?).await?)
            }
            Operation::CustomDefinitions => {
                to_json(service.custom_definitions(&property_id_arg(&arguments)?).await?)
            }
        }
    }
}
