//! Tool registry
//!
//! Populated once at startup and shared read-only afterwards. Iteration
//! order is registration order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::error::AnalyticsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn descriptor(&self) -> &ToolDescriptor;

    async fn invoke(&self, arguments: Value) -> Result<Value, AnalyticsError>;
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    Duplicate(String),
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), RegistryError> {
        let name = &tool.descriptor().name;
        if self.get(name).is_some() {
            return Err(RegistryError::Duplicate(name.clone()));
        }
        self.tools.push(Arc::new(tool));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.descriptor().name == name)
    }

    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke `name` on its own task, so a panicking tool surfaces as an
    /// error instead of tearing down the connection.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value, AnalyticsError> {
        let tool = self
            .get(name)
            .cloned()
            .ok_or_else(|| AnalyticsError::ToolNotFound(name.to_string()))?;

        match tokio::spawn(async move { tool.invoke(arguments).await }).await {
            Ok(result) => result,
            Err(e) => Err(AnalyticsError::upstream(format!("tool task failed: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo(ToolDescriptor);

    impl Echo {
        fn named(name: &str) -> Self {
            Self(ToolDescriptor {
                name: name.to_string(),
                description: "echo arguments".to_string(),
                input_schema: json!({"type": "object"}),
            })
        }
    }

    #[async_trait]
    impl Tool for Echo {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.0
        }

        async fn invoke(&self, arguments: Value) -> Result<Value, AnalyticsError> {
            Ok(arguments)
        }
    }

    struct Panics(ToolDescriptor);

    #[async_trait]
    impl Tool for Panics {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.0
        }

        async fn invoke(&self, _arguments: Value) -> Result<Value, AnalyticsError> {
            panic!("boom")
        }
    }

    #[test]
    fn keeps_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Echo::named("b")).unwrap();
        registry.register(Echo::named("a")).unwrap();
        registry.register(Echo::named("c")).unwrap();

        let names: Vec<_> = registry.descriptors().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut registry = ToolRegistry::new();
        registry.register(Echo::named("echo")).unwrap();
        let err = registry.register(Echo::named("echo")).unwrap_err();
        assert_eq!(err.to_string(), "tool 'echo' is already registered");
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn call_passes_arguments_through() {
        let mut registry = ToolRegistry::new();
        registry.register(Echo::named("echo")).unwrap();
        let out = registry.call("echo", json!({"x": 1})).await.unwrap();
        assert_eq!(out, json!({"x": 1}));
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let registry = ToolRegistry::new();
        let err = registry.call("nope", json!({})).await.unwrap_err();
        assert!(matches!(err, AnalyticsError::ToolNotFound(ref n) if n == "nope"));
    }

    #[tokio::test]
    async fn panicking_tool_becomes_error() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Panics(ToolDescriptor {
                name: "panics".to_string(),
                description: String::new(),
                input_schema: json!({}),
            }))
            .unwrap();
        let err = registry.call("panics", json!({})).await.unwrap_err();
        assert!(err.to_string().contains("tool task failed"));
    }
}
