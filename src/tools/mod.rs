//! Tool system for the agent.
//!
//! Tools are single-argument search capabilities keyed by a closed set of
//! [`ToolName`]s. The registry wraps every tool in a [`ToolAdapter`] so a
//! failing tool produces an observation string instead of an error.

mod google;
mod wikipedia;

pub use google::GoogleSearch;
pub use wikipedia::WikipediaSearch;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Names a model may use to request a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolName {
    Wikipedia,
    Google,
    /// No tool; the model should go on to answer.
    None,
}

impl ToolName {
    pub const ALL: [ToolName; 3] = [ToolName::Wikipedia, ToolName::Google, ToolName::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::Wikipedia => "wikipedia",
            ToolName::Google => "google",
            ToolName::None => "none",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tool name: {0}")]
pub struct UnknownToolName(pub String);

impl FromStr for ToolName {
    type Err = UnknownToolName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownToolName(s.to_string()))
    }
}

/// A capability that maps a query to a textual result.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Run the tool. Errors are turned into observations by [`ToolAdapter`].
    async fn search(&self, query: &str) -> anyhow::Result<String>;
}

/// Uniform wrapper around a registered tool.
#[derive(Clone)]
pub struct ToolAdapter {
    name: ToolName,
    tool: Arc<dyn Tool>,
}

impl ToolAdapter {
    pub fn new(name: ToolName, tool: Arc<dyn Tool>) -> Self {
        Self { name, tool }
    }

    /// Run the wrapped tool. Never fails: an error becomes its own text.
    pub async fn use_tool(&self, query: &str) -> String {
        match self.tool.search(query).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Error executing tool {}: {}", self.name, e);
                e.to_string()
            }
        }
    }
}

/// Static table of tools available to the agent, in registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolAdapter>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tool` under `name`, replacing any earlier registration.
    pub fn register(&mut self, name: ToolName, tool: Arc<dyn Tool>) {
        let adapter = ToolAdapter::new(name, tool);
        match self.tools.iter_mut().find(|t| t.name == name) {
            Some(existing) => *existing = adapter,
            None => self.tools.push(adapter),
        }
    }

    pub fn get(&self, name: ToolName) -> Option<&ToolAdapter> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Comma-joined tool names as shown in the prompt.
    pub fn prompt_list(&self) -> String {
        self.tools
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Create the registry used by the server: Wikipedia and Google.
pub fn default_registry(serp_api_key: Option<String>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(ToolName::Wikipedia, Arc::new(WikipediaSearch::new()));
    registry.register(ToolName::Google, Arc::new(GoogleSearch::new(serp_api_key)));
    registry
}


#[cfg(test)]
mod tests {
    use super::testing::{BrokenTool, StaticTool};
    use super::*;

    #[test]
    fn test_tool_name_parses_case_insensitively() {
        assert_eq!("WIKIPEDIA".parse::<ToolName>(), Ok(ToolName::Wikipedia));
        assert_eq!("Google".parse::<ToolName>(), Ok(ToolName::Google));
        assert_eq!("none".parse::<ToolName>(), Ok(ToolName::None));
        assert_eq!(
            "bing".parse::<ToolName>(),
            Err(UnknownToolName("bing".to_string()))
        );
    }

    #[test]
    fn test_tool_name_display_is_lowercase() {
        assert_eq!(ToolName::Wikipedia.to_string(), "wikipedia");
        assert_eq!(serde_json::to_string(&ToolName::Google).unwrap(), "\"google\"");
    }

    #[tokio::test]
    async fn test_adapter_turns_errors_into_observations() {
        let adapter = ToolAdapter::new(ToolName::Google, Arc::new(BrokenTool));
        assert_eq!(adapter.use_tool("anything").await, "rate limited by provider");
    }

    #[tokio::test]
    async fn test_adapter_passes_results_through() {
        let adapter = ToolAdapter::new(ToolName::Wikipedia, Arc::new(StaticTool::new("Paris")));
        assert_eq!(adapter.use_tool("capital of France").await, "Paris");
    }

    #[tokio::test]
    async fn test_registry_keeps_order_and_replaces() {
        let mut registry = ToolRegistry::new();
        registry.register(ToolName::Wikipedia, Arc::new(StaticTool::new("a")));
        registry.register(ToolName::Google, Arc::new(StaticTool::new("b")));
        registry.register(ToolName::Wikipedia, Arc::new(StaticTool::new("c")));

        assert_eq!(registry.prompt_list(), "wikipedia, google");
        assert!(registry.get(ToolName::None).is_none());

        let replaced = registry.get(ToolName::Wikipedia).unwrap();
        assert_eq!(replaced.use_tool("x").await, "c");
    }

    #[test]
    fn test_default_registry_has_both_search_tools() {
        let registry = default_registry(None);
        assert_eq!(registry.prompt_list(), "wikipedia, google");
        assert!(registry.get(ToolName::None).is_none());
    }
}
