//! Tool registry

use super::base::{FunctionCall, Result, Tool, ToolError, Tools};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Registry of available tools, keyed by name
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Unregister a tool by name
    pub fn unregister(&mut self, name: &str) {
        self.tools.remove(name);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool is registered
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Run the tool a function call names
    pub fn call(&self, call: &FunctionCall) -> Result<String> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;

        let params = call.parsed_arguments()?;
        let errors = tool.validate_params(&params);
        if !errors.is_empty() {
            return Err(ToolError::InvalidArguments(format!(
                "{}: {}",
                call.name,
                errors.join("; ")
            )));
        }

        debug!("Calling tool {} with {}", call.name, params);
        tool.execute(params)
    }

    /// Get list of registered tool names
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Get number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Tools for ToolRegistry {
    fn definitions(&self) -> Vec<Value> {
        self.tools.values().map(|tool| tool.to_schema()).collect()
    }

    fn try_call(&self, call: &FunctionCall) {
        match self.call(call) {
            Ok(result) => info!("Tool {} returned: {}", call.name, result),
            Err(e) => warn!("Tool call {} failed: {}", call.name, e),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
