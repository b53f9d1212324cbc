//! Base traits for tools

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A function invocation returned by the model (`message.function_call`).
///
/// Kept as the model sent it: `arguments` is usually a JSON-encoded string
/// but any value is accepted, and unknown keys land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
            extra: Map::new(),
        }
    }

    /// Decode the arguments into an object value.
    ///
    /// A string is parsed as JSON, with an empty string or a missing value
    /// meaning no arguments; any other value is taken as already decoded.
    pub fn parsed_arguments(&self) -> Result<Value> {
        match &self.arguments {
            Value::Null => Ok(Value::Object(Map::new())),
            Value::String(raw) if raw.trim().is_empty() => Ok(Value::Object(Map::new())),
            Value::String(raw) => serde_json::from_str(raw)
                .map_err(|e| ToolError::InvalidArguments(format!("{}: {}", self.name, e))),
            other => Ok(other.clone()),
        }
    }
}

/// A set of callable definitions attached to a request.
///
/// `definitions` goes into the request payload as `functions`; `try_call`
/// receives any function call the model returns. Dispatch is
/// fire-and-forget from the request's side.
pub trait Tools {
    /// Function definitions in the `functions` payload shape
    fn definitions(&self) -> Vec<Value>;

    /// Dispatch a function call returned by the model
    fn try_call(&self, call: &FunctionCall);
}

/// Trait for a single callable tool
pub trait Tool: Send + Sync {
    /// Get the tool name
    fn name(&self) -> &str;

    /// Get the tool description
    fn description(&self) -> &str;

    /// Get the tool parameters schema (JSON Schema format)
    fn parameters(&self) -> Value;

    /// Execute the tool with arguments
    fn execute(&self, args: Value) -> Result<String>;

    /// Validate parameters against the schema
    fn validate_params(&self, params: &Value) -> Vec<String> {
        let Some(params_obj) = params.as_object() else {
            return vec!["Parameters must be an object".to_string()];
        };

        let schema = self.parameters();
        let mut errors = Vec::new();

        if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
            for field in required {
                if let Some(field_name) = field.as_str() {
                    if !params_obj.contains_key(field_name) {
                        errors.push(format!("Missing required field: {}", field_name));
                    }
                }
            }
        }

        errors
    }

    /// Convert tool to a `functions` entry
    fn to_schema(&self) -> Value {
        serde_json::json!({
            "name": self.name(),
            "description": self.description(),
            "parameters": self.parameters(),
        })
    }
}

/// Tool errors
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool '{0}' not found")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, ToolError>;
