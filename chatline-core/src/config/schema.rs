//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default chat completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Contents of a `.openai.yaml` file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Provider section
    #[serde(default)]
    pub openai: OpenAiSection,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The `openai:` section of the config file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OpenAiSection {
    /// Model name
    #[serde(default)]
    pub model: Option<String>,
    /// API token
    #[serde(default)]
    pub token: Option<String>,
    /// Chat completions endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Sampling parameters
    #[serde(default)]
    pub params: ParamsSection,
}

/// The `openai.params:` section of the config file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ParamsSection {
    #[serde(default, rename = "max-tokens")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub n: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files; no file log when unset
    #[serde(default)]
    pub dir: Option<String>,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: None,
            overrides: HashMap::new(),
        }
    }
}

/// Fully resolved client configuration.
///
/// Every value is settled once at startup; nothing here falls back to the
/// config file again afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub token: String,
    pub model: String,
    pub max_tokens: u32,
    pub n: u32,
    /// Not sent with requests; sampling uses fixed values.
    pub temperature: f32,
    pub endpoint: String,
}

impl Config {
    pub const DEFAULT_MAX_TOKENS: u32 = 150;
    pub const DEFAULT_N: u32 = 1;
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Create a config with default parameters for the given credentials
    pub fn new(token: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            model: model.into(),
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            n: Self::DEFAULT_N,
            temperature: Self::DEFAULT_TEMPERATURE,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Override the endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}
