//! Configuration discovery and resolution

use super::schema::{Config, FileConfig, DEFAULT_ENDPOINT};
use super::validate::validate_config;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the config file looked up in the working directory and its parents
pub const CONFIG_FILE_NAME: &str = ".openai.yaml";

/// Locates and reads `.openai.yaml`
pub struct ConfigLoader {
    start_dir: PathBuf,
}

impl ConfigLoader {
    /// Create a loader that starts searching from the current directory
    pub fn new() -> Self {
        let start_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { start_dir }
    }

    /// Create a loader that starts searching from a custom directory
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            start_dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Find the nearest config file.
    ///
    /// Walks from the start directory up to the filesystem root and takes the
    /// first `.openai.yaml` it meets. Falls back to one in the home directory.
    pub fn discover(&self) -> Option<PathBuf> {
        for dir in self.start_dir.ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                debug!("Using config file {}", candidate.display());
                return Some(candidate);
            }
        }

        let home = dirs::home_dir()?.join(CONFIG_FILE_NAME);
        if home.is_file() {
            debug!("Using config file {}", home.display());
            Some(home)
        } else {
            None
        }
    }

    /// Discover and parse the config file
    pub fn load(&self) -> crate::Result<FileConfig> {
        let path = self.discover().ok_or_else(|| {
            crate::Error::NotFound(format!(
                "{} (searched from {})",
                CONFIG_FILE_NAME,
                self.start_dir.display()
            ))
        })?;
        read_config_file(&path)
    }

    /// Get the directory the search starts from
    pub fn start_dir(&self) -> &Path {
        &self.start_dir
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Discover and parse the config file nearest to `start_dir`
pub fn load_configuration<P: AsRef<Path>>(start_dir: P) -> crate::Result<FileConfig> {
    ConfigLoader::with_dir(start_dir).load()
}

/// Parse a config file at a known path
pub fn read_config_file(path: &Path) -> crate::Result<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    let config: FileConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Options a client is constructed from.
///
/// Explicit values win over the config file; parameters left unset in both
/// places fall back to their defaults.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub token: Option<String>,
    pub model: Option<String>,
    /// Explicit config file; skips discovery when set
    pub config_file: Option<PathBuf>,
    /// Directory discovery starts from; the current directory when unset
    pub start_dir: Option<PathBuf>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    /// Load the config file and settle every effective value
    pub fn resolve(&self) -> crate::Result<Config> {
        let file = self.load_file()?;
        self.resolve_with(&file)
    }

    /// Read the explicit config file, or discover one
    pub fn load_file(&self) -> crate::Result<FileConfig> {
        let loaded = match &self.config_file {
            Some(path) if path.is_file() => read_config_file(path),
            Some(_) => Err(crate::Error::NotFound(CONFIG_FILE_NAME.to_string())),
            None => match &self.start_dir {
                Some(dir) => load_configuration(dir),
                None => ConfigLoader::new().load(),
            },
        };

        match loaded {
            Err(crate::Error::NotFound(_)) => Err(crate::Error::Config(format!(
                "{} not found",
                CONFIG_FILE_NAME
            ))),
            other => other,
        }
    }

    /// Settle every effective value against an already parsed file
    pub fn resolve_with(&self, file: &FileConfig) -> crate::Result<Config> {
        let openai = &file.openai;

        let token = self
            .token
            .clone()
            .or_else(|| openai.token.clone())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| crate::Error::Config("Token not found".to_string()))?;
        let model = self
            .model
            .clone()
            .or_else(|| openai.model.clone())
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| crate::Error::Config("Model missing".to_string()))?;

        let config = Config {
            token,
            model,
            max_tokens: openai.params.max_tokens.unwrap_or(Config::DEFAULT_MAX_TOKENS),
            n: openai.params.n.unwrap_or(Config::DEFAULT_N),
            temperature: openai
                .params
                .temperature
                .unwrap_or(Config::DEFAULT_TEMPERATURE),
            endpoint: openai
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        };

        validate_config(&config)?;
        Ok(config)
    }
}
