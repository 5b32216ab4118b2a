mod env_manager;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use url::Url;
use crate::error::{ExplainError, Result};

pub use env_manager::{get_env_value, load_dotenv, ApiKeys};

/// Main configuration struct for the application
///
/// Every section has defaults, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Repository hosting API settings
    pub github: GitHubConfig,
    /// Summarization service settings
    pub gemini: GeminiConfig,
    /// Truncation limits for fetched content
    pub limits: ContentLimits,
    /// API credentials
    pub api_keys: ApiKeys,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,
}

/// GitHub API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// REST API base URL
    pub api_base: String,
    /// Base URL for raw file content
    pub raw_base: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Gemini API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API base URL
    pub api_base: String,
    /// Model name used in the `generateContent` path
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Truncation limits, in characters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentLimits {
    /// Maximum README length forwarded to the prompt
    pub readme_max_chars: usize,
    /// Maximum length of each dependency manifest
    pub dependency_max_chars: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_level: "info".to_string(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            raw_base: "https://raw.githubusercontent.com".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-flash-lite-latest".to_string(),
            temperature: 0.3,
            max_output_tokens: 2000,
            timeout_secs: 60,
        }
    }
}

impl Default for ContentLimits {
    fn default() -> Self {
        Self {
            readme_max_chars: 8000,
            dependency_max_chars: 4000,
        }
    }
}

impl GitHubConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl GeminiConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Loads configuration from a TOML file and then applies environment overrides
    ///
    /// With no explicit path, `<config_dir>/explainmyrepo/config.toml` is used if it
    /// exists. An explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(get_env_value);
        Ok(config)
    }

    /// Reads a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ExplainError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("explainmyrepo").join("config.toml"))
    }

    /// Applies overrides from environment-style lookups
    ///
    /// Takes the lookup as a function so callers can substitute the process
    /// environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("GITHUB_TOKEN") {
            self.api_keys.github_token = Some(token);
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.api_keys.gemini_api_key = Some(key);
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(base) = lookup("GITHUB_API_BASE_URL") {
            self.github.api_base = base;
        }
        if let Some(base) = lookup("GITHUB_RAW_BASE_URL") {
            self.github.raw_base = base;
        }
        if let Some(base) = lookup("GEMINI_API_BASE_URL") {
            self.gemini.api_base = base;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
    }

    /// Checks that the configuration can be used to serve requests
    pub fn validate(&self) -> Result<()> {
        for (name, base) in [
            ("github.api_base", &self.github.api_base),
            ("github.raw_base", &self.github.raw_base),
            ("gemini.api_base", &self.gemini.api_base),
        ] {
            Url::parse(base)
                .map_err(|e| ExplainError::Config(format!("{} is not a valid URL: {}", name, e)))?;
        }
        if !(0.0..=2.0).contains(&self.gemini.temperature) {
            return Err(ExplainError::Config(format!(
                "gemini.temperature must be between 0 and 2, got {}",
                self.gemini.temperature
            )));
        }
        if self.limits.readme_max_chars == 0 || self.limits.dependency_max_chars == 0 {
            return Err(ExplainError::Config("content limits must be greater than zero".into()));
        }
        self.ensure_tokens()
    }

    /// Validates that configured tokens are not blank
    pub fn ensure_tokens(&self) -> Result<()> {
        if let Some(token) = &self.api_keys.github_token {
            if token.trim().is_empty() {
                return Err(ExplainError::Config("GitHub token is empty".into()));
            }
        }
        Ok(())
    }

    /// Whether a GitHub token is configured
    pub fn has_github_token(&self) -> bool {
        self.api_keys.has_github_token()
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
