use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stores API credentials for the two upstream services
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeys {
    /// GitHub API token for authenticated requests
    pub github_token: Option<String>,
    /// Gemini API key
    pub gemini_api_key: Option<String>,
}

impl ApiKeys {
    /// Whether a GitHub token is configured
    pub fn has_github_token(&self) -> bool {
        self.github_token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// Loads a `.env` file into the process environment.
///
/// `DOTENV_PATH` selects the file, defaulting to `.env` in the working directory.
/// Returns the path that was read, or `None` when there was nothing to load.
/// Runs before logging is set up, so callers report the outcome themselves.
pub fn load_dotenv() -> Option<PathBuf> {
    let path = PathBuf::from(std::env::var("DOTENV_PATH").unwrap_or_else(|_| ".env".into()));
    dotenvy::from_path(&path).ok().map(|()| path)
}

/// Reads an environment variable, treating empty values as unset
pub fn get_env_value(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
