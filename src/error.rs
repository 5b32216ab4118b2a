use std::fmt;
use std::io;
use thiserror::Error;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, ExplainError>;

/// Errors that can occur while explaining a repository
#[derive(Debug, Error)]
pub enum ExplainError {
    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// HTTP request/response errors that were not classified further
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// TOML configuration parse errors
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Input validation errors, shown to the user as-is
    #[error("{0}")]
    Validation(String),

    /// The repository does not exist or is not public
    #[error("{0}")]
    NotFound(String),

    /// GitHub refused access for a reason other than rate limiting
    #[error("{0}")]
    Forbidden(String),

    /// API rate limit exceeded
    #[error("{0}")]
    RateLimitExceeded(String),

    /// Any other non-success answer from the GitHub API
    #[error("{0}")]
    GitHubApi(String),

    /// An upstream request timed out
    #[error("{0}")]
    Timeout(String),

    /// Network connectivity errors
    #[error("{0}")]
    Network(String),

    /// Summarization service errors
    #[error("{0}")]
    Gemini(String),

    /// The summarization request timed out
    #[error("{0}")]
    GeminiTimeout(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

/// Which stage of the pipeline an error belongs to.
///
/// The label is what the error page shows to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input
    Validation,
    /// Repository metadata could not be fetched
    GitHub,
    /// The summarization service failed
    Gemini,
    /// Unknown route
    NotFound,
    /// Anything else
    Internal,
}

impl ErrorKind {
    /// Label rendered on the error page
    pub fn label(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::GitHub => "github",
            Self::Gemini => "gemini",
            Self::NotFound => "404",
            Self::Internal => "500",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl ExplainError {
    /// Classifies the error by pipeline stage
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_)
            | Self::Forbidden(_)
            | Self::RateLimitExceeded(_)
            | Self::GitHubApi(_)
            | Self::Timeout(_)
            | Self::Network(_) => ErrorKind::GitHub,
            Self::Gemini(_) | Self::GeminiTimeout(_) => ErrorKind::Gemini,
            Self::IO(_)
            | Self::Http(_)
            | Self::Json(_)
            | Self::UrlParse(_)
            | Self::Toml(_)
            | Self::Config(_) => ErrorKind::Internal,
        }
    }

    /// Checks if this error is transient, i.e. trying again later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) |
            Self::Http(_) |
            Self::Timeout(_) |
            Self::GeminiTimeout(_) |
            Self::RateLimitExceeded(_) |
            Self::IO(_)
        )
    }
}
