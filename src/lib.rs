#![warn(missing_docs)]
#![warn(clippy::all)]

//! ExplainMyRepo - plain-language explanations of public GitHub repositories
//!
//! A small web service: a URL comes in through a form, repository metadata is
//! fetched from the GitHub REST API, a prompt built from that metadata goes to
//! Gemini, and the parsed answer is rendered as an HTML page.
//!
//! ## Usage
//! ```rust,ignore
//! use explainmyrepo::{Config, web};
//!
//! async fn example() -> explainmyrepo::Result<()> {
//!     let config = Config::load(None)?;
//!     let state = web::AppState::from_config(&config)?;
//!     let explanation = state.explainer.explain("https://github.com/tokio-rs/axum").await?;
//!     println!("{}", explanation.sections.recruiter_summary);
//!     Ok(())
//! }
//! ```

/// Configuration loading (defaults, TOML file, environment)
pub mod config;
/// Error handling types and utilities
pub mod error;
/// Logging configuration and utilities
pub mod logging;
/// GitHub metadata client
pub mod github;
/// Gemini summarization client
pub mod gemini;
/// Prompt construction
pub mod prompts;
/// Parsing of the summarizer's answer
pub mod analysis;
/// The explanation pipeline and its collaborator traits
pub mod explainer;
/// HTTP routes and HTML rendering
pub mod web;
/// Utilities (repository URL parsing, text helpers)
pub mod utils;

// Re-export common types
pub use analysis::{parse_analysis, AnalysisSections};
pub use config::Config;
pub use error::{ErrorKind, ExplainError, Result};
pub use explainer::{Explanation, RepoExplainer, RepositorySource, Summarizer};
pub use gemini::GeminiClient;
pub use github::{GitHubClient, RateLimitInfo, RepoData};
pub use utils::{extract_repo_info, RepoRef};
