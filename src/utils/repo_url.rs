use std::fmt;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref GITHUB_REPO_PATTERN: Regex =
        Regex::new(r"(?:https?://)?(?:www\.)?github\.com/([^/]+)/([^/\s?#]+)")
            .expect("repository URL pattern is valid");
}

/// An `owner/repo` pair identifying a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// User or organization login
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoRef {
    /// Creates a new reference
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Public web URL of the repository
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Extracts the owner and repository name from user input.
///
/// - Trims surrounding whitespace and trailing slashes
/// - Accepts the URL with or without scheme and `www.`
/// - Ignores anything after the repository segment (`/tree/...`, `?query`, `#fragment`)
/// - Drops a trailing `.git`
///
/// Returns `None` when the input does not name a repository.
pub fn extract_repo_info(input: &str) -> Option<RepoRef> {
    let cleaned = input.trim().trim_end_matches('/');
    let captures = GITHUB_REPO_PATTERN.captures(cleaned)?;

    let owner = captures.get(1)?.as_str().trim();
    let repo = captures.get(2)?.as_str();
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some(RepoRef::new(owner, repo))
}
