//! GitHub REST client that gathers the metadata an explanation is built from.
//!
//! Only the repository lookup is mandatory. README, listing, dependency
//! manifests, and language statistics are best-effort: a failure there leaves
//! the corresponding field empty and the explanation continues.

mod types;

use std::collections::{BTreeMap, HashSet};
use base64::Engine;
use lazy_static::lazy_static;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, info, warn};

use crate::config::{Config, ContentLimits};
use crate::error::{ExplainError, Result};
use crate::utils::{truncate_chars, RepoRef};

pub use types::{EntryKind, RateLimitInfo, RepoData, TreeEntry};
use types::{ReadmeResponse, RateLimitResponse, RepositoryInfo};

const USER_AGENT_VALUE: &str = "ExplainMyRepo/1.0";
const ACCEPT_VALUE: &str = "application/vnd.github.v3+json";
const FALLBACK_BRANCHES: &[&str] = &["main", "master"];

/// Top-level folders that carry no information about the project itself
pub const IGNORE_FOLDERS: &[&str] = &[
    "node_modules", "venv", ".git", "dist", "build",
    "__pycache__", ".venv", "env", ".env", ".idea",
    ".vscode", "vendor", "target", ".gradle", "bin", "obj",
];

/// Manifest and build files whose contents are forwarded to the summarizer
pub const DEPENDENCY_FILES: &[&str] = &[
    "requirements.txt", "pyproject.toml", "setup.py", "Pipfile",
    "package.json", "package-lock.json", "yarn.lock",
    "pom.xml", "build.gradle", "build.gradle.kts",
    "go.mod", "go.sum",
    "Cargo.toml", "Gemfile", "composer.json",
    "Makefile", "Dockerfile", "docker-compose.yml", "docker-compose.yaml",
];

lazy_static! {
    static ref IGNORED: HashSet<String> =
        IGNORE_FOLDERS.iter().map(|f| f.to_lowercase()).collect();
}

/// Whether a top-level entry should be left out of the listing
pub fn is_ignored(name: &str) -> bool {
    IGNORED.contains(&name.to_lowercase())
}

/// Client for the GitHub REST API and raw content host
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    raw_base: String,
    token: Option<String>,
    limits: ContentLimits,
}

impl GitHubClient {
    /// Builds a client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.github.timeout())
            .build()
            .map_err(|e| ExplainError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.github.api_base.trim_end_matches('/').to_string(),
            raw_base: config.github.raw_base.trim_end_matches('/').to_string(),
            token: config
                .api_keys
                .github_token
                .clone()
                .filter(|t| !t.trim().is_empty()),
            limits: config.limits.clone(),
        })
    }

    /// Whether requests are authenticated
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn api_get(&self, path: &str) -> RequestBuilder {
        let request = self.client.get(format!("{}{}", self.api_base, path));
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("token {}", token)),
            None => request,
        }
    }

    /// Reads the core API quota. Any failure yields `None`.
    pub async fn check_rate_limit(&self) -> Option<RateLimitInfo> {
        let response = match self.api_get("/rate_limit").send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Rate limit check failed: {}", e);
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            debug!("Rate limit check returned {}", response.status());
            return None;
        }

        response
            .json::<RateLimitResponse>()
            .await
            .map(RateLimitInfo::from)
            .map_err(|e| debug!("Unreadable rate limit response: {}", e))
            .ok()
    }

    /// Gathers all metadata for a repository
    pub async fn fetch_repo_data(&self, repo: &RepoRef) -> Result<RepoData> {
        info!("Fetching repository metadata for {}", repo);

        let info = self.fetch_repository(repo).await?;
        let readme = self.fetch_readme(repo).await;
        let structure = self.fetch_structure(repo).await;
        let dependencies = self
            .fetch_dependency_files(repo, &structure, info.default_branch.as_deref())
            .await;
        let languages = self.fetch_languages(repo).await;

        debug!(
            "Fetched {}: readme={}, entries={}, manifests={}, languages={}",
            repo,
            readme.is_some(),
            structure.len(),
            dependencies.len(),
            languages.len()
        );

        Ok(RepoData {
            readme,
            structure,
            dependencies,
            languages,
            description: info.description,
            language: info.language,
            topics: info.topics,
            stars: info.stargazers_count,
            forks: info.forks_count,
        })
    }

    async fn fetch_repository(&self, repo: &RepoRef) -> Result<RepositoryInfo> {
        let response = self
            .api_get(&format!("/repos/{}/{}", repo.owner, repo.repo))
            .send()
            .await
            .map_err(map_transport_error)?;

        let remaining = header_str(response.headers(), "x-ratelimit-remaining").to_string();
        let limit = header_str(response.headers(), "x-ratelimit-limit").to_string();
        debug!("GitHub quota after repository lookup: {}/{}", remaining, limit);

        match response.status() {
            StatusCode::OK => response.json::<RepositoryInfo>().await.map_err(|e| {
                ExplainError::GitHubApi(format!("Unexpected repository response from GitHub: {}", e))
            }),
            StatusCode::NOT_FOUND => Err(ExplainError::NotFound(format!(
                "Repository '{}' not found. Make sure it exists and is public.",
                repo
            ))),
            StatusCode::FORBIDDEN if remaining == "0" => {
                warn!("GitHub API rate limit exhausted");
                Err(ExplainError::RateLimitExceeded(self.rate_limit_message()))
            }
            StatusCode::FORBIDDEN => Err(ExplainError::Forbidden(
                "Access forbidden. The repository might be private.".to_string(),
            )),
            status => Err(ExplainError::GitHubApi(format!(
                "GitHub API error (Status: {})",
                status.as_u16()
            ))),
        }
    }

    fn rate_limit_message(&self) -> String {
        let mut message = String::from("GitHub API rate limit exceeded.\n\n");
        if self.has_token() {
            message.push_str("Please wait a few minutes and try again.");
        } else {
            message.push_str(
                "Tip: add a GitHub token to your .env file to get 5000 requests/hour instead of 60.\n",
            );
            message.push_str("Get one at: https://github.com/settings/tokens");
        }
        message
    }

    async fn fetch_readme(&self, repo: &RepoRef) -> Option<String> {
        let response = self
            .api_get(&format!("/repos/{}/{}/readme", repo.owner, repo.repo))
            .send()
            .await
            .map_err(|e| debug!("README request for {} failed: {}", repo, e))
            .ok()?;

        if response.status() != StatusCode::OK {
            debug!("No README for {} ({})", repo, response.status());
            return None;
        }

        let readme: ReadmeResponse = response
            .json()
            .await
            .map_err(|e| debug!("Unreadable README response for {}: {}", repo, e))
            .ok()?;

        decode_readme(&readme, self.limits.readme_max_chars)
    }

    async fn fetch_structure(&self, repo: &RepoRef) -> Vec<TreeEntry> {
        let response = match self
            .api_get(&format!("/repos/{}/{}/contents", repo.owner, repo.repo))
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => response,
            Ok(response) => {
                debug!("No listing for {} ({})", repo, response.status());
                return Vec::new();
            }
            Err(e) => {
                debug!("Listing request for {} failed: {}", repo, e);
                return Vec::new();
            }
        };

        match response.json::<Vec<TreeEntry>>().await {
            Ok(entries) => sort_structure(entries),
            Err(e) => {
                debug!("Unreadable listing for {}: {}", repo, e);
                Vec::new()
            }
        }
    }

    async fn fetch_dependency_files(
        &self,
        repo: &RepoRef,
        structure: &[TreeEntry],
        default_branch: Option<&str>,
    ) -> BTreeMap<String, String> {
        let branches = candidate_branches(default_branch);
        let mut dependencies = BTreeMap::new();

        for entry in structure
            .iter()
            .filter(|e| e.kind == EntryKind::File && DEPENDENCY_FILES.contains(&e.name.as_str()))
        {
            let path = if entry.path.is_empty() { &entry.name } else { &entry.path };
            for branch in &branches {
                let url = format!(
                    "{}/{}/{}/{}/{}",
                    self.raw_base, repo.owner, repo.repo, branch, path
                );
                match self.client.get(&url).send().await {
                    Ok(response) if response.status() == StatusCode::OK => {
                        if let Ok(content) = response.text().await {
                            let content =
                                truncate_chars(&content, self.limits.dependency_max_chars);
                            dependencies.insert(entry.name.clone(), content.to_string());
                            break;
                        }
                    }
                    Ok(response) => {
                        debug!("{} not on branch {} ({})", path, branch, response.status())
                    }
                    Err(e) => debug!("Fetching {} from {} failed: {}", path, branch, e),
                }
            }
        }

        dependencies
    }

    async fn fetch_languages(&self, repo: &RepoRef) -> BTreeMap<String, u64> {
        let response = match self
            .api_get(&format!("/repos/{}/{}/languages", repo.owner, repo.repo))
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => response,
            _ => return BTreeMap::new(),
        };
        response.json().await.unwrap_or_default()
    }
}

fn map_transport_error(e: reqwest::Error) -> ExplainError {
    if e.is_timeout() {
        ExplainError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        ExplainError::Network(format!("Network error: {}", e))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Decodes a README payload. Only base64 content is understood.
fn decode_readme(readme: &ReadmeResponse, max_chars: usize) -> Option<String> {
    let encoding = readme.encoding.as_deref().unwrap_or("base64");
    if encoding != "base64" || readme.content.is_empty() {
        return None;
    }

    // The API wraps base64 content at 60 columns.
    let compact: String = readme.content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| debug!("README is not valid base64: {}", e))
        .ok()?;

    let text = String::from_utf8_lossy(&bytes);
    Some(truncate_chars(&text, max_chars).to_string())
}

/// Drops ignored folders and orders directories before files, by case-insensitive name
fn sort_structure(entries: Vec<TreeEntry>) -> Vec<TreeEntry> {
    let mut structure: Vec<TreeEntry> = entries
        .into_iter()
        .filter(|e| !is_ignored(&e.name))
        .map(|mut e| {
            if e.path.is_empty() {
                e.path = e.name.clone();
            }
            e
        })
        .collect();
    structure.sort_by_key(|e| (!e.is_dir(), e.name.to_lowercase()));
    structure
}

fn candidate_branches(default_branch: Option<&str>) -> Vec<String> {
    let mut branches: Vec<String> = Vec::new();
    if let Some(branch) = default_branch.filter(|b| !b.is_empty()) {
        branches.push(branch.to_string());
    }
    for branch in FALLBACK_BRANCHES {
        if !branches.iter().any(|b| b == branch) {
            branches.push((*branch).to_string());
        }
    }
    branches
}
