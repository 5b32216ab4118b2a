use std::collections::BTreeMap;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a top-level repository entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Directory
    Dir,
    /// Regular file
    File,
    /// Symlink, submodule, or anything newer the API may report
    #[serde(other)]
    Other,
}

/// One entry of the repository's top-level listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// File or directory name
    pub name: String,
    /// Entry kind
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Path relative to the repository root
    #[serde(default)]
    pub path: String,
}

impl TreeEntry {
    /// Whether this entry is a directory
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Everything fetched about a repository for one explanation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoData {
    /// Decoded README text, truncated
    pub readme: Option<String>,
    /// Top-level listing, directories first
    pub structure: Vec<TreeEntry>,
    /// Dependency manifest name to (truncated) content
    pub dependencies: BTreeMap<String, String>,
    /// Language name to number of bytes
    pub languages: BTreeMap<String, u64>,
    /// Repository description
    pub description: Option<String>,
    /// Primary language reported by GitHub
    pub language: Option<String>,
    /// Repository topics
    pub topics: Vec<String>,
    /// Stargazer count
    pub stars: u64,
    /// Fork count
    pub forks: u64,
}

impl RepoData {
    /// Languages ordered by share of bytes, largest first, as percentages
    pub fn language_breakdown(&self) -> Vec<(String, f64)> {
        let total: u64 = self.languages.values().sum();
        if total == 0 {
            return Vec::new();
        }

        let mut breakdown: Vec<(String, f64)> = self
            .languages
            .iter()
            .map(|(name, bytes)| (name.clone(), *bytes as f64 * 100.0 / total as f64))
            .collect();
        breakdown.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        breakdown
    }
}

/// Core API quota as reported by `GET /rate_limit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    /// Requests allowed per window
    pub limit: u64,
    /// Requests left in the current window
    pub remaining: u64,
    /// Unix timestamp at which the window resets
    pub reset_time: i64,
}

impl RateLimitInfo {
    /// Reset time as a UTC timestamp
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.reset_time, 0).single()
    }
}

/// Subset of `GET /repos/{owner}/{repo}` that the explainer uses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RepositoryInfo {
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub default_branch: Option<String>,
}

/// `GET /repos/{owner}/{repo}/readme`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReadmeResponse {
    #[serde(default)]
    pub content: String,
    pub encoding: Option<String>,
}

/// `GET /rate_limit`
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RateLimitResponse {
    #[serde(default)]
    pub resources: RateLimitResources,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RateLimitResources {
    #[serde(default)]
    pub core: RateLimitCore,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RateLimitCore {
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub remaining: u64,
    #[serde(default)]
    pub reset: i64,
}

impl From<RateLimitResponse> for RateLimitInfo {
    fn from(response: RateLimitResponse) -> Self {
        let core = response.resources.core;
        Self {
            limit: core.limit,
            remaining: core.remaining,
            reset_time: core.reset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_deserialization() {
        let entries: Vec<TreeEntry> = serde_json::from_str(
            r#"[
                {"name": "src", "type": "dir", "path": "src"},
                {"name": "README.md", "type": "file", "path": "README.md"},
                {"name": "vendored", "type": "submodule", "path": "vendored"},
                {"name": "link", "type": "symlink"}
            ]"#,
        )
        .unwrap();

        assert_eq!(entries[0].kind, EntryKind::Dir);
        assert_eq!(entries[1].kind, EntryKind::File);
        assert_eq!(entries[2].kind, EntryKind::Other);
        assert_eq!(entries[3].kind, EntryKind::Other);
        assert_eq!(entries[3].path, "");
    }

    #[test]
    fn test_language_breakdown() {
        let mut data = RepoData::default();
        assert!(data.language_breakdown().is_empty());

        data.languages.insert("Rust".into(), 750);
        data.languages.insert("Shell".into(), 250);
        let breakdown = data.language_breakdown();
        assert_eq!(breakdown[0].0, "Rust");
        assert!((breakdown[0].1 - 75.0).abs() < f64::EPSILON);
        assert_eq!(breakdown[1].0, "Shell");
    }

    #[test]
    fn test_rate_limit_conversion() {
        let response: RateLimitResponse = serde_json::from_str(
            r#"{"resources": {"core": {"limit": 60, "remaining": 5, "reset": 1700000000}}}"#,
        )
        .unwrap();
        let info = RateLimitInfo::from(response);
        assert_eq!(info, RateLimitInfo { limit: 60, remaining: 5, reset_time: 1_700_000_000 });
        assert!(info.reset_at().is_some());
    }
}
