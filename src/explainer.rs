//! The fetch → summarize → parse pipeline behind `/analyze`.

use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::{parse_analysis, AnalysisSections};
use crate::error::{ExplainError, Result};
use crate::github::{GitHubClient, RateLimitInfo, RepoData};
use crate::prompts::build_analysis_prompt;
use crate::utils::{extract_repo_info, RepoRef};

/// Somewhere repository metadata can be fetched from
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Fetches all metadata for a repository
    async fn fetch(&self, repo: &RepoRef) -> Result<RepoData>;

    /// Current API quota, if it can be determined
    async fn rate_limit(&self) -> Option<RateLimitInfo>;

    /// Whether requests are authenticated
    fn has_token(&self) -> bool;
}

/// A text generation service
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Generates text for a prompt
    async fn summarize(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn fetch(&self, repo: &RepoRef) -> Result<RepoData> {
        self.fetch_repo_data(repo).await
    }

    async fn rate_limit(&self) -> Option<RateLimitInfo> {
        self.check_rate_limit().await
    }

    fn has_token(&self) -> bool {
        GitHubClient::has_token(self)
    }
}

/// A finished explanation of one repository
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    /// Which repository was explained
    pub repo: RepoRef,
    /// Metadata the explanation was built from
    pub data: RepoData,
    /// Parsed summarizer output
    pub sections: AnalysisSections,
}

/// Runs the explanation pipeline against a repository source and a summarizer
#[derive(Clone)]
pub struct RepoExplainer {
    source: Arc<dyn RepositorySource>,
    summarizer: Arc<dyn Summarizer>,
}

impl RepoExplainer {
    /// Creates an explainer from its two collaborators
    pub fn new(source: Arc<dyn RepositorySource>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self { source, summarizer }
    }

    /// The repository source, for quota checks
    pub fn source(&self) -> &dyn RepositorySource {
        self.source.as_ref()
    }

    /// Explains the repository named by user input
    pub async fn explain(&self, raw_url: &str) -> Result<Explanation> {
        let repo = parse_repo_input(raw_url)?;
        let span = info_span!("explain", request_id = %Uuid::new_v4(), repo = %repo);

        async move {
            let data = self.source.fetch(&repo).await?;

            let prompt = build_analysis_prompt(&repo, &data);
            let answer = self.summarizer.summarize(&prompt).await?;
            let sections = parse_analysis(&answer);

            info!("Explanation ready ({} answer chars)", answer.len());
            Ok(Explanation { repo, data, sections })
        }
        .instrument(span)
        .await
    }
}

/// Validates user input and extracts the repository it names
pub fn parse_repo_input(raw_url: &str) -> Result<RepoRef> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err(ExplainError::Validation(
            "Please enter a GitHub repository URL.".to_string(),
        ));
    }
    extract_repo_info(trimmed).ok_or_else(|| {
        ExplainError::Validation(
            "Invalid GitHub URL format. Please use a URL like: https://github.com/username/repository"
                .to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StaticSource {
        result: fn() -> Result<RepoData>,
    }

    #[async_trait]
    impl RepositorySource for StaticSource {
        async fn fetch(&self, _repo: &RepoRef) -> Result<RepoData> {
            (self.result)()
        }

        async fn rate_limit(&self) -> Option<RateLimitInfo> {
            None
        }

        fn has_token(&self) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct RecordingSummarizer {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Summarizer for RecordingSummarizer {
        async fn summarize(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(r#"{"project_type": "Library", "tech_stack": ["Rust"]}"#.to_string())
        }
    }

    fn explainer(source: StaticSource) -> (RepoExplainer, Arc<RecordingSummarizer>) {
        let summarizer = Arc::new(RecordingSummarizer::default());
        (RepoExplainer::new(Arc::new(source), summarizer.clone()), summarizer)
    }

    #[tokio::test]
    async fn test_explain_runs_pipeline() {
        let (explainer, summarizer) = explainer(StaticSource {
            result: || Ok(RepoData { description: Some("Parser library".into()), ..RepoData::default() }),
        });

        let explanation = explainer.explain("https://github.com/acme/parser").await.unwrap();
        assert_eq!(explanation.repo, RepoRef::new("acme", "parser"));
        assert_eq!(explanation.sections.project_type, "Library");
        assert_eq!(explanation.sections.tech_stack, "Rust");

        let prompts = summarizer.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Description: Parser library"));
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_summarizer() {
        let (explainer, summarizer) = explainer(StaticSource {
            result: || Err(ExplainError::NotFound("missing".into())),
        });

        let result = explainer.explain("https://github.com/acme/missing").await;
        assert!(matches!(result, Err(ExplainError::NotFound(_))));
        assert!(summarizer.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_parse_repo_input_validation() {
        let empty = parse_repo_input("   ").unwrap_err();
        assert_eq!(empty.to_string(), "Please enter a GitHub repository URL.");

        let invalid = parse_repo_input("https://example.com/x").unwrap_err();
        assert!(invalid.to_string().starts_with("Invalid GitHub URL format"));
        assert_eq!(invalid.kind().label(), "validation");
    }
}
