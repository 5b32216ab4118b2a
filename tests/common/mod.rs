#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use explainmyrepo::{
    Config, ExplainError, RateLimitInfo, RepoData, RepoExplainer, RepoRef, RepositorySource,
    Result, Summarizer,
};
use explainmyrepo::web::AppState;

pub mod test_helpers {
    use super::*;

    /// Configuration with every upstream pointed at a mock server
    pub fn create_test_config(server_url: &str) -> Config {
        let mut config = Config::default();
        config.github.api_base = server_url.to_string();
        config.github.raw_base = server_url.to_string();
        config.gemini.api_base = server_url.to_string();
        config.gemini.model = "test-model".to_string();
        config.api_keys.gemini_api_key = Some("test-key".to_string());
        config
    }

    pub fn setup_test_logger() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    }

    pub fn sample_analysis() -> String {
        serde_json::json!({
            "tech_stack": ["Rust", "axum"],
            "project_type": "Web App",
            "architecture_mermaid": "graph TD; Browser-->Server;",
            "architecture_description": "A single axum server.",
            "what_it_does": "Explains repositories.",
            "recruiter_summary": "A tool that explains code to non-engineers."
        })
        .to_string()
    }
}

/// Repository source answering from memory
pub struct FakeSource {
    pub result: fn(&RepoRef) -> Result<RepoData>,
    pub rate: Option<RateLimitInfo>,
    pub has_token: bool,
}

impl FakeSource {
    pub fn ok() -> Self {
        Self {
            result: |_| {
                Ok(RepoData {
                    description: Some("Demo repository".to_string()),
                    language: Some("Rust".to_string()),
                    stars: 10,
                    forks: 2,
                    ..RepoData::default()
                })
            },
            rate: Some(RateLimitInfo { limit: 60, remaining: 59, reset_time: 0 }),
            has_token: false,
        }
    }

    pub fn failing(result: fn(&RepoRef) -> Result<RepoData>) -> Self {
        Self { result, ..Self::ok() }
    }
}

#[async_trait]
impl RepositorySource for FakeSource {
    async fn fetch(&self, repo: &RepoRef) -> Result<RepoData> {
        (self.result)(repo)
    }

    async fn rate_limit(&self) -> Option<RateLimitInfo> {
        self.rate
    }

    fn has_token(&self) -> bool {
        self.has_token
    }
}

/// Summarizer returning a fixed answer and recording prompts
pub struct FakeSummarizer {
    pub answer: std::result::Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeSummarizer {
    pub fn answering(answer: String) -> Self {
        Self { answer: Ok(answer), prompts: Mutex::new(Vec::new()) }
    }

    pub fn failing(message: &str) -> Self {
        Self { answer: Err(message.to_string()), prompts: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer.clone().map_err(ExplainError::Gemini)
    }
}

pub fn app_state(source: FakeSource, summarizer: FakeSummarizer) -> AppState {
    AppState {
        explainer: RepoExplainer::new(Arc::new(source), Arc::new(summarizer)),
    }
}
