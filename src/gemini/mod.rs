//! Client for the Gemini `generateContent` endpoint.

mod types;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::error::{ExplainError, Result};
use crate::explainer::Summarizer;
use types::{ErrorResponse, GenerateRequest, GenerateResponse};

/// Gemini text generation client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// Builds a client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.gemini.timeout())
            .build()
            .map_err(|e| ExplainError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.gemini.api_base.trim_end_matches('/').to_string(),
            model: config.gemini.model.clone(),
            api_key: config
                .api_keys
                .gemini_api_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            temperature: config.gemini.temperature,
            max_output_tokens: config.gemini.max_output_tokens,
        })
    }

    fn endpoint(&self, api_key: &str) -> Result<Url> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model);
        Ok(Url::parse_with_params(&url, &[("key", api_key)])?)
    }

    /// Sends a prompt and returns the generated text
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ExplainError::Gemini(
                "Gemini API key is not configured. Set GEMINI_API_KEY and restart the server.".to_string(),
            )
        })?;

        info!("Requesting analysis from {} ({} prompt chars)", self.model, prompt.len());

        let response = self
            .client
            .post(self.endpoint(api_key)?)
            .json(&GenerateRequest::new(prompt, self.temperature, self.max_output_tokens))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExplainError::GeminiTimeout(
                        "Gemini API request timed out. Please try again.".to_string(),
                    )
                } else {
                    // Drop the URL; it carries the API key.
                    ExplainError::Gemini(format!(
                        "Network error calling Gemini API: {}",
                        e.without_url()
                    ))
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.map_err(|e| {
                ExplainError::Gemini(format!("Error processing Gemini response: {}", e.without_url()))
            })?;
            let message = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(parsed) => parsed
                    .error
                    .and_then(|error| error.message)
                    .unwrap_or_else(|| "Unknown error".to_string()),
                Err(e) => {
                    warn!("Gemini returned {} with an unreadable body", status);
                    return Err(ExplainError::Gemini(format!(
                        "Error processing Gemini response: {}",
                        e
                    )));
                }
            };
            warn!("Gemini returned {}: {}", status, message);
            return Err(ExplainError::Gemini(format!("Gemini API error: {}", message)));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            ExplainError::Gemini(format!("Error processing Gemini response: {}", e.without_url()))
        })?;

        match body.first_text() {
            Some(text) => {
                debug!("Gemini produced {} chars", text.len());
                Ok(text)
            }
            None => Err(ExplainError::Gemini(
                "Unexpected response format from Gemini API".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, prompt: &str) -> Result<String> {
        self.generate(prompt).await
    }
}
