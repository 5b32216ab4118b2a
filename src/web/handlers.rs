use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use super::render;
use super::AppState;
use crate::error::{ErrorKind, ExplainError};

/// Body of the form posted to `/analyze`
#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    /// Repository URL as typed by the user
    #[serde(default)]
    pub github_url: String,
}

/// Landing page
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let source = state.explainer.source();
    let has_token = source.has_token();
    let rate = source.rate_limit().await;
    let show_warning = !has_token && rate.is_some_and(|r| r.remaining < 10);

    Html(render::index_page(show_warning, has_token, rate.as_ref()))
}

/// Runs the pipeline for a submitted URL
pub async fn analyze(
    State(state): State<AppState>,
    form: Result<Form<AnalyzeForm>, FormRejection>,
) -> Response {
    let github_url = match form {
        Ok(Form(form)) => form.github_url,
        Err(rejection) => {
            warn!("Rejected analyze form: {}", rejection);
            String::new()
        }
    };

    info!("Analysis requested for {:?}", github_url.trim());
    match state.explainer.explain(&github_url).await {
        Ok(explanation) => Html(render::results_page(&explanation)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// JSON view of the GitHub quota
pub async fn rate_limit(State(state): State<AppState>) -> Json<Value> {
    let source = state.explainer.source();
    let rate = source.rate_limit().await;
    Json(json!({
        "rate_limit": rate,
        "has_token": source.has_token(),
    }))
}

/// Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "explainmyrepo",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now(),
    }))
}

/// Fallback for unknown routes
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(render::error_page("Page not found.", ErrorKind::NotFound)),
    )
        .into_response()
}

/// HTTP status used when rendering an error page
pub fn status_for(err: &ExplainError) -> StatusCode {
    match err {
        ExplainError::Validation(_) => StatusCode::BAD_REQUEST,
        ExplainError::NotFound(_) => StatusCode::NOT_FOUND,
        ExplainError::Forbidden(_) => StatusCode::FORBIDDEN,
        ExplainError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
        ExplainError::Timeout(_) | ExplainError::GeminiTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        ExplainError::GitHubApi(_) | ExplainError::Network(_) | ExplainError::Gemini(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Renders an error page for a pipeline failure
pub fn error_response(err: &ExplainError) -> Response {
    let kind = err.kind();
    let message = match kind {
        ErrorKind::Internal => {
            error!("Internal error: {}", err);
            "Internal server error. Please try again.".to_string()
        }
        _ => {
            warn!("Explanation failed ({}, transient={}): {}", kind, err.is_transient(), err);
            err.to_string()
        }
    };

    (status_for(err), Html(render::error_page(&message, kind))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for() {
        assert_eq!(status_for(&ExplainError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&ExplainError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&ExplainError::RateLimitExceeded("x".into())),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(status_for(&ExplainError::Gemini("x".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(&ExplainError::Timeout("x".into())), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            status_for(&ExplainError::GeminiTimeout("x".into())),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&ExplainError::Config("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
