//! HTTP surface: routes, shared state, and page rendering.

mod handlers;
pub mod render;

use std::sync::Arc;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::explainer::RepoExplainer;
use crate::gemini::GeminiClient;
use crate::github::GitHubClient;

pub use handlers::{error_response, status_for, AnalyzeForm};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The explanation pipeline
    pub explainer: RepoExplainer,
}

impl AppState {
    /// Wires the real GitHub and Gemini clients from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let github = GitHubClient::new(config)?;
        let gemini = GeminiClient::new(config)?;
        Ok(Self {
            explainer: RepoExplainer::new(Arc::new(github), Arc::new(gemini)),
        })
    }
}

/// Builds the application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/analyze", post(handlers::analyze))
        .route("/rate-limit", get(handlers::rate_limit))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the application until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}
