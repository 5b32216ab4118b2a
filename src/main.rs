use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use explainmyrepo::{config, logging, web, Config, GitHubClient};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Interface to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let dotenv = config::load_dotenv();
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.server.log_level = level;
    }

    logging::init(&config.server.log_level)?;
    match dotenv {
        Some(path) => info!("Loaded environment from {}", path.display()),
        None => debug!("No environment file loaded"),
    }
    config.validate().context("invalid configuration")?;

    if config.api_keys.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; every analysis will fail until it is configured");
    }

    let github = GitHubClient::new(&config)?;
    match github.check_rate_limit().await {
        Some(rate) => info!(
            "GitHub rate limit: {}/{} remaining{}",
            rate.remaining,
            rate.limit,
            if config.has_github_token() { " (token)" } else { " (anonymous)" }
        ),
        None => warn!("Could not read the GitHub rate limit"),
    }

    let state = web::AppState::from_config(&config)?;
    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("binding {}", config.bind_addr()))?;

    web::serve(listener, state, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
