use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use docudigest_core::Config;
use docudigest_core::config_file::{self, ConfigFile};

mod app;
mod error;
mod handlers;
mod models;
mod state;
mod template;
mod upload;

use state::AppState;

const DEFAULT_BIND: &str = "0.0.0.0:5001";

/// DocuDigest web server - upload a document, get an AI summary
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to listen on (default: 0.0.0.0:5001)
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Config file layered over the platform and ./.docudigest.toml configs
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum upload size in megabytes
    #[arg(long)]
    max_upload_mb: Option<u64>,

    /// Base URL of the summarization service
    #[arg(long)]
    summarizer_url: Option<String>,

    /// Timeout for the summarization call, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Resolve configuration: CLI flags > env vars > config files > defaults
    let mut file = config_file::load_config();
    if let Some(ref path) = args.config {
        let extra = config_file::load_from_path(path)
            .ok_or_else(|| anyhow::anyhow!("Could not read config file {}", path.display()))?;
        file = config_file::merge(file, extra);
    }

    let mut config = Config::from_file(&file);
    if let Some(key) = std::env::var("COHERE_API_KEY").ok().filter(|k| !k.is_empty()) {
        config.cohere_api_key = Some(key);
    }
    if let Some(mb) = args.max_upload_mb {
        config.max_upload_mb = mb;
    }
    if let Some(url) = args.summarizer_url {
        config.summarizer_base_url = url;
    }
    if let Some(secs) = args.timeout_secs {
        config.summarizer_timeout_secs = secs;
    }

    let addr = resolve_bind(args.bind, &file)?;

    if config.cohere_api_key.is_none() {
        tracing::warn!("COHERE_API_KEY is not set; summarization requests will fail until it is");
    }
    tracing::debug!(?config, "resolved configuration");

    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState::new(config, shutdown.clone()));
    let app = app::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}

fn resolve_bind(flag: Option<SocketAddr>, file: &ConfigFile) -> anyhow::Result<SocketAddr> {
    if let Some(addr) = flag {
        return Ok(addr);
    }
    let configured = file
        .server
        .as_ref()
        .and_then(|s| s.bind.as_deref())
        .unwrap_or(DEFAULT_BIND);
    configured
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address {:?}: {}", configured, e))
}

/// Resolve on Ctrl+C / SIGTERM and cancel in-flight summarizer calls.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down");
    token.cancel();
}
