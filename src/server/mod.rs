//! HTTP API: router construction, shared state and graceful shutdown.

pub mod error;
pub mod handlers;
pub mod models;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::github::GithubClient;
use crate::scanner::Scanner;

/// Handler state, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
    pub github: Arc<GithubClient>,
    /// Where upload and GitHub staging directories are created.
    pub scratch_dir: Option<PathBuf>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let scanner = Scanner::from_config(&config.registry)
            .context("failed to build registry client")?;
        let github = GithubClient::new(&config.github).context("failed to build GitHub client")?;

        Ok(Self {
            scanner: Arc::new(scanner),
            github: Arc::new(github),
            scratch_dir: config.server.scratch_dir.clone(),
        })
    }
}

pub fn create_router(state: AppState, config: &Config) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/scan/github", post(handlers::scan_github))
        .route("/scan/upload", post(handlers::scan_upload))
        .route("/license/{package}", get(handlers::license_lookup))
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to `host:port` and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config)?;
    let router = create_router(state, config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
