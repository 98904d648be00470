//! Server initialization and main run loop

use super::config::AppConfig;
use super::loader::load_config;
use crate::api::{api_router, DiagnoseState};
use anyhow::{Context, Result};
use autodiag_llm::ProviderKind;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the HTTP application for a loaded configuration
pub fn build_router(config: &AppConfig) -> Result<Router> {
    let state = DiagnoseState::from_config(config).context("Failed to create LLM client")?;

    Ok(api_router(Arc::new(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}

/// Providers that would fail every request for lack of a usable key
fn missing_credentials(config: &AppConfig) -> Vec<ProviderKind> {
    let providers = config.llm.provider_settings();
    [ProviderKind::OpenAi, ProviderKind::Anthropic]
        .into_iter()
        .filter(|kind| !providers.settings(*kind).has_api_key())
        .collect()
}

/// Run the server
pub async fn run() -> Result<()> {
    info!("Starting Autodiag server v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("Failed to load configuration")?;
    info!(
        provider = %config.llm.default_provider,
        pipeline = ?config.pipeline,
        "Configuration loaded"
    );

    for kind in missing_credentials(&config) {
        warn!(
            "{} not set, {} requests will fail",
            kind.credential_env(),
            kind.display_name()
        );
    }

    let app = build_router(&config)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Autodiag shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}
