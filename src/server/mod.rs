//! HTTP facade: the positions API and the frontend shell.

mod api;
mod state;

pub use api::ErrorEnvelope;
pub use state::AppState;

use crate::config::ServerConfig;
use crate::fetch::BasicClient;
use anyhow::{Context, Result};
use axum::{Router, routing::get};
use axum_server::tls_rustls::RustlsConfig;
use std::{path::Path, sync::Arc, time::Duration};
use tower_http::{services::ServeFile, trace::TraceLayer};
use tracing::{error, info};

/// Builds the application router over an already-constructed state.
pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route("/api/positions", get(api::positions))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the server until Ctrl-C, over TLS when cert and key are configured.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let client = BasicClient::new(&config.fetch).context("Failed to build upstream HTTP client")?;
    let state = Arc::new(AppState::new(client, config.feed_url.clone()));
    let app = router(state, &config.static_dir);

    info!(
        feed_url = %config.feed_url,
        static_dir = %config.static_dir.display(),
        timeout_secs = config.fetch.timeout.as_secs(),
        "Server configured"
    );

    match &config.tls {
        Some(tls) => {
            let rustls = RustlsConfig::from_pem_file(&tls.cert, &tls.key)
                .await
                .with_context(|| {
                    format!(
                        "Failed to load TLS material from '{}' and '{}'",
                        tls.cert.display(),
                        tls.key.display()
                    )
                })?;

            let handle = axum_server::Handle::new();
            let shutdown = handle.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                shutdown.graceful_shutdown(Some(Duration::from_secs(5)));
            });

            info!(addr = %config.bind, "Listening on https");
            axum_server::bind_rustls(config.bind, rustls)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(config.bind)
                .await
                .with_context(|| format!("Failed to bind {}", config.bind))?;

            info!(addr = %config.bind, "Listening on http");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
