//! Router construction and server lifecycle.
//!
//! Models are loaded before the listener binds: a process that cannot load
//! them exits instead of serving.

use axum::Router;
use axum::routing::{get, post};
use headlines_core::Models;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::routes::{not_found, score, status};
use crate::state::ServerState;

/// Build the router over already-loaded models.
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/status", get(status::get_status))
        .route("/score_headlines", post(score::score_headlines))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load models, bind, and serve until Ctrl+C or SIGTERM.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let models = headlines_ai::load_models(&config.model_config()).map_err(|e| {
        error!(error = %e, "model loading failed");
        anyhow::Error::new(e).context("model loading failed")
    })?;

    let listener = TcpListener::bind(config.socket_addr()?).await?;
    serve(listener, models).await
}

/// Serve on an already-bound listener.
pub async fn serve(listener: TcpListener, models: Models) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let app = build_router(ServerState::new(models));

    info!(%addr, "headline scoring service listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
