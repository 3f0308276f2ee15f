//! HTTP transport for the classification service.

mod error;
mod request;
mod routes;

use std::sync::Arc;

use plantclip_core::ClassificationService;
use tokio::net::TcpListener;
use tokio::signal;

pub use routes::create_router;

/// State shared by every handler.
pub type SharedState = Arc<ClassificationService>;

/// Bind `address` and serve until Ctrl-C or SIGTERM.
pub async fn serve(service: SharedState, address: &str) -> anyhow::Result<()> {
    let app = create_router(service);

    let listener = bind(address).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Bind a `host:port` address. Hostnames are resolved.
async fn bind(address: &str) -> anyhow::Result<TcpListener> {
    TcpListener::bind(address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {address}: {e}"))
}

/// Resolves on the first of SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
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

    tracing::warn!("Shutdown signal received, stopping server...");
}
