use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use crate::routes::router;
use crate::state::AppState;

/// Bind `address` and serve the dashboard until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, address: &str) -> anyhow::Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(%address, "dashboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl-C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
