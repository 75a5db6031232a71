//! OS signal handling.

use super::Shutdown;

/// Wait for Ctrl+C, then trigger `shutdown`.
pub async fn wait_for_signal(shutdown: Shutdown) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
    shutdown.trigger();
}
