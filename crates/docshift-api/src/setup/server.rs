//! Server startup and graceful shutdown

use crate::state::Readiness;
use anyhow::Result;
use axum::Router;
use docshift_core::Config;

/// Start the server with graceful shutdown
pub async fn start_server(config: &Config, app: Router, readiness: Readiness) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        max_upload_mb = config.max_upload_size_bytes() / 1024 / 1024,
        allowed_content_types = %config.allowed_content_types().join(","),
        upload_dir = %config.upload_dir().display(),
        output_dir = %config.output_dir().display(),
        upload_retention_secs = config.upload_retention().as_secs_f64(),
        output_retention_secs = config.output_retention().as_secs_f64(),
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(readiness))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Signal handler for graceful shutdown
///
/// Resolves on Ctrl+C (SIGINT) or SIGTERM after flagging the service as not
/// ready, so requests still arriving on open connections get a 503.
async fn shutdown_signal(readiness: Readiness) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    readiness.begin_shutdown();
    tracing::info!("Shutting down gracefully...");
}
