//! Process supervisor.
//!
//! Owns the multiplexer's lifecycle: runs the accept loop in the background,
//! waits for a stop request, then drives a bounded graceful shutdown. Every
//! session is told to wind down; whatever is still running when the grace
//! period expires is aborted and the shutdown is reported as failed.

use std::{future::Future, time::Duration};

use tokio::sync::watch;

use crate::{error::ServerError, multiplexer::Multiplexer, transport::Transport};

/// Run `mux` until `stop` resolves, then shut down within `grace`.
///
/// # Errors
///
/// - [`ServerError::ShutdownTimeout`] if sessions outlive the grace period.
/// - [`ServerError::Task`] if the accept loop task fails.
pub async fn supervise<T, F>(mux: Multiplexer<T>, grace: Duration, stop: F) -> Result<(), ServerError>
where
    T: Transport,
    F: Future<Output = ()> + Send,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut accept_loop = tokio::spawn(mux.run(shutdown_rx));

    tokio::select! {
        () = stop => tracing::info!("stop requested, shutting down"),
        joined = &mut accept_loop => {
            tracing::warn!("accept loop exited unexpectedly");
            return joined.map_err(|e| ServerError::Task(e.to_string()));
        },
    }

    // Every session holds a receiver; the loop itself stops accepting.
    let _ = shutdown_tx.send(true);

    match tokio::time::timeout(grace, &mut accept_loop).await {
        Ok(Ok(())) => {
            tracing::info!("shutdown complete");
            Ok(())
        },
        Ok(Err(e)) => Err(ServerError::Task(e.to_string())),
        Err(_) => {
            accept_loop.abort();
            tracing::error!(?grace, "could not stop server gracefully, aborted remaining sessions");
            Err(ServerError::ShutdownTimeout(grace))
        },
    }
}

/// Resolve on SIGINT (Ctrl-C) or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("received interrupt"),
        () = terminate => tracing::info!("received terminate"),
    }
}
