pub mod forms;
pub mod handlers;
pub mod middlewares;
pub mod router;
pub mod state;

use std::{future::Future, net::SocketAddr};

use crate::{conf::Settings, prelude::Result};
use router::build_routes;
use state::AppState;

pub async fn listen(settings: Settings) -> Result<()> {
    let port = settings.port;
    let state = AppState::new(settings);
    state.uploads.ensure_root().await?;

    match state.store.ping().await {
        Ok(()) => tracing::info!("Database connected successfully"),
        Err(e) => tracing::error!("Database connection error: {}", e),
    }

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Listening at port {}", port);
    axum::serve(
        listener,
        build_routes(state.clone()).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    state.store.close().await;
    tracing::info!("Server closed. Database connection pool ended");
    Ok(())
}

/// Resolves on SIGTERM or ctrl+c. In-flight requests are drained without a deadline.
async fn shutdown_signal() {
    let interrupt = wait_for(tokio::signal::ctrl_c(), "SIGINT");

    #[cfg(unix)]
    let terminate = wait_for(
        async {
            use tokio::signal::unix::{signal, SignalKind};
            signal(SignalKind::terminate())?.recv().await;
            Ok::<(), std::io::Error>(())
        },
        "SIGTERM",
    );
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => tracing::info!("SIGINT received. Shutting down gracefully"),
        _ = terminate => tracing::info!("SIGTERM received. Shutting down gracefully"),
    }
}

/// Resolves once `signal` fires. A listener that could not be installed never
/// resolves, so it cannot start a shutdown on its own.
async fn wait_for<F>(signal: F, name: &str)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!("could not listen for {}: {}", name, e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use std::{io, time::Duration};

    use super::*;

    #[tokio::test]
    async fn delivered_signal_resolves() {
        let fired = tokio::time::timeout(
            Duration::from_millis(200),
            wait_for(async { Ok::<(), io::Error>(()) }, "SIGTERM"),
        )
        .await;
        assert!(fired.is_ok());
    }

    #[tokio::test]
    async fn failed_listener_never_triggers_shutdown() {
        let fired = tokio::time::timeout(
            Duration::from_millis(50),
            wait_for(
                async { Err::<(), _>(io::Error::other("no signal driver")) },
                "SIGINT",
            ),
        )
        .await;
        assert!(fired.is_err());
    }
}
