//! HTTP surface of the relay.
//!
//! An axum router with permissive CORS (the caller is a browser extension on
//! arbitrary origins) and request tracing.

mod handlers;
mod routes;

pub use routes::{create_router, AppState};

use crate::config::Config;
use crate::error::Result;
use crate::relay::Relay;
use tokio::net::TcpListener;

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &Config, relay: Relay) -> Result<()> {
    let listener = TcpListener::bind(config.server.bind_addr()).await?;
    serve_on(listener, config, relay).await
}

/// Serve on an already bound listener until Ctrl-C.
pub async fn serve_on(listener: TcpListener, config: &Config, relay: Relay) -> Result<()> {
    let router = create_router(relay, config.server.body_limit_bytes());
    let addr = listener.local_addr()?;
    tracing::info!("Lookout relay listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Lookout relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown requested, draining in-flight requests"),
        Err(e) => tracing::error!("Failed to listen for Ctrl-C: {e}"),
    }
}
