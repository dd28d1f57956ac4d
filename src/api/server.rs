use anyhow::{Context, Result};
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

use crate::infrastructure::config::ServerConfig;

/// Bind and serve until `shutdown` resolves
pub async fn serve<F>(config: &ServerConfig, router: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🚀 Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server terminated with an error")?;

    info!("Server stopped");
    Ok(())
}
