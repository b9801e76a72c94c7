//! HTTP server for the game API.

pub mod api;

use std::net::SocketAddr;

pub use api::{AppState, create_router};

use crate::config::Config;

/// OABot game HTTP server.
pub struct GameServer {
    state: AppState,
}

impl GameServer {
    /// Create a new server.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { state: AppState::new(config) }
    }

    /// Serve until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run(self, addr: SocketAddr) -> anyhow::Result<()> {
        tracing::info!(
            sparql = %self.state.config.sparql_url,
            resolver = %self.state.config.resolver_url,
            log = %self.state.log.path().display(),
            "Starting OABot game server"
        );

        let router = create_router(self.state);
        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!("HTTP server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for GameServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameServer").field("log", &self.state.log.path()).finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
