use std::sync::Arc;

use tokio::net::TcpListener;

use hll_ledger::{HashLinkedLog, LogService};
use hll_store::FileLineStore;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// HLL HTTP server over a single shared chain.
pub struct HllServer {
    config: ServerConfig,
    log: Arc<dyn LogService>,
}

impl HllServer {
    /// Open the configured line file and build the log over it.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let store = FileLineStore::open(&config.log_path, config.sync)?;
        let log = HashLinkedLog::new(store, config.log.clone());
        Ok(Self::with_log(config, Arc::new(log)))
    }

    /// Serve an already constructed log.
    pub fn with_log(config: ServerConfig, log: Arc<dyn LogService>) -> Self {
        Self { config, log }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.log))
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            log = %self.config.log_path.display(),
            difficulty = %self.config.log.difficulty,
            "HLL server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
