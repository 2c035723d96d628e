//! ServerBuilder for fluent API to build HTTP servers

use super::router::build_routes;
use super::state::AppState;
use crate::config::{AppConfig, LogConfig};
use crate::core::{AdminGate, RecordStore};
use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the invoice verification server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryRecordStore::new())
///     .with_admin_key("s3cr3t")
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn RecordStore>>,
    admin_key: Option<String>,
    log_limits: LogConfig,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            admin_key: None,
            log_limits: LogConfig::default(),
        }
    }

    /// Set the record store (required)
    pub fn with_store(self, store: impl RecordStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    /// Set a record store that is also held elsewhere
    pub fn with_shared_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the admin secret (required)
    pub fn with_admin_key(mut self, key: impl Into<String>) -> Self {
        self.admin_key = Some(key.into());
        self
    }

    /// Set the verification-log listing bounds
    pub fn with_log_limits(mut self, log_limits: LogConfig) -> Self {
        self.log_limits = log_limits;
        self
    }

    /// Take the admin secret and log bounds from a loaded configuration
    pub fn with_config(self, config: &AppConfig) -> Self {
        self.with_admin_key(config.admin.key.clone())
            .with_log_limits(config.logs)
    }

    /// Build the application state
    pub fn build_state(self) -> Result<AppState> {
        let store = self
            .store
            .ok_or_else(|| anyhow::anyhow!("RecordStore is required. Call .with_store()"))?;

        let admin_key = self
            .admin_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("A non-empty admin key is required. Call .with_admin_key()")
            })?;

        if self.log_limits.default_limit == 0
            || self.log_limits.default_limit > self.log_limits.max_limit
        {
            anyhow::bail!(
                "Invalid log limits: default {} must be within 1..={}",
                self.log_limits.default_limit,
                self.log_limits.max_limit
            );
        }

        Ok(AppState {
            store,
            admin: AdminGate::new(admin_key),
            log_limits: self.log_limits,
        })
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        Ok(build_routes(self.build_state()?))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests, exposing the peer address to handlers
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_store(store)
    ///     .with_config(&config)
    ///     .serve(&config.server.bind_address()).await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
