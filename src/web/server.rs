//! Web server for Filedrop.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::service::{FileStore, NamePolicy};
use crate::storage::LocalStorage;
use crate::{FiledropError, Result};

use super::handlers::AppState;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
    /// Request body cap in bytes.
    max_request_size: Option<usize>,
}

impl WebServer {
    /// Create a new web server around an existing file store.
    pub fn new(addr: SocketAddr, store: FileStore) -> Self {
        Self {
            addr,
            app_state: Arc::new(AppState::new(store)),
            cors_origins: vec![],
            max_request_size: None,
        }
    }

    /// Build the server from a validated configuration, backed by the local
    /// filesystem.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let port = config
            .server
            .port
            .ok_or_else(|| FiledropError::Config("port is not set".to_string()))?;
        let addr: SocketAddr = format!("{}:{}", config.server.host, port)
            .parse()
            .map_err(|e| {
                FiledropError::Config(format!(
                    "invalid server address {}:{}: {e}",
                    config.server.host, port
                ))
            })?;

        let upload_dir = config
            .storage
            .upload_dir
            .as_deref()
            .ok_or_else(|| FiledropError::Config("upload directory is not set".to_string()))?;

        let store = FileStore::new(Arc::new(LocalStorage::new(upload_dir)))
            .with_name_policy(NamePolicy::from_config(
                config.storage.allow_path_separators,
            ))
            .with_max_files(config.storage.max_files_per_upload);

        let max_request_size = config
            .server
            .max_request_size_mb
            .map(request_size_bytes)
            .transpose()?;

        Ok(Self::new(addr, store)
            .with_cors_origins(config.server.cors_origins.clone())
            .with_max_request_size(max_request_size))
    }

    /// Set the CORS allowed origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Set the request body cap in bytes. `None` removes the cap.
    pub fn with_max_request_size(mut self, max_request_size: Option<usize>) -> Self {
        self.max_request_size = max_request_size;
        self
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Create the storage directory and bind the listener.
    async fn prepare(self) -> Result<(TcpListener, Router)> {
        self.app_state.store.init().await?;
        tracing::info!(
            policy = ?self.app_state.store.name_policy(),
            max_files = self.app_state.store.max_files(),
            "Storage ready"
        );

        let router = create_router(
            self.app_state,
            &self.cors_origins,
            self.max_request_size,
        );

        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Server is running on http://{}", listener.local_addr()?);

        Ok((listener, router))
    }

    /// Run the web server until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<()> {
        let (listener, router) = self.prepare().await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, router) = self.prepare().await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

/// Convert the configured request cap from MiB to bytes.
fn request_size_bytes(mb: u64) -> Result<usize> {
    mb.checked_mul(1024 * 1024)
        .and_then(|bytes| usize::try_from(bytes).ok())
        .ok_or_else(|| {
            FiledropError::Config(format!("server.max_request_size_mb is too large: {mb}"))
        })
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
