/// Public library interface for the habit tracker API server
///
/// This module exports the server implementation and the public types
/// used by the binary and by tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

pub mod config;
pub mod domain;
pub mod http;
pub mod provider;
pub mod service;
pub mod storage;

pub use config::Args;
pub use domain::*;
pub use http::AppState;
pub use provider::{ChatTurn, GeminiClient, ProviderError, Role, TextGenerator};
pub use service::{HabitWithLogs, ServiceError};
pub use storage::{HabitStore, SqliteStore, StorageError};

/// Errors that can occur during server startup and operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Provider client error: {0}")]
    Provider(#[from] provider::ProviderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The habit tracker HTTP server
///
/// Owns the shared application state and serves the JSON API until
/// shutdown.
pub struct HabitApiServer {
    state: Arc<AppState>,
    listen: SocketAddr,
    cors_allowed_origins: Vec<String>,
}

impl HabitApiServer {
    /// Build a server from parsed configuration and a database path
    ///
    /// Initializes the SQLite schema if needed and, when an API key is
    /// configured, the provider client with an explicit call timeout.
    pub fn from_config(args: &Args, db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing habit tracker with database: {:?}", db_path);

        let store = SqliteStore::new(db_path)?;

        let generator: Option<Arc<dyn TextGenerator>> = match &args.gemini_api_key {
            Some(key) => {
                let client = GeminiClient::new(
                    key.clone(),
                    args.gemini_model.clone(),
                    Duration::from_secs(args.provider_timeout_secs),
                )?;
                tracing::info!("AI suggestions enabled (model: {})", args.gemini_model);
                Some(Arc::new(client))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not set; AI endpoints are disabled");
                None
            }
        };

        Ok(Self {
            state: Arc::new(AppState::new(store, generator)),
            listen: args.listen,
            cors_allowed_origins: args.cors_allowed_origins.clone(),
        })
    }

    /// Serve the HTTP API until ctrl-c
    pub async fn run(self) -> Result<(), ServerError> {
        let app = http::router(self.state, &self.cors_allowed_origins);

        let listener = tokio::net::TcpListener::bind(self.listen).await?;
        tracing::info!("Listening on {}", self.listen);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    /// Get a reference to the shared state (useful for testing)
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install ctrl-c handler: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
