//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, DocumentStore, MemoryStore, PgDocumentStore};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let store: Arc<dyn DocumentStore> = if args.in_memory {
        tracing::warn!("Using the in-memory store; data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let db = Database::connect(&config).await?;
        tracing::info!("Database connected");
        Arc::new(PgDocumentStore::new(db.get_connection()))
    };

    let app = create_router(AppState::from_store(store));

    // Start server
    let host = args.host.unwrap_or_else(|| config.server_host.clone());
    let port = args.port.unwrap_or(config.server_port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
