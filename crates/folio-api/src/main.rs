// Folio analytics API server
// Decision: Run on the in-memory store when no database is configured (dev mode)

use anyhow::{Context, Result};
use folio_api::{build_app, ServerConfig};
use folio_core::telemetry::{init_telemetry, TelemetryConfig};
use folio_core::AnalyticsStore;
use folio_storage::StorageBackend;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    init_telemetry(TelemetryConfig {
        service_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        ..TelemetryConfig::from_env()
    })?;

    let config = ServerConfig::from_env();

    let backend = if config.use_in_memory() {
        tracing::warn!("Dev mode: using in-memory store, data is lost on restart");
        StorageBackend::in_memory()
    } else {
        let url = config
            .database_url
            .as_deref()
            .context("DATABASE_URL is not set")?;
        tracing::info!("Connecting to PostgreSQL");
        StorageBackend::postgres(url)
            .await
            .context("Failed to connect to database")?
    };

    if config.run_migrations {
        backend.migrate().await.context("Failed to run migrations")?;
    }

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }
    if config.cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS origins configured");
    }

    let storage = backend.kind();
    let store: Arc<dyn AnalyticsStore> = Arc::new(backend);
    let app = build_app(store, storage, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!(storage, "HTTP server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
