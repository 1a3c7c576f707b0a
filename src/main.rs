//! corp-registry server
//!
//! Reads config from env vars (or `.env`):
//!   CORP_REGISTRY_BIND_ADDR  — listen address (default: 0.0.0.0:8080)
//!   CORP_REGISTRY_SOURCE     — corp-code listing (default: corp.xml)
//!   CORP_REGISTRY_STATIC_DIR — landing page directory (default: static)
//!   CORP_REGISTRY_POOL_SIZE  — SQLite pool size (default: 4)

use std::sync::Arc;

use anyhow::Context;
use corp_registry::{
    build_router, AppState, CorporationService, Loader, RegistryConfig, SqliteCorporationStore,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,corp_registry=debug,tower_http=info".into()),
        )
        .init();

    let config = RegistryConfig::from_env();
    tracing::info!(?config, "Starting corp-registry");

    // Phase 1: storage
    let store = Arc::new(
        SqliteCorporationStore::connect_in_memory(&config.store)
            .await
            .context("failed to open in-memory store")?,
    );

    // Phase 2: load once, failures are logged and ignored
    Loader::new(store.clone())
        .load_at_startup(&config.source_path)
        .await;

    // Phase 3: serve
    let state = AppState::new(CorporationService::new(store));
    let app = build_router(state, &config.static_dir);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("corp-registry listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
