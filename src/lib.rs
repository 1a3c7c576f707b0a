//! Corporate registry lookup service
//!
//! Loads the DART corp-code listing into an in-memory SQLite table and serves
//! read-only lookups over HTTP.
//!
//! # Startup
//!
//! ```text
//! storage ──► loader (once, failures logged) ──► router ──► listener
//! ```
//!
//! Nothing is served until the loader has finished, so handlers never
//! observe a half-loaded table.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use corp_registry::{build_router, AppState, CorporationService, Loader, SqliteCorporationStore};
//!
//! let store = Arc::new(SqliteCorporationStore::connect_in_memory(&config.store).await?);
//! Loader::new(store.clone()).load_at_startup(&config.source_path).await;
//! let app = build_router(AppState::new(CorporationService::new(store)), &config.static_dir);
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod server;
pub mod service;
pub mod store;

pub use config::{RegistryConfig, StoreConfig};
pub use error::{ApiError, LoadError, StoreError};
pub use loader::{LoadReport, Loader};
pub use models::Corporation;
pub use server::{build_router, AppState};
pub use service::CorporationService;
pub use store::{CorporationStore, SqliteCorporationStore};
