//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for documents and stock queries under `/api/v1`
//! - The `X-User-Id` actor extractor
//! - JSON error rendering for repository errors

pub mod error;
pub mod extractors;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use stockflow_db::{DocumentRepository, StockRepository};
use stockflow_shared::InventoryConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use extractors::Actor;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DatabaseConnection,
    /// Stock ledger settings.
    pub inventory: InventoryConfig,
}

impl AppState {
    /// Creates the shared state.
    #[must_use]
    pub const fn new(db: DatabaseConnection, inventory: InventoryConfig) -> Self {
        Self { db, inventory }
    }

    /// Document orchestrator bound to this state's pool.
    #[must_use]
    pub fn documents(&self) -> DocumentRepository {
        DocumentRepository::new(self.db.clone(), self.inventory)
    }

    /// Stock ledger queries bound to this state's pool.
    #[must_use]
    pub fn stock(&self) -> StockRepository {
        StockRepository::new(self.db.clone())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
