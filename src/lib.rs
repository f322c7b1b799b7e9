pub mod config;
pub mod db;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use std::sync::Arc;

use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::dictionary::DictionaryClient;
use crate::state::AppState;

/// Builds the router over an already-initialized pool. Used by the binary
/// and by integration tests.
pub fn create_app(pool: SqlitePool, dictionary: Arc<DictionaryClient>) -> axum::Router {
    let state = AppState::new(pool, dictionary);

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
