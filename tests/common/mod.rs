#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use lingua_backend::services::dictionary::DictionaryClient;

/// A private in-memory database. Single connection: every pool connection
/// to `sqlite::memory:` would otherwise get its own empty database.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    lingua_backend::db::run_migrations(&pool)
        .await
        .expect("failed to apply schema");

    pool
}

/// Dictionary client pointed at a port nothing listens on, so lookup
/// routes exercise the upstream-unavailable path quickly.
pub fn unreachable_dictionary() -> Arc<DictionaryClient> {
    Arc::new(
        DictionaryClient::new("http://127.0.0.1:1", Duration::from_millis(200))
            .expect("failed to build dictionary client"),
    )
}

pub async fn create_test_app() -> Router {
    let pool = create_test_pool().await;
    lingua_backend::create_app(pool, unreachable_dictionary())
}

pub async fn create_test_app_with_pool(pool: SqlitePool) -> Router {
    lingua_backend::create_app(pool, unreachable_dictionary())
}
