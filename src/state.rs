use std::sync::Arc;
use std::time::Instant;

use sqlx::SqlitePool;

use crate::services::dictionary::DictionaryClient;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    pool: SqlitePool,
    dictionary: Arc<DictionaryClient>,
}

impl AppState {
    pub fn new(pool: SqlitePool, dictionary: Arc<DictionaryClient>) -> Self {
        Self {
            started_at: Instant::now(),
            pool,
            dictionary,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn dictionary(&self) -> Arc<DictionaryClient> {
        Arc::clone(&self.dictionary)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
