mod health;
mod quiz;
mod stats;
mod users;
mod words;

use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;

use crate::response::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/users/resolve", post(users::resolve))
        .route("/api/users/:external_id", get(users::get_by_external_id))
        .route("/api/users/:external_id/stats", get(stats::get))
        .route(
            "/api/users/:external_id/words",
            get(words::list).post(words::lookup_and_save),
        )
        .route(
            "/api/users/:external_id/words/:word/mastered",
            post(words::mark_mastered),
        )
        .route("/api/users/:external_id/review", get(words::review_queue))
        .route("/api/users/:external_id/quiz", get(quiz::question))
        .route("/api/users/:external_id/quiz/answer", post(quiz::answer))
        .nest("/health", health::router())
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> impl IntoResponse {
    AppError::not_found("route not found")
}
