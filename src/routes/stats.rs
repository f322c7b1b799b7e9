use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use crate::response::{json_ok, AppError};
use crate::routes::words::require_user;
use crate::services::stats;
use crate::state::AppState;

pub async fn get(State(state): State<AppState>, Path(external_id): Path<i64>) -> Response {
    let user = match require_user(&state, external_id).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    match stats::get_stats(state.pool(), &user.id).await {
        Ok(stats) => json_ok(stats),
        Err(err) => AppError::from(err).into_response(),
    }
}
