use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::response::{json_ok, AppError};
use crate::services::users;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveUserRequest {
    pub external_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

/// First-contact entry point: idempotent under concurrent calls with the
/// same external id.
pub async fn resolve(
    State(state): State<AppState>,
    Json(req): Json<ResolveUserRequest>,
) -> Response {
    match users::get_or_create_user(
        state.pool(),
        req.external_id,
        req.username.as_deref(),
        req.first_name.as_deref(),
    )
    .await
    {
        Ok(user) => json_ok(user),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn get_by_external_id(
    State(state): State<AppState>,
    Path(external_id): Path<i64>,
) -> Response {
    match users::get_user_by_external_id(state.pool(), external_id).await {
        Ok(user) => json_ok(user),
        Err(err) => AppError::from(err).into_response(),
    }
}
