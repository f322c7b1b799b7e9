use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::response::{json_ok, AppError};
use crate::routes::words::require_user;
use crate::services::{quiz, stats};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    /// The index returned with the question, round-tripped unchanged.
    pub correct_index: usize,
    pub chosen_index: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerResponse {
    correct: bool,
    stats: stats::UserStats,
}

pub async fn question(State(state): State<AppState>, Path(external_id): Path<i64>) -> Response {
    let user = match require_user(&state, external_id).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    match quiz::build_question(state.pool(), &user.id).await {
        Ok(question) => json_ok(question),
        Err(err) => AppError::from(err).into_response(),
    }
}

/// Scores the answer and counts it. No question state is kept server-side,
/// so abandoned or concurrent quizzes cannot interfere with each other.
pub async fn answer(
    State(state): State<AppState>,
    Path(external_id): Path<i64>,
    Json(req): Json<AnswerRequest>,
) -> Response {
    let user = match require_user(&state, external_id).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    let correct = quiz::score_answer(req.correct_index, req.chosen_index);

    if let Err(err) = stats::record_answer(state.pool(), &user.id, correct).await {
        return AppError::from(err).into_response();
    }

    match stats::get_stats(state.pool(), &user.id).await {
        Ok(stats) => json_ok(AnswerResponse { correct, stats }),
        Err(err) => AppError::from(err).into_response(),
    }
}
