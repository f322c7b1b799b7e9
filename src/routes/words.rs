use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::response::{json_ok, AppError};
use crate::services::users::{self, User};
use crate::services::vocabulary::{self, NewWordEntry, VocabularyItem};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WordCardResponse {
    entry: NewWordEntry,
    item: VocabularyItem,
    sound_url: Option<String>,
    image_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WordListResponse {
    words: Vec<VocabularyItem>,
    total: i64,
}

/// Looks a word up in the dictionary and saves the first meaning of the
/// first hit to the user's vocabulary. The user is resolved with
/// get-or-create semantics so a bare lookup also works as first contact.
pub async fn lookup_and_save(
    State(state): State<AppState>,
    Path(external_id): Path<i64>,
    Json(req): Json<LookupRequest>,
) -> Response {
    let query = req.query.trim();
    if query.is_empty() {
        return AppError::bad_request("query must not be empty").into_response();
    }

    let user = match users::get_or_create_user(state.pool(), external_id, None, None).await {
        Ok(user) => user,
        Err(err) => return AppError::from(err).into_response(),
    };

    let dictionary = state.dictionary();
    let results = match dictionary.search(query).await {
        Ok(results) => results,
        Err(err) => return AppError::from(err).into_response(),
    };

    let Some(hit) = results.first() else {
        return AppError::word_not_found("no dictionary entry for that word").into_response();
    };

    let Some((preview, entry)) = hit
        .meanings
        .iter()
        .find_map(|m| NewWordEntry::from_preview(&hit.text, m).map(|entry| (m, entry)))
    else {
        return AppError::word_not_found("dictionary entry has no translation").into_response();
    };

    // Examples live behind a second API call; losing them is not worth
    // failing the save over.
    let entry = match dictionary.fetch_meanings(&[preview.id]).await {
        Ok(meanings) => match meanings.first() {
            Some(meaning) => entry.with_examples(meaning),
            None => entry,
        },
        Err(err) => {
            tracing::debug!(error = %err, "meaning details unavailable, saving without examples");
            entry
        }
    };

    match vocabulary::add_word(state.pool(), &user.id, &entry).await {
        Ok(item) => json_ok(WordCardResponse {
            entry,
            item,
            sound_url: preview.sound_url.clone(),
            image_url: preview.image_url.clone(),
        }),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Path(external_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> Response {
    let user = match require_user(&state, external_id).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    let words = match vocabulary::list_words(state.pool(), &user.id, page.limit, page.offset).await
    {
        Ok(words) => words,
        Err(err) => return AppError::from(err).into_response(),
    };

    match vocabulary::count_words(state.pool(), &user.id).await {
        Ok(total) => json_ok(WordListResponse { words, total }),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn mark_mastered(
    State(state): State<AppState>,
    Path((external_id, word)): Path<(i64, String)>,
) -> Response {
    let user = match require_user(&state, external_id).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    match vocabulary::mark_mastered(state.pool(), &user.id, &word).await {
        Ok(()) => json_ok(serde_json::json!({ "word": word, "mastered": true })),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn review_queue(
    State(state): State<AppState>,
    Path(external_id): Path<i64>,
    Query(query): Query<ReviewQuery>,
) -> Response {
    let user = match require_user(&state, external_id).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    let limit = query.limit.unwrap_or(vocabulary::DEFAULT_PAGE_SIZE);
    match vocabulary::words_for_review(state.pool(), &user.id, limit).await {
        Ok(words) => json_ok(words),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn require_user(state: &AppState, external_id: i64) -> Result<User, AppError> {
    users::get_user_by_external_id(state.pool(), external_id)
        .await
        .map_err(AppError::from)
}
