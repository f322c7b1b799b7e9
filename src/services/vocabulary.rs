use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A normalized dictionary lookup result, ready to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWordEntry {
    pub word: String,
    pub translation: String,
    pub transcription: Option<String>,
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub examples: Vec<Example>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub id: i64,
    pub word_id: String,
    pub word: String,
    pub translation: String,
    pub transcription: Option<String>,
    pub part_of_speech: Option<String>,
    pub examples: Vec<Example>,
    pub mastered: bool,
    pub added_at_ms: i64,
    pub last_reviewed_at_ms: Option<i64>,
    pub review_count: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("word not found in vocabulary")]
    NotFound,
    #[error("sql error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("stored examples are not valid json: {0}")]
    Examples(#[from] serde_json::Error),
}

/// Idempotent upsert keyed by (user, headword). The shared word row is
/// refreshed with the latest lookup; an existing vocabulary link keeps its
/// mastered flag, review count and added timestamp.
pub async fn add_word(
    pool: &SqlitePool,
    user_id: &str,
    entry: &NewWordEntry,
) -> Result<VocabularyItem, VocabularyError> {
    let examples_json = serde_json::to_string(&entry.examples)?;
    let now = Utc::now();
    let created_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let added_at_ms = now.timestamp_millis();
    let word_id = Uuid::new_v4().to_string();

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO "words" ("id", "word", "translation", "transcription", "part_of_speech", "examples", "created_at")
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT ("word") DO UPDATE SET
            "translation" = excluded."translation",
            "transcription" = excluded."transcription",
            "part_of_speech" = excluded."part_of_speech",
            "examples" = excluded."examples"
        "#,
    )
    .bind(&word_id)
    .bind(&entry.word)
    .bind(&entry.translation)
    .bind(&entry.transcription)
    .bind(&entry.part_of_speech)
    .bind(&examples_json)
    .bind(&created_at)
    .execute(&mut *tx)
    .await?;

    let word_id: String = sqlx::query_scalar(r#"SELECT "id" FROM "words" WHERE "word" = ?"#)
        .bind(&entry.word)
        .fetch_one(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO "user_words" ("user_id", "word_id", "added_at_ms")
        VALUES (?, ?, ?)
        ON CONFLICT ("user_id", "word_id") DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(&word_id)
    .bind(added_at_ms)
    .execute(&mut *tx)
    .await?;

    let row = sqlx::query(&format!("{ITEM_SELECT} WHERE uw.\"user_id\" = ? AND uw.\"word_id\" = ?"))
        .bind(user_id)
        .bind(&word_id)
        .fetch_one(&mut *tx)
        .await?;
    let item = item_from_row(&row)?;

    tx.commit().await?;

    tracing::info!(user_id, word = %entry.word, "word added to vocabulary");
    Ok(item)
}

/// Most-recently-added first. Empty vocabularies return an empty page.
pub async fn list_words(
    pool: &SqlitePool,
    user_id: &str,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<VocabularyItem>, VocabularyError> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);

    let rows = sqlx::query(&format!(
        "{ITEM_SELECT} WHERE uw.\"user_id\" = ? ORDER BY uw.\"added_at_ms\" DESC, uw.\"id\" DESC LIMIT ? OFFSET ?"
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(item_from_row).collect()
}

pub async fn count_words(pool: &SqlitePool, user_id: &str) -> Result<i64, VocabularyError> {
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "user_words" WHERE "user_id" = ?"#)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn mark_mastered(
    pool: &SqlitePool,
    user_id: &str,
    word_text: &str,
) -> Result<(), VocabularyError> {
    let now_ms = Utc::now().timestamp_millis();

    let result = sqlx::query(
        r#"
        UPDATE "user_words"
        SET "mastered" = 1,
            "last_reviewed_at_ms" = ?,
            "review_count" = "review_count" + 1
        WHERE "user_id" = ?
          AND "word_id" IN (SELECT "id" FROM "words" WHERE "word" = ?)
        "#,
    )
    .bind(now_ms)
    .bind(user_id)
    .bind(word_text)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(VocabularyError::NotFound);
    }
    Ok(())
}

/// FIFO review queue: unmastered words, oldest-added first.
pub async fn words_for_review(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<VocabularyItem>, VocabularyError> {
    let limit = limit.clamp(1, MAX_PAGE_SIZE);

    let rows = sqlx::query(&format!(
        "{ITEM_SELECT} WHERE uw.\"user_id\" = ? AND uw.\"mastered\" = 0 ORDER BY uw.\"added_at_ms\" ASC, uw.\"id\" ASC LIMIT ?"
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter().map(item_from_row).collect()
}

const ITEM_SELECT: &str = r#"
    SELECT uw."id", uw."word_id", w."word", w."translation", w."transcription",
           w."part_of_speech", w."examples", uw."mastered", uw."added_at_ms",
           uw."last_reviewed_at_ms", uw."review_count"
    FROM "user_words" uw
    JOIN "words" w ON uw."word_id" = w."id"
"#;

fn item_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<VocabularyItem, VocabularyError> {
    let examples: Option<String> = row.get("examples");
    let examples = match examples.as_deref() {
        Some(json) if !json.is_empty() => serde_json::from_str(json)?,
        _ => Vec::new(),
    };

    Ok(VocabularyItem {
        id: row.get("id"),
        word_id: row.get("word_id"),
        word: row.get("word"),
        translation: row.get("translation"),
        transcription: row.get("transcription"),
        part_of_speech: row.get("part_of_speech"),
        examples,
        mastered: row.get::<i64, _>("mastered") != 0,
        added_at_ms: row.get("added_at_ms"),
        last_reviewed_at_ms: row.get("last_reviewed_at_ms"),
        review_count: row.get("review_count"),
    })
}
