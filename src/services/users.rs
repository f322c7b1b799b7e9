use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub external_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub created_at: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,
    #[error("sql error: {0}")]
    Sql(#[from] sqlx::Error),
}

/// Resolves the external identity to a user record, creating the user row
/// and its zeroed stats row in one transaction on first contact. A losing
/// race on the `external_id` unique constraint falls back to a plain read.
pub async fn get_or_create_user(
    pool: &SqlitePool,
    external_id: i64,
    username: Option<&str>,
    first_name: Option<&str>,
) -> Result<User, UserError> {
    if let Some(user) = fetch_by_external_id(pool, external_id).await? {
        return Ok(user);
    }

    match insert_user(pool, external_id, username, first_name).await {
        Ok(user) => Ok(user),
        Err(err) if is_unique_violation(&err) => {
            tracing::debug!(external_id, "lost get-or-create race, re-reading");
            fetch_by_external_id(pool, external_id)
                .await?
                .ok_or(UserError::NotFound)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn get_user_by_external_id(
    pool: &SqlitePool,
    external_id: i64,
) -> Result<User, UserError> {
    fetch_by_external_id(pool, external_id)
        .await?
        .ok_or(UserError::NotFound)
}

async fn insert_user(
    pool: &SqlitePool,
    external_id: i64,
    username: Option<&str>,
    first_name: Option<&str>,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO "users" ("id", "external_id", "username", "first_name", "created_at")
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(external_id)
    .bind(username)
    .bind(first_name)
    .bind(&created_at)
    .execute(&mut *tx)
    .await?;

    sqlx::query(r#"INSERT INTO "user_stats" ("user_id") VALUES (?)"#)
        .bind(&id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(external_id, user_id = %id, "user created");

    Ok(User {
        id,
        external_id,
        username: username.map(str::to_string),
        first_name: first_name.map(str::to_string),
        created_at,
    })
}

async fn fetch_by_external_id(
    pool: &SqlitePool,
    external_id: i64,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT "id", "external_id", "username", "first_name", "created_at"
        FROM "users"
        WHERE "external_id" = ?
        "#,
    )
    .bind(external_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| User {
        id: row.get("id"),
        external_id: row.get("external_id"),
        username: row.get("username"),
        first_name: row.get("first_name"),
        created_at: row.get("created_at"),
    }))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
