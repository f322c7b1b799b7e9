use serde::Serialize;
use sqlx::{Row, SqlitePool};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_words: i64,
    pub mastered_words: i64,
    pub correct_answers: i64,
    pub wrong_answers: i64,
    /// Percentage of correct answers over all recorded answers, one
    /// decimal place, 0.0 when nothing has been answered yet.
    pub accuracy: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("sql error: {0}")]
    Sql(#[from] sqlx::Error),
}

pub async fn get_stats(pool: &SqlitePool, user_id: &str) -> Result<UserStats, StatsError> {
    let word_counts = sqlx::query(
        r#"
        SELECT COUNT(*) AS "total",
               COALESCE(SUM(CASE WHEN "mastered" != 0 THEN 1 ELSE 0 END), 0) AS "mastered"
        FROM "user_words"
        WHERE "user_id" = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let answer_counts = sqlx::query(
        r#"SELECT "correct_answers", "wrong_answers" FROM "user_stats" WHERE "user_id" = ?"#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let (correct, wrong) = match answer_counts {
        Some(row) => (row.get("correct_answers"), row.get("wrong_answers")),
        None => (0, 0),
    };

    Ok(UserStats {
        total_words: word_counts.get("total"),
        mastered_words: word_counts.get("mastered"),
        correct_answers: correct,
        wrong_answers: wrong,
        accuracy: accuracy_percent(correct, wrong),
    })
}

/// Counts one quiz answer. The increment happens inside the statement so
/// two answers racing each other are both counted; the stats row is
/// created lazily if the user predates it.
pub async fn record_answer(
    pool: &SqlitePool,
    user_id: &str,
    correct: bool,
) -> Result<(), StatsError> {
    let sql = if correct {
        r#"
        INSERT INTO "user_stats" ("user_id", "correct_answers", "wrong_answers")
        VALUES (?, 1, 0)
        ON CONFLICT ("user_id") DO UPDATE SET "correct_answers" = "correct_answers" + 1
        "#
    } else {
        r#"
        INSERT INTO "user_stats" ("user_id", "correct_answers", "wrong_answers")
        VALUES (?, 0, 1)
        ON CONFLICT ("user_id") DO UPDATE SET "wrong_answers" = "wrong_answers" + 1
        "#
    };

    sqlx::query(sql).bind(user_id).execute(pool).await?;
    Ok(())
}

pub fn accuracy_percent(correct: i64, wrong: i64) -> f64 {
    let total = correct + wrong;
    if total == 0 {
        return 0.0;
    }
    let raw = correct as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_zero_answers_is_zero() {
        assert_eq!(accuracy_percent(0, 0), 0.0);
    }

    #[test]
    fn accuracy_rounds_to_one_decimal() {
        assert_eq!(accuracy_percent(1, 1), 50.0);
        assert_eq!(accuracy_percent(1, 2), 33.3);
        assert_eq!(accuracy_percent(2, 1), 66.7);
        assert_eq!(accuracy_percent(5, 0), 100.0);
    }
}
