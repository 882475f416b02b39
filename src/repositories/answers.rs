use sqlx::PgPool;

use crate::core::time::primitive_now_utc;
use crate::db::models::Answer;

pub(crate) const COLUMNS: &str =
    "attempt_id, question_id, selected_option, is_correct, answered_at";

pub(crate) async fn list_by_attempt(
    pool: &PgPool,
    attempt_id: &str,
) -> Result<Vec<Answer>, sqlx::Error> {
    sqlx::query_as::<_, Answer>(&format!(
        "SELECT {COLUMNS} FROM answers WHERE attempt_id = $1"
    ))
    .bind(attempt_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn upsert(
    pool: &PgPool,
    attempt_id: &str,
    question_id: &str,
    selected_option: i32,
    is_correct: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO answers (attempt_id, question_id, selected_option, is_correct, answered_at) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (attempt_id, question_id) DO UPDATE \
         SET selected_option = EXCLUDED.selected_option, \
             is_correct = EXCLUDED.is_correct, \
             answered_at = EXCLUDED.answered_at",
    )
    .bind(attempt_id)
    .bind(question_id)
    .bind(selected_option)
    .bind(is_correct)
    .bind(primitive_now_utc())
    .execute(pool)
    .await?;
    Ok(())
}
