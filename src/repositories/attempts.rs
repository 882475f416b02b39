use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::ExamAttempt;

pub(crate) const COLUMNS: &str = "\
    id, exam_id, student_id, started_at, completed_at, score, \
    correct_answers, total_questions";

pub(crate) async fn find_incomplete(
    pool: &PgPool,
    student_id: &str,
    exam_id: &str,
) -> Result<Option<ExamAttempt>, sqlx::Error> {
    sqlx::query_as::<_, ExamAttempt>(&format!(
        "SELECT {COLUMNS} FROM exam_attempts \
         WHERE student_id = $1 AND exam_id = $2 AND completed_at IS NULL"
    ))
    .bind(student_id)
    .bind(exam_id)
    .fetch_optional(pool)
    .await
}

/// At most one open attempt per (student, exam): the insert races against the
/// partial unique index and falls back to the surviving row on conflict.
pub(crate) async fn get_or_create_incomplete(
    pool: &PgPool,
    student_id: &str,
    exam_id: &str,
) -> Result<ExamAttempt, sqlx::Error> {
    if let Some(attempt) = find_incomplete(pool, student_id, exam_id).await? {
        return Ok(attempt);
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO exam_attempts (id, exam_id, student_id, started_at) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (student_id, exam_id) WHERE completed_at IS NULL DO NOTHING",
    )
    .bind(&id)
    .bind(exam_id)
    .bind(student_id)
    .bind(primitive_now_utc())
    .execute(pool)
    .await?;

    sqlx::query_as::<_, ExamAttempt>(&format!(
        "SELECT {COLUMNS} FROM exam_attempts \
         WHERE student_id = $1 AND exam_id = $2 AND completed_at IS NULL"
    ))
    .bind(student_id)
    .bind(exam_id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn complete(
    pool: &PgPool,
    id: &str,
    score: f64,
    correct_answers: i32,
    total_questions: i32,
) -> Result<ExamAttempt, sqlx::Error> {
    sqlx::query_as::<_, ExamAttempt>(&format!(
        "UPDATE exam_attempts \
         SET completed_at = $1, score = $2, correct_answers = $3, total_questions = $4 \
         WHERE id = $5 \
         RETURNING {COLUMNS}"
    ))
    .bind(primitive_now_utc())
    .bind(score)
    .bind(correct_answers)
    .bind(total_questions)
    .bind(id)
    .fetch_one(pool)
    .await
}
