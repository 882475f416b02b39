use sqlx::PgPool;

use crate::db::models::Question;

pub(crate) const COLUMNS: &str = "\
    id, exam_id, question_text, options, correct_option, timer_seconds, \
    question_order, difficulty, category, question_type, grade_level, \
    language, created_at";

pub(crate) async fn list_by_exam(
    pool: &PgPool,
    exam_id: &str,
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {COLUMNS} FROM questions WHERE exam_id = $1 ORDER BY question_order"
    ))
    .bind(exam_id)
    .fetch_all(pool)
    .await
}
