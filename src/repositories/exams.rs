use sqlx::PgPool;

use crate::db::models::Exam;

pub(crate) const COLUMNS: &str =
    "id, title, description, is_active, created_by, created_at, updated_at";

pub(crate) async fn find_active_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams WHERE id = $1 AND is_active = TRUE"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}
