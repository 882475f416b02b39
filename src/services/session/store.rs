use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::models::{Answer, Exam, ExamAttempt, Question};
use crate::repositories::{answers, attempts, exams, questions};

/// Persistence boundary for exam sessions. Session actors only ever touch the
/// database through this trait, so tests can swap in an in-memory store.
#[async_trait]
pub(crate) trait AttemptStore: Send + Sync + 'static {
    /// Returns the exam only when it exists and is currently active.
    async fn get_active_exam(&self, exam_id: &str) -> anyhow::Result<Option<Exam>>;

    /// Questions for the exam, ordered by their position.
    async fn get_questions(&self, exam_id: &str) -> anyhow::Result<Vec<Question>>;

    /// Reuses the student's open attempt on this exam, creating one if none
    /// exists. At most one open attempt per (student, exam) pair.
    async fn get_or_create_incomplete_attempt(
        &self,
        student_id: &str,
        exam_id: &str,
    ) -> anyhow::Result<ExamAttempt>;

    async fn get_answers(&self, attempt_id: &str) -> anyhow::Result<Vec<Answer>>;

    /// Records a selection, replacing any earlier answer to the same question.
    async fn upsert_answer(
        &self,
        attempt_id: &str,
        question_id: &str,
        selected_option: i32,
        is_correct: bool,
    ) -> anyhow::Result<()>;

    async fn complete_attempt(
        &self,
        attempt_id: &str,
        score: f64,
        correct_answers: i32,
        total_questions: i32,
    ) -> anyhow::Result<ExamAttempt>;
}

pub(crate) struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttemptStore for PgStore {
    async fn get_active_exam(&self, exam_id: &str) -> anyhow::Result<Option<Exam>> {
        Ok(exams::find_active_by_id(&self.pool, exam_id).await?)
    }

    async fn get_questions(&self, exam_id: &str) -> anyhow::Result<Vec<Question>> {
        Ok(questions::list_by_exam(&self.pool, exam_id).await?)
    }

    async fn get_or_create_incomplete_attempt(
        &self,
        student_id: &str,
        exam_id: &str,
    ) -> anyhow::Result<ExamAttempt> {
        Ok(attempts::get_or_create_incomplete(&self.pool, student_id, exam_id).await?)
    }

    async fn get_answers(&self, attempt_id: &str) -> anyhow::Result<Vec<Answer>> {
        Ok(answers::list_by_attempt(&self.pool, attempt_id).await?)
    }

    async fn upsert_answer(
        &self,
        attempt_id: &str,
        question_id: &str,
        selected_option: i32,
        is_correct: bool,
    ) -> anyhow::Result<()> {
        answers::upsert(&self.pool, attempt_id, question_id, selected_option, is_correct).await?;
        Ok(())
    }

    async fn complete_attempt(
        &self,
        attempt_id: &str,
        score: f64,
        correct_answers: i32,
        total_questions: i32,
    ) -> anyhow::Result<ExamAttempt> {
        Ok(attempts::complete(&self.pool, attempt_id, score, correct_answers, total_questions)
            .await?)
    }
}
