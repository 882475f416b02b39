use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{DifficultyLevel, Language, QuestionCategory};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Exam {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) created_by: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Immutable once created; `options` always holds exactly four distinct strings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Question {
    pub(crate) id: String,
    pub(crate) exam_id: Option<String>,
    pub(crate) question_text: String,
    pub(crate) options: Json<Vec<String>>,
    pub(crate) correct_option: i32,
    pub(crate) timer_seconds: i32,
    pub(crate) question_order: i32,
    pub(crate) difficulty: DifficultyLevel,
    pub(crate) category: QuestionCategory,
    pub(crate) question_type: String,
    pub(crate) grade_level: Option<i32>,
    pub(crate) language: Language,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ExamAttempt {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) student_id: String,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) completed_at: Option<PrimitiveDateTime>,
    pub(crate) score: Option<f64>,
    pub(crate) correct_answers: Option<i32>,
    pub(crate) total_questions: Option<i32>,
}

impl ExamAttempt {
    pub(crate) fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// One per (attempt, question); the latest selection supersedes prior ones.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Answer {
    pub(crate) attempt_id: String,
    pub(crate) question_id: String,
    pub(crate) selected_option: i32,
    pub(crate) is_correct: bool,
    pub(crate) answered_at: PrimitiveDateTime,
}
