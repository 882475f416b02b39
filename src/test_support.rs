use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::types::Json;

use crate::core::time::primitive_now_utc;
use crate::db::models::{Answer, Exam, ExamAttempt, Question};
use crate::db::types::{DifficultyLevel, Language, QuestionCategory};
use crate::services::session::store::AttemptStore;

pub(crate) struct StoredExam {
    pub(crate) id: String,
    pub(crate) is_active: bool,
}

impl StoredExam {
    pub(crate) fn active(id: &str) -> Self {
        Self { id: id.to_string(), is_active: true }
    }

    pub(crate) fn inactive(id: &str) -> Self {
        Self { id: id.to_string(), is_active: false }
    }
}

/// In-memory `AttemptStore` with the same upsert and open-attempt semantics
/// as the Postgres binding. Attempt ids are deterministic (`attempt-1`,
/// `attempt-2`, ...) so tests can reference them directly.
pub(crate) struct MemoryStore {
    exams: Mutex<HashMap<String, Exam>>,
    questions: Mutex<HashMap<String, Vec<Question>>>,
    attempts: Mutex<HashMap<String, ExamAttempt>>,
    answers: Mutex<HashMap<String, HashMap<String, Answer>>>,
    next_attempt: AtomicU64,
    fail_upserts: AtomicBool,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            exams: Mutex::new(HashMap::new()),
            questions: Mutex::new(HashMap::new()),
            attempts: Mutex::new(HashMap::new()),
            answers: Mutex::new(HashMap::new()),
            next_attempt: AtomicU64::new(1),
            fail_upserts: AtomicBool::new(false),
        }
    }

    pub(crate) fn add_exam(&self, exam: StoredExam) {
        let now = primitive_now_utc();
        self.exams.lock().expect("exams lock").insert(
            exam.id.clone(),
            Exam {
                id: exam.id,
                title: "Test exam".to_string(),
                description: None,
                is_active: exam.is_active,
                created_by: "teacher-1".to_string(),
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub(crate) fn add_question(
        &self,
        exam_id: &str,
        id: &str,
        order: i32,
        correct_option: i32,
        timer_seconds: i32,
    ) {
        let question = Question {
            id: id.to_string(),
            exam_id: Some(exam_id.to_string()),
            question_text: format!("What is question {order}?"),
            options: Json(vec![
                "0".to_string(),
                "1".to_string(),
                "2".to_string(),
                "3".to_string(),
            ]),
            correct_option,
            timer_seconds,
            question_order: order,
            difficulty: DifficultyLevel::Easy,
            category: QuestionCategory::Arithmetic,
            question_type: "addition".to_string(),
            grade_level: None,
            language: Language::English,
            created_at: primitive_now_utc(),
        };
        self.questions
            .lock()
            .expect("questions lock")
            .entry(exam_id.to_string())
            .or_default()
            .push(question);
    }

    pub(crate) fn fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn attempt(&self, attempt_id: &str) -> Option<ExamAttempt> {
        self.attempts.lock().expect("attempts lock").get(attempt_id).cloned()
    }

    pub(crate) fn stored_answers(&self, attempt_id: &str) -> HashMap<String, Answer> {
        self.answers.lock().expect("answers lock").get(attempt_id).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl AttemptStore for MemoryStore {
    async fn get_active_exam(&self, exam_id: &str) -> anyhow::Result<Option<Exam>> {
        Ok(self
            .exams
            .lock()
            .expect("exams lock")
            .get(exam_id)
            .filter(|exam| exam.is_active)
            .cloned())
    }

    async fn get_questions(&self, exam_id: &str) -> anyhow::Result<Vec<Question>> {
        let mut questions = self
            .questions
            .lock()
            .expect("questions lock")
            .get(exam_id)
            .cloned()
            .unwrap_or_default();
        questions.sort_by_key(|question| question.question_order);
        Ok(questions)
    }

    async fn get_or_create_incomplete_attempt(
        &self,
        student_id: &str,
        exam_id: &str,
    ) -> anyhow::Result<ExamAttempt> {
        let mut attempts = self.attempts.lock().expect("attempts lock");
        if let Some(existing) = attempts.values().find(|attempt| {
            attempt.student_id == student_id
                && attempt.exam_id == exam_id
                && attempt.completed_at.is_none()
        }) {
            return Ok(existing.clone());
        }

        let id = format!("attempt-{}", self.next_attempt.fetch_add(1, Ordering::SeqCst));
        let attempt = ExamAttempt {
            id: id.clone(),
            exam_id: exam_id.to_string(),
            student_id: student_id.to_string(),
            started_at: primitive_now_utc(),
            completed_at: None,
            score: None,
            correct_answers: None,
            total_questions: None,
        };
        attempts.insert(id, attempt.clone());
        Ok(attempt)
    }

    async fn get_answers(&self, attempt_id: &str) -> anyhow::Result<Vec<Answer>> {
        Ok(self
            .answers
            .lock()
            .expect("answers lock")
            .get(attempt_id)
            .map(|answers| answers.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert_answer(
        &self,
        attempt_id: &str,
        question_id: &str,
        selected_option: i32,
        is_correct: bool,
    ) -> anyhow::Result<()> {
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(anyhow!("simulated upsert failure"));
        }

        self.answers.lock().expect("answers lock").entry(attempt_id.to_string()).or_default().insert(
            question_id.to_string(),
            Answer {
                attempt_id: attempt_id.to_string(),
                question_id: question_id.to_string(),
                selected_option,
                is_correct,
                answered_at: primitive_now_utc(),
            },
        );
        Ok(())
    }

    async fn complete_attempt(
        &self,
        attempt_id: &str,
        score: f64,
        correct_answers: i32,
        total_questions: i32,
    ) -> anyhow::Result<ExamAttempt> {
        let mut attempts = self.attempts.lock().expect("attempts lock");
        let attempt =
            attempts.get_mut(attempt_id).ok_or_else(|| anyhow!("attempt {attempt_id} not found"))?;
        attempt.completed_at = Some(primitive_now_utc());
        attempt.score = Some(score);
        attempt.correct_answers = Some(correct_answers);
        attempt.total_questions = Some(total_questions);
        Ok(attempt.clone())
    }
}
