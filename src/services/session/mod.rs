pub(crate) mod registry;
pub(crate) mod store;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tokio::time::{sleep_until, Duration, Instant};

use crate::db::models::Question;
use crate::db::types::{DifficultyLevel, QuestionCategory};
use crate::services::session::store::AttemptStore;

const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("exam is not available")]
    ExamUnavailable,
    #[error("exam has no questions")]
    NoQuestions,
    #[error("{missing} question(s) remaining")]
    IncompleteAnswers { missing: usize },
    #[error("question index {index} out of range")]
    QuestionOutOfRange { index: usize },
    #[error("option {option} out of range")]
    InvalidOption { option: i32 },
    #[error("attempt already submitted")]
    AlreadySubmitted,
    #[error("session is no longer running")]
    SessionClosed,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Student-facing view of a question. The correct option never leaves the
/// actor.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct QuestionView {
    pub(crate) id: String,
    pub(crate) question_text: String,
    pub(crate) options: Vec<String>,
    pub(crate) timer_seconds: i32,
    pub(crate) question_order: i32,
    pub(crate) difficulty: DifficultyLevel,
    pub(crate) category: QuestionCategory,
}

impl QuestionView {
    fn from_question(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            question_text: question.question_text.clone(),
            options: question.options.0.clone(),
            timer_seconds: question.timer_seconds,
            question_order: question.question_order,
            difficulty: question.difficulty,
            category: question.category,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SessionSnapshot {
    pub(crate) attempt_id: String,
    pub(crate) exam_id: String,
    pub(crate) current_index: usize,
    pub(crate) total_questions: usize,
    pub(crate) question: QuestionView,
    pub(crate) remaining_seconds: u64,
    pub(crate) answers: HashMap<String, i32>,
    pub(crate) answered_count: usize,
    pub(crate) timer_expired: bool,
    pub(crate) submitted: bool,
    pub(crate) submit_blocked: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SubmissionSummary {
    pub(crate) attempt_id: String,
    pub(crate) score: f64,
    pub(crate) correct_answers: i32,
    pub(crate) total_questions: i32,
    pub(crate) completed_at: String,
}

enum Command {
    Snapshot { reply: oneshot::Sender<SessionSnapshot> },
    Select { option: i32, reply: oneshot::Sender<Result<SessionSnapshot, SessionError>> },
    Next { reply: oneshot::Sender<Result<SessionSnapshot, SessionError>> },
    Previous { reply: oneshot::Sender<SessionSnapshot> },
    JumpTo { index: usize, reply: oneshot::Sender<Result<SessionSnapshot, SessionError>> },
    Submit { reply: oneshot::Sender<Result<SubmissionSummary, SessionError>> },
}

/// Cheaply cloneable handle to a running session actor. All mutation happens
/// inside the actor task, one command at a time.
#[derive(Clone, Debug)]
pub(crate) struct SessionHandle {
    tx: mpsc::Sender<Command>,
    student_id: String,
}

impl SessionHandle {
    /// Loads the exam, reuses or creates the student's open attempt and spawns
    /// the session actor. Resuming always rewinds to the first question with a
    /// fresh timer; previously stored answers are carried over.
    pub(crate) async fn start(
        store: Arc<dyn AttemptStore>,
        student_id: &str,
        exam_id: &str,
    ) -> Result<(Self, SessionSnapshot), SessionError> {
        let exam = store
            .get_active_exam(exam_id)
            .await?
            .ok_or(SessionError::ExamUnavailable)?;
        let questions = store.get_questions(&exam.id).await?;
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        let attempt = store.get_or_create_incomplete_attempt(student_id, exam_id).await?;

        let mut answers = HashMap::new();
        for answer in store.get_answers(&attempt.id).await? {
            if questions.iter().any(|question| question.id == answer.question_id) {
                answers.insert(answer.question_id, answer.selected_option);
            }
        }

        let mut session = ExamSession {
            store,
            attempt_id: attempt.id,
            exam_id: exam.id,
            questions,
            answers,
            current_index: 0,
            deadline: None,
            timer_expired: false,
            submitted: false,
            submit_blocked: None,
            writes: JoinSet::new(),
        };
        session.goto(0);
        let snapshot = session.snapshot();

        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(session.run(rx));

        Ok((Self { tx, student_id: student_id.to_string() }, snapshot))
    }

    /// Owner of the attempt this session runs.
    pub(crate) fn student_id(&self) -> &str {
        &self.student_id
    }

    #[cfg(test)]
    pub(crate) fn stub(student_id: &str) -> Self {
        let (tx, _rx) = mpsc::channel(COMMAND_BUFFER);
        Self { tx, student_id: student_id.to_string() }
    }

    pub(crate) async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| SessionError::SessionClosed)?;
        rx.await.map_err(|_| SessionError::SessionClosed)
    }

    pub(crate) async fn select(&self, option: i32) -> Result<SessionSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Select { option, reply })
            .await
            .map_err(|_| SessionError::SessionClosed)?;
        rx.await.map_err(|_| SessionError::SessionClosed)?
    }

    pub(crate) async fn next(&self) -> Result<SessionSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Next { reply })
            .await
            .map_err(|_| SessionError::SessionClosed)?;
        rx.await.map_err(|_| SessionError::SessionClosed)?
    }

    pub(crate) async fn previous(&self) -> Result<SessionSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Previous { reply })
            .await
            .map_err(|_| SessionError::SessionClosed)?;
        rx.await.map_err(|_| SessionError::SessionClosed)
    }

    pub(crate) async fn jump_to(&self, index: usize) -> Result<SessionSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::JumpTo { index, reply })
            .await
            .map_err(|_| SessionError::SessionClosed)?;
        rx.await.map_err(|_| SessionError::SessionClosed)?
    }

    pub(crate) async fn submit(&self) -> Result<SubmissionSummary, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Submit { reply })
            .await
            .map_err(|_| SessionError::SessionClosed)?;
        rx.await.map_err(|_| SessionError::SessionClosed)?
    }
}

struct ExamSession {
    store: Arc<dyn AttemptStore>,
    attempt_id: String,
    exam_id: String,
    questions: Vec<Question>,
    answers: HashMap<String, i32>,
    current_index: usize,
    deadline: Option<Instant>,
    timer_expired: bool,
    submitted: bool,
    submit_blocked: Option<String>,
    writes: JoinSet<anyhow::Result<()>>,
}

impl ExamSession {
    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        loop {
            let deadline = self.deadline;
            tokio::select! {
                // An elapsed deadline takes priority over commands queued
                // behind it.
                biased;
                // The fallback instant is never polled: the branch is disabled
                // while no timer is armed.
                _ = sleep_until(deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(86_400))),
                    if deadline.is_some() =>
                {
                    self.handle_expiry().await;
                }
                maybe_command = rx.recv() => match maybe_command {
                    Some(command) => self.handle_command(command).await,
                    // Every handle dropped: the session was abandoned.
                    None => break,
                },
                Some(result) = self.writes.join_next(), if !self.writes.is_empty() => {
                    log_write_result(&self.attempt_id, result);
                }
            }
        }
        // Dropping the JoinSet aborts answer writes still in flight.
        tracing::debug!(attempt_id = %self.attempt_id, "Session actor stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        // A deadline that lapsed while the command sat in the queue is
        // honored before the command itself.
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            self.handle_expiry().await;
        }

        match command {
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            Command::Select { option, reply } => {
                let _ = reply.send(self.select(option));
            }
            Command::Next { reply } => {
                let result = if self.submitted {
                    Ok(self.snapshot())
                } else if self.current_index + 1 < self.questions.len() {
                    self.goto(self.current_index + 1);
                    Ok(self.snapshot())
                } else {
                    // Advancing past the last question submits the attempt.
                    self.try_submit().await.map(|_| self.snapshot())
                };
                let _ = reply.send(result);
            }
            Command::Previous { reply } => {
                if !self.submitted && self.current_index > 0 {
                    self.goto(self.current_index - 1);
                }
                let _ = reply.send(self.snapshot());
            }
            Command::JumpTo { index, reply } => {
                let result = if index >= self.questions.len() {
                    Err(SessionError::QuestionOutOfRange { index })
                } else {
                    if !self.submitted {
                        self.goto(index);
                    }
                    Ok(self.snapshot())
                };
                let _ = reply.send(result);
            }
            Command::Submit { reply } => {
                let _ = reply.send(self.try_submit().await);
            }
        }
    }

    /// Moves to a question and restarts its countdown from the full duration.
    fn goto(&mut self, index: usize) {
        self.current_index = index;
        self.timer_expired = false;
        self.submit_blocked = None;
        let timer = self.questions[index].timer_seconds.max(0) as u64;
        self.deadline = Some(Instant::now() + Duration::from_secs(timer));
    }

    /// Selections after expiry or submission are dropped without error; the
    /// snapshot tells the caller nothing changed.
    fn select(&mut self, option: i32) -> Result<SessionSnapshot, SessionError> {
        if self.submitted || self.timer_expired {
            return Ok(self.snapshot());
        }
        let question = &self.questions[self.current_index];
        if option < 0 || option as usize >= question.options.0.len() {
            return Err(SessionError::InvalidOption { option });
        }

        let is_correct = option == question.correct_option;
        self.answers.insert(question.id.clone(), option);
        self.submit_blocked = None;

        // Fire-and-forget persistence; failures are logged and reconciled at
        // submit time.
        let store = Arc::clone(&self.store);
        let attempt_id = self.attempt_id.clone();
        let question_id = question.id.clone();
        self.writes.spawn(async move {
            store.upsert_answer(&attempt_id, &question_id, option, is_correct).await
        });

        Ok(self.snapshot())
    }

    /// A countdown hitting zero advances to the next question. On the last
    /// question it attempts an auto-submit instead; when answers are missing
    /// the session stays put with the timer disarmed and the rejection
    /// surfaced in the snapshot.
    async fn handle_expiry(&mut self) {
        self.deadline = None;
        self.timer_expired = true;

        if self.current_index + 1 < self.questions.len() {
            self.goto(self.current_index + 1);
            return;
        }

        match self.try_submit().await {
            Ok(summary) => {
                tracing::info!(
                    attempt_id = %self.attempt_id,
                    score = summary.score,
                    "Attempt auto-submitted on final timer expiry"
                );
            }
            Err(err) => {
                tracing::info!(attempt_id = %self.attempt_id, reason = %err, "Auto-submit blocked");
                self.submit_blocked = Some(err.to_string());
            }
        }
    }

    async fn try_submit(&mut self) -> Result<SubmissionSummary, SessionError> {
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }

        let missing = self
            .questions
            .iter()
            .filter(|question| !self.answers.contains_key(&question.id))
            .count();
        if missing > 0 {
            return Err(SessionError::IncompleteAnswers { missing });
        }

        // Drain in-flight writes so the read-back below observes them.
        while let Some(result) = self.writes.join_next().await {
            log_write_result(&self.attempt_id, result);
        }

        // Backstop for writes that failed in flight: re-persist any selection
        // the store does not reflect, this time surfacing the error.
        let stored: HashMap<String, i32> = self
            .store
            .get_answers(&self.attempt_id)
            .await?
            .into_iter()
            .map(|answer| (answer.question_id, answer.selected_option))
            .collect();
        for question in &self.questions {
            let Some(&selected) = self.answers.get(&question.id) else { continue };
            if stored.get(&question.id) != Some(&selected) {
                let is_correct = selected == question.correct_option;
                self.store
                    .upsert_answer(&self.attempt_id, &question.id, selected, is_correct)
                    .await?;
            }
        }

        let final_answers = self.store.get_answers(&self.attempt_id).await?;
        let correct = final_answers.iter().filter(|answer| answer.is_correct).count() as i32;
        let total = self.questions.len() as i32;
        let score = if total == 0 { 0.0 } else { 100.0 * f64::from(correct) / f64::from(total) };

        let attempt = self.store.complete_attempt(&self.attempt_id, score, correct, total).await?;

        self.submitted = true;
        self.deadline = None;
        self.submit_blocked = None;

        let completed_at = attempt.completed_at.unwrap_or_else(crate::core::time::primitive_now_utc);

        Ok(SubmissionSummary {
            attempt_id: attempt.id,
            score,
            correct_answers: correct,
            total_questions: total,
            completed_at: crate::core::time::format_primitive(completed_at),
        })
    }

    fn snapshot(&self) -> SessionSnapshot {
        let question = &self.questions[self.current_index];
        let remaining_seconds = if self.submitted || self.timer_expired {
            0
        } else {
            self.deadline
                .map(|deadline| deadline.saturating_duration_since(Instant::now()).as_secs())
                .unwrap_or(0)
        };

        SessionSnapshot {
            attempt_id: self.attempt_id.clone(),
            exam_id: self.exam_id.clone(),
            current_index: self.current_index,
            total_questions: self.questions.len(),
            question: QuestionView::from_question(question),
            remaining_seconds,
            answers: self.answers.clone(),
            answered_count: self.answers.len(),
            timer_expired: self.timer_expired,
            submitted: self.submitted,
            submit_blocked: self.submit_blocked.clone(),
        }
    }
}

fn log_write_result(attempt_id: &str, result: Result<anyhow::Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            tracing::warn!(attempt_id, error = %err, "Failed to persist answer");
        }
        Err(err) => {
            tracing::warn!(attempt_id, error = %err, "Answer write task failed");
        }
    }
}
