use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::Student;
use crate::core::state::AppState;
use crate::schemas::session::{JumpRequest, SelectAnswerRequest};
use crate::services::session::registry::RegistryFull;
use crate::services::session::{SessionError, SessionHandle, SessionSnapshot, SubmissionSummary};

pub(crate) fn exam_router() -> Router<AppState> {
    Router::new().route("/:exam_id/session", post(join_session))
}

pub(crate) fn attempt_router() -> Router<AppState> {
    Router::new()
        .route("/:attempt_id", get(get_snapshot).delete(leave_session))
        .route("/:attempt_id/answer", post(select_answer))
        .route("/:attempt_id/next", post(next_question))
        .route("/:attempt_id/previous", post(previous_question))
        .route("/:attempt_id/jump", post(jump_to_question))
        .route("/:attempt_id/submit", post(submit_attempt))
}

/// Creates (or resumes) the student's open attempt on an exam and spawns its
/// session actor. Rejoining replaces any earlier live session for the same
/// attempt, which stops the old actor.
async fn join_session(
    State(state): State<AppState>,
    Student(student_id): Student,
    Path(exam_id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let max_sessions = state.settings().exam().max_active_sessions as usize;
    if state.sessions().len() >= max_sessions {
        return Err(ApiError::TooManyRequests("Too many active exam sessions"));
    }

    let (handle, snapshot) = SessionHandle::start(state.store(), &student_id, &exam_id)
        .await
        .map_err(map_session_error)?;

    // The registry re-checks the cap under its own lock; the check above is
    // only a fast path.
    let replaced = state
        .sessions()
        .try_insert(snapshot.attempt_id.clone(), handle, max_sessions)
        .map_err(|RegistryFull| ApiError::TooManyRequests("Too many active exam sessions"))?;
    if replaced.is_some() {
        tracing::info!(attempt_id = %snapshot.attempt_id, "Replaced live session on rejoin");
    }
    metrics::gauge!("exam_sessions_active").set(state.sessions().len() as f64);

    Ok(Json(snapshot))
}

async fn get_snapshot(
    State(state): State<AppState>,
    Student(student_id): Student,
    Path(attempt_id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = lookup(&state, &student_id, &attempt_id)?;
    handle.snapshot().await.map(Json).map_err(map_session_error)
}

async fn select_answer(
    State(state): State<AppState>,
    Student(student_id): Student,
    Path(attempt_id): Path<String>,
    Json(payload): Json<SelectAnswerRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    payload.validate().map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let handle = lookup(&state, &student_id, &attempt_id)?;
    handle.select(payload.option).await.map(Json).map_err(map_session_error)
}

async fn next_question(
    State(state): State<AppState>,
    Student(student_id): Student,
    Path(attempt_id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = lookup(&state, &student_id, &attempt_id)?;
    let snapshot = handle.next().await.map_err(map_session_error)?;

    // Advancing past the last question submits the attempt.
    if snapshot.submitted {
        state.sessions().remove(&attempt_id);
        metrics::gauge!("exam_sessions_active").set(state.sessions().len() as f64);
        metrics::counter!("exam_attempts_submitted_total").increment(1);
    }

    Ok(Json(snapshot))
}

async fn previous_question(
    State(state): State<AppState>,
    Student(student_id): Student,
    Path(attempt_id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = lookup(&state, &student_id, &attempt_id)?;
    handle.previous().await.map(Json).map_err(map_session_error)
}

async fn jump_to_question(
    State(state): State<AppState>,
    Student(student_id): Student,
    Path(attempt_id): Path<String>,
    Json(payload): Json<JumpRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = lookup(&state, &student_id, &attempt_id)?;
    handle.jump_to(payload.index).await.map(Json).map_err(map_session_error)
}

async fn submit_attempt(
    State(state): State<AppState>,
    Student(student_id): Student,
    Path(attempt_id): Path<String>,
) -> Result<Json<SubmissionSummary>, ApiError> {
    let handle = lookup(&state, &student_id, &attempt_id)?;
    let summary = handle.submit().await.map_err(map_session_error)?;

    state.sessions().remove(&attempt_id);
    metrics::gauge!("exam_sessions_active").set(state.sessions().len() as f64);
    metrics::counter!("exam_attempts_submitted_total").increment(1);

    Ok(Json(summary))
}

/// Drops the live session without submitting. The attempt stays open, so the
/// student can rejoin later with their answers intact.
async fn leave_session(
    State(state): State<AppState>,
    Student(student_id): Student,
    Path(attempt_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    lookup(&state, &student_id, &attempt_id)?;
    state.sessions().remove(&attempt_id);
    metrics::gauge!("exam_sessions_active").set(state.sessions().len() as f64);

    Ok(Json(serde_json::json!({ "detail": "Session closed" })))
}

/// Another student's attempt is indistinguishable from a missing one.
fn lookup(state: &AppState, student_id: &str, attempt_id: &str) -> Result<SessionHandle, ApiError> {
    state
        .sessions()
        .get(attempt_id)
        .filter(|handle| handle.student_id() == student_id)
        .ok_or_else(|| ApiError::NotFound("No live session for this attempt".to_string()))
}

fn map_session_error(err: SessionError) -> ApiError {
    match err {
        SessionError::ExamUnavailable => ApiError::NotFound("Exam not found or inactive".to_string()),
        SessionError::NoQuestions => ApiError::BadRequest("Exam has no questions".to_string()),
        SessionError::IncompleteAnswers { .. }
        | SessionError::QuestionOutOfRange { .. }
        | SessionError::InvalidOption { .. } => ApiError::BadRequest(err.to_string()),
        SessionError::AlreadySubmitted => ApiError::Conflict(err.to_string()),
        SessionError::SessionClosed => {
            ApiError::NotFound("No live session for this attempt".to_string())
        }
        SessionError::Store(inner) => ApiError::internal(inner, "Session storage failure"),
    }
}
