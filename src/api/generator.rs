use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use rand::rngs::StdRng;
use rand::SeedableRng;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::schemas::generator::{GenerateRequest, GenerateResponse, RegenerateRequest};
use crate::services::generator::{self, GenerateError, GeneratedQuestion};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/questions", post(generate_questions))
        .route("/questions/regenerate", post(regenerate_question))
}

async fn generate_questions(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    payload.validate().map_err(|err| ApiError::BadRequest(err.to_string()))?;

    let max_count = state.settings().exam().generator_max_count as usize;
    if payload.count > max_count {
        return Err(ApiError::BadRequest(format!("count must not exceed {max_count}")));
    }

    let params = payload.params();
    let mut rng = StdRng::from_entropy();
    let questions =
        generator::generate(payload.count, &params, &mut rng).map_err(map_generate_error)?;

    metrics::counter!("generator_questions_total").increment(questions.len() as u64);

    Ok(Json(GenerateResponse { count: questions.len(), questions }))
}

async fn regenerate_question(
    State(_state): State<AppState>,
    Json(payload): Json<RegenerateRequest>,
) -> Result<Json<GeneratedQuestion>, ApiError> {
    payload.validate().map_err(|err| ApiError::BadRequest(err.to_string()))?;

    let params = payload.params();
    let mut rng = StdRng::from_entropy();
    let question =
        generator::regenerate_one(payload.category, &params, &mut rng).map_err(map_generate_error)?;

    metrics::counter!("generator_questions_total").increment(1);

    Ok(Json(question))
}

fn map_generate_error(err: GenerateError) -> ApiError {
    match err {
        GenerateError::NoCategories | GenerateError::InvalidGrade(_) => {
            ApiError::BadRequest(err.to_string())
        }
        GenerateError::Numeric(inner) => {
            ApiError::internal(inner, "Question generation failed")
        }
    }
}
