pub(crate) mod algebra;
pub(crate) mod arithmetic;
pub(crate) mod fractions;
pub(crate) mod geometry;
pub(crate) mod templates;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::db::types::{DifficultyLevel, Language, QuestionCategory};
use crate::services::numeric::{self, NumericError};

#[derive(Debug, Error)]
pub(crate) enum GenerateError {
    #[error("no question categories requested")]
    NoCategories,
    #[error("grade must be between 1 and 12, got {0}")]
    InvalidGrade(u8),
    #[error(transparent)]
    Numeric(#[from] NumericError),
}

/// Legacy mode keys every range off a difficulty tier; curriculum mode keys
/// arithmetic operand ranges and geometry shape selection off a school grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GeneratorMode {
    Legacy(DifficultyLevel),
    Curriculum { grade: u8 },
}

#[derive(Debug, Clone)]
pub(crate) struct GeneratorParams {
    pub(crate) categories: Vec<QuestionCategory>,
    pub(crate) mode: GeneratorMode,
    pub(crate) language: Language,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GeneratedQuestion {
    pub(crate) question_text: String,
    pub(crate) options: Vec<String>,
    pub(crate) correct_option: usize,
    pub(crate) timer_seconds: u32,
    pub(crate) difficulty: DifficultyLevel,
    pub(crate) category: QuestionCategory,
    pub(crate) question_type: &'static str,
    pub(crate) grade_level: Option<u8>,
    pub(crate) language: Language,
}

/// Resolved per-request context the category generators draw from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GenCtx {
    pub(crate) difficulty: DifficultyLevel,
    pub(crate) grade: Option<u8>,
    pub(crate) language: Language,
}

impl GenCtx {
    fn from_params(params: &GeneratorParams) -> Self {
        match params.mode {
            GeneratorMode::Legacy(difficulty) => Self {
                difficulty,
                grade: None,
                language: params.language,
            },
            GeneratorMode::Curriculum { grade } => Self {
                difficulty: DifficultyLevel::for_grade(grade),
                grade: Some(grade),
                language: params.language,
            },
        }
    }
}

/// Operand window for curriculum-mode arithmetic, widening with the grade.
pub(crate) fn curriculum_range(grade: u8) -> (i64, i64) {
    match grade {
        1..=2 => (1, 10),
        3..=4 => (1, 20),
        5..=6 => (1, 50),
        7..=8 => (1, 100),
        9..=10 => (1, 500),
        _ => (1, 200),
    }
}

pub(crate) fn integer_spread(difficulty: DifficultyLevel) -> i64 {
    match difficulty {
        DifficultyLevel::Easy => 5,
        DifficultyLevel::Medium => 10,
        DifficultyLevel::Hard => 20,
    }
}

pub(crate) fn fraction_spread(difficulty: DifficultyLevel) -> i64 {
    match difficulty {
        DifficultyLevel::Easy => 2,
        DifficultyLevel::Medium => 5,
        DifficultyLevel::Hard => 10,
    }
}

pub(crate) fn timer_for(difficulty: DifficultyLevel, easy: u32, medium: u32, hard: u32) -> u32 {
    match difficulty {
        DifficultyLevel::Easy => easy,
        DifficultyLevel::Medium => medium,
        DifficultyLevel::Hard => hard,
    }
}

/// Generates `count` questions spread evenly over the requested categories:
/// each category contributes ceil(count / categories) questions and the batch
/// is truncated back to `count`.
pub(crate) fn generate<R: Rng + ?Sized>(
    count: usize,
    params: &GeneratorParams,
    rng: &mut R,
) -> Result<Vec<GeneratedQuestion>, GenerateError> {
    if params.categories.is_empty() {
        return Err(GenerateError::NoCategories);
    }
    if let GeneratorMode::Curriculum { grade } = params.mode {
        if !(1..=12).contains(&grade) {
            return Err(GenerateError::InvalidGrade(grade));
        }
    }

    let ctx = GenCtx::from_params(params);
    let per_category = (count + params.categories.len() - 1) / params.categories.len();

    let mut questions = Vec::with_capacity(count);
    'categories: for category in &params.categories {
        for _ in 0..per_category {
            if questions.len() == count {
                break 'categories;
            }
            questions.push(generate_for_category(rng, *category, &ctx)?);
        }
    }

    Ok(questions)
}

/// Produces a single replacement question for one category, used when a
/// teacher rejects a generated question and wants another of the same kind.
pub(crate) fn regenerate_one<R: Rng + ?Sized>(
    category: QuestionCategory,
    params: &GeneratorParams,
    rng: &mut R,
) -> Result<GeneratedQuestion, GenerateError> {
    if let GeneratorMode::Curriculum { grade } = params.mode {
        if !(1..=12).contains(&grade) {
            return Err(GenerateError::InvalidGrade(grade));
        }
    }
    generate_for_category(rng, category, &GenCtx::from_params(params))
}

fn generate_for_category<R: Rng + ?Sized>(
    rng: &mut R,
    category: QuestionCategory,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    match category {
        QuestionCategory::Arithmetic => arithmetic::generate(rng, ctx),
        QuestionCategory::Fractions => fractions::generate(rng, ctx),
        QuestionCategory::Algebra => algebra::generate(rng, ctx),
        QuestionCategory::Geometry => geometry::generate(rng, ctx),
    }
}

pub(crate) fn build_integer_question<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
    question_text: String,
    answer: i64,
    valid: impl Fn(i64) -> bool,
    timer_seconds: u32,
    category: QuestionCategory,
    question_type: &'static str,
) -> Result<GeneratedQuestion, GenerateError> {
    let spread = integer_spread(ctx.difficulty);
    let distractors = numeric::integer_distractors(rng, answer, 3, spread, valid)?
        .into_iter()
        .map(|value| value.to_string())
        .collect();
    let (options, correct_option) = numeric::shuffle_options(rng, answer.to_string(), distractors);

    Ok(GeneratedQuestion {
        question_text,
        options,
        correct_option,
        timer_seconds,
        difficulty: ctx.difficulty,
        category,
        question_type,
        grade_level: ctx.grade,
        language: ctx.language,
    })
}

pub(crate) fn build_fraction_question<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
    question_text: String,
    answer: String,
    timer_seconds: u32,
    question_type: &'static str,
) -> Result<GeneratedQuestion, GenerateError> {
    let spread = fraction_spread(ctx.difficulty);
    let distractors = numeric::fraction_distractors(rng, &answer, 3, spread)?;
    let (options, correct_option) = numeric::shuffle_options(rng, answer, distractors);

    Ok(GeneratedQuestion {
        question_text,
        options,
        correct_option,
        timer_seconds,
        difficulty: ctx.difficulty,
        category: QuestionCategory::Fractions,
        question_type,
        grade_level: ctx.grade,
        language: ctx.language,
    })
}
