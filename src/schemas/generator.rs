use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::types::{DifficultyLevel, Language, QuestionCategory};
use crate::services::generator::{GeneratedQuestion, GeneratorMode, GeneratorParams};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct GenerateRequest {
    #[validate(range(min = 1, message = "count must be at least 1"))]
    pub(crate) count: usize,
    #[serde(default = "default_categories")]
    pub(crate) categories: Vec<QuestionCategory>,
    #[serde(default)]
    pub(crate) difficulty: Option<DifficultyLevel>,
    #[serde(default)]
    #[serde(alias = "gradeLevel")]
    #[validate(range(min = 1, max = 12, message = "grade must be between 1 and 12"))]
    pub(crate) grade: Option<u8>,
    #[serde(default = "default_language")]
    pub(crate) language: Language,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RegenerateRequest {
    pub(crate) category: QuestionCategory,
    #[serde(default)]
    pub(crate) difficulty: Option<DifficultyLevel>,
    #[serde(default)]
    #[serde(alias = "gradeLevel")]
    #[validate(range(min = 1, max = 12, message = "grade must be between 1 and 12"))]
    pub(crate) grade: Option<u8>,
    #[serde(default = "default_language")]
    pub(crate) language: Language,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateResponse {
    pub(crate) questions: Vec<GeneratedQuestion>,
    pub(crate) count: usize,
}

fn default_categories() -> Vec<QuestionCategory> {
    QuestionCategory::ALL.to_vec()
}

fn default_language() -> Language {
    Language::English
}

/// A grade request wins over an explicit difficulty; without either the
/// generator falls back to medium.
pub(crate) fn resolve_mode(grade: Option<u8>, difficulty: Option<DifficultyLevel>) -> GeneratorMode {
    match grade {
        Some(grade) => GeneratorMode::Curriculum { grade },
        None => GeneratorMode::Legacy(difficulty.unwrap_or(DifficultyLevel::Medium)),
    }
}

impl GenerateRequest {
    pub(crate) fn params(&self) -> GeneratorParams {
        GeneratorParams {
            categories: self.categories.clone(),
            mode: resolve_mode(self.grade, self.difficulty),
            language: self.language,
        }
    }
}

impl RegenerateRequest {
    pub(crate) fn params(&self) -> GeneratorParams {
        GeneratorParams {
            categories: vec![self.category],
            mode: resolve_mode(self.grade, self.difficulty),
            language: self.language,
        }
    }
}
