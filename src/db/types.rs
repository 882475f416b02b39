use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "difficultylevel", rename_all = "lowercase")]
pub(crate) enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    /// Curriculum mode maps grades onto the legacy difficulty tiers.
    pub(crate) fn for_grade(grade: u8) -> Self {
        match grade {
            1..=4 => DifficultyLevel::Easy,
            5..=8 => DifficultyLevel::Medium,
            _ => DifficultyLevel::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "questioncategory", rename_all = "lowercase")]
pub(crate) enum QuestionCategory {
    Arithmetic,
    Fractions,
    Algebra,
    Geometry,
}

impl QuestionCategory {
    pub(crate) const ALL: [QuestionCategory; 4] = [
        QuestionCategory::Arithmetic,
        QuestionCategory::Fractions,
        QuestionCategory::Algebra,
        QuestionCategory::Geometry,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "questionlanguage", rename_all = "lowercase")]
pub(crate) enum Language {
    English,
    French,
}
