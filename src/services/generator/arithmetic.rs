use rand::Rng;

use crate::db::types::{DifficultyLevel, QuestionCategory};
use crate::services::generator::{
    build_integer_question, curriculum_range, templates, timer_for, GenCtx, GenerateError,
    GeneratedQuestion,
};

pub(crate) fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    match rng.gen_range(0..4) {
        0 => addition(rng, ctx),
        1 => subtraction(rng, ctx),
        2 => multiplication(rng, ctx),
        _ => division(rng, ctx),
    }
}

fn addition<R: Rng + ?Sized>(rng: &mut R, ctx: &GenCtx) -> Result<GeneratedQuestion, GenerateError> {
    let (lo, hi) = match ctx.grade {
        Some(grade) => curriculum_range(grade),
        None => match ctx.difficulty {
            DifficultyLevel::Easy => (1, 20),
            DifficultyLevel::Medium => (10, 100),
            DifficultyLevel::Hard => (100, 999),
        },
    };
    let a = rng.gen_range(lo..=hi);
    let b = rng.gen_range(lo..=hi);

    build_integer_question(
        rng,
        ctx,
        templates::addition(ctx.language, a, b),
        a + b,
        |value| value > 0,
        timer_for(ctx.difficulty, 30, 45, 60),
        QuestionCategory::Arithmetic,
        "addition",
    )
}

/// Minuend is always drawn at least as large as the subtrahend, so results
/// never go negative at any grade.
fn subtraction<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    let (a, b) = match ctx.grade {
        Some(grade) => {
            let (lo, hi) = curriculum_range(grade);
            let a = rng.gen_range(lo..=hi);
            (a, rng.gen_range(lo..=a))
        }
        None => match ctx.difficulty {
            DifficultyLevel::Easy => {
                let a = rng.gen_range(10..=30);
                (a, rng.gen_range(1..=a))
            }
            DifficultyLevel::Medium => {
                let a = rng.gen_range(50..=200);
                (a, rng.gen_range(10..=a))
            }
            DifficultyLevel::Hard => {
                let a = rng.gen_range(500..=1000);
                (a, rng.gen_range(100..=a))
            }
        },
    };

    build_integer_question(
        rng,
        ctx,
        templates::subtraction(ctx.language, a, b),
        a - b,
        |value| value >= 0,
        timer_for(ctx.difficulty, 30, 45, 60),
        QuestionCategory::Arithmetic,
        "subtraction",
    )
}

fn multiplication<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    let (lo, hi) = factor_range(ctx);
    let a = rng.gen_range(lo..=hi);
    let b = rng.gen_range(lo..=hi);

    build_integer_question(
        rng,
        ctx,
        templates::multiplication(ctx.language, a, b),
        a * b,
        |value| value > 0,
        timer_for(ctx.difficulty, 30, 45, 60),
        QuestionCategory::Arithmetic,
        "multiplication",
    )
}

/// Built product-first: divisor and quotient are drawn, the dividend is their
/// product, so the division always comes out exact.
fn division<R: Rng + ?Sized>(rng: &mut R, ctx: &GenCtx) -> Result<GeneratedQuestion, GenerateError> {
    let (lo, hi) = factor_range(ctx);
    let divisor = rng.gen_range(lo..=hi);
    let quotient = rng.gen_range(lo..=hi);
    let dividend = divisor * quotient;

    build_integer_question(
        rng,
        ctx,
        templates::division(ctx.language, dividend, divisor),
        quotient,
        |value| value > 0,
        timer_for(ctx.difficulty, 30, 45, 60),
        QuestionCategory::Arithmetic,
        "division",
    )
}

fn factor_range(ctx: &GenCtx) -> (i64, i64) {
    match ctx.grade {
        Some(grade) => curriculum_range(grade),
        None => match ctx.difficulty {
            DifficultyLevel::Easy => (2, 12),
            DifficultyLevel::Medium => (5, 25),
            DifficultyLevel::Hard => (10, 50),
        },
    }
}
