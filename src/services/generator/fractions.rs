use rand::Rng;

use crate::db::types::DifficultyLevel;
use crate::services::generator::{
    build_fraction_question, templates, timer_for, GenCtx, GenerateError, GeneratedQuestion,
};
use crate::services::numeric;

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

/// Easy keeps a common denominator; medium and hard cross denominators.
fn operands<R: Rng + ?Sized>(rng: &mut R, difficulty: DifficultyLevel) -> (i64, i64, i64, i64) {
    match difficulty {
        DifficultyLevel::Easy => {
            let b = rng.gen_range(2..=8);
            (rng.gen_range(1..=5), b, rng.gen_range(1..=5), b)
        }
        DifficultyLevel::Medium => (
            rng.gen_range(1..=8),
            rng.gen_range(3..=12),
            rng.gen_range(1..=8),
            rng.gen_range(3..=12),
        ),
        DifficultyLevel::Hard => (
            rng.gen_range(1..=12),
            rng.gen_range(5..=20),
            rng.gen_range(1..=12),
            rng.gen_range(5..=20),
        ),
    }
}

fn addition<R: Rng + ?Sized>(rng: &mut R, ctx: &GenCtx) -> Result<GeneratedQuestion, GenerateError> {
    let (a, b, c, d) = operands(rng, ctx.difficulty);
    let answer = numeric::add_fractions(a, b, c, d)?;

    build_fraction_question(
        rng,
        ctx,
        templates::fraction_addition(ctx.language, a, b, c, d),
        answer,
        timer_for(ctx.difficulty, 45, 60, 90),
        "fraction_addition",
    )
}

/// Operands are ordered so the larger fraction comes first and the difference
/// stays non-negative.
fn subtraction<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    let (a, b, c, d) = match ctx.difficulty {
        DifficultyLevel::Easy => {
            let a = rng.gen_range(3..=8);
            let b = rng.gen_range(2..=8);
            (a, b, rng.gen_range(1..=a - 1), b)
        }
        _ => {
            let (a, b, c, d) = operands(rng, ctx.difficulty);
            if a * d >= c * b {
                (a, b, c, d)
            } else {
                (c, d, a, b)
            }
        }
    };
    let answer = numeric::subtract_fractions(a, b, c, d)?;

    build_fraction_question(
        rng,
        ctx,
        templates::fraction_subtraction(ctx.language, a, b, c, d),
        answer,
        timer_for(ctx.difficulty, 45, 60, 90),
        "fraction_subtraction",
    )
}

fn multiplication<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    let (a, b, c, d) = operands(rng, ctx.difficulty);
    let answer = numeric::simplify_fraction(a * c, b * d)?;

    build_fraction_question(
        rng,
        ctx,
        templates::fraction_multiplication(ctx.language, a, b, c, d),
        answer,
        timer_for(ctx.difficulty, 45, 60, 90),
        "fraction_multiplication",
    )
}

fn division<R: Rng + ?Sized>(rng: &mut R, ctx: &GenCtx) -> Result<GeneratedQuestion, GenerateError> {
    let (a, b, c, d) = operands(rng, ctx.difficulty);
    let answer = numeric::simplify_fraction(a * d, b * c)?;

    build_fraction_question(
        rng,
        ctx,
        templates::fraction_division(ctx.language, a, b, c, d),
        answer,
        timer_for(ctx.difficulty, 45, 60, 90),
        "fraction_division",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::types::Language;
    use crate::services::numeric::gcd;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ctx(difficulty: DifficultyLevel) -> GenCtx {
        GenCtx {
            difficulty,
            grade: None,
            language: Language::English,
        }
    }

    fn parse_fraction(value: &str) -> (i64, i64) {
        match value.split_once('/') {
            Some((num, den)) => (num.parse().unwrap(), den.parse().unwrap()),
            None => (value.parse().unwrap(), 1),
        }
    }

    #[test]
    fn answers_are_in_lowest_terms() {
        let mut rng = StdRng::seed_from_u64(31);
        for difficulty in [
            DifficultyLevel::Easy,
            DifficultyLevel::Medium,
            DifficultyLevel::Hard,
        ] {
            for _ in 0..50 {
                let question = generate(&mut rng, &ctx(difficulty)).unwrap();
                let (num, den) = parse_fraction(&question.options[question.correct_option]);
                assert!(den >= 1);
                if num != 0 {
                    assert_eq!(gcd(num, den), 1, "not reduced: {num}/{den}");
                }
            }
        }
    }

    #[test]
    fn subtraction_stays_non_negative_across_denominators() {
        let mut rng = StdRng::seed_from_u64(32);
        for difficulty in [
            DifficultyLevel::Easy,
            DifficultyLevel::Medium,
            DifficultyLevel::Hard,
        ] {
            for _ in 0..50 {
                let question = subtraction(&mut rng, &ctx(difficulty)).unwrap();
                let (num, _) = parse_fraction(&question.options[question.correct_option]);
                assert!(num >= 0, "negative difference in {}", question.question_text);
            }
        }
    }

    #[test]
    fn easy_mode_keeps_common_denominator() {
        let mut rng = StdRng::seed_from_u64(33);
        for _ in 0..50 {
            let question = addition(&mut rng, &ctx(DifficultyLevel::Easy)).unwrap();
            // "What is {a}/{b} + {c}/{d}?"
            let trimmed = question
                .question_text
                .trim_start_matches("What is ")
                .trim_end_matches('?');
            let (left, right) = trimmed.split_once(" + ").unwrap();
            let (_, left_den) = left.split_once('/').unwrap();
            let (_, right_den) = right.split_once('/').unwrap();
            assert_eq!(left_den, right_den);
        }
    }
}
