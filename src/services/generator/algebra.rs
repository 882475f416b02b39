use rand::Rng;

use crate::db::types::{DifficultyLevel, QuestionCategory};
use crate::services::generator::{
    build_integer_question, templates, timer_for, GenCtx, GenerateError, GeneratedQuestion,
};

pub(crate) fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    match rng.gen_range(0..3) {
        0 => linear(rng, ctx),
        1 => quadratic(rng, ctx),
        _ => system(rng, ctx),
    }
}

/// The solution is drawn first and the constant term derived from it, so x is
/// always a whole number.
fn linear<R: Rng + ?Sized>(rng: &mut R, ctx: &GenCtx) -> Result<GeneratedQuestion, GenerateError> {
    let (a, b, x) = match ctx.difficulty {
        DifficultyLevel::Easy => (
            rng.gen_range(1..=5),
            rng.gen_range(1..=10),
            rng.gen_range(1..=10),
        ),
        DifficultyLevel::Medium => (
            rng.gen_range(2..=10),
            rng.gen_range(1..=20),
            rng.gen_range(1..=20),
        ),
        DifficultyLevel::Hard => (
            rng.gen_range(5..=20),
            rng.gen_range(1..=50),
            rng.gen_range(1..=30),
        ),
    };
    let c = a * x + b;

    build_integer_question(
        rng,
        ctx,
        templates::linear_equation(ctx.language, a, b, c),
        x,
        |_| true,
        timer_for(ctx.difficulty, 60, 90, 120),
        QuestionCategory::Algebra,
        "linear_equation",
    )
}

/// Roots are drawn first and expanded into coefficients, so both solutions
/// are integers. Distractors must avoid the second root: that value would be
/// a correct answer too.
fn quadratic<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    let (a, root_span) = match ctx.difficulty {
        DifficultyLevel::Easy => (1, 5),
        DifficultyLevel::Medium => (rng.gen_range(1..=3), 8),
        DifficultyLevel::Hard => (rng.gen_range(1..=5), 10),
    };
    let r1 = rng.gen_range(-root_span..=root_span);
    let r2 = rng.gen_range(-root_span..=root_span);
    let b = -a * (r1 + r2);
    let c = a * r1 * r2;

    build_integer_question(
        rng,
        ctx,
        templates::quadratic_equation(ctx.language, a, b, c),
        r1,
        move |value| value != r2,
        timer_for(ctx.difficulty, 90, 120, 150),
        QuestionCategory::Algebra,
        "quadratic_equation",
    )
}

/// Both unknowns are drawn first and the right-hand sides derived; the
/// coefficient matrix is re-drawn until its determinant is nonzero so the
/// system has exactly one solution.
fn system<R: Rng + ?Sized>(rng: &mut R, ctx: &GenCtx) -> Result<GeneratedQuestion, GenerateError> {
    let (coef_hi, unknown_hi) = match ctx.difficulty {
        DifficultyLevel::Easy => (3, 5),
        DifficultyLevel::Medium => (5, 8),
        DifficultyLevel::Hard => (10, 10),
    };
    let x = rng.gen_range(1..=unknown_hi);
    let y = rng.gen_range(1..=unknown_hi);

    let (a, b, d, e) = loop {
        let a = rng.gen_range(1..=coef_hi);
        let b = rng.gen_range(1..=coef_hi);
        let d = rng.gen_range(1..=coef_hi);
        let e = rng.gen_range(1..=coef_hi);
        if a * e - b * d != 0 {
            break (a, b, d, e);
        }
    };
    let c = a * x + b * y;
    let f = d * x + e * y;

    build_integer_question(
        rng,
        ctx,
        templates::system_of_equations(ctx.language, a, b, c, d, e, f),
        x,
        |_| true,
        timer_for(ctx.difficulty, 120, 150, 180),
        QuestionCategory::Algebra,
        "system_of_equations",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::types::Language;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ctx(difficulty: DifficultyLevel) -> GenCtx {
        GenCtx {
            difficulty,
            grade: None,
            language: Language::English,
        }
    }

    // "Solve for x: {a}x + {b} = {c}"
    fn parse_linear(text: &str) -> (i64, i64, i64) {
        let rest = text.trim_start_matches("Solve for x: ");
        let (lhs, c) = rest.split_once(" = ").unwrap();
        let (ax, b) = lhs.split_once(" + ").unwrap();
        (
            ax.trim_end_matches('x').parse().unwrap(),
            b.parse().unwrap(),
            c.parse().unwrap(),
        )
    }

    // "Solve for x: {a}x² + {b}x + {c} = 0 (find one solution)"
    fn parse_quadratic(text: &str) -> (i64, i64, i64) {
        let rest = text.trim_start_matches("Solve for x: ");
        let (lhs, _) = rest.split_once(" = 0").unwrap();
        let mut parts = lhs.split(" + ");
        let a = parts.next().unwrap().trim_end_matches("x²").parse().unwrap();
        let b = parts.next().unwrap().trim_end_matches('x').parse().unwrap();
        let c = parts.next().unwrap().parse().unwrap();
        (a, b, c)
    }

    // "Solve the system: {a}x + {b}y = {c} and {d}x + {e}y = {f}. What is x?"
    fn parse_system(text: &str) -> (i64, i64, i64, i64, i64, i64) {
        let rest = text
            .trim_start_matches("Solve the system: ")
            .trim_end_matches(". What is x?");
        let (first, second) = rest.split_once(" and ").unwrap();
        let parse_eq = |eq: &str| -> (i64, i64, i64) {
            let (lhs, rhs) = eq.split_once(" = ").unwrap();
            let (ax, by) = lhs.split_once(" + ").unwrap();
            (
                ax.trim_end_matches('x').parse().unwrap(),
                by.trim_end_matches('y').parse().unwrap(),
                rhs.parse().unwrap(),
            )
        };
        let (a, b, c) = parse_eq(first);
        let (d, e, f) = parse_eq(second);
        (a, b, c, d, e, f)
    }

    #[test]
    fn linear_solution_satisfies_equation() {
        let mut rng = StdRng::seed_from_u64(41);
        for difficulty in [
            DifficultyLevel::Easy,
            DifficultyLevel::Medium,
            DifficultyLevel::Hard,
        ] {
            for _ in 0..50 {
                let question = linear(&mut rng, &ctx(difficulty)).unwrap();
                let (a, b, c) = parse_linear(&question.question_text);
                let x: i64 = question.options[question.correct_option].parse().unwrap();
                assert_eq!(a * x + b, c);
            }
        }
    }

    #[test]
    fn quadratic_has_exactly_one_root_among_options() {
        let mut rng = StdRng::seed_from_u64(42);
        for difficulty in [
            DifficultyLevel::Easy,
            DifficultyLevel::Medium,
            DifficultyLevel::Hard,
        ] {
            for _ in 0..50 {
                let question = quadratic(&mut rng, &ctx(difficulty)).unwrap();
                let (a, b, c) = parse_quadratic(&question.question_text);
                let roots: Vec<usize> = question
                    .options
                    .iter()
                    .enumerate()
                    .filter(|(_, option)| {
                        let x: i64 = option.parse().unwrap();
                        a * x * x + b * x + c == 0
                    })
                    .map(|(i, _)| i)
                    .collect();
                assert_eq!(roots, vec![question.correct_option]);
            }
        }
    }

    #[test]
    fn system_solution_satisfies_both_equations() {
        let mut rng = StdRng::seed_from_u64(43);
        for _ in 0..100 {
            let question = system(&mut rng, &ctx(DifficultyLevel::Hard)).unwrap();
            let (a, b, c, d, e, f) = parse_system(&question.question_text);
            let x: i64 = question.options[question.correct_option].parse().unwrap();
            // Cramer's rule for y given the reported x.
            let det = a * e - b * d;
            assert_ne!(det, 0);
            let y_num = c * d - a * f;
            assert_eq!(y_num % (b * d - a * e), 0);
            let y = y_num / (b * d - a * e);
            assert_eq!(a * x + b * y, c);
            assert_eq!(d * x + e * y, f);
        }
    }
}
