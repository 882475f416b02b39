use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// Retry budget for distractor synthesis before giving up on a question.
const MAX_DISTRACTOR_ATTEMPTS: u32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum NumericError {
    #[error("fraction denominator is zero")]
    DivisionByZero,
    #[error("could not synthesize {needed} distinct distractors within {attempts} attempts")]
    GenerationExhausted { needed: usize, attempts: u32 },
}

pub(crate) fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let rem = a % b;
        a = b;
        b = rem;
    }
    a
}

/// Renders `numerator/denominator` in lowest terms, collapsing to a bare
/// integer when the reduced denominator is 1. Generators never pass a zero
/// denominator; the error exists so a bad operand cannot slip into a question.
pub(crate) fn simplify_fraction(numerator: i64, denominator: i64) -> Result<String, NumericError> {
    if denominator == 0 {
        return Err(NumericError::DivisionByZero);
    }

    let divisor = gcd(numerator, denominator);
    // gcd is 0 only when both inputs are 0, which the zero-denominator guard excludes.
    let simplified_num = numerator / divisor;
    let simplified_den = denominator / divisor;

    if simplified_den == 1 {
        return Ok(simplified_num.to_string());
    }

    Ok(format!("{simplified_num}/{simplified_den}"))
}

pub(crate) fn add_fractions(a: i64, b: i64, c: i64, d: i64) -> Result<String, NumericError> {
    simplify_fraction(a * d + c * b, b * d)
}

pub(crate) fn subtract_fractions(a: i64, b: i64, c: i64, d: i64) -> Result<String, NumericError> {
    simplify_fraction(a * d - c * b, b * d)
}

/// Synthesizes `count` distinct integer distractors within `±spread` of the
/// correct value, each passing `valid`. Bounded retries keep this total even
/// for predicates that reject most of the window.
pub(crate) fn integer_distractors<R: Rng + ?Sized>(
    rng: &mut R,
    correct: i64,
    count: usize,
    spread: i64,
    valid: impl Fn(i64) -> bool,
) -> Result<Vec<i64>, NumericError> {
    let mut distractors: Vec<i64> = Vec::with_capacity(count);
    let mut attempts = 0;

    while distractors.len() < count {
        if attempts >= MAX_DISTRACTOR_ATTEMPTS {
            return Err(NumericError::GenerationExhausted {
                needed: count,
                attempts: MAX_DISTRACTOR_ATTEMPTS,
            });
        }
        attempts += 1;

        let candidate = correct + rng.gen_range(-spread..=spread);
        if candidate != correct && valid(candidate) && !distractors.contains(&candidate) {
            distractors.push(candidate);
        }
    }

    Ok(distractors)
}

/// Fraction distractors perturb numerator and denominator independently,
/// mirroring the kinds of slips students actually make. Uniqueness is by
/// rendered string, matching how options are compared everywhere else.
pub(crate) fn fraction_distractors<R: Rng + ?Sized>(
    rng: &mut R,
    correct: &str,
    count: usize,
    spread: i64,
) -> Result<Vec<String>, NumericError> {
    let (num, den) = match correct.split_once('/') {
        Some((num, den)) => {
            (num.parse::<i64>().unwrap_or(0), den.parse::<i64>().unwrap_or(1))
        }
        None => (correct.parse::<i64>().unwrap_or(0), 1),
    };

    let mut distractors: Vec<String> = Vec::with_capacity(count);
    let mut attempts = 0;

    while distractors.len() < count {
        if attempts >= MAX_DISTRACTOR_ATTEMPTS {
            return Err(NumericError::GenerationExhausted {
                needed: count,
                attempts: MAX_DISTRACTOR_ATTEMPTS,
            });
        }
        attempts += 1;

        let wrong_num = num + rng.gen_range(-spread..=spread);
        let wrong_den = den + rng.gen_range(-spread..=spread);
        if wrong_num <= 0 || wrong_den <= 0 || (wrong_num == num && wrong_den == den) {
            continue;
        }

        let rendered = format!("{wrong_num}/{wrong_den}");
        if rendered != correct && !distractors.contains(&rendered) {
            distractors.push(rendered);
        }
    }

    Ok(distractors)
}

/// Uniformly shuffles the correct option in with its distractors and reports
/// the correct value's post-shuffle index.
pub(crate) fn shuffle_options<R: Rng + ?Sized>(
    rng: &mut R,
    correct: String,
    distractors: Vec<String>,
) -> (Vec<String>, usize) {
    let mut options = Vec::with_capacity(distractors.len() + 1);
    options.push(correct.clone());
    options.extend(distractors);
    options.shuffle(rng);

    let correct_index = options
        .iter()
        .position(|option| *option == correct)
        .unwrap_or(0);

    (options, correct_index)
}
