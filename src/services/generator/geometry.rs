use rand::seq::SliceRandom;
use rand::Rng;

use crate::db::types::{DifficultyLevel, QuestionCategory};
use crate::services::generator::{
    build_integer_question, templates, timer_for, GenCtx, GenerateError, GeneratedQuestion,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    RectangleArea,
    RectanglePerimeter,
    TriangleArea,
    PrismVolume,
    TriangleAngle,
    CircleArea,
}

/// Curriculum mode gates shapes by grade band: lower grades stick to
/// rectangles, middle grades add triangles, volumes and angles, and circle
/// area waits for the upper grades. Legacy mode draws from the full set.
fn shapes_for(ctx: &GenCtx) -> &'static [Shape] {
    match ctx.grade {
        Some(1..=4) => &[Shape::RectangleArea, Shape::RectanglePerimeter],
        Some(5..=8) => &[
            Shape::RectangleArea,
            Shape::RectanglePerimeter,
            Shape::TriangleArea,
            Shape::PrismVolume,
            Shape::TriangleAngle,
        ],
        _ => &[
            Shape::RectangleArea,
            Shape::RectanglePerimeter,
            Shape::TriangleArea,
            Shape::PrismVolume,
            Shape::TriangleAngle,
            Shape::CircleArea,
        ],
    }
}

pub(crate) fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    let shape = *shapes_for(ctx)
        .choose(rng)
        .unwrap_or(&Shape::RectangleArea);
    match shape {
        Shape::RectangleArea => rectangle_area(rng, ctx),
        Shape::RectanglePerimeter => rectangle_perimeter(rng, ctx),
        Shape::TriangleArea => triangle_area(rng, ctx),
        Shape::PrismVolume => prism_volume(rng, ctx),
        Shape::TriangleAngle => triangle_angle(rng, ctx),
        Shape::CircleArea => circle_area(rng, ctx),
    }
}

fn side_range(difficulty: DifficultyLevel, easy: (i64, i64), medium: (i64, i64), hard: (i64, i64)) -> (i64, i64) {
    match difficulty {
        DifficultyLevel::Easy => easy,
        DifficultyLevel::Medium => medium,
        DifficultyLevel::Hard => hard,
    }
}

fn rectangle_area<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    let (lo, hi) = side_range(ctx.difficulty, (2, 10), (5, 20), (10, 50));
    let length = rng.gen_range(lo..=hi);
    let width = rng.gen_range(lo..=hi);

    build_integer_question(
        rng,
        ctx,
        templates::rectangle_area(ctx.language, length, width),
        length * width,
        |value| value > 0,
        timer_for(ctx.difficulty, 45, 60, 90),
        QuestionCategory::Geometry,
        "rectangle_area",
    )
}

fn rectangle_perimeter<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    let (lo, hi) = side_range(ctx.difficulty, (3, 10), (5, 20), (10, 50));
    let length = rng.gen_range(lo..=hi);
    let width = rng.gen_range(lo..=hi);

    build_integer_question(
        rng,
        ctx,
        templates::rectangle_perimeter(ctx.language, length, width),
        2 * (length + width),
        |value| value > 0,
        timer_for(ctx.difficulty, 45, 60, 90),
        QuestionCategory::Geometry,
        "rectangle_perimeter",
    )
}

fn triangle_area<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    let (lo, hi) = side_range(ctx.difficulty, (3, 10), (5, 20), (10, 50));
    let base = rng.gen_range(lo..=hi);
    let height = rng.gen_range(lo..=hi);
    let area = ((base * height) as f64 / 2.0).round() as i64;

    build_integer_question(
        rng,
        ctx,
        templates::triangle_area(ctx.language, base, height),
        area,
        |value| value > 0,
        timer_for(ctx.difficulty, 45, 60, 90),
        QuestionCategory::Geometry,
        "triangle_area",
    )
}

fn circle_area<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    let (lo, hi) = side_range(ctx.difficulty, (2, 10), (5, 20), (10, 50));
    let radius = rng.gen_range(lo..=hi);
    let area = (std::f64::consts::PI * (radius * radius) as f64).round() as i64;

    build_integer_question(
        rng,
        ctx,
        templates::circle_area(ctx.language, radius),
        area,
        |value| value > 0,
        timer_for(ctx.difficulty, 60, 90, 120),
        QuestionCategory::Geometry,
        "circle_area",
    )
}

fn prism_volume<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    let (lo, hi) = side_range(ctx.difficulty, (2, 8), (5, 15), (10, 30));
    let length = rng.gen_range(lo..=hi);
    let width = rng.gen_range(lo..=hi);
    let height = rng.gen_range(lo..=hi);

    build_integer_question(
        rng,
        ctx,
        templates::prism_volume(ctx.language, length, width, height),
        length * width * height,
        |value| value > 0,
        timer_for(ctx.difficulty, 60, 90, 120),
        QuestionCategory::Geometry,
        "rectangular_prism_volume",
    )
}

/// The second angle's ceiling is clamped so the pair always leaves room for a
/// positive third angle.
fn triangle_angle<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &GenCtx,
) -> Result<GeneratedQuestion, GenerateError> {
    let (lo, hi) = side_range(ctx.difficulty, (30, 60), (20, 80), (10, 100));
    let first = rng.gen_range(lo..=hi);
    let second = rng.gen_range(lo..=hi.min(179 - first));

    build_integer_question(
        rng,
        ctx,
        templates::triangle_angle(ctx.language, first, second),
        180 - first - second,
        |value| value > 0,
        timer_for(ctx.difficulty, 45, 60, 90),
        QuestionCategory::Geometry,
        "triangle_angle",
    )
}
