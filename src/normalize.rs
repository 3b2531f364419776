//! # Data Normalizer
//!
//! Coerces a loosely-shaped dashboard record into the canonical fixed-shape
//! model: exactly 7 days of exactly 3 meal slots, percentages clamped and
//! rescaled to sum ≈ 100, palette entries resolved with per-key defaults.
//! Pure and deterministic — no I/O, never panics, never divides by zero.

use crate::model::{
    Breakdown, Color, DashboardModel, DayColumn, ImageRef, MealSlot, Palette, RawDashboard,
    RawImage, RawMeal, RawPalette, DAY_COUNT, MEAL_SLOTS,
};

const DEFAULT_CLIENT_NAME: &str = "Maria";
const DEFAULT_WEEK_LABEL: &str = "tracked meals";

/// How far the percentage sum may drift from 100 before rescaling kicks in.
const SUM_TOLERANCE: f64 = 0.5;

/// Normalize a raw record into the canonical model.
pub fn normalize(raw: &RawDashboard) -> DashboardModel {
    let palette = normalize_palette(&raw.palette);
    let client_title = possessive(&sanitize(raw.client_name.as_deref(), DEFAULT_CLIENT_NAME));
    let week_label = sanitize(raw.week_label.as_deref(), DEFAULT_WEEK_LABEL);

    // Index-based backfill: input days beyond the seventh are ignored,
    // missing indices synthesize placeholder days.
    let days = std::array::from_fn(|index| {
        let source = raw.days.get(index);
        let label = sanitize(
            source.and_then(|d| d.label.as_deref()),
            &format!("Day {}", index + 1),
        );
        let meals = normalize_meals(source.map(|d| d.meals.as_slice()).unwrap_or(&[]), index);
        let summary = day_summary(&meals);
        DayColumn { label, summary, meals }
    });

    DashboardModel {
        client_title,
        week_label,
        palette,
        days,
    }
}

/// Trim and fall back when the result is empty.
fn sanitize(value: Option<&str>, fallback: &str) -> String {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `Maria` → `Maria's`, but names already ending in s get a bare apostrophe.
fn possessive(name: &str) -> String {
    if name.ends_with('s') || name.ends_with('S') {
        format!("{}'", name)
    } else {
        format!("{}'s", name)
    }
}

fn normalize_palette(raw: &RawPalette) -> Palette {
    let defaults = Palette::default();
    let resolve = |entry: &Option<String>, fallback: Color| {
        entry
            .as_deref()
            .and_then(Color::from_hex)
            .unwrap_or(fallback)
    };
    Palette {
        veg_fruit: resolve(&raw.veg_fruit, defaults.veg_fruit),
        healthy_carbs: resolve(&raw.healthy_carbs, defaults.healthy_carbs),
        protein: resolve(&raw.protein, defaults.protein),
        pause_food: resolve(&raw.pause_food, defaults.pause_food),
        neutral: resolve(&raw.neutral, defaults.neutral),
        canvas_bg: resolve(&raw.canvas_bg, defaults.canvas_bg),
    }
}

fn normalize_meals(raw_meals: &[RawMeal], day_index: usize) -> [MealSlot; MEAL_SLOTS] {
    std::array::from_fn(|slot| match raw_meals.get(slot) {
        Some(meal) => MealSlot {
            id: sanitize(
                meal.id.as_deref(),
                &format!("day-{}-meal-{}", day_index + 1, slot + 1),
            ),
            title: sanitize(meal.title.as_deref(), &format!("Meal {}", slot + 1)),
            breakdown: meal
                .breakdown
                .as_ref()
                .map(normalize_breakdown)
                .unwrap_or_default(),
            summary: meal.summary.clone().unwrap_or_default(),
            adjustment_tips: meal.adjustment_tips.clone().unwrap_or_default(),
            image: derive_image(meal.image.as_ref()),
            has_data: meal.breakdown.is_some(),
        },
        None => MealSlot {
            id: format!("day-{}-placeholder-{}", day_index + 1, slot + 1),
            title: format!("Meal {}", slot + 1),
            breakdown: Breakdown::default(),
            summary: String::new(),
            adjustment_tips: String::new(),
            image: None,
            has_data: false,
        },
    })
}

/// Clamp each percentage to `[0, 100]`, then rescale all four by `100/sum`
/// when the sum drifts outside tolerance. An all-zero breakdown stays
/// all-zero.
pub fn normalize_breakdown(raw: &Breakdown) -> Breakdown {
    let mut parsed = Breakdown {
        veg_fruit: clamp_pct(raw.veg_fruit),
        healthy_carbs: clamp_pct(raw.healthy_carbs),
        protein: clamp_pct(raw.protein),
        pause_food: clamp_pct(raw.pause_food),
    };
    let total = parsed.total();
    if total > 0.0 && (total - 100.0).abs() > SUM_TOLERANCE {
        let scale = 100.0 / total;
        parsed.veg_fruit = round1(parsed.veg_fruit * scale);
        parsed.healthy_carbs = round1(parsed.healthy_carbs * scale);
        parsed.protein = round1(parsed.protein * scale);
        parsed.pause_food = round1(parsed.pause_food * scale);
    }
    parsed
}

fn clamp_pct(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Per-category mean over the meals that actually carry data. A day with no
/// data-bearing meals gets an all-zero summary.
pub fn day_summary(meals: &[MealSlot]) -> Breakdown {
    let eligible: Vec<&Breakdown> = meals
        .iter()
        .filter(|m| m.has_data)
        .map(|m| &m.breakdown)
        .collect();
    if eligible.is_empty() {
        return Breakdown::default();
    }
    let count = eligible.len() as f64;
    let mut totals = Breakdown::default();
    for breakdown in eligible {
        totals.veg_fruit += breakdown.veg_fruit;
        totals.healthy_carbs += breakdown.healthy_carbs;
        totals.protein += breakdown.protein;
        totals.pause_food += breakdown.pause_food;
    }
    Breakdown {
        veg_fruit: round1(totals.veg_fruit / count),
        healthy_carbs: round1(totals.healthy_carbs / count),
        protein: round1(totals.protein / count),
        pause_food: round1(totals.pause_food / count),
    }
}

fn derive_image(raw: Option<&RawImage>) -> Option<ImageRef> {
    let raw = raw?;
    let payload = raw.data.as_deref()?.trim();
    if payload.is_empty() {
        return None;
    }
    let mime_type = raw
        .mime_type
        .clone()
        .or_else(|| extract_mime(payload))
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Some(ImageRef {
        payload: payload.to_string(),
        mime_type,
    })
}

fn extract_mime(payload: &str) -> Option<String> {
    let rest = payload.strip_prefix("data:")?;
    let end = rest.find(';').or_else(|| rest.find(','))?;
    Some(rest[..end].to_string())
}
