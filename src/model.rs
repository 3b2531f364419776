//! # Dashboard Data Model
//!
//! Two layers: the `Raw*` types are the loosely-shaped serde surface — any
//! number of days and meals, every field optional — and the canonical types
//! are what the rest of the engine consumes after normalization. The canonical
//! shape is rigid on purpose: always 7 day columns, always 3 meal slots per
//! day, so the renderer never branches on missing entries. Empty slots carry
//! placeholders with `has_data = false`.

use serde::{Deserialize, Serialize};

/// A rendered week always spans this many day columns.
pub const DAY_COUNT: usize = 7;
/// Every day column holds exactly this many meal slots.
pub const MEAL_SLOTS: usize = 3;

// ─── Categories ─────────────────────────────────────────────────

/// The four fixed food categories every breakdown is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryKey {
    VegFruit,
    HealthyCarbs,
    Protein,
    PauseFood,
}

/// A category key paired with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub key: CategoryKey,
    pub label: &'static str,
}

/// Display order for legend rows, donut sweep, and allocation bar segments.
pub const CATEGORY_ORDER: [Category; 4] = [
    Category { key: CategoryKey::VegFruit, label: "Always Food" },
    Category { key: CategoryKey::Protein, label: "Fuel Food \u{b7} Protein" },
    Category { key: CategoryKey::HealthyCarbs, label: "Fuel Food \u{b7} Whole Grain" },
    Category { key: CategoryKey::PauseFood, label: "Pause Food" },
];

// ─── Breakdown ──────────────────────────────────────────────────

/// Four non-negative percentages describing the composition of a meal or day.
/// After normalization the sum is within 0.5 of 100 (or exactly 0 for a slot
/// with no data).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Breakdown {
    pub veg_fruit: f64,
    pub healthy_carbs: f64,
    pub protein: f64,
    pub pause_food: f64,
}

impl Breakdown {
    pub fn get(&self, key: CategoryKey) -> f64 {
        match key {
            CategoryKey::VegFruit => self.veg_fruit,
            CategoryKey::HealthyCarbs => self.healthy_carbs,
            CategoryKey::Protein => self.protein,
            CategoryKey::PauseFood => self.pause_food,
        }
    }

    pub fn set(&mut self, key: CategoryKey, value: f64) {
        match key {
            CategoryKey::VegFruit => self.veg_fruit = value,
            CategoryKey::HealthyCarbs => self.healthy_carbs = value,
            CategoryKey::Protein => self.protein = value,
            CategoryKey::PauseFood => self.pause_food = value,
        }
    }

    pub fn total(&self) -> f64 {
        self.veg_fruit + self.healthy_carbs + self.protein + self.pause_food
    }

    /// Values walked in display order (legend/donut/bar order).
    pub fn in_display_order(&self) -> [f64; 4] {
        [
            self.get(CATEGORY_ORDER[0].key),
            self.get(CATEGORY_ORDER[1].key),
            self.get(CATEGORY_ORDER[2].key),
            self.get(CATEGORY_ORDER[3].key),
        ]
    }

    /// The neutral split shown when a whole week carries no data at all.
    pub fn even_split() -> Self {
        Breakdown {
            veg_fruit: 25.0,
            healthy_carbs: 25.0,
            protein: 25.0,
            pause_food: 25.0,
        }
    }
}

// ─── Color & palette ────────────────────────────────────────────

/// An RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb255(255, 255, 255);

    pub const fn rgb255(r: u8, g: u8, b: u8) -> Color {
        Color {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional). Returns `None` for
    /// anything else so callers can fall back to a default.
    pub fn from_hex(hex: &str) -> Option<Color> {
        let digits = hex.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return None,
        };
        let value = u32::from_str_radix(&expanded, 16).ok()?;
        Some(Color::rgb255(
            ((value >> 16) & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
        ))
    }
}

/// Resolved colors for the four categories plus the neutral border color and
/// the page background. Every entry falls back individually to the default
/// palette during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub veg_fruit: Color,
    pub healthy_carbs: Color,
    pub protein: Color,
    pub pause_food: Color,
    pub neutral: Color,
    pub canvas_bg: Color,
}

impl Palette {
    pub fn color(&self, key: CategoryKey) -> Color {
        match key {
            CategoryKey::VegFruit => self.veg_fruit,
            CategoryKey::HealthyCarbs => self.healthy_carbs,
            CategoryKey::Protein => self.protein,
            CategoryKey::PauseFood => self.pause_food,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            veg_fruit: Color::rgb255(0x4F, 0xA7, 0x42),
            healthy_carbs: Color::rgb255(0xF5, 0xD9, 0x57),
            protein: Color::rgb255(0xF5, 0x9F, 0x1A),
            pause_food: Color::rgb255(0xF2, 0x89, 0x9A),
            neutral: Color::rgb255(0xD2, 0xD2, 0xD2),
            canvas_bg: Color::WHITE,
        }
    }
}

// ─── Raw input (pre-normalization) ──────────────────────────────

/// The loosely-shaped record handed to the engine. Days and meals may be
/// missing, over-long, or partially filled; the normalizer coerces all of it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDashboard {
    pub client_name: Option<String>,
    pub week_label: Option<String>,
    pub palette: RawPalette,
    pub days: Vec<RawDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPalette {
    pub veg_fruit: Option<String>,
    pub healthy_carbs: Option<String>,
    pub protein: Option<String>,
    pub pause_food: Option<String>,
    pub neutral: Option<String>,
    pub canvas_bg: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDay {
    pub label: Option<String>,
    pub meals: Vec<RawMeal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMeal {
    pub id: Option<String>,
    pub title: Option<String>,
    /// Present iff the upstream classifier produced data for this slot.
    pub breakdown: Option<Breakdown>,
    pub summary: Option<String>,
    pub adjustment_tips: Option<String>,
    pub image: Option<RawImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawImage {
    /// A `data:<mime>;base64,<payload>` URL or raw base64 image bytes.
    pub data: Option<String>,
    pub mime_type: Option<String>,
}

// ─── Canonical model (post-normalization) ───────────────────────

/// The fixed-shape model one render invocation owns. Never mutated after
/// normalization; the composer only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardModel {
    /// Possessive form of the client name, e.g. `Maria's`.
    pub client_title: String,
    pub week_label: String,
    pub palette: Palette,
    pub days: [DayColumn; DAY_COUNT],
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    pub label: String,
    /// Per-category mean over the data-bearing meals of this day.
    pub summary: Breakdown,
    pub meals: [MealSlot; MEAL_SLOTS],
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealSlot {
    pub id: String,
    pub title: String,
    pub breakdown: Breakdown,
    pub summary: String,
    pub adjustment_tips: String,
    pub image: Option<ImageRef>,
    pub has_data: bool,
}

/// Opaque encoded image data plus its format tag. The payload string doubles
/// as the identity key for the per-render image cache.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub payload: String,
    pub mime_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_six_digits() {
        let c = Color::from_hex("#4fa742").unwrap();
        assert!((c.r - 79.0 / 255.0).abs() < 1e-9);
        assert!((c.g - 167.0 / 255.0).abs() < 1e-9);
        assert!((c.b - 66.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_hex_short_form() {
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("abc"), Color::from_hex("#aabbcc"));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert_eq!(Color::from_hex(""), None);
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("not-a-color"), None);
    }

    #[test]
    fn test_breakdown_display_order_matches_category_order() {
        let b = Breakdown {
            veg_fruit: 1.0,
            healthy_carbs: 3.0,
            protein: 2.0,
            pause_food: 4.0,
        };
        assert_eq!(b.in_display_order(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_raw_dashboard_parses_sparse_json() {
        let raw: RawDashboard =
            serde_json::from_str(r#"{ "days": [ { "meals": [ {} ] } ] }"#).unwrap();
        assert_eq!(raw.days.len(), 1);
        assert!(raw.client_name.is_none());
        assert!(raw.days[0].meals[0].breakdown.is_none());
    }
}
