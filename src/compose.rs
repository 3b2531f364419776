//! # Composition Orchestrator
//!
//! Sequences one full page build: Normalize (done upstream) → Plan → Draw.
//! The draw phase walks the page in a fixed order — header, legend with the
//! aggregate chart, then seven day columns of three cards each — and every
//! element's geometry comes from the single [`LayoutPlan`] solved up front.
//!
//! Physical page size and margins are configuration constants, not computed.
//! The orchestrator owns a per-call image cache keyed by encoded payload, so
//! a photo referenced by two cards is decoded and embedded once; nothing
//! survives the call.

use std::collections::HashMap;

use serde::Serialize;

use crate::allocation::proportion_bar;
use crate::donut::{donut_wedges, DonutSegment};
use crate::error::ReportError;
use crate::font::Font;
use crate::image::{decode_image, fit_rect, payload_bytes, Rect};
use crate::layout::{clamp_finite, solve_column_layout, ColumnBudget, LayoutPlan};
use crate::model::{
    Breakdown, Color, DashboardModel, DayColumn, MealSlot, CATEGORY_ORDER, DAY_COUNT, MEAL_SLOTS,
};
use crate::pdf::{write_document, PageCanvas};
use crate::text::wrap_text;

pub const POINTS_PER_INCH: f64 = 72.0;

// US Letter landscape with fixed margins; everything in points.
const PAGE_WIDTH: f64 = 11.0 * POINTS_PER_INCH;
const PAGE_HEIGHT: f64 = 8.5 * POINTS_PER_INCH;
const PAGE_MARGIN: f64 = 0.35 * POINTS_PER_INCH;
const HEADER_HEIGHT: f64 = 1.45 * POINTS_PER_INCH;
const HEADER_GAP: f64 = 0.2 * POINTS_PER_INCH;
const LEGEND_WIDTH: f64 = 3.6 * POINTS_PER_INCH;
const LEGEND_GAP: f64 = 0.3 * POINTS_PER_INCH;
const COLUMN_GUTTER: f64 = 0.1 * POINTS_PER_INCH;
const CARD_GAP: f64 = 0.08 * POINTS_PER_INCH;
const DONUT_RADIUS: f64 = 0.42 * POINTS_PER_INCH;
const BRAND_CIRCLE_DIAMETER: f64 = 0.75 * POINTS_PER_INCH;

const HEADING_SIZE: f64 = 32.0;
const SUBHEAD_SIZE: f64 = 24.0;
const BODY_SIZE: f64 = 11.5;
const LABEL_SIZE: f64 = 9.0;
const LABEL_BLOCK_SPACING: f64 = 12.0;
const DONUT_BLOCK_SPACING: f64 = 10.0;
const CARD_TARGET_HEIGHT: f64 = 138.0;
const CARD_MIN_HEIGHT: f64 = 104.0;
const CARD_IMAGE_RATIO: f64 = 0.46;
const INNER_RADIUS_RATIO: f64 = 0.55;
const CARD_PADDING: f64 = 10.0;

const TITLE_ACCENT: Color = Color::rgb255(0xF4, 0x8A, 0x1F);
const TEXT_DARK: Color = Color::rgb255(25, 25, 25);
const TEXT_MUTED: Color = Color::rgb255(111, 111, 111);
const PLACEHOLDER_BG: Color = Color::rgb255(247, 247, 247);
const PLACEHOLDER_STROKE: Color = Color::rgb255(210, 210, 210);
const BAR_TRACK: Color = Color { r: 0.93, g: 0.93, b: 0.93 };

const EMPTY_SUMMARY_TEXT: &str = "Awaiting notes\u{2026}";
const EMPTY_SLOT_TIP: &str = "Drop a meal photo or use the wizard to capture this slot.";

/// Every resolved layout dimension of one render, for external validation.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
    pub width_pt: f64,
    pub height_pt: f64,
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,
    pub column_width_pt: f64,
    pub column_width_in: f64,
    pub body_height_pt: f64,
    pub card_height_pt: f64,
    pub card_gap_pt: f64,
    pub label_block_pt: f64,
    pub donut_block_pt: f64,
    pub donut_radius_pt: f64,
    pub meal_slots: usize,
}

impl ReportMetrics {
    /// Leftover vertical space in a day column. Negative means the fit
    /// invariant is violated; the engine reports it rather than erroring,
    /// since a caller may accept slight overflow into print margins.
    pub fn fit_slack_pt(&self) -> f64 {
        let required = self.label_block_pt
            + self.donut_block_pt
            + self.card_height_pt * self.meal_slots as f64
            + self.card_gap_pt * self.meal_slots.saturating_sub(1) as f64;
        self.body_height_pt - required
    }

    pub fn fits(&self, epsilon: f64) -> bool {
        self.fit_slack_pt() >= -epsilon
    }
}

/// The document bytes plus the metrics a caller needs to validate the fit.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub metrics: ReportMetrics,
}

/// Build the complete page for an already-normalized model.
pub fn compose(model: &DashboardModel) -> Result<RenderedReport, ReportError> {
    let body_top = PAGE_HEIGHT - PAGE_MARGIN - HEADER_HEIGHT - HEADER_GAP;
    let body_height = body_top - PAGE_MARGIN;
    let printable_width = PAGE_WIDTH - PAGE_MARGIN * 2.0;
    let column_width =
        (printable_width - COLUMN_GUTTER * (DAY_COUNT - 1) as f64) / DAY_COUNT as f64;

    let plan = solve_column_layout(&ColumnBudget {
        body_height,
        slot_count: MEAL_SLOTS,
        min_donut_radius: DONUT_RADIUS * 0.65,
        max_donut_radius: DONUT_RADIUS,
        label_block_height: LABEL_SIZE + LABEL_BLOCK_SPACING,
        donut_spacing: DONUT_BLOCK_SPACING,
        card_gap: CARD_GAP,
        target_card_height: CARD_TARGET_HEIGHT,
        min_card_height: CARD_MIN_HEIGHT,
    });

    let mut composer = Composer {
        canvas: PageCanvas::new(PAGE_WIDTH, PAGE_HEIGHT),
        model,
        plan,
        body_top,
        column_width,
        image_cache: HashMap::new(),
    };

    composer.draw_header();
    composer.draw_day_columns()?;

    let title = format!("{} {}", model.client_title, model.week_label);
    let bytes = write_document(&composer.canvas, &title)?;

    Ok(RenderedReport {
        bytes,
        metrics: ReportMetrics {
            width_pt: PAGE_WIDTH,
            height_pt: PAGE_HEIGHT,
            width_in: PAGE_WIDTH / POINTS_PER_INCH,
            height_in: PAGE_HEIGHT / POINTS_PER_INCH,
            dpi: POINTS_PER_INCH,
            column_width_pt: column_width,
            column_width_in: column_width / POINTS_PER_INCH,
            body_height_pt: plan.body_height,
            card_height_pt: plan.card_height,
            card_gap_pt: plan.card_gap,
            label_block_pt: plan.label_block_height,
            donut_block_pt: plan.donut_block_height,
            donut_radius_pt: plan.donut_radius,
            meal_slots: plan.slot_count,
        },
    })
}

/// Decoded-image bookkeeping for the per-call cache.
#[derive(Clone, Copy)]
struct CachedImage {
    index: usize,
    width_px: u32,
    height_px: u32,
}

struct Composer<'a> {
    canvas: PageCanvas,
    model: &'a DashboardModel,
    plan: LayoutPlan,
    body_top: f64,
    column_width: f64,
    /// Encoded payload → embedded XObject, scoped to this render call.
    image_cache: HashMap<String, CachedImage>,
}

impl Composer<'_> {
    fn draw_header(&mut self) {
        let top_y = PAGE_HEIGHT - PAGE_MARGIN;
        let title_size = HEADING_SIZE + 2.0;
        let subhead_size = SUBHEAD_SIZE - 6.0;

        self.canvas.text(
            &self.model.client_title,
            PAGE_MARGIN,
            top_y - title_size,
            Font::HelveticaBold,
            title_size,
            TITLE_ACCENT,
        );
        self.canvas.text(
            &self.model.week_label,
            PAGE_MARGIN,
            top_y - title_size - subhead_size - 6.0,
            Font::HelveticaBold,
            subhead_size,
            TEXT_DARK,
        );

        self.draw_legend(Rect {
            x: PAGE_WIDTH - PAGE_MARGIN - LEGEND_WIDTH,
            y: top_y,
            width: LEGEND_WIDTH,
            height: HEADER_HEIGHT - LEGEND_GAP,
        });
    }

    /// Aggregate donut, brand mark, and one swatch row per category.
    /// `bounds.y` is the top edge.
    fn draw_legend(&mut self, bounds: Rect) {
        let padding = 10.0;
        let radius = self.plan.donut_radius.min(bounds.width / 2.2);
        let cx = bounds.x + radius + padding;
        let cy = bounds.y - padding - radius;

        let summary = overall_summary(&self.model.days);
        self.draw_donut(cx, cy, radius, &summary);

        let brand = BRAND_CIRCLE_DIAMETER;
        let brand_x = bounds.x + bounds.width - brand - padding;
        let brand_y = cy + radius - brand / 2.0;
        self.canvas.fill_circle(
            brand_x + brand / 2.0,
            brand_y + brand / 2.0,
            brand / 2.0,
            self.model.palette.pause_food,
        );
        self.canvas.text(
            "w",
            brand_x + brand / 2.0 - 6.0,
            brand_y + brand / 2.0 - 6.0,
            Font::HelveticaBold,
            14.0,
            Color::WHITE,
        );

        let list_x = cx + radius + padding;
        let list_y = cy + radius - padding;
        let line_height = BODY_SIZE + 2.0;
        for (index, category) in CATEGORY_ORDER.iter().enumerate() {
            let y = list_y - index as f64 * line_height;
            let color = self.model.palette.color(category.key);
            self.canvas.fill_rect(list_x, y - 5.0, 9.0, 9.0, color);
            self.canvas.text(
                category.label,
                list_x + 14.0,
                y - BODY_SIZE,
                Font::Helvetica,
                BODY_SIZE,
                TEXT_DARK,
            );
        }
    }

    fn draw_day_columns(&mut self) -> Result<(), ReportError> {
        for index in 0..DAY_COUNT {
            let day = &self.model.days[index];
            let column_x = PAGE_MARGIN + index as f64 * (self.column_width + COLUMN_GUTTER);
            self.draw_day_column(day.clone(), column_x)?;
        }
        Ok(())
    }

    fn draw_day_column(&mut self, day: DayColumn, column_x: f64) -> Result<(), ReportError> {
        let mut cursor_y = self.body_top;

        self.canvas.text(
            &day.label.to_uppercase(),
            column_x,
            cursor_y - LABEL_SIZE,
            Font::HelveticaBold,
            LABEL_SIZE,
            TEXT_DARK,
        );
        cursor_y -= self.plan.label_block_height;

        // The column may be narrower than the solved radius allows for.
        let radius = self.plan.donut_radius.min(self.column_width * 0.42);
        self.draw_donut(column_x + radius, cursor_y - radius, radius, &day.summary);
        cursor_y -= radius * 2.0 + self.plan.donut_spacing;

        for meal in &day.meals {
            cursor_y = self.draw_meal_card(meal, column_x, cursor_y)?;
            cursor_y -= self.plan.card_gap;
        }
        Ok(())
    }

    /// One bordered card: title, photo (or placeholder), allocation bar,
    /// wrapped summary, optional wrapped tip. Returns the card's bottom edge.
    fn draw_meal_card(
        &mut self,
        meal: &MealSlot,
        x: f64,
        top_y: f64,
    ) -> Result<f64, ReportError> {
        let width = self.column_width;
        let card_height = self.plan.card_height;
        let card_y = top_y - card_height;
        let inner_width = width - CARD_PADDING * 2.0;

        self.canvas.fill_rect(x, card_y, width, card_height, Color::WHITE);
        self.canvas
            .stroke_rect(x, card_y, width, card_height, self.model.palette.neutral, 0.8);

        let title_lines = wrap_text(
            &meal.title,
            |s| Font::HelveticaBold.measure(s, BODY_SIZE),
            inner_width,
            1,
        );
        if let Some(line) = title_lines.first() {
            self.canvas.text(
                line,
                x + CARD_PADDING,
                top_y - CARD_PADDING - BODY_SIZE,
                Font::HelveticaBold,
                BODY_SIZE,
                TEXT_DARK,
            );
        }

        // Text below the image keeps a 48pt reservation; the image gets the
        // rest, bounded to a sane band of the card.
        let reserved_below_image = 48.0;
        let max_image_height =
            (card_height - (BODY_SIZE + CARD_PADDING * 2.0 + reserved_below_image)).max(40.0);
        let image_height = clamp_finite(max_image_height, 40.0, card_height * CARD_IMAGE_RATIO);
        let image_y = top_y - CARD_PADDING - BODY_SIZE - 12.0 - image_height;
        self.draw_meal_image(
            meal,
            Rect {
                x: x + CARD_PADDING,
                y: image_y,
                width: inner_width,
                height: image_height,
            },
        )?;

        let bar_y = image_y - 14.0;
        self.draw_allocation_bar(&meal.breakdown, x + CARD_PADDING, bar_y, inner_width, 8.0);

        let mut text_cursor = bar_y - 14.0;
        let summary_text = if meal.summary.is_empty() {
            EMPTY_SUMMARY_TEXT
        } else {
            &meal.summary
        };
        let summary_lines = wrap_text(
            summary_text,
            |s| Font::Helvetica.measure(s, LABEL_SIZE),
            inner_width,
            3,
        );
        text_cursor =
            self.draw_text_lines(&summary_lines, x + CARD_PADDING, text_cursor, TEXT_MUTED);

        let tip_text = if !meal.adjustment_tips.is_empty() {
            meal.adjustment_tips.as_str()
        } else if !meal.has_data {
            EMPTY_SLOT_TIP
        } else {
            ""
        };
        if !tip_text.is_empty() {
            let tip_lines = wrap_text(
                tip_text,
                |s| Font::Helvetica.measure(s, LABEL_SIZE),
                inner_width,
                2,
            );
            self.draw_text_lines(&tip_lines, x + CARD_PADDING, text_cursor - 10.0, TEXT_DARK);
        }

        Ok(card_y)
    }

    fn draw_text_lines(&mut self, lines: &[String], x: f64, start_y: f64, color: Color) -> f64 {
        let line_height = LABEL_SIZE + 2.0;
        let mut cursor = start_y;
        for line in lines {
            self.canvas
                .text(line, x, cursor - LABEL_SIZE, Font::Helvetica, LABEL_SIZE, color);
            cursor -= line_height;
        }
        cursor
    }

    fn draw_donut(&mut self, cx: f64, cy: f64, radius: f64, breakdown: &Breakdown) {
        let segments: Vec<DonutSegment> = CATEGORY_ORDER
            .iter()
            .map(|category| DonutSegment {
                value: breakdown.get(category.key),
                color: self.model.palette.color(category.key),
            })
            .collect();
        for wedge in donut_wedges(cx, cy, radius, INNER_RADIUS_RATIO, &segments) {
            self.canvas.fill_path(&wedge.path, wedge.color);
        }
        // Punch the annular hole with the page background.
        self.canvas
            .fill_circle(cx, cy, radius * INNER_RADIUS_RATIO, self.model.palette.canvas_bg);
    }

    fn draw_allocation_bar(&mut self, breakdown: &Breakdown, x: f64, y: f64, width: f64, height: f64) {
        self.canvas.fill_rect(x, y, width, height, BAR_TRACK);
        let widths = proportion_bar(breakdown, width);
        let mut cursor = x;
        for (index, category) in CATEGORY_ORDER.iter().enumerate() {
            let segment_width = widths[index];
            if segment_width <= 0.0 {
                continue;
            }
            self.canvas.fill_rect(
                cursor,
                y,
                segment_width,
                height,
                self.model.palette.color(category.key),
            );
            cursor += segment_width;
        }
        self.canvas
            .stroke_rect(x, y, width, height, self.model.palette.neutral, 0.5);
    }

    /// Embed the meal photo fit-and-centered, or draw the crossed-box
    /// placeholder. Decoding happens at most once per distinct payload.
    fn draw_meal_image(&mut self, meal: &MealSlot, bounds: Rect) -> Result<(), ReportError> {
        let Some(image_ref) = &meal.image else {
            self.draw_image_placeholder(bounds);
            return Ok(());
        };

        let cached = match self.image_cache.get(&image_ref.payload) {
            Some(&hit) => hit,
            None => {
                let Some(bytes) = payload_bytes(&image_ref.payload) else {
                    // Nothing decodable behind the reference: a missing
                    // photo must not abort the page.
                    self.draw_image_placeholder(bounds);
                    return Ok(());
                };
                let loaded = decode_image(&bytes).map_err(|reason| ReportError::Image {
                    meal_id: meal.id.clone(),
                    reason,
                })?;
                let entry = CachedImage {
                    width_px: loaded.width_px,
                    height_px: loaded.height_px,
                    index: self.canvas.register_image(loaded),
                };
                self.image_cache.insert(image_ref.payload.clone(), entry);
                entry
            }
        };

        let placed = fit_rect(cached.width_px as f64, cached.height_px as f64, bounds);
        self.canvas
            .draw_image(cached.index, placed.x, placed.y, placed.width, placed.height);
        Ok(())
    }

    fn draw_image_placeholder(&mut self, b: Rect) {
        self.canvas.fill_rect(b.x, b.y, b.width, b.height, PLACEHOLDER_BG);
        self.canvas
            .stroke_rect(b.x, b.y, b.width, b.height, PLACEHOLDER_STROKE, 0.75);
        let inset = 6.0;
        self.canvas.line(
            b.x + inset,
            b.y + inset,
            b.x + b.width - inset,
            b.y + b.height - inset,
            PLACEHOLDER_STROKE,
            0.5,
        );
        self.canvas.line(
            b.x + b.width - inset,
            b.y + inset,
            b.x + inset,
            b.y + b.height - inset,
            PLACEHOLDER_STROKE,
            0.5,
        );
    }
}

/// Mean of the seven day summaries. A week with no data at all gets the
/// neutral even split so the legend chart still reads as a chart.
fn overall_summary(days: &[DayColumn]) -> Breakdown {
    if days.is_empty() {
        return Breakdown::even_split();
    }
    let count = days.len() as f64;
    let mut totals = Breakdown::default();
    for day in days {
        totals.veg_fruit += day.summary.veg_fruit;
        totals.healthy_carbs += day.summary.healthy_carbs;
        totals.protein += day.summary.protein;
        totals.pause_food += day.summary.pause_food;
    }
    let mean = Breakdown {
        veg_fruit: totals.veg_fruit / count,
        healthy_carbs: totals.healthy_carbs / count,
        protein: totals.protein / count,
        pause_food: totals.pause_food / count,
    };
    if mean.total() <= 0.0 {
        Breakdown::even_split()
    } else {
        mean
    }
}
