//! Integration tests for the Weekplate rendering pipeline.
//!
//! These tests exercise the full path from JSON input to PDF output.
//! They verify:
//! - JSON deserialization tolerates sparse and malformed records
//! - Normalization always produces the fixed 7×3 week grid
//! - The resolved layout satisfies the column fit invariant
//! - PDF output is structurally valid
//! - Image failures split correctly into placeholder vs. fatal

use weekplate::model::{DAY_COUNT, MEAL_SLOTS};
use weekplate::normalize::normalize;
use weekplate::{render_json, ReportError};

// ─── Helpers ────────────────────────────────────────────────────

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 50, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(
        bytes.windows(5).any(|w| w == b"%%EOF"),
        "Missing %%EOF marker"
    );
    assert!(
        bytes.windows(4).any(|w| w == b"xref"),
        "Missing xref table"
    );
}

fn base64_of(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn tiny_png_data_uri() -> String {
    let mut img = image::RgbaImage::new(3, 2);
    for pixel in img.pixels_mut() {
        *pixel = image::Rgba([200, 100, 50, 255]);
    }
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(encoder, img.as_raw(), 3, 2, image::ColorType::Rgba8)
        .unwrap();
    format!("data:image/png;base64,{}", base64_of(&buf))
}

// ─── Full pipeline ──────────────────────────────────────────────

#[test]
fn test_empty_record_renders_full_page() {
    let report = render_json("{}").unwrap();
    assert_valid_pdf(&report.bytes);
}

#[test]
fn test_example_record_renders() {
    let json = r##"{
        "clientName": "Ana",
        "weekLabel": "Week of Feb 9",
        "days": [
            {
                "label": "Monday",
                "meals": [
                    {
                        "title": "Oatmeal with berries",
                        "breakdown": { "vegFruit": 35, "healthyCarbs": 45, "protein": 15, "pauseFood": 5 },
                        "summary": "Rolled oats with blueberries.",
                        "adjustmentTips": "Add a boiled egg."
                    }
                ]
            }
        ]
    }"##;
    let report = render_json(json).unwrap();
    assert_valid_pdf(&report.bytes);

    // Possessive title lands in the Info dictionary uncompressed.
    let text = String::from_utf8_lossy(&report.bytes);
    assert!(text.contains("Ana's Week of Feb 9"));
}

#[test]
fn test_invalid_json_is_a_parse_error() {
    match render_json("{ not json") {
        Err(ReportError::Parse(_)) => {}
        other => panic!("expected parse error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_metrics_fit_invariant_holds() {
    let report = render_json("{}").unwrap();
    let m = report.metrics;
    assert!(m.fits(1e-6), "columns overflow by {}pt", -m.fit_slack_pt());
    assert!((m.width_in - 11.0).abs() < 1e-9);
    assert!((m.height_in - 8.5).abs() < 1e-9);
    assert_eq!(m.meal_slots, MEAL_SLOTS);
    // Seven columns plus six gutters span the printable width.
    let printable = m.width_pt - 2.0 * 0.35 * 72.0;
    let spanned = m.column_width_pt * DAY_COUNT as f64 + 0.1 * 72.0 * (DAY_COUNT - 1) as f64;
    assert!((printable - spanned).abs() < 1e-6);
}

// ─── Normalization through the public surface ───────────────────

#[test]
fn test_week_grid_is_always_seven_by_three() {
    let raw = serde_json::from_str(r#"{ "days": [ { "meals": [ {}, {}, {}, {}, {} ] } ] }"#)
        .unwrap();
    let model = normalize(&raw);
    assert_eq!(model.days.len(), DAY_COUNT);
    for day in &model.days {
        assert_eq!(day.meals.len(), MEAL_SLOTS);
    }
    // The fourth and fifth meal of the over-long day were dropped.
    assert_eq!(model.days[0].meals[2].id, "day-1-meal-3");
}

#[test]
fn test_breakdown_rescaled_to_hundred() {
    let raw = serde_json::from_str(
        r#"{ "days": [ { "meals": [ { "breakdown":
            { "vegFruit": 20, "healthyCarbs": 20, "protein": 20, "pauseFood": 20 } } ] } ] }"#,
    )
    .unwrap();
    let model = normalize(&raw);
    let b = model.days[0].meals[0].breakdown;
    assert!((b.total() - 100.0).abs() <= 0.5, "total was {}", b.total());
    assert!((b.veg_fruit - 25.0).abs() < 1e-9);
}

// ─── Image paths ────────────────────────────────────────────────

#[test]
fn test_png_image_is_embedded() {
    let json = format!(
        r#"{{ "days": [ {{ "meals": [ {{
            "breakdown": {{ "vegFruit": 100 }},
            "image": {{ "data": "{}" }}
        }} ] }} ] }}"#,
        tiny_png_data_uri()
    );
    let report = render_json(&json).unwrap();
    assert_valid_pdf(&report.bytes);
    let text = String::from_utf8_lossy(&report.bytes);
    assert!(text.contains("/XObject"), "page should carry an image XObject");
    assert!(text.contains("/Im0"));
}

#[test]
fn test_unreadable_payload_renders_placeholder() {
    // A data URI with no payload after the comma marker is "no photo",
    // not a render failure.
    let json = r#"{ "days": [ { "meals": [ {
        "image": { "data": "data:image/png;base64" }
    } ] } ] }"#;
    let report = render_json(json).unwrap();
    assert_valid_pdf(&report.bytes);
    let text = String::from_utf8_lossy(&report.bytes);
    assert!(!text.contains("/XObject"), "placeholder must not embed an image");
}

#[test]
fn test_non_raster_payload_is_fatal() {
    let json = format!(
        r#"{{ "days": [ {{ "meals": [ {{
            "image": {{ "data": "data:image/gif;base64,{}" }}
        }} ] }} ] }}"#,
        base64_of(b"GIF89a not a supported format")
    );
    match render_json(&json) {
        Err(ReportError::Image { meal_id, .. }) => {
            assert_eq!(meal_id, "day-1-meal-1");
        }
        other => panic!("expected fatal image error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_shared_image_payload_embedded_once() {
    let uri = tiny_png_data_uri();
    let json = format!(
        r#"{{ "days": [ {{ "meals": [
            {{ "image": {{ "data": "{uri}" }} }},
            {{ "image": {{ "data": "{uri}" }} }}
        ] }} ] }}"#
    );
    let report = render_json(&json).unwrap();
    let text = String::from_utf8_lossy(&report.bytes);
    assert!(text.contains("/Im0"));
    assert!(!text.contains("/Im1"), "identical payloads share one XObject");
}

// ─── Determinism ────────────────────────────────────────────────

#[test]
fn test_render_is_deterministic() {
    let json = r#"{ "clientName": "Ana", "days": [ { "meals": [
        { "breakdown": { "vegFruit": 60, "protein": 40 } } ] } ] }"#;
    let first = render_json(json).unwrap();
    let second = render_json(json).unwrap();
    assert_eq!(first.bytes, second.bytes);
}
