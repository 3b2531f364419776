//! # Weekplate
//!
//! A weekly meal-report renderer: one JSON record describing a client's
//! tracked week in, one single-page landscape PDF out.
//!
//! The page is fixed, not flowed. A week is always seven day columns of three
//! meal cards each, so instead of a general layout engine there is a single
//! closed-form solve that sizes the per-column donut chart and the card
//! heights so the grid always fits the printable area. Sparse or malformed
//! input is coerced up front; after normalization the composer never branches
//! on missing data.
//!
//! ## Pipeline
//!
//! ```text
//! Input (JSON)
//!       ↓
//!  [normalize]  — Coerce to the fixed 7×3 model, rescale percentages
//!       ↓
//!   [layout]    — Solve donut radius + card height for the column budget
//!       ↓
//!   [compose]   — Header, legend, columns, cards onto one canvas
//!       ↓
//!    [pdf]      — Serialize to PDF bytes
//! ```

pub mod model;
pub mod normalize;
pub mod layout;
pub mod donut;
pub mod allocation;
pub mod text;
pub mod font;
pub mod image;
pub mod compose;
pub mod pdf;
pub mod error;

pub use compose::{ReportMetrics, RenderedReport};
pub use error::ReportError;

use model::RawDashboard;

/// Render a weekly report to PDF bytes.
///
/// This is the primary entry point. Takes the raw dashboard record as
/// deserialized and returns the document bytes plus the resolved layout
/// metrics.
pub fn render(raw: &RawDashboard) -> Result<RenderedReport, ReportError> {
    let dashboard = normalize::normalize(raw);
    compose::compose(&dashboard)
}

/// Render a weekly report described as JSON to PDF bytes.
pub fn render_json(json: &str) -> Result<RenderedReport, ReportError> {
    let raw: RawDashboard = serde_json::from_str(json)?;
    render(&raw)
}
