//! Structured error types for the weekplate rendering engine.
//!
//! Most bad input is absorbed by documented fallbacks (placeholder figures,
//! default palette entries, rescaled percentages) and never surfaces here.
//! What remains fatal: unparseable JSON input, an image payload whose bytes
//! are not a supported raster format, and PDF serialization failures. A
//! half-rendered page is never returned.

use thiserror::Error;

/// The unified error type returned by all public weekplate API functions.
#[derive(Debug, Error)]
pub enum ReportError {
    /// JSON input failed to parse as a dashboard record.
    #[error("failed to parse dashboard input: {0}")]
    Parse(#[from] serde_json::Error),

    /// An image payload yielded bytes that could not be decoded as JPEG or PNG.
    #[error("image for meal '{meal_id}' could not be decoded: {reason}")]
    Image { meal_id: String, reason: String },

    /// The assembled page could not be serialized to PDF bytes.
    #[error("pdf serialization failed: {0}")]
    Pdf(String),
}
