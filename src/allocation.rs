//! # Allocation Bar Proportioner
//!
//! Converts a four-category breakdown into contiguous segment widths that
//! always span the full container width. Rounding error is absorbed by the
//! last nonzero segment — a deliberate tie-break so the rendered bar never
//! shows a trailing gap.

use crate::model::Breakdown;

/// Segment widths in category display order, summing exactly to
/// `total_width`. An all-zero breakdown yields all-zero widths (the bar
/// renders as an empty track, not an error).
pub fn proportion_bar(breakdown: &Breakdown, total_width: f64) -> [f64; 4] {
    let values = breakdown.in_display_order().map(|v| v.max(0.0));
    let total: f64 = values.iter().sum();

    let mut widths = [0.0; 4];
    if total <= 0.0 || total_width <= 0.0 {
        return widths;
    }

    let last_nonzero = values
        .iter()
        .rposition(|&v| v > 0.0)
        .expect("total > 0 implies a nonzero value");

    let mut assigned = 0.0;
    for (i, &value) in values.iter().enumerate() {
        if value <= 0.0 {
            continue;
        }
        widths[i] = if i == last_nonzero {
            total_width - assigned
        } else {
            (value / total * total_width).min(total_width - assigned)
        };
        assigned += widths[i];
    }
    widths
}
