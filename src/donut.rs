//! # Annular Chart Geometry
//!
//! Turns a set of proportion segments into annulus-slice outlines ready for
//! the PDF path operators. Segments sweep clockwise from 12 o'clock in the
//! order given. PDF has no arc operator, so every arc is emitted as cubic
//! Bézier spans of at most 90°; a single segment at 100% of the total renders
//! as a full ring instead of a degenerate zero-length arc.

use crate::model::Color;

/// Proportion value plus fill color for one chart segment.
#[derive(Debug, Clone, Copy)]
pub struct DonutSegment {
    pub value: f64,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Path drawing instructions in page coordinates (y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    /// Cubic Bézier: two control points, then the end point.
    CurveTo(Point, Point, Point),
    Close,
}

/// A filled annulus slice.
#[derive(Debug, Clone)]
pub struct Wedge {
    pub color: Color,
    pub path: Vec<PathCmd>,
}

/// Compute the wedges for one donut chart.
///
/// Segments with `value <= 0` are skipped entirely. If the total is zero the
/// result is empty — no wedges, no division by zero; callers wanting a
/// visually-neutral chart in that case substitute their own segment set.
/// The inner hole is not part of the wedge paths: callers fill a circle of
/// `outer_radius * inner_ratio` in the page background color on top.
pub fn donut_wedges(
    cx: f64,
    cy: f64,
    outer_radius: f64,
    inner_ratio: f64,
    segments: &[DonutSegment],
) -> Vec<Wedge> {
    let total: f64 = segments.iter().map(|s| s.value.max(0.0)).sum();
    if total <= 0.0 || outer_radius <= 0.0 {
        return Vec::new();
    }
    let inner_radius = outer_radius * inner_ratio;

    let mut wedges = Vec::new();
    let mut bearing = 0.0;
    for segment in segments {
        let value = segment.value.max(0.0);
        if value <= 0.0 {
            continue;
        }
        let sweep = value / total * 360.0;
        wedges.push(Wedge {
            color: segment.color,
            path: annulus_slice(cx, cy, outer_radius, inner_radius, bearing, bearing + sweep),
        });
        bearing += sweep;
    }
    wedges
}

/// Bearing degrees → page point. Bearing 0 is 12 o'clock, increasing
/// clockwise as seen on the page.
pub fn polar(cx: f64, cy: f64, radius: f64, bearing_deg: f64) -> Point {
    let a = bearing_deg.to_radians();
    Point {
        x: cx + radius * a.sin(),
        y: cy + radius * a.cos(),
    }
}

/// Outline one annulus slice: outer arc start→end, radial line inward, inner
/// arc back end→start, close (the closing edge is the second radial line).
fn annulus_slice(
    cx: f64,
    cy: f64,
    outer_r: f64,
    inner_r: f64,
    start_deg: f64,
    end_deg: f64,
) -> Vec<PathCmd> {
    let mut path = vec![PathCmd::MoveTo(polar(cx, cy, outer_r, start_deg))];
    arc_to(&mut path, cx, cy, outer_r, start_deg, end_deg);
    path.push(PathCmd::LineTo(polar(cx, cy, inner_r, end_deg)));
    arc_to(&mut path, cx, cy, inner_r, end_deg, start_deg);
    path.push(PathCmd::Close);
    path
}

/// Append Bézier spans approximating a circular arc from `from_deg` to
/// `to_deg` (either direction). Spans never exceed 90° — that keeps the
/// standard tangent-length approximation accurate and handles sweeps past
/// 180° (the SVG large-arc case) and full 360° rings alike.
fn arc_to(path: &mut Vec<PathCmd>, cx: f64, cy: f64, radius: f64, from_deg: f64, to_deg: f64) {
    let total_sweep = to_deg - from_deg;
    if total_sweep == 0.0 {
        return;
    }
    let spans = (total_sweep.abs() / 90.0).ceil().max(1.0) as usize;
    let step = total_sweep / spans as f64;

    for i in 0..spans {
        let a0 = (from_deg + step * i as f64).to_radians();
        let a1 = (from_deg + step * (i + 1) as f64).to_radians();
        // Tangent length for a cubic approximating a circular span.
        let k = 4.0 / 3.0 * ((a1 - a0) / 4.0).tan() * radius;

        let p0 = Point {
            x: cx + radius * a0.sin(),
            y: cy + radius * a0.cos(),
        };
        let p1 = Point {
            x: cx + radius * a1.sin(),
            y: cy + radius * a1.cos(),
        };
        // Unit tangent along increasing bearing at a is (cos a, -sin a).
        let c0 = Point {
            x: p0.x + k * a0.cos(),
            y: p0.y - k * a0.sin(),
        };
        let c1 = Point {
            x: p1.x - k * a1.cos(),
            y: p1.y + k * a1.sin(),
        };
        path.push(PathCmd::CurveTo(c0, c1, p1));
    }
}
