//! Geometry expansion for thick lines, circles and arcs.
//!
//! Everything here turns a primitive's parameters into concrete vertex
//! lists in model space, with no backend involvement, so the math is
//! testable on its own. Angles are measured clockwise from the positive
//! Y axis (compass style), which is why the sin/cos pairing looks
//! swapped.

use glam::{IVec2, ivec2};

use crate::render::defaults::CIRCLE_STEPS;
use crate::types::offset_coord;

/// Expanded form of a line of a given width.
#[derive(Clone, Debug, PartialEq)]
pub enum ThickLine {
    /// Width gives no thickness; draw a plain segment.
    Segment(IVec2, IVec2),
    /// Axis-aligned: one rectangle with square end caps.
    Quad([IVec2; 4]),
    /// General direction: two triangles, six vertices.
    Tris([IVec2; 6]),
}

pub fn thick_line(a: IVec2, b: IVec2, width: i32) -> ThickLine {
    let w = width / 2;
    if w <= 0 {
        return ThickLine::Segment(a, b);
    }
    let wl = w as i64;

    // Axis-aligned lines get exact rectangles; the two branches order the
    // endpoints so the caps extend outward on both ends.
    if (a.x <= b.x && a.y == b.y) || (a.x == b.x && a.y < b.y) {
        return ThickLine::Quad([
            ivec2(offset_coord(a.x, -wl), offset_coord(a.y, -wl)),
            ivec2(offset_coord(a.x, -wl), offset_coord(a.y, wl)),
            ivec2(offset_coord(b.x, wl), offset_coord(b.y, wl)),
            ivec2(offset_coord(b.x, wl), offset_coord(b.y, -wl)),
        ]);
    }
    if (a.x > b.x && a.y == b.y) || (a.x == b.x && a.y > b.y) {
        return ThickLine::Quad([
            ivec2(offset_coord(b.x, -wl), offset_coord(b.y, -wl)),
            ivec2(offset_coord(b.x, -wl), offset_coord(b.y, wl)),
            ivec2(offset_coord(a.x, wl), offset_coord(a.y, wl)),
            ivec2(offset_coord(a.x, wl), offset_coord(a.y, -wl)),
        ]);
    }

    let angle = ((b.y as i64 - a.y as i64) as f64).atan2((b.x as i64 - a.x as i64) as f64);
    let dx = (w as f64 * angle.sin()) as i64;
    let dy = (w as f64 * angle.cos()) as i64;
    let v0 = ivec2(offset_coord(a.x, dx), offset_coord(a.y, -dy));
    let v1 = ivec2(offset_coord(b.x, dx), offset_coord(b.y, -dy));
    let v2 = ivec2(offset_coord(b.x, -dx), offset_coord(b.y, dy));
    let v3 = ivec2(offset_coord(a.x, -dx), offset_coord(a.y, dy));
    ThickLine::Tris([v0, v1, v2, v2, v3, v0])
}

/// Vertices of a circle approximated with [`CIRCLE_STEPS`] segments,
/// starting at the top and sweeping clockwise.
pub fn circle_points(center: IVec2, radius: i32) -> Vec<IVec2> {
    let r = radius as f64;
    let step = std::f64::consts::TAU / CIRCLE_STEPS as f64;
    (0..CIRCLE_STEPS)
        .map(|i| {
            let angle = i as f64 * step;
            ivec2(
                offset_coord(center.x, (angle.sin() * r) as i64),
                offset_coord(center.y, (angle.cos() * r) as i64),
            )
        })
        .collect()
}

/// Quads tiling an annulus sector of the given stroke width.
///
/// The sector starts at `start` degrees (90 = north, growing clockwise)
/// and sweeps by `delta`; a negative delta sweeps backwards from the
/// start. Width is floored at 2 so the annulus never collapses.
pub fn arc_quads(
    center: IVec2,
    radius: i32,
    start: i32,
    delta: i32,
    width: i32,
) -> Vec<[IVec2; 4]> {
    let w = if width >= 2 { width } else { 2 };
    let r_outer = (radius + w / 2) as f64;
    let r_inner = (radius - w / 2) as f64;

    let mut angle_start = (((start - 90) % 360) as f64).to_radians();
    let mut angle_end = angle_start;
    let angle_delta = (delta as f64).to_radians();
    if angle_delta >= 0.0 {
        angle_end += angle_delta;
    } else {
        angle_start += angle_delta;
    }

    let sample = |angle: f64| -> (IVec2, IVec2) {
        let (s, c) = (angle.sin(), angle.cos());
        (
            ivec2((s * r_outer) as i32, (c * r_outer) as i32),
            ivec2((s * r_inner) as i32, (c * r_inner) as i32),
        )
    };

    // Rim samples at the step raster, plus the exact endpoint.
    let step = std::f64::consts::TAU / CIRCLE_STEPS as f64;
    let mut rim = Vec::with_capacity(CIRCLE_STEPS + 1);
    let mut angle = angle_start;
    while angle < angle_end {
        rim.push(sample(angle));
        angle += step;
    }
    rim.push(sample(angle_end));

    // The endpoint can quantize onto the last raster sample; drop the
    // degenerate sliver it would produce.
    if rim.len() > 1 && rim[rim.len() - 1].0 == rim[rim.len() - 2].0 {
        rim.pop();
    }

    rim.windows(2)
        .map(|pair| {
            let ((o0, i0), (o1, i1)) = (pair[0], pair[1]);
            [
                ivec2(offset_coord(center.x, o0.x as i64), offset_coord(center.y, o0.y as i64)),
                ivec2(offset_coord(center.x, o1.x as i64), offset_coord(center.y, o1.y as i64)),
                ivec2(offset_coord(center.x, i1.x as i64), offset_coord(center.y, i1.y as i64)),
                ivec2(offset_coord(center.x, i0.x as i64), offset_coord(center.y, i0.y as i64)),
            ]
        })
        .collect()
}
