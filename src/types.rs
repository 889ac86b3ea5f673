//! Clamped numeric parsing and small geometry types for the primitive language.
//!
//! Every numeric field in the language has a documented range and is
//! clamped, never rejected. Non-numeric input parses as 0 and is then
//! clamped like any other out-of-range value.

use glam::{I64Vec2, IVec2};
use std::fmt;

/// Coordinates are limited to `[-LARGE, LARGE]`.
pub const LARGE: i32 = 2_000_000_000;

/// Highest togglable layer. Layer 0 is reserved for always-visible
/// overlay content.
pub const MAX_LAYERS: u8 = 12;

/// Maximum scale (and width) factor: 2^20.
pub const MAX_SCALE: i32 = 1 << 20;

/// An RGB color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// The rotation quantum applied to text and image extents.
///
/// The language accepts any angle 0..=359 but only quarter turns have a
/// defined extent mapping; anything else snaps to no rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub fn from_degrees(deg: i32) -> Self {
        match deg {
            90 => Rotation::R90,
            180 => Rotation::R180,
            270 => Rotation::R270,
            _ => Rotation::R0,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// Map a scaled width/height to the offset of the opposite corner.
    ///
    /// This is the fixed quarter-turn table: each turn swaps the axes
    /// and flips signs so the rectangle sweeps out in the rotated
    /// direction.
    pub fn extent(self, sw: i64, sh: i64) -> (i64, i64) {
        match self {
            Rotation::R0 => (sw, sh),
            Rotation::R90 => (-sh, sw),
            Rotation::R180 => (-sw, -sh),
            Rotation::R270 => (sh, -sw),
        }
    }
}

// ============================================================================
// Clamped parsing
// ============================================================================

/// Best-effort integer parse: optional sign followed by a digit prefix,
/// anything after the prefix ignored. Empty or non-numeric input is 0.
fn atoi(s: &str) -> i64 {
    let s = s.trim_start();
    let mut chars = s.chars().peekable();
    let negative = match chars.peek() {
        Some('-') => {
            chars.next();
            true
        }
        Some('+') => {
            chars.next();
            false
        }
        _ => false,
    };
    let mut value: i64 = 0;
    for c in chars {
        let Some(d) = c.to_digit(10) else { break };
        value = value.saturating_mul(10).saturating_add(d as i64);
    }
    if negative { -value } else { value }
}

fn clamped(s: &str, min: i64, max: i64) -> i32 {
    atoi(s).clamp(min, max) as i32
}

/// Limit coordinates to the `[-LARGE, LARGE]` range.
pub fn coord(s: &str) -> i32 {
    clamped(s, -(LARGE as i64), LARGE as i64)
}

/// Limit a color channel to 0..=255.
pub fn color_level(s: &str) -> u8 {
    clamped(s, 0, 255) as u8
}

/// Limit scale (and width) factors to 1..=2^20.
pub fn scale_factor(s: &str) -> i32 {
    clamped(s, 1, MAX_SCALE as i64)
}

/// Limit a radius to 1..=LARGE.
pub fn radius(s: &str) -> i32 {
    clamped(s, 1, LARGE as i64)
}

/// Limit an angle to whole degrees 0..=359.
pub fn angle(s: &str) -> i32 {
    clamped(s, 0, 359)
}

/// Limit a delta angle to -360..=360.
pub fn delta_angle(s: &str) -> i32 {
    clamped(s, -360, 360)
}

/// Limit a layer to 1..=MAX_LAYERS.
pub fn layer_index(s: &str) -> u8 {
    clamped(s, 1, MAX_LAYERS as i64) as u8
}

/// Offset a coordinate by a (possibly huge) derived extent, staying
/// inside the coordinate range instead of wrapping.
pub fn offset_coord(base: i32, delta: i64) -> i32 {
    (base as i64 + delta).clamp(-(LARGE as i64), LARGE as i64) as i32
}

// ============================================================================
// Bounding box
// ============================================================================

/// Axis-aligned bounding box over primitive contributing points.
///
/// Extrema are kept as i64 so the 5%-per-side margin cannot overflow even
/// when the scene spans the whole coordinate range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BBox {
    pub min: I64Vec2,
    pub max: I64Vec2,
}

impl BBox {
    /// Create an empty bounding box (will contract on first point).
    pub fn new() -> Self {
        BBox {
            min: I64Vec2::splat(LARGE as i64 + 1),
            max: I64Vec2::splat(-(LARGE as i64) - 1),
        }
    }

    /// An empty box means zero geometry primitives ever contributed.
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y
    }

    /// Extend the box to include a point.
    pub fn expand_point(&mut self, p: IVec2) {
        let p = p.as_i64vec2();
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn width(&self) -> i64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i64 {
        self.max.y - self.min.y
    }

    /// Grow each edge outward by extent/20 (about 5% per side).
    ///
    /// All four deltas come from the pre-expansion extents and are applied
    /// afterwards, so opposite edges never compound each other's margin.
    /// Division truncates toward zero.
    pub fn expand_margin(&mut self) {
        let dx = self.width() / 20;
        let dy = self.height() / 20;
        self.min.x -= dx;
        self.min.y -= dy;
        self.max.x += dx;
        self.max.y += dy;
    }
}

impl Default for BBox {
    fn default() -> Self {
        Self::new()
    }
}
