//! The backend seam between the scene walk and whatever actually draws.
//!
//! [`RenderBackend`] is the narrow set of operations the primitives need;
//! a GPU-backed implementation submits them to a graphics API, while
//! [`RecordingBackend`] captures them as data for tests and the draw-op
//! dump.

use glam::IVec2;
use std::fmt;

use crate::types::Rgb;

/// Backend handle for an uploaded texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureId(pub u32);

/// Style state as the backend sees it: the subset of [`crate::scene::Style`]
/// that maps to draw state rather than geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawStyle {
    pub color: Rgb,
    pub width: i32,
    pub fill: bool,
}

/// Draw operations in model coordinates. Style is stateful: a `set_style`
/// applies to every operation until the next one, matching how a GL-like
/// backend consumes it.
pub trait RenderBackend {
    fn set_style(&mut self, style: DrawStyle);
    /// A one-pixel segment (used when the style width gives no thickness).
    fn line(&mut self, a: IVec2, b: IVec2, z: i32);
    /// A convex polygon; outlined when `filled` is false.
    fn polygon(&mut self, points: &[IVec2], z: i32, filled: bool);
    /// Independent triangles, three points each, honoring the style fill.
    fn triangles(&mut self, points: &[IVec2], z: i32);
    /// Stroke-font text anchored at `origin`, rotated by a quarter turn.
    fn stroke_text(&mut self, origin: IVec2, z: i32, scale: f64, rotate: i32, text: &str);
    /// Upload raw RGB pixels (3 bytes each, bottom row first).
    fn create_texture(&mut self, width: i32, height: i32, rgb: &[u8]) -> TextureId;
    /// A textured axis-aligned quad between two opposite corners.
    fn textured_quad(&mut self, texture: TextureId, a: IVec2, b: IVec2, z: i32);
}

// ============================================================================
// Recording backend
// ============================================================================

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Style(DrawStyle),
    Line {
        a: IVec2,
        b: IVec2,
        z: i32,
    },
    Polygon {
        points: Vec<IVec2>,
        z: i32,
        filled: bool,
    },
    Triangles {
        points: Vec<IVec2>,
        z: i32,
    },
    Text {
        origin: IVec2,
        z: i32,
        scale: f64,
        rotate: i32,
        text: String,
    },
    CreateTexture {
        id: TextureId,
        width: i32,
        height: i32,
        bytes: usize,
    },
    TexturedQuad {
        texture: TextureId,
        a: IVec2,
        b: IVec2,
        z: i32,
    },
}

fn write_points(f: &mut fmt::Formatter<'_>, points: &[IVec2]) -> fmt::Result {
    // Long vertex runs (circles, arcs) would swamp the dump; keep the count.
    if points.len() > 8 {
        return Ok(());
    }
    for p in points {
        write!(f, " ({},{})", p.x, p.y)?;
    }
    Ok(())
}

impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawOp::Style(s) => write!(
                f,
                "style {} width={} {}",
                s.color,
                s.width,
                if s.fill { "fill" } else { "wire" }
            ),
            DrawOp::Line { a, b, z } => {
                write!(f, "line ({},{})..({},{}) z={z}", a.x, a.y, b.x, b.y)
            }
            DrawOp::Polygon { points, z, filled } => {
                write!(
                    f,
                    "poly[{}] {} z={z}",
                    points.len(),
                    if *filled { "fill" } else { "wire" }
                )?;
                write_points(f, points)
            }
            DrawOp::Triangles { points, z } => {
                write!(f, "tris[{}] z={z}", points.len())?;
                write_points(f, points)
            }
            DrawOp::Text {
                origin,
                z,
                scale,
                rotate,
                text,
            } => write!(
                f,
                "text ({},{}) z={z} scale={scale:.5} rot={rotate} \"{text}\"",
                origin.x, origin.y
            ),
            DrawOp::CreateTexture {
                id,
                width,
                height,
                bytes,
            } => write!(f, "texture #{} {}x{} ({} bytes)", id.0, width, height, bytes),
            DrawOp::TexturedQuad { texture, a, b, z } => write!(
                f,
                "image #{} ({},{})..({},{}) z={z}",
                texture.0, a.x, a.y, b.x, b.y
            ),
        }
    }
}

/// Captures every backend call in order. The draw-op dump and most render
/// tests are written against this.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub ops: Vec<DrawOp>,
    next_texture: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        RecordingBackend::default()
    }

    /// The recorded operations, one formatted line each.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for op in &self.ops {
            out.push_str(&op.to_string());
            out.push('\n');
        }
        out
    }
}

impl RenderBackend for RecordingBackend {
    fn set_style(&mut self, style: DrawStyle) {
        self.ops.push(DrawOp::Style(style));
    }

    fn line(&mut self, a: IVec2, b: IVec2, z: i32) {
        self.ops.push(DrawOp::Line { a, b, z });
    }

    fn polygon(&mut self, points: &[IVec2], z: i32, filled: bool) {
        self.ops.push(DrawOp::Polygon {
            points: points.to_vec(),
            z,
            filled,
        });
    }

    fn triangles(&mut self, points: &[IVec2], z: i32) {
        self.ops.push(DrawOp::Triangles {
            points: points.to_vec(),
            z,
        });
    }

    fn stroke_text(&mut self, origin: IVec2, z: i32, scale: f64, rotate: i32, text: &str) {
        self.ops.push(DrawOp::Text {
            origin,
            z,
            scale,
            rotate,
            text: text.to_string(),
        });
    }

    fn create_texture(&mut self, width: i32, height: i32, rgb: &[u8]) -> TextureId {
        self.next_texture += 1;
        let id = TextureId(self.next_texture);
        self.ops.push(DrawOp::CreateTexture {
            id,
            width,
            height,
            bytes: rgb.len(),
        });
        id
    }

    fn textured_quad(&mut self, texture: TextureId, a: IVec2, b: IVec2, z: i32) {
        self.ops.push(DrawOp::TexturedQuad { texture, a, b, z });
    }
}
