//! The scene model: primitives, style snapshots and the ordered scene list.
//!
//! Every geometry directive in the input becomes one [`Primitive`]: a style
//! snapshot captured at creation time plus a per-kind payload. Primitives
//! are appended in input order and never mutated afterwards, except that
//! image primitives trade their pixel buffer for a backend texture handle
//! during finalization.

use enum_dispatch::enum_dispatch;
use glam::{IVec2, ivec2};

use crate::image::DecodedImage;
use crate::log::debug;
use crate::render::backend::TextureId;
use crate::render::{Draw, RenderBackend};
use crate::types::{BBox, Rgb, Rotation, offset_coord};
use std::fmt;

/// Drawing attributes captured from the style state when a primitive is
/// created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Style {
    pub color: Rgb,
    pub layer: u8,
    pub width: i32,
    pub scale: i32,
    pub fill: bool,
    pub rotate: Rotation,
}

impl Style {
    /// The style in effect before any directive runs.
    pub fn initial() -> Self {
        Style {
            color: Rgb::WHITE,
            layer: 1,
            width: 1,
            scale: 1,
            fill: false,
            rotate: Rotation::R0,
        }
    }

    /// Style for the synthetic overlay primitives injected at finalization.
    /// Layer 0 is never hidden by layer toggles.
    fn overlay() -> Self {
        Style {
            layer: 0,
            ..Style::initial()
        }
    }
}

// ============================================================================
// Primitive kinds
// ============================================================================

/// A straight segment. Always drawn filled when thick.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub a: IVec2,
    pub b: IVec2,
}

/// A point, drawn as a filled disc of radius width/2 (at least 1).
#[derive(Clone, Debug, PartialEq)]
pub struct PointMark {
    pub at: IVec2,
}

/// An axis-aligned rectangle between two opposite corners.
#[derive(Clone, Debug, PartialEq)]
pub struct Rect {
    pub a: IVec2,
    pub b: IVec2,
}

/// A circle, carrying the derived corners of its bounding square.
#[derive(Clone, Debug, PartialEq)]
pub struct Circle {
    pub center: IVec2,
    pub radius: i32,
    pub min: IVec2,
    pub max: IVec2,
}

impl Circle {
    pub fn new(center: IVec2, radius: i32) -> Self {
        let r = radius as i64;
        Circle {
            center,
            radius,
            min: ivec2(offset_coord(center.x, -r), offset_coord(center.y, -r)),
            max: ivec2(offset_coord(center.x, r), offset_coord(center.y, r)),
        }
    }
}

/// An annulus sector. Always drawn filled; width below 2 would be
/// invisible so the renderer enforces a floor.
#[derive(Clone, Debug, PartialEq)]
pub struct Arc {
    pub center: IVec2,
    pub radius: i32,
    pub start: i32,
    pub delta: i32,
    pub min: IVec2,
    pub max: IVec2,
}

impl Arc {
    pub fn new(center: IVec2, radius: i32, start: i32, delta: i32) -> Self {
        let r = radius as i64;
        Arc {
            center,
            radius,
            start,
            delta,
            min: ivec2(offset_coord(center.x, -r), offset_coord(center.y, -r)),
            max: ivec2(offset_coord(center.x, r), offset_coord(center.y, r)),
        }
    }
}

/// Three vertices, filled or outlined.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub a: IVec2,
    pub b: IVec2,
    pub c: IVec2,
}

/// A text label. The opposite corner is derived from the measured extent
/// (one scale unit per character cell) and the rotation quantum.
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    pub origin: IVec2,
    pub corner: IVec2,
    pub text: String,
}

impl Text {
    pub fn new(origin: IVec2, text: String, scale: i32, rotate: Rotation) -> Self {
        let sw = text.chars().count() as i64 * scale as i64;
        let sh = scale as i64;
        let (dx, dy) = rotate.extent(sw, sh);
        Text {
            origin,
            corner: ivec2(offset_coord(origin.x, dx), offset_coord(origin.y, dy)),
            text,
        }
    }
}

/// A raster image. The pixel buffer lives only between decode and texture
/// upload; afterwards the backend texture handle takes over.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub origin: IVec2,
    pub corner: IVec2,
    /// Unscaled pixel dimensions reported by the decoder.
    pub size: IVec2,
    pub path: String,
    pub pixels: Option<Vec<u8>>,
    pub texture: Option<TextureId>,
}

impl Image {
    pub fn new(origin: IVec2, path: String, decoded: DecodedImage, scale: i32, rotate: Rotation) -> Self {
        let sw = decoded.width as i64 * scale as i64;
        let sh = decoded.height as i64 * scale as i64;
        let (dx, dy) = rotate.extent(sw, sh);
        Image {
            origin,
            corner: ivec2(offset_coord(origin.x, dx), offset_coord(origin.y, dy)),
            size: ivec2(decoded.width, decoded.height),
            path,
            pixels: Some(decoded.rgb),
            texture: None,
        }
    }
}

/// The per-kind payload of a primitive.
#[enum_dispatch(Draw)]
#[derive(Clone, Debug, PartialEq)]
pub enum PrimitiveKind {
    Line(Line),
    PointMark(PointMark),
    Rect(Rect),
    Circle(Circle),
    Arc(Arc),
    Triangle(Triangle),
    Text(Text),
    Image(Image),
}

/// One drawable record: a style snapshot plus kind-specific geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    pub style: Style,
    pub kind: PrimitiveKind,
}

impl Primitive {
    pub fn new(style: Style, kind: PrimitiveKind) -> Self {
        Primitive { style, kind }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PrimitiveKind::Line(l) => {
                write!(f, "LINE ({},{})..({},{})", l.a.x, l.a.y, l.b.x, l.b.y)?
            }
            PrimitiveKind::PointMark(p) => write!(f, "POINT ({},{})", p.at.x, p.at.y)?,
            PrimitiveKind::Rect(r) => {
                write!(f, "RECT ({},{})..({},{})", r.a.x, r.a.y, r.b.x, r.b.y)?
            }
            PrimitiveKind::Circle(c) => {
                write!(f, "CIRCLE ({},{}) r={}", c.center.x, c.center.y, c.radius)?
            }
            PrimitiveKind::Arc(a) => write!(
                f,
                "ARC ({},{}) r={} start={} delta={}",
                a.center.x, a.center.y, a.radius, a.start, a.delta
            )?,
            PrimitiveKind::Triangle(t) => write!(
                f,
                "TRIANGLE ({},{}) ({},{}) ({},{})",
                t.a.x, t.a.y, t.b.x, t.b.y, t.c.x, t.c.y
            )?,
            PrimitiveKind::Text(t) => {
                write!(f, "TEXT ({},{}) \"{}\"", t.origin.x, t.origin.y, t.text)?
            }
            PrimitiveKind::Image(i) => write!(
                f,
                "IMAGE ({},{}) {}x{} \"{}\"",
                i.origin.x, i.origin.y, i.size.x, i.size.y, i.path
            )?,
        }
        let s = &self.style;
        write!(
            f,
            " {} layer={} width={} scale={} {}",
            s.color,
            s.layer,
            s.width,
            s.scale,
            if s.fill { "fill" } else { "wire" }
        )
    }
}

// ============================================================================
// Scene
// ============================================================================

/// The ordered scene list. Insertion order is draw order.
#[derive(Debug, Default)]
pub struct Scene {
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// One-shot finalization after all input lines are consumed.
    ///
    /// Computes the bounding box over every primitive's contributing
    /// points, expands it by the fixed margin, and prepends two layer-0
    /// overlay primitives: a border rectangle tracing the box and a label
    /// showing its dimensions. Returns `None` when no geometry ever
    /// contributed - the valid "nothing to draw" outcome.
    pub fn finalize(&mut self) -> Option<BBox> {
        let mut bounds = BBox::new();
        for prim in &self.primitives {
            prim.kind.extend_bounds(&mut bounds);
        }
        if bounds.is_empty() {
            debug!("empty scene, nothing to draw");
            return None;
        }
        bounds.expand_margin();

        let (w, h) = (bounds.width(), bounds.height());
        debug!(width = w, height = h, "finalized scene bounds");
        let minx = offset_coord(0, bounds.min.x);
        let miny = offset_coord(0, bounds.min.y);
        let maxx = offset_coord(0, bounds.max.x);
        let maxy = offset_coord(0, bounds.max.y);

        // Dimension label below the lower-left corner, sized relative to
        // the box so it stays legible at the initial fit.
        let label_scale = (w / 50).clamp(10, 10_000) as i32;
        let label_style = Style {
            scale: label_scale,
            ..Style::overlay()
        };
        let label = Primitive::new(
            label_style,
            Text::new(
                ivec2(minx, offset_coord(miny, -2 * label_scale as i64)),
                format!("{w} x {h}"),
                label_scale,
                Rotation::R0,
            )
            .into(),
        );

        let border = Primitive::new(
            Style::overlay(),
            Rect {
                a: ivec2(minx, miny),
                b: ivec2(maxx, maxy),
            }
            .into(),
        );

        // Border first so the label draws over it.
        self.primitives.insert(0, label);
        self.primitives.insert(0, border);
        Some(bounds)
    }

    /// Hand every decoded image's pixels to the backend, caching the
    /// returned texture handle on the primitive. Runs once, after
    /// finalization and before the first frame.
    pub fn upload_textures(&mut self, backend: &mut dyn RenderBackend) {
        for prim in &mut self.primitives {
            if let PrimitiveKind::Image(img) = &mut prim.kind {
                if let Some(pixels) = img.pixels.take() {
                    img.texture = Some(backend.create_texture(img.size.x, img.size.y, &pixels));
                }
            }
        }
    }
}
