//! Rendering: the per-kind draw dispatch and the scene walk.
//!
//! Primitives know how to contribute to the scene bounds and how to turn
//! themselves into backend calls; [`render_scene`] walks the list in
//! input order, skipping hidden layers and setting style state before
//! each primitive.

pub mod backend;
pub mod defaults;
pub mod geometry;

use enum_dispatch::enum_dispatch;
use glam::ivec2;

pub use backend::{DrawOp, DrawStyle, RecordingBackend, RenderBackend};

use crate::scene::{Arc, Circle, Image, Line, PointMark, Rect, Scene, Style, Text, Triangle};
use crate::types::BBox;
use crate::view::LayerSet;
use defaults::{LAYER_SEP, MIN_TEXT_SCALE};
use geometry::{ThickLine, arc_quads, circle_points, thick_line};

/// What every primitive kind can do: report its contributing points and
/// emit backend calls for itself.
#[enum_dispatch]
pub trait Draw {
    fn extend_bounds(&self, bounds: &mut BBox);
    fn draw(&self, style: &Style, z: i32, backend: &mut dyn RenderBackend);
}

/// Depth for a layer. Higher layers sit further back so layer 0 overlay
/// content always draws in front.
pub fn ltoz(layer: u8) -> i32 {
    -(layer as i32) * LAYER_SEP
}

/// Walk the scene in input order and emit draw operations for every
/// primitive on a visible layer.
pub fn render_scene(scene: &Scene, layers: &LayerSet, backend: &mut dyn RenderBackend) {
    for prim in &scene.primitives {
        if !layers.visible(prim.style.layer) {
            continue;
        }
        backend.set_style(DrawStyle {
            color: prim.style.color,
            width: prim.style.width,
            fill: prim.style.fill,
        });
        prim.kind.draw(&prim.style, ltoz(prim.style.layer), backend);
    }
}

// ============================================================================
// Per-kind impls
// ============================================================================

impl Draw for Line {
    fn extend_bounds(&self, bounds: &mut BBox) {
        bounds.expand_point(self.a);
        bounds.expand_point(self.b);
    }

    fn draw(&self, style: &Style, z: i32, backend: &mut dyn RenderBackend) {
        match thick_line(self.a, self.b, style.width) {
            ThickLine::Segment(a, b) => backend.line(a, b, z),
            ThickLine::Quad(quad) => backend.polygon(&quad, z, true),
            ThickLine::Tris(tris) => backend.triangles(&tris, z),
        }
    }
}

impl Draw for PointMark {
    fn extend_bounds(&self, bounds: &mut BBox) {
        bounds.expand_point(self.at);
    }

    fn draw(&self, style: &Style, z: i32, backend: &mut dyn RenderBackend) {
        let radius = (style.width / 2).max(1);
        backend.polygon(&circle_points(self.at, radius), z, true);
    }
}

impl Draw for Rect {
    fn extend_bounds(&self, bounds: &mut BBox) {
        bounds.expand_point(self.a);
        bounds.expand_point(self.b);
    }

    fn draw(&self, style: &Style, z: i32, backend: &mut dyn RenderBackend) {
        let quad = [
            self.a,
            ivec2(self.b.x, self.a.y),
            self.b,
            ivec2(self.a.x, self.b.y),
        ];
        backend.polygon(&quad, z, style.fill);
    }
}

impl Draw for Circle {
    fn extend_bounds(&self, bounds: &mut BBox) {
        bounds.expand_point(self.min);
        bounds.expand_point(self.max);
    }

    fn draw(&self, style: &Style, z: i32, backend: &mut dyn RenderBackend) {
        backend.polygon(&circle_points(self.center, self.radius), z, style.fill);
    }
}

impl Draw for Arc {
    fn extend_bounds(&self, bounds: &mut BBox) {
        bounds.expand_point(self.min);
        bounds.expand_point(self.max);
    }

    fn draw(&self, style: &Style, z: i32, backend: &mut dyn RenderBackend) {
        for quad in arc_quads(self.center, self.radius, self.start, self.delta, style.width) {
            backend.polygon(&quad, z, true);
        }
    }
}

impl Draw for Triangle {
    fn extend_bounds(&self, bounds: &mut BBox) {
        bounds.expand_point(self.a);
        bounds.expand_point(self.b);
        bounds.expand_point(self.c);
    }

    fn draw(&self, _style: &Style, z: i32, backend: &mut dyn RenderBackend) {
        backend.triangles(&[self.a, self.b, self.c], z);
    }
}

impl Draw for Text {
    fn extend_bounds(&self, bounds: &mut BBox) {
        bounds.expand_point(self.origin);
        bounds.expand_point(self.corner);
    }

    fn draw(&self, style: &Style, z: i32, backend: &mut dyn RenderBackend) {
        backend.stroke_text(
            self.origin,
            z,
            MIN_TEXT_SCALE * style.scale as f64,
            style.rotate.degrees(),
            &self.text,
        );
    }
}

impl Draw for Image {
    fn extend_bounds(&self, bounds: &mut BBox) {
        bounds.expand_point(self.origin);
        bounds.expand_point(self.corner);
    }

    fn draw(&self, _style: &Style, z: i32, backend: &mut dyn RenderBackend) {
        // Nothing to draw until finalization has uploaded the pixels.
        if let Some(texture) = self.texture {
            backend.textured_quad(texture, self.origin, self.corner, z);
        }
    }
}
