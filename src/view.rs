//! The interactive view transform and layer visibility.
//!
//! Zoom and rotation both anchor to an arbitrary screen point: the model
//! point under the cursor stays under the cursor. All of the math lives
//! here so it can be unit tested without any windowing backend.

use glam::{DVec2, DVec3};

use crate::types::{BBox, MAX_LAYERS};

pub const ZOOM_MIN: f64 = 0.0001;
pub const ZOOM_MAX: f64 = 100.0;
/// Multiplicative zoom increment per wheel notch.
pub const ZOOM_STEP: f64 = 0.81;
/// Finer increment with the modifier held.
pub const ZOOM_STEP_FINE: f64 = 0.95;
/// Rotation increment per key press, in degrees.
pub const ROT_STEP: f64 = 360.0 / 64.0;
pub const ROT_STEP_FINE: f64 = ROT_STEP / 4.0;
/// Largest initial window the fit will ask for.
pub const INIT_MAX_WIDTH: u32 = 1024;
pub const INIT_MAX_HEIGHT: u32 = 1024;

/// Normalize a rotation into [0, 360).
pub fn range360(mut deg: f64) -> f64 {
    while deg < 0.0 {
        deg += 360.0;
    }
    while deg >= 360.0 {
        deg -= 360.0;
    }
    deg
}

/// Zoom, pan and rotation state, plus the recorded home view.
///
/// Screen coordinates here follow window convention (Y down); the pan
/// math carries the sign flips so model space stays Y up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub zoom: f64,
    pub pan: DVec2,
    /// Degrees around each axis, each held in [0, 360). Only the Z
    /// component is an in-plane rotation; X and Y are applied by the
    /// backend in 3D at render time.
    pub rot: DVec3,
    zoom_min: f64,
    zoom_home: f64,
    pan_home: DVec2,
}

impl ViewTransform {
    pub fn new() -> Self {
        ViewTransform {
            zoom: 1.0,
            pan: DVec2::ZERO,
            rot: DVec3::ZERO,
            zoom_min: ZOOM_MIN,
            zoom_home: 1.0,
            pan_home: DVec2::ZERO,
        }
    }

    /// The model-space point currently under a screen point, by the
    /// pan/zoom component of the transform.
    pub fn screen_to_model(&self, s: DVec2) -> DVec2 {
        DVec2::new(s.x / self.zoom - self.pan.x, s.y / self.zoom + self.pan.y)
    }

    /// Change zoom, keeping the model point under screen point `s` fixed.
    /// A target outside the zoom limits is ignored entirely.
    pub fn zoom_about(&mut self, new_zoom: f64, s: DVec2) {
        if new_zoom < self.zoom_min || new_zoom > ZOOM_MAX {
            return;
        }
        self.pan.x -= s.x / self.zoom - s.x / new_zoom;
        self.pan.y += s.y / self.zoom - s.y / new_zoom;
        self.zoom = new_zoom;
    }

    /// Adjust rotation by delta degrees around each axis, compensating
    /// pan so the in-plane (Z) component pivots around screen point `s`.
    /// X and Y rotation accumulates without pan compensation - those are
    /// 3D effects, not pan-plane motion.
    pub fn rotate_about(&mut self, delta: DVec3, s: DVec2) {
        let old = self.screen_to_model(s);
        let dist = old.length();
        let angle = old.y.atan2(old.x) + delta.z.to_radians();
        let new = DVec2::new(angle.cos(), angle.sin()) * dist;
        let d = old - new;
        self.pan.x -= d.x;
        self.pan.y += d.y;

        if delta.x != 0.0 {
            self.rot.x = range360(self.rot.x + delta.x);
        }
        if delta.y != 0.0 {
            self.rot.y = range360(self.rot.y + delta.y);
        }
        if delta.z != 0.0 {
            self.rot.z = range360(self.rot.z + delta.z);
        }
    }

    /// Pan by a screen-space drag delta.
    pub fn pan_by(&mut self, d: DVec2) {
        self.pan.x += d.x / self.zoom;
        self.pan.y -= d.y / self.zoom;
    }

    /// Return to the view recorded by [`ViewTransform::fit`].
    pub fn home(&mut self) {
        self.zoom = self.zoom_home;
        self.pan = self.pan_home;
        self.rot = DVec3::ZERO;
    }

    /// Compute the initial view for a finalized bounding box, record it
    /// as home, and return the window size that shows the whole box.
    ///
    /// Interactive zoom-out is limited to half the initial fit.
    pub fn fit(&mut self, bounds: &BBox, max_width: u32, max_height: u32) -> (u32, u32) {
        let w = bounds.width() as f64;
        let h = bounds.height() as f64;
        let mut zoom = 1.0_f64
            .min(max_width as f64 / w)
            .min(max_height as f64 / h);
        if zoom < ZOOM_MIN {
            zoom = ZOOM_MIN;
        }
        self.zoom = zoom;
        self.zoom_min = zoom / 2.0;
        self.pan = DVec2::new(-(bounds.min.x as f64), -(bounds.max.y as f64));
        self.zoom_home = zoom;
        self.pan_home = self.pan;
        self.rot = DVec3::ZERO;
        ((w * zoom) as u32, (h * zoom) as u32)
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Layer visibility
// ============================================================================

/// Togglable visibility flags for layers 1..=12. Index 0 is reserved for
/// overlay primitives and is always visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerSet([bool; MAX_LAYERS as usize + 1]);

impl LayerSet {
    /// All layers visible.
    pub fn all_visible() -> Self {
        LayerSet([true; MAX_LAYERS as usize + 1])
    }

    pub fn visible(&self, layer: u8) -> bool {
        layer == 0 || self.0.get(layer as usize).copied().unwrap_or(false)
    }

    /// Toggle one layer; 0 and out-of-range indices are ignored.
    pub fn toggle(&mut self, layer: u8) {
        if (1..=MAX_LAYERS).contains(&layer) {
            self.0[layer as usize] = !self.0[layer as usize];
        }
    }

    pub fn show_all(&mut self) {
        *self = Self::all_visible();
    }
}

impl Default for LayerSet {
    fn default() -> Self {
        Self::all_visible()
    }
}
