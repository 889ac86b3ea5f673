//! Fixed rendering parameters.

/// Stroke-font scale that renders text at one model unit per character
/// cell; multiplied by the primitive's scale factor.
pub const MIN_TEXT_SCALE: f64 = 0.00954;

/// Segments used to approximate circles and full arcs.
pub const CIRCLE_STEPS: usize = 128;

/// Depth separation between adjacent layers.
pub const LAYER_SEP: i32 = 100;
