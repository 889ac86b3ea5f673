//! An interactive viewer for a tiny 2D drawing-primitive language.
//!
//! Input is a line-oriented text stream: one directive per line, such as
//! `Line 0 0 100 100`, `Circle 50 50 20` or `Color 255 0 0`. State
//! directives (`Color`, `Width`, `Layer`, `Scale`, `Rotate`, `Fill`,
//! `Wire`) adjust the style applied to every primitive that follows;
//! geometry directives append primitives to the scene in input order.
//! Unrecognized lines are ignored, out-of-range numbers are clamped, and
//! `//` comments out the rest of a line.
//!
//! After input ends the scene is finalized: a bounding box with a 5%
//! margin is computed, and a border rectangle plus a dimension label are
//! added on the always-visible layer 0. The view half of the crate
//! ([`view`], [`input`]) implements the interactive transform: zoom and
//! rotation anchored to the cursor, drag panning, per-layer visibility
//! toggles and a home view. Rendering goes through the
//! [`render::RenderBackend`] seam, so everything is testable (and
//! dumpable) without a window.

use pest_derive::Parser;

pub mod errors;
pub mod image;
pub mod input;
pub mod log;
pub mod parse;
pub mod render;
pub mod scene;
pub mod types;
pub mod view;

/// Line tokenizer grammar. Accepts any input; tokenization never fails.
#[derive(Parser)]
#[grammar = "drawing.pest"]
pub struct DrawingParser;

pub use errors::{ImageError, SceneError};
pub use image::{ImageDecoder, MagickDecoder};
pub use input::{ViewEvent, Viewer};
pub use parse::SceneBuilder;
pub use scene::{Primitive, Scene};
pub use view::{LayerSet, ViewTransform};

/// Build a scene from a line-oriented reader. The scene is returned
/// unfinalized; call [`Scene::finalize`] once all input is in.
pub fn load_scene(
    reader: impl std::io::BufRead,
    decoder: Box<dyn ImageDecoder>,
) -> Result<Scene, SceneError> {
    let mut builder = SceneBuilder::new(decoder);
    builder.read(reader)?;
    Ok(builder.finish())
}
