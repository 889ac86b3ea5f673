//! Error types for the fatal tier.
//!
//! The language itself never errors: unrecognized directives are ignored
//! and out-of-range numbers are clamped. What remains fatal is the
//! resource tier - unreadable input and failed image decodes - reported
//! through miette with a diagnostic code.

use miette::Diagnostic;
use thiserror::Error;

/// Failures from the external image-decoding collaborator.
#[derive(Error, Diagnostic, Debug)]
pub enum ImageError {
    #[error("cannot run `{tool}` for {path}")]
    #[diagnostic(
        code(drawview::image::spawn),
        help("image loading shells out to ImageMagick; make sure `identify` and `convert` are installed")
    )]
    Spawn {
        tool: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot identify image {path}")]
    #[diagnostic(code(drawview::image::identify))]
    Identify { path: String },

    #[error("invalid image size for {path}: {width} x {height}")]
    #[diagnostic(code(drawview::image::invalid_size))]
    InvalidSize {
        path: String,
        width: i64,
        height: i64,
    },

    #[error("cannot convert image {path} to raw RGB")]
    #[diagnostic(code(drawview::image::convert))]
    Convert { path: String },

    #[error("short pixel data for {path}: expected {expected} bytes, got {got}")]
    #[diagnostic(code(drawview::image::truncated))]
    Truncated {
        path: String,
        expected: u64,
        got: u64,
    },
}

/// Errors that abort scene construction.
#[derive(Error, Diagnostic, Debug)]
pub enum SceneError {
    #[error("cannot read input")]
    #[diagnostic(code(drawview::scene::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Image(#[from] ImageError),
}
