//! The external image-decoding collaborator.
//!
//! The viewer does not link an image codec; it shells out to ImageMagick
//! the way the rest of the toolchain does. [`ImageDecoder`] is the narrow
//! seam so scene construction can be tested with a fake.

use crate::errors::ImageError;
use std::process::Command;

/// A decoded image: dimensions plus a vertically flipped raw RGB buffer
/// (3 bytes per pixel, bottom row first, ready for texture upload).
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    pub width: i32,
    pub height: i32,
    pub rgb: Vec<u8>,
}

/// Resolves an image path to raw pixels. Failure is fatal for the whole
/// program: a scene that names an image it cannot load is not viewable.
pub trait ImageDecoder {
    fn decode(&self, path: &str) -> Result<DecodedImage, ImageError>;
}

/// Production decoder backed by ImageMagick's `identify` and `convert`.
pub struct MagickDecoder;

impl MagickDecoder {
    fn identify(&self, path: &str) -> Result<(i64, i64), ImageError> {
        let output = Command::new("identify")
            .args(["-format", "%w %h", path])
            .output()
            .map_err(|source| ImageError::Spawn {
                tool: "identify",
                path: path.to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(ImageError::Identify {
                path: path.to_string(),
            });
        }
        let text = String::from_utf8_lossy(&output.stdout);
        let mut fields = text.split_whitespace();
        let (Some(w), Some(h)) = (fields.next(), fields.next()) else {
            return Err(ImageError::Identify {
                path: path.to_string(),
            });
        };
        let (Ok(w), Ok(h)) = (w.parse::<i64>(), h.parse::<i64>()) else {
            return Err(ImageError::Identify {
                path: path.to_string(),
            });
        };
        Ok((w, h))
    }
}

impl ImageDecoder for MagickDecoder {
    fn decode(&self, path: &str) -> Result<DecodedImage, ImageError> {
        let (width, height) = self.identify(path)?;
        if width <= 0 || height <= 0 || width > i32::MAX as i64 || height > i32::MAX as i64 {
            return Err(ImageError::InvalidSize {
                path: path.to_string(),
                width,
                height,
            });
        }

        // -flip because the renderer's Y axis points up while image rows
        // are stored top-down.
        let output = Command::new("convert")
            .args([path, "-depth", "8", "-flip", "RGB:-"])
            .output()
            .map_err(|source| ImageError::Spawn {
                tool: "convert",
                path: path.to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(ImageError::Convert {
                path: path.to_string(),
            });
        }

        let expected = width as u64 * height as u64 * 3;
        if output.stdout.len() as u64 != expected {
            return Err(ImageError::Truncated {
                path: path.to_string(),
                expected,
                got: output.stdout.len() as u64,
            });
        }

        Ok(DecodedImage {
            width: width as i32,
            height: height as i32,
            rgb: output.stdout,
        })
    }
}
