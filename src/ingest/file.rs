//! Still-image frame source.
//!
//! Decodes a local image once. The image becomes the canvas for a single
//! detect/composite pass; there is no next frame.

use image::RgbImage;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::frame::read_rgb_image;

/// A local image file.
pub struct StillSource {
    path: PathBuf,
}

impl StillSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode the image as RGB8.
    pub fn load(&self) -> Result<RgbImage> {
        let frame = read_rgb_image(&self.path)?;
        log::info!(
            "StillSource: loaded {} ({}x{})",
            self.path.display(),
            frame.width(),
            frame.height()
        );
        Ok(frame)
    }
}
