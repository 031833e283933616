//! Canvas and overlay asset buffers.
//!
//! - `Canvas`: the single mutable frame buffer a pass draws into.
//! - `OverlayAsset`: an accessory image loaded once at startup.
//!
//! Both store 8-bit RGB without alpha. Asset files that carry an alpha channel
//! have it dropped on load; black asset pixels are what make an overlay
//! visually transparent under the additive blend.

use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

use crate::error::{OverlayError, Result};

// ----------------------------------------------------------------------------
// Canvas
// ----------------------------------------------------------------------------

/// Mutable frame buffer. Owned by the stream driver for the duration of a pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    pixels: RgbImage,
}

impl Canvas {
    pub fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Black canvas of the given size.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(RgbImage::new(width, height))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixel(&self, col: u32, row: u32) -> Option<&Rgb<u8>> {
        self.pixels.get_pixel_checked(col, row)
    }

    pub fn image(&self) -> &RgbImage {
        &self.pixels
    }

    pub(crate) fn image_mut(&mut self) -> &mut RgbImage {
        &mut self.pixels
    }

    /// Overwrite the canvas with a freshly acquired frame.
    ///
    /// The existing allocation is reused when the frame size is unchanged.
    pub fn refill(&mut self, frame: RgbImage) {
        if self.pixels.dimensions() == frame.dimensions() {
            self.pixels.copy_from_slice(frame.as_raw());
        } else {
            self.pixels = frame;
        }
    }

    pub fn into_image(self) -> RgbImage {
        self.pixels
    }
}

// ----------------------------------------------------------------------------
// OverlayAsset
// ----------------------------------------------------------------------------

/// Accessory image plus its position in the configured asset list.
#[derive(Clone, Debug)]
pub struct OverlayAsset {
    pub index: usize,
    pub image: RgbImage,
}

impl OverlayAsset {
    pub fn new(index: usize, image: RgbImage) -> Self {
        Self { index, image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Decode an image file into RGB8, rejecting files that decode to nothing.
pub fn read_rgb_image(path: &Path) -> Result<RgbImage> {
    log::info!("reading image from {}", path.display());
    let decoded = image::open(path).map_err(|e| OverlayError::asset(path, e))?;
    let rgb = decoded.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(OverlayError::asset(path, "image is empty"));
    }
    Ok(rgb)
}

/// Load every configured accessory, in order.
pub fn load_assets(paths: &[PathBuf]) -> Result<Vec<OverlayAsset>> {
    paths
        .iter()
        .enumerate()
        .map(|(index, path)| read_rgb_image(path).map(|image| OverlayAsset::new(index, image)))
        .collect()
}
