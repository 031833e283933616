use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::error::{OverlayError, Result};
use crate::frame::OverlayAsset;

/// Largest scaled overlay side; anything bigger is skipped rather than resized.
pub const MAX_SCALED_SIDE: u32 = 1 << 15;

/// Target size for an asset stretched to `round(roi_width * scale_x)` pixels wide.
///
/// Height follows the asset's aspect ratio with integer truncation.
pub fn scaled_size(asset: &OverlayAsset, roi_width: i32, scale_x: f64) -> Result<(u32, u32)> {
    let (width, height) = asset.image.dimensions();
    if width == 0 {
        return Err(OverlayError::DegenerateAsset { index: asset.index });
    }
    let target_width = (roi_width as f64 * scale_x).round().max(0.0) as u32;
    let target_height = (target_width as u64 * height as u64 / width as u64)
        .min(u32::MAX as u64) as u32;
    Ok((target_width, target_height))
}

/// Resize an asset for one detection using cubic interpolation.
///
/// Sizes with a zero side, or a side above `MAX_SCALED_SIDE`, give an empty
/// image, which places nothing.
pub fn scale_overlay(asset: &OverlayAsset, roi_width: i32, scale_x: f64) -> Result<RgbImage> {
    let (width, height) = scaled_size(asset, roi_width, scale_x)?;
    if width == 0 || height == 0 {
        return Ok(RgbImage::new(0, 0));
    }
    if width > MAX_SCALED_SIDE || height > MAX_SCALED_SIDE {
        log::warn!(
            "overlay asset #{} would scale to {}x{}; skipping",
            asset.index,
            width,
            height
        );
        return Ok(RgbImage::new(0, 0));
    }
    if (width, height) == asset.image.dimensions() {
        return Ok(asset.image.clone());
    }
    Ok(imageops::resize(
        &asset.image,
        width,
        height,
        FilterType::CatmullRom,
    ))
}
