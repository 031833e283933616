//! Detection-to-overlay placement and compositing.
//!
//! For each accepted detection, in acceptance order:
//! 1. map the normalized box to a canvas ROI (`rect`)
//! 2. pick asset and tuning by acceptance index (`cycle`)
//! 3. scale the asset to the ROI width (`scale`)
//! 4. anchor and clip against the canvas (`clip`)
//! 5. add the clipped overlay onto the canvas (`composite`)

pub mod clip;
pub mod composite;
pub mod cycle;
pub mod rect;
pub mod scale;

pub use clip::{place_overlay, Placement};
pub use composite::composite_additive;
pub use cycle::{select_placement, PlacementParams};
pub use rect::PixelRect;
pub use scale::scale_overlay;

use image::RgbImage;

use crate::config::{OverlayConfig, PlacementConfig};
use crate::detect::{accept_detections, DetectionFeed, CONFIDENCE_THRESHOLD};
use crate::error::Result;
use crate::frame::{load_assets, Canvas, OverlayAsset};

/// Everything a pass needs besides the canvas and the detections.
///
/// Built once at startup and shared by reference with every pass.
#[derive(Clone, Debug)]
pub struct OverlayContext {
    pub placement: PlacementConfig,
    pub assets: Vec<OverlayAsset>,
    pub confidence_threshold: f32,
}

/// What one pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    pub records: usize,
    pub accepted: usize,
    pub composited: usize,
}

impl OverlayContext {
    pub fn new(placement: PlacementConfig, assets: Vec<OverlayAsset>) -> Self {
        Self {
            placement,
            assets,
            confidence_threshold: CONFIDENCE_THRESHOLD,
        }
    }

    /// Load every accessory named by the config.
    pub fn from_config(config: &OverlayConfig) -> Result<Self> {
        let assets = load_assets(&config.accessories)?;
        Ok(Self::new(config.placement.clone(), assets))
    }

    /// Composite an overlay for every accepted detection in the feed.
    ///
    /// Detections whose overlay lands entirely off-canvas are skipped silently.
    pub fn apply(&self, feed: &DetectionFeed, canvas: &mut Canvas) -> Result<PassReport> {
        let (width, height) = canvas.dimensions();
        let detections = accept_detections(feed, self.confidence_threshold);
        let mut report = PassReport {
            records: feed.len(),
            accepted: detections.len(),
            composited: 0,
        };

        for detection in &detections {
            let roi = PixelRect::from_normalized(&detection.bbox, width, height);
            let Some(params) =
                select_placement(detection.acceptance_index, &self.placement, &self.assets)
            else {
                log::warn!("no overlay assets configured; skipping detections");
                break;
            };
            let scaled = scale_overlay(params.asset, roi.width(), params.scale_x)?;
            log::debug!(
                "detection #{} conf={:.2} roi={:?} asset=#{} overlay {}x{}",
                detection.record_index,
                detection.confidence,
                roi,
                params.asset.index,
                scaled.width(),
                scaled.height()
            );
            if paste_overlay(
                &scaled,
                &roi,
                params.translate_x_pct,
                params.translate_y_pct,
                canvas,
            ) {
                report.composited += 1;
            }
        }
        Ok(report)
    }
}

/// Clip an already-scaled overlay against the canvas and blend it in.
///
/// Returns false when no part of the overlay lands on the canvas.
pub fn paste_overlay(
    overlay: &RgbImage,
    roi: &PixelRect,
    translate_x_pct: f64,
    translate_y_pct: f64,
    canvas: &mut Canvas,
) -> bool {
    let Some(placement) = place_overlay(
        overlay.dimensions(),
        roi,
        translate_x_pct,
        translate_y_pct,
        canvas.dimensions(),
    ) else {
        return false;
    };
    log::debug!(
        "target {}x{} @ ({},{})->({},{})",
        placement.width(),
        placement.height(),
        placement.dest.left,
        placement.dest.top,
        placement.dest.right,
        placement.dest.bottom
    );
    composite_additive(canvas, overlay, &placement);
    true
}
