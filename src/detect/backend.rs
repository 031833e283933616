use image::RgbImage;

use crate::detect::result::DetectionFeed;
use crate::error::Result;

/// Detector backend trait.
///
/// The model behind a backend is an external collaborator: given a frame it
/// returns a flat detection feed. Filtering and placement happen downstream,
/// so backends report every record the model produced.
pub trait DetectorBackend {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run detection on a frame.
    ///
    /// Implementations must treat the frame as read-only.
    fn detect(&mut self, frame: &RgbImage) -> Result<DetectionFeed>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
