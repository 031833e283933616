use std::path::Path;

use image::RgbImage;

use crate::detect::backend::DetectorBackend;
use crate::detect::result::DetectionFeed;
use crate::error::{OverlayError, Result};

/// Replays a fixed detection feed for every frame.
///
/// Stands in for a model when running offline or in tests. The feed is a
/// JSON array of numbers in the detector's flat record layout.
pub struct ReplayBackend {
    feed: DetectionFeed,
    calls: u64,
}

impl ReplayBackend {
    pub fn new(feed: DetectionFeed) -> Self {
        Self { feed, calls: 0 }
    }

    pub fn from_values(values: Vec<f32>) -> Self {
        Self::new(DetectionFeed::new(values))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| OverlayError::asset(path, e))?;
        let values: Vec<f32> =
            serde_json::from_str(&raw).map_err(|e| OverlayError::asset(path, e))?;
        log::info!(
            "ReplayBackend: loaded {} values from {}",
            values.len(),
            path.display()
        );
        Ok(Self::from_values(values))
    }

    /// Number of frames this backend has been asked to process.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl DetectorBackend for ReplayBackend {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn detect(&mut self, _frame: &RgbImage) -> Result<DetectionFeed> {
        self.calls += 1;
        Ok(self.feed.clone())
    }
}
