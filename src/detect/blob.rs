//! Frame-to-tensor preprocessing for SSD-style face detectors.
//!
//! Models trained in Caffe expect BGR input with per-channel mean subtraction
//! and no scaling; TensorFlow exports expect RGB mapped into [-1, 1]. The
//! artifact extensions decide which layout a classifier gets.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbImage;

/// Side length of the square detector input.
pub const BLOB_SIZE: u32 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlobParams {
    pub scale: f32,
    /// Per-channel mean in tensor channel order.
    pub mean: [f32; 3],
    pub order: ChannelOrder,
}

impl BlobParams {
    pub const CAFFE: Self = Self {
        scale: 1.0,
        mean: [104.0, 177.0, 123.0],
        order: ChannelOrder::Bgr,
    };

    pub const TENSORFLOW: Self = Self {
        scale: 1.0 / 127.5,
        mean: [127.5, 127.5, 127.5],
        order: ChannelOrder::Rgb,
    };

    /// Pick preprocessing from the classifier artifacts' lineage.
    pub fn for_artifacts(model: &Path, network: &Path) -> Self {
        let has_ext = |path: &Path, ext: &str| {
            path.extension()
                .is_some_and(|found| found.eq_ignore_ascii_case(ext))
        };
        if has_ext(model, "caffemodel") || has_ext(network, "prototxt") {
            Self::CAFFE
        } else {
            Self::TENSORFLOW
        }
    }
}

/// Resize to `BLOB_SIZE` square and lay out as NCHW `f32`, batch of one.
pub fn build_blob(frame: &RgbImage, params: &BlobParams) -> Vec<f32> {
    let resized = imageops::resize(frame, BLOB_SIZE, BLOB_SIZE, FilterType::Triangle);
    let plane = (BLOB_SIZE * BLOB_SIZE) as usize;
    let mut blob = vec![0.0f32; plane * 3];
    for (x, y, pixel) in resized.enumerate_pixels() {
        let offset = (y * BLOB_SIZE + x) as usize;
        for channel in 0..3 {
            let source = match params.order {
                ChannelOrder::Rgb => channel,
                ChannelOrder::Bgr => 2 - channel,
            };
            let value = pixel.0[source] as f32;
            blob[channel * plane + offset] = (value - params.mean[channel]) * params.scale;
        }
    }
    blob
}
