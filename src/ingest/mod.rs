//! Frame acquisition.
//!
//! A run reads either one still image or a live capture device:
//! - `StillSource`: a local image file, decoded once
//! - `LiveSource`: a V4L2 device (feature: ingest-v4l2) or a synthetic
//!   `stub://` generator for tests
//!
//! Which one is used follows from the shape of the source identifier: a bare
//! non-negative integer names a capture device, anything else is a file path.
//!
//! The ingestion layer only produces RGB8 frames; it never writes anything.

pub mod file;
#[cfg(feature = "ingest-v4l2")]
mod normalize;
pub mod v4l2;

use std::path::PathBuf;

pub use file::StillSource;
pub use v4l2::{LiveConfig, LiveSource, LiveStats};

/// Parsed frame-source identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceId {
    /// Capture device index, e.g. `0` for `/dev/video0`.
    Device(u32),
    File(PathBuf),
}

impl SourceId {
    pub fn parse(raw: &str) -> Self {
        let is_index = !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit());
        match raw.parse::<u32>() {
            Ok(index) if is_index => SourceId::Device(index),
            _ => SourceId::File(PathBuf::from(raw)),
        }
    }

    pub fn is_device(&self) -> bool {
        matches!(self, SourceId::Device(_))
    }
}
