//! Error kinds surfaced by the overlay pipeline.
//!
//! Every variant is terminal for the run that produced it. Callers decide
//! whether to exit, retry with different inputs, or report; the library never
//! aborts the process on its own.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OverlayError>;

#[derive(Debug, Error)]
pub enum OverlayError {
    /// Configuration file missing, unparsable, or semantically invalid.
    #[error("failed to read config {}: {reason}", path.display())]
    ConfigRead { path: PathBuf, reason: String },

    /// Image or classifier artifact missing, undecodable, or empty.
    #[error("failed to read asset {}: {reason}", path.display())]
    AssetRead { path: PathBuf, reason: String },

    /// Overlay source image with zero width cannot be scaled.
    #[error("overlay asset #{index} has zero width")]
    DegenerateAsset { index: usize },

    /// Capture device unreachable, or closed mid-stream.
    #[error("capture {device}: {reason}")]
    Capture { device: String, reason: String },

    #[error("detector backend {backend}: {reason}")]
    Inference {
        backend: &'static str,
        reason: String,
    },

    #[error("display: {reason}")]
    Display { reason: String },
}

impl OverlayError {
    pub(crate) fn config(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ConfigRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn asset(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::AssetRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn capture(device: impl Into<String>, reason: impl ToString) -> Self {
        Self::Capture {
            device: device.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn inference(backend: &'static str, reason: impl ToString) -> Self {
        Self::Inference {
            backend,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn display(reason: impl ToString) -> Self {
        Self::Display {
            reason: reason.to_string(),
        }
    }
}
