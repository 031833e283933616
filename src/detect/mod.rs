mod backend;
mod backends;
pub mod blob;
mod result;

pub use backend::DetectorBackend;
pub use backends::ReplayBackend;
#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
pub use result::{
    accept_detections, Detection, DetectionFeed, NormalizedRect, RawDetection,
    CONFIDENCE_THRESHOLD, RECORD_LEN,
};
