//! Lots-o-hats
//!
//! Overlays accessory images onto regions found by an object detector, on a
//! still image or on every frame of a live capture device.
//!
//! # Pipeline
//!
//! For each frame:
//!
//! 1. the detector backend produces a flat detection feed
//! 2. detections scoring above the confidence threshold are kept, in order
//! 3. each kept box is mapped to canvas pixels and paired with an accessory
//!    and placement tuning by cycling over the configured lists
//! 4. the accessory is scaled to the box width, anchored on the box bottom,
//!    clipped against the canvas and added onto it
//! 5. the canvas goes to the display surface
//!
//! # Module Structure
//!
//! - `config`: overlay configuration file and environment overrides
//! - `detect`: detection feed layout, filtering, detector backends
//! - `display`: display surfaces and cancellation
//! - `driver`: static/live state machine
//! - `error`: typed errors
//! - `frame`: canvas and overlay asset buffers
//! - `ingest`: still-image and live capture frame sources
//! - `overlay`: placement, scaling, clipping and compositing

pub mod config;
pub mod detect;
pub mod display;
pub mod driver;
pub mod error;
pub mod frame;
pub mod ingest;
pub mod overlay;

pub use config::{ClassifierArtifacts, OverlayConfig, PlacementConfig};
pub use detect::{DetectionFeed, DetectorBackend, ReplayBackend};
pub use display::{DisplaySurface, HeadlessDisplay};
pub use driver::{FrameSource, RunSummary, StreamDriver, StreamMode, StreamState};
pub use error::{OverlayError, Result};
pub use frame::{Canvas, OverlayAsset};
pub use ingest::{LiveConfig, LiveSource, SourceId, StillSource};
pub use overlay::{OverlayContext, PassReport, PixelRect};
