//! Live capture frame source.
//!
//! This module provides `LiveSource` for reading frames from a local capture
//! device, one blocking read per iteration of the live loop.
//!
//! Backends:
//! - `stub://...` devices produce synthetic frames (tests, demos); an optional
//!   frame limit makes the device "close" after that many frames
//! - real device nodes use libv4l (feature: ingest-v4l2)
//!
//! Any read failure is reported as a capture error; the caller treats the
//! device as closed.

use image::RgbImage;

use crate::error::{OverlayError, Result};

#[cfg(feature = "ingest-v4l2")]
use super::normalize::{normalize_to_rgb, PixelFormat};

/// Configuration for a live source.
#[derive(Clone, Debug)]
pub struct LiveConfig {
    /// Device path (e.g., "/dev/video0") or `stub://name`.
    pub device: String,
    /// Requested frame rate. Zero leaves the driver default.
    pub target_fps: u32,
    /// Preferred frame width.
    pub width: u32,
    /// Preferred frame height.
    pub height: u32,
    /// Synthetic devices fail after this many frames.
    pub frame_limit: Option<u64>,
}

impl LiveConfig {
    /// Config for `/dev/video{index}`.
    pub fn for_index(index: u32) -> Self {
        Self {
            device: format!("/dev/video{index}"),
            ..Self::default()
        }
    }

    pub fn synthetic(name: &str, width: u32, height: u32) -> Self {
        Self {
            device: format!("stub://{name}"),
            width,
            height,
            ..Self::default()
        }
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            target_fps: 30,
            width: 640,
            height: 480,
            frame_limit: None,
        }
    }
}

/// Live capture source.
pub struct LiveSource {
    backend: LiveBackend,
}

enum LiveBackend {
    Synthetic(SyntheticSource),
    #[cfg(feature = "ingest-v4l2")]
    Device(DeviceSource),
}

impl LiveSource {
    pub fn new(config: LiveConfig) -> Result<Self> {
        if config.device.starts_with("stub://") {
            return Ok(Self {
                backend: LiveBackend::Synthetic(SyntheticSource::new(config)),
            });
        }
        #[cfg(feature = "ingest-v4l2")]
        {
            Ok(Self {
                backend: LiveBackend::Device(DeviceSource::new(config)),
            })
        }
        #[cfg(not(feature = "ingest-v4l2"))]
        {
            Err(OverlayError::capture(
                config.device,
                "live capture requires the ingest-v4l2 feature",
            ))
        }
    }

    /// Open the device.
    pub fn connect(&mut self) -> Result<()> {
        match &mut self.backend {
            LiveBackend::Synthetic(source) => source.connect(),
            #[cfg(feature = "ingest-v4l2")]
            LiveBackend::Device(source) => source.connect(),
        }
    }

    /// Block until the next frame is available.
    pub fn next_frame(&mut self) -> Result<RgbImage> {
        match &mut self.backend {
            LiveBackend::Synthetic(source) => source.next_frame(),
            #[cfg(feature = "ingest-v4l2")]
            LiveBackend::Device(source) => source.next_frame(),
        }
    }

    /// Get frame statistics.
    pub fn stats(&self) -> LiveStats {
        match &self.backend {
            LiveBackend::Synthetic(source) => source.stats(),
            #[cfg(feature = "ingest-v4l2")]
            LiveBackend::Device(source) => source.stats(),
        }
    }
}

/// Statistics for a live source.
#[derive(Clone, Debug)]
pub struct LiveStats {
    pub frames_captured: u64,
    pub device: String,
}

// ----------------------------------------------------------------------------
// Synthetic source (stub://) for tests
// ----------------------------------------------------------------------------

struct SyntheticSource {
    config: LiveConfig,
    frame_count: u64,
    connected: bool,
}

impl SyntheticSource {
    fn new(config: LiveConfig) -> Self {
        Self {
            config,
            frame_count: 0,
            connected: false,
        }
    }

    fn connect(&mut self) -> Result<()> {
        log::info!("LiveSource: connected to {} (synthetic)", self.config.device);
        self.connected = true;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<RgbImage> {
        if !self.connected {
            return Err(OverlayError::capture(
                &self.config.device,
                "device not connected",
            ));
        }
        if self
            .config
            .frame_limit
            .is_some_and(|limit| self.frame_count >= limit)
        {
            self.connected = false;
            return Err(OverlayError::capture(&self.config.device, "device closed"));
        }
        self.frame_count += 1;

        // Diagonal gradient drifting one step per frame.
        let shift = self.frame_count;
        Ok(RgbImage::from_fn(
            self.config.width,
            self.config.height,
            |x, y| {
                let v = ((x as u64 + y as u64 + shift) % 128) as u8;
                image::Rgb([v, v / 2, 127 - v])
            },
        ))
    }

    fn stats(&self) -> LiveStats {
        LiveStats {
            frames_captured: self.frame_count,
            device: self.config.device.clone(),
        }
    }
}

// ----------------------------------------------------------------------------
// V4L2 device source using libv4l
// ----------------------------------------------------------------------------

#[cfg(feature = "ingest-v4l2")]
struct DeviceSource {
    config: LiveConfig,
    state: Option<DeviceState>,
    frame_count: u64,
    active_width: u32,
    active_height: u32,
    format: PixelFormat,
}

#[cfg(feature = "ingest-v4l2")]
#[ouroboros::self_referencing]
struct DeviceState {
    device: v4l::Device,
    #[borrows(device)]
    #[covariant]
    stream: v4l::prelude::MmapStream<'this>,
}

#[cfg(feature = "ingest-v4l2")]
impl DeviceSource {
    fn new(config: LiveConfig) -> Self {
        Self {
            active_width: config.width,
            active_height: config.height,
            config,
            state: None,
            frame_count: 0,
            format: PixelFormat::Rgb24,
        }
    }

    fn capture_error(&self, reason: impl ToString) -> OverlayError {
        OverlayError::capture(&self.config.device, reason)
    }

    fn connect(&mut self) -> Result<()> {
        use v4l::buffer::Type;
        use v4l::video::Capture;

        let device = v4l::Device::with_path(&self.config.device)
            .map_err(|e| self.capture_error(format!("open device: {e}")))?;
        let mut format = device
            .format()
            .map_err(|e| self.capture_error(format!("read format: {e}")))?;
        format.width = self.config.width;
        format.height = self.config.height;
        format.fourcc = v4l::FourCC::new(b"RGB3");

        let format = match device.set_format(&format) {
            Ok(format) => format,
            Err(err) => {
                log::warn!(
                    "LiveSource: failed to set format on {}: {}",
                    self.config.device,
                    err
                );
                device
                    .format()
                    .map_err(|e| self.capture_error(format!("read format: {e}")))?
            }
        };
        self.format = PixelFormat::from_fourcc(&format.fourcc.repr).ok_or_else(|| {
            self.capture_error(format!("unsupported pixel format {}", format.fourcc))
        })?;

        if self.config.target_fps > 0 {
            let params = v4l::video::capture::Parameters::with_fps(self.config.target_fps);
            if let Err(err) = device.set_params(&params) {
                log::warn!(
                    "LiveSource: failed to set fps on {}: {}",
                    self.config.device,
                    err
                );
            }
        }

        self.active_width = format.width;
        self.active_height = format.height;

        let state = DeviceState::try_new(device, |device| {
            v4l::prelude::MmapStream::with_buffers(device, Type::VideoCapture, 4)
        })
        .map_err(|e| self.capture_error(format!("create buffer stream: {e}")))?;
        self.state = Some(state);

        log::info!(
            "LiveSource: connected to {} ({}x{} {:?})",
            self.config.device,
            self.active_width,
            self.active_height,
            self.format
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<RgbImage> {
        use v4l::io::traits::CaptureStream;

        let captured = match self.state.as_mut() {
            Some(state) => {
                state.with_stream_mut(|stream| stream.next().map(|(buf, _meta)| buf.to_vec()))
            }
            None => return Err(self.capture_error("device not connected")),
        };
        let raw = captured.map_err(|e| self.capture_error(format!("read frame: {e}")))?;

        let frame = self.frame_from_raw(&raw)?;
        self.frame_count += 1;
        Ok(frame)
    }

    fn frame_from_raw(&self, raw: &[u8]) -> Result<RgbImage> {
        let rgb = normalize_to_rgb(raw, self.active_width, self.active_height, self.format)
            .map_err(|e| self.capture_error(e))?;
        RgbImage::from_raw(self.active_width, self.active_height, rgb)
            .ok_or_else(|| self.capture_error("frame buffer size mismatch"))
    }

    fn stats(&self) -> LiveStats {
        LiveStats {
            frames_captured: self.frame_count,
            device: self.config.device.clone(),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
