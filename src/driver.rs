//! Stream driver.
//!
//! Runs the detect/composite/display cycle over a frame source. The mode is
//! fixed by the source:
//!
//! - Static: `Loaded -> Detected -> Composited -> Displayed -> Done`. One pass,
//!   then the result stays up until the display reports cancellation.
//! - Live: `Loaded -> {Detected -> Composited -> Displayed}* -> Done`. Between
//!   frames the display is polled for cancellation with the frame interval as
//!   timeout; a capture failure ends the run with an error.
//!
//! Everything is synchronous. The driver owns the canvas; the overlay context,
//! detector and display are borrowed for the duration of the run.

use std::time::Duration;

use crate::detect::{DetectionFeed, DetectorBackend};
use crate::display::DisplaySurface;
use crate::error::Result;
use crate::frame::Canvas;
use crate::ingest::{LiveConfig, LiveSource, SourceId, StillSource};
use crate::overlay::OverlayContext;

/// Poll interval while a static result waits for cancellation.
const STATIC_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Default pause between live frames.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamMode {
    Static,
    Live,
}

/// Where the driver is in the cycle.
#[derive(Debug)]
pub enum StreamState {
    /// Canvas holds a fresh frame.
    Loaded,
    /// Detector output for the current canvas.
    Detected(DetectionFeed),
    Composited,
    Displayed,
    Done,
}

/// Frame source selected from the source identifier.
pub enum FrameSource {
    Still(StillSource),
    Live(LiveSource),
}

impl FrameSource {
    /// A device index opens a live source, anything else a still image.
    pub fn open(id: &SourceId) -> Result<Self> {
        match id {
            SourceId::Device(index) => Ok(FrameSource::Live(LiveSource::new(
                LiveConfig::for_index(*index),
            )?)),
            SourceId::File(path) => Ok(FrameSource::Still(StillSource::new(path.clone()))),
        }
    }

    pub fn mode(&self) -> StreamMode {
        match self {
            FrameSource::Still(_) => StreamMode::Static,
            FrameSource::Live(_) => StreamMode::Live,
        }
    }
}

/// Totals over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub accepted: u64,
    pub composited: u64,
}

pub struct StreamDriver<'a> {
    context: &'a OverlayContext,
    detector: &'a mut dyn DetectorBackend,
    display: &'a mut dyn DisplaySurface,
    source: FrameSource,
    frame_interval: Duration,
    canvas: Canvas,
    summary: RunSummary,
}

impl<'a> StreamDriver<'a> {
    pub fn new(
        context: &'a OverlayContext,
        detector: &'a mut dyn DetectorBackend,
        display: &'a mut dyn DisplaySurface,
        source: FrameSource,
    ) -> Self {
        Self {
            context,
            detector,
            display,
            source,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            canvas: Canvas::blank(0, 0),
            summary: RunSummary::default(),
        }
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    pub fn mode(&self) -> StreamMode {
        self.source.mode()
    }

    /// The canvas as of the last completed step.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Drive the source until cancellation (or capture failure in live mode).
    pub fn run(&mut self) -> Result<RunSummary> {
        let mode = self.mode();
        log::info!(
            "stream driver starting in {:?} mode with detector {}",
            mode,
            self.detector.name()
        );
        self.summary = RunSummary::default();
        self.detector.warm_up()?;
        self.load_first_frame()?;

        let mut state = StreamState::Loaded;
        loop {
            state = match state {
                StreamState::Loaded => {
                    StreamState::Detected(self.detector.detect(self.canvas.image())?)
                }
                StreamState::Detected(feed) => {
                    let report = self.context.apply(&feed, &mut self.canvas)?;
                    self.summary.accepted += report.accepted as u64;
                    self.summary.composited += report.composited as u64;
                    log::debug!(
                        "frame {}: {} records, {} accepted, {} composited",
                        self.summary.frames,
                        report.records,
                        report.accepted,
                        report.composited
                    );
                    StreamState::Composited
                }
                StreamState::Composited => {
                    self.display.show(&self.canvas)?;
                    self.summary.frames += 1;
                    StreamState::Displayed
                }
                StreamState::Displayed => self.after_display(mode)?,
                StreamState::Done => break,
            };
        }

        log::info!(
            "stream driver done: {} frames, {} detections accepted, {} overlays composited",
            self.summary.frames,
            self.summary.accepted,
            self.summary.composited
        );
        self.log_source_stats();
        Ok(self.summary)
    }

    fn log_source_stats(&self) {
        if let FrameSource::Live(source) = &self.source {
            let stats = source.stats();
            log::info!(
                "{}: {} frames captured",
                stats.device,
                stats.frames_captured
            );
        }
    }

    fn load_first_frame(&mut self) -> Result<()> {
        match &mut self.source {
            FrameSource::Still(source) => {
                self.canvas = Canvas::new(source.load()?);
            }
            FrameSource::Live(source) => {
                source.connect()?;
                self.canvas = Canvas::new(source.next_frame()?);
            }
        }
        Ok(())
    }

    fn after_display(&mut self, mode: StreamMode) -> Result<StreamState> {
        match (mode, &mut self.source) {
            (StreamMode::Live, FrameSource::Live(source)) => {
                if self.display.poll_cancel(self.frame_interval)? {
                    return Ok(StreamState::Done);
                }
                let frame = source.next_frame();
                match frame {
                    Ok(frame) => {
                        self.canvas.refill(frame);
                        Ok(StreamState::Loaded)
                    }
                    Err(err) => {
                        log::warn!("live capture ended: {err}");
                        self.log_source_stats();
                        Err(err)
                    }
                }
            }
            _ => {
                while !self.display.poll_cancel(STATIC_POLL_INTERVAL)? {}
                Ok(StreamState::Done)
            }
        }
    }
}
