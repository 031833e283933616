//! Display surfaces.
//!
//! The stream driver hands the canvas to a surface after every composite pass
//! and asks it, between frames, whether the run was cancelled.
//!
//! - `HeadlessDisplay`: no window; cancelled by Ctrl-C, optionally writes the
//!   latest canvas to an image file
//! - `WindowDisplay`: desktop window (feature: display-window)

#[cfg(feature = "display-window")]
mod window;

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::error::{OverlayError, Result};
use crate::frame::Canvas;

#[cfg(feature = "display-window")]
pub use window::WindowDisplay;

/// Something that presents the canvas and reports cancellation.
pub trait DisplaySurface {
    /// Present the canvas as it stands after a composite pass.
    fn show(&mut self, canvas: &Canvas) -> Result<()>;

    /// Wait up to `timeout` for a cancellation request.
    ///
    /// Returns true once the run should stop.
    fn poll_cancel(&mut self, timeout: Duration) -> Result<bool>;
}

/// Windowless surface.
pub struct HeadlessDisplay {
    cancel: Receiver<()>,
    snapshot: Option<PathBuf>,
    shown: u64,
}

impl HeadlessDisplay {
    /// Cancel on Ctrl-C. The handler can be installed once per process.
    pub fn with_ctrlc() -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        ctrlc::set_handler(move || {
            let _ = tx.send(());
        })
        .map_err(|e| OverlayError::display(format!("error setting Ctrl-C handler: {e}")))?;
        Ok(Self::from_receiver(rx))
    }

    /// Cancel whenever a message arrives on `cancel`.
    ///
    /// A disconnected channel counts as cancellation, since nothing can ever
    /// stop the run otherwise.
    pub fn from_receiver(cancel: Receiver<()>) -> Self {
        Self {
            cancel,
            snapshot: None,
            shown: 0,
        }
    }

    /// Re-encode the canvas to `path` on every `show`.
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(path.into());
        self
    }

    pub fn frames_shown(&self) -> u64 {
        self.shown
    }
}

impl DisplaySurface for HeadlessDisplay {
    fn show(&mut self, canvas: &Canvas) -> Result<()> {
        self.shown += 1;
        if let Some(path) = &self.snapshot {
            canvas
                .image()
                .save(path)
                .map_err(|e| OverlayError::display(format!("write {}: {e}", path.display())))?;
            log::debug!("snapshot {} written to {}", self.shown, path.display());
        }
        Ok(())
    }

    fn poll_cancel(&mut self, timeout: Duration) -> Result<bool> {
        match self.cancel.recv_timeout(timeout) {
            Ok(()) => {
                log::info!("cancellation requested");
                Ok(true)
            }
            Err(RecvTimeoutError::Timeout) => Ok(false),
            Err(RecvTimeoutError::Disconnected) => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn poll_times_out_without_signal() -> Result<()> {
        let (_tx, rx) = mpsc::channel();
        let mut display = HeadlessDisplay::from_receiver(rx);
        assert!(!display.poll_cancel(Duration::from_millis(1))?);
        Ok(())
    }

    #[test]
    fn signal_cancels() -> Result<()> {
        let (tx, rx) = mpsc::channel();
        let mut display = HeadlessDisplay::from_receiver(rx);
        tx.send(()).expect("send");
        assert!(display.poll_cancel(Duration::from_millis(1))?);
        Ok(())
    }

    #[test]
    fn dropped_sender_cancels() -> Result<()> {
        let (tx, rx) = mpsc::channel::<()>();
        drop(tx);
        let mut display = HeadlessDisplay::from_receiver(rx);
        assert!(display.poll_cancel(Duration::from_millis(1))?);
        Ok(())
    }

    #[test]
    fn snapshot_writes_latest_canvas() -> Result<()> {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("latest.png");
        let (_tx, rx) = mpsc::channel();
        let mut display = HeadlessDisplay::from_receiver(rx).with_snapshot(&path);

        let mut canvas = Canvas::blank(4, 3);
        display.show(&canvas)?;
        canvas.refill(image::RgbImage::from_pixel(4, 3, Rgb([9, 8, 7])));
        display.show(&canvas)?;

        let written = image::open(&path).expect("decode snapshot").to_rgb8();
        assert_eq!(written.get_pixel(3, 2), &Rgb([9, 8, 7]));
        assert_eq!(display.frames_shown(), 2);
        Ok(())
    }
}
