//! Desktop window surface.
//!
//! The window is created on the first `show` and recreated whenever the
//! canvas size changes. Any key press or closing the window cancels the run.

use std::time::Duration;

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use super::DisplaySurface;
use crate::error::{OverlayError, Result};
use crate::frame::Canvas;

const WINDOW_TITLE: &str = "Lots-o-hats";

pub struct WindowDisplay {
    window: Option<Window>,
    buffer: Vec<u32>,
    size: (usize, usize),
}

impl WindowDisplay {
    pub fn new() -> Self {
        Self {
            window: None,
            buffer: Vec::new(),
            size: (0, 0),
        }
    }

    fn ensure_window(&mut self, width: usize, height: usize) -> Result<&mut Window> {
        if self.window.is_none() || self.size != (width, height) {
            let window = Window::new(WINDOW_TITLE, width, height, WindowOptions::default())
                .map_err(|e| OverlayError::display(format!("open window: {e}")))?;
            log::info!("window opened ({width}x{height})");
            self.window = Some(window);
            self.size = (width, height);
        }
        self.window
            .as_mut()
            .ok_or_else(|| OverlayError::display("window unavailable"))
    }
}

impl Default for WindowDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for WindowDisplay {
    fn show(&mut self, canvas: &Canvas) -> Result<()> {
        let (width, height) = canvas.dimensions();
        let (width, height) = (width as usize, height as usize);

        // 0RGB packing expected by minifb.
        self.buffer.clear();
        self.buffer.extend(canvas.image().pixels().map(|p| {
            let [r, g, b] = p.0;
            (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
        }));
        let buffer = std::mem::take(&mut self.buffer);
        let updated = self
            .ensure_window(width, height)?
            .update_with_buffer(&buffer, width, height)
            .map_err(|e| OverlayError::display(format!("update window: {e}")));
        self.buffer = buffer;
        updated
    }

    fn poll_cancel(&mut self, timeout: Duration) -> Result<bool> {
        std::thread::sleep(timeout);
        let Some(window) = self.window.as_mut() else {
            return Ok(false);
        };
        window.update();
        let pressed: Vec<Key> = window.get_keys_pressed(KeyRepeat::No);
        Ok(!window.is_open() || !pressed.is_empty())
    }
}
