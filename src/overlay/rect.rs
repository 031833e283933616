use crate::detect::NormalizedRect;

/// Axis-aligned integer rectangle in canvas pixels.
///
/// Edges are half-open in the usual image sense: `width = right - left`.
/// Construction swaps inverted edges, so width and height are never negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Map a detector box onto a canvas, truncating toward zero.
    ///
    /// No clipping: the result may lie partly or wholly outside the canvas.
    pub fn from_normalized(bbox: &NormalizedRect, width: u32, height: u32) -> Self {
        let w = width as f32;
        let h = height as f32;
        Self::new(
            (bbox.left * w) as i32,
            (bbox.top * h) as i32,
            (bbox.right * w) as i32,
            (bbox.bottom * h) as i32,
        )
    }

    /// Saturates for boxes spanning more than `i32::MAX` pixels.
    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }
}
