//! Overlay placement and canvas-boundary clipping.
//!
//! The overlay is centred horizontally on the ROI (plus a fractional shift)
//! and hangs from the ROI's bottom edge (minus a fractional lift). Whatever
//! falls outside the canvas is trimmed from the destination, and the same
//! number of rows/columns is trimmed from the matching side of the source.
//!
//! The source rectangle starts as `[0, w-1] x [0, h-1]` while the destination
//! is `2 * (w / 2)` wide and `h` tall, so a span can come out one short of its
//! destination after clipping. That is settled per axis by moving the
//! source's low edge down when it has room, else its high edge up. Which row
//! or column is dropped at a border depends on this order; keep it.

use super::rect::PixelRect;

/// Matched regions of the scaled overlay and the canvas, equal in size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub source: PixelRect,
    pub dest: PixelRect,
}

impl Placement {
    pub fn width(&self) -> u32 {
        self.dest.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.dest.height() as u32
    }
}

/// Edges further out than this are treated as off-canvas.
///
/// Keeps every later clip step (`-min`, `max - limit + 1`) inside `i32`.
const MAX_EDGE: i64 = (i32::MAX / 4) as i64;

/// Where the overlay would land before clipping.
///
/// Returns `None` when an extreme translation pushes an edge out of range.
pub fn anchor_rect(
    overlay_size: (u32, u32),
    roi: &PixelRect,
    translate_x_pct: f64,
    translate_y_pct: f64,
) -> Option<PixelRect> {
    let (overlay_w, overlay_h) = (overlay_size.0 as i64, overlay_size.1 as i64);
    let (roi_w, roi_h) = (roi.width() as f64, roi.height() as f64);
    let center_x = roi.left as i64 + (0.5 * roi_w) as i64;
    let shift_x = (roi_w * translate_x_pct) as i64;
    let lift_y = (roi_h * translate_y_pct) as i64;
    let half_w = (0.5 * overlay_w as f64) as i64;
    let bottom = (roi.bottom as i64).saturating_sub(lift_y);

    let edge = |value: i64| {
        if (-MAX_EDGE..=MAX_EDGE).contains(&value) {
            i32::try_from(value).ok()
        } else {
            None
        }
    };
    Some(PixelRect::new(
        edge(center_x.saturating_add(shift_x).saturating_sub(half_w))?,
        edge(bottom.saturating_sub(overlay_h))?,
        edge(center_x.saturating_add(shift_x).saturating_add(half_w))?,
        edge(bottom)?,
    ))
}

/// Compute the clipped source/destination pair for one overlay.
///
/// Returns `None` when nothing of the overlay lands on the canvas.
pub fn place_overlay(
    overlay_size: (u32, u32),
    roi: &PixelRect,
    translate_x_pct: f64,
    translate_y_pct: f64,
    canvas_size: (u32, u32),
) -> Option<Placement> {
    let (Ok(overlay_w), Ok(overlay_h)) = (
        i32::try_from(overlay_size.0),
        i32::try_from(overlay_size.1),
    ) else {
        return None;
    };
    let (canvas_w, canvas_h) = (
        i32::try_from(canvas_size.0).unwrap_or(i32::MAX),
        i32::try_from(canvas_size.1).unwrap_or(i32::MAX),
    );
    if overlay_w == 0 || overlay_h == 0 {
        return None;
    }

    let Some(mut dest) = anchor_rect(overlay_size, roi, translate_x_pct, translate_y_pct) else {
        log::debug!("overlay anchor for {:?} is out of range", roi);
        return None;
    };
    let mut source = PixelRect {
        left: 0,
        top: 0,
        right: overlay_w - 1,
        bottom: overlay_h - 1,
    };

    clip_axis(
        AxisEdges {
            source_min: &mut source.left,
            source_max: &mut source.right,
            dest_min: &mut dest.left,
            dest_max: &mut dest.right,
        },
        canvas_w,
        "x",
    );
    clip_axis(
        AxisEdges {
            source_min: &mut source.top,
            source_max: &mut source.bottom,
            dest_min: &mut dest.top,
            dest_max: &mut dest.bottom,
        },
        canvas_h,
        "y",
    );

    let placement = Placement { source, dest };
    if dest.width() <= 0 || dest.height() <= 0 {
        log::debug!("overlay {:?} falls outside the canvas", dest);
        return None;
    }
    let in_bounds = source.width() == dest.width()
        && source.height() == dest.height()
        && source.left >= 0
        && source.top >= 0
        && source.right <= overlay_w
        && source.bottom <= overlay_h
        && dest.left >= 0
        && dest.top >= 0
        && dest.right <= canvas_w
        && dest.bottom <= canvas_h;
    if !in_bounds {
        log::debug!("overlay placement {:?} has no usable overlap", placement);
        return None;
    }
    Some(placement)
}

struct AxisEdges<'a> {
    source_min: &'a mut i32,
    source_max: &'a mut i32,
    dest_min: &'a mut i32,
    dest_max: &'a mut i32,
}

fn clip_axis(edges: AxisEdges<'_>, limit: i32, axis: &str) {
    let AxisEdges {
        source_min,
        source_max,
        dest_min,
        dest_max,
    } = edges;

    if *dest_min < 0 {
        log::debug!("clipping min {axis}");
        *source_min = -*dest_min;
        *dest_min = 0;
    }
    if *dest_max >= limit {
        log::debug!("clipping max {axis}");
        *source_max -= *dest_max - limit + 1;
        *dest_max = limit - 1;
    }
    if *source_max - *source_min < *dest_max - *dest_min {
        if *source_min > 0 {
            *source_min -= 1;
        } else {
            *source_max += 1;
        }
    }
}
