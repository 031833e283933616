use image::RgbImage;

use super::clip::Placement;
use crate::frame::Canvas;

/// Add the overlay's source region onto the canvas's destination region.
///
/// Per channel `canvas = saturate(overlay + canvas)`: unit weights, zero
/// offset, no alpha. Black overlay pixels leave the canvas untouched.
pub fn composite_additive(canvas: &mut Canvas, overlay: &RgbImage, placement: &Placement) {
    let (width, height) = (placement.width(), placement.height());
    let (src_x, src_y) = (placement.source.left as u32, placement.source.top as u32);
    let (dst_x, dst_y) = (placement.dest.left as u32, placement.dest.top as u32);
    let target = canvas.image_mut();

    for row in 0..height {
        for col in 0..width {
            let over = overlay.get_pixel(src_x + col, src_y + row);
            let under = target.get_pixel_mut(dst_x + col, dst_y + row);
            for (dst, src) in under.0.iter_mut().zip(over.0) {
                *dst = dst.saturating_add(src);
            }
        }
    }
}
