use crate::config::PlacementConfig;
use crate::frame::OverlayAsset;

/// Placement chosen for one accepted detection.
#[derive(Clone, Copy, Debug)]
pub struct PlacementParams<'a> {
    pub asset: &'a OverlayAsset,
    pub scale_x: f64,
    pub translate_x_pct: f64,
    pub translate_y_pct: f64,
}

/// Select `values[index % len]`; `None` for an empty sequence.
pub fn cycled<T>(values: &[T], index: usize) -> Option<&T> {
    if values.is_empty() {
        None
    } else {
        values.get(index % values.len())
    }
}

/// Pick asset and tuning for the detection with the given acceptance index.
///
/// Each of the four sequences wraps on its own length.
pub fn select_placement<'a>(
    acceptance_index: usize,
    placement: &PlacementConfig,
    assets: &'a [OverlayAsset],
) -> Option<PlacementParams<'a>> {
    Some(PlacementParams {
        asset: cycled(assets, acceptance_index)?,
        scale_x: *cycled(&placement.scale_x, acceptance_index)?,
        translate_x_pct: *cycled(&placement.translate_x_pct, acceptance_index)?,
        translate_y_pct: *cycled(&placement.translate_y_pct, acceptance_index)?,
    })
}
