//! Initial position and size of a newly added overlay.

use crate::{
    foundation::config::{EditorConfig, ReferenceBasis},
    foundation::core::{ObjectTransform, Placement, Size},
    viewport::ViewportFit,
};

/// `min(basis * fraction, max_width) / native_width`.
///
/// Without a basis the target width is `max_width`.
pub fn initial_scale(native_width: f64, basis: Option<f64>, fraction: f64, max_width: f64) -> f64 {
    let target = basis.map_or(max_width, |b| b * fraction).min(max_width);
    target / native_width
}

/// Compute where a new overlay of native size `overlay` lands.
///
/// Returns `None` while the viewport is not displayable; the overlay then keeps its default
/// transform until the user moves it.
pub fn initial_placement(
    overlay: Size,
    fit: &ViewportFit,
    background: Option<Size>,
    cfg: &EditorConfig,
) -> Option<Placement> {
    let (left, top) = fit.center()?;
    let basis = match cfg.reference_basis {
        ReferenceBasis::BackgroundWidth => background.map(|b| b.width),
        ReferenceBasis::CanvasWidth => Some(fit.canvas_size.width),
    };
    let scale = initial_scale(
        overlay.width,
        basis,
        cfg.placement_fraction,
        cfg.placement_max_width_px,
    );
    Some(Placement {
        scale,
        left,
        top,
        angle_deg: 0.0,
    })
}

/// Center-anchored transform for a new overlay.
pub fn initial_transform(
    overlay: Size,
    fit: &ViewportFit,
    background: Option<Size>,
    cfg: &EditorConfig,
) -> ObjectTransform {
    initial_placement(overlay, fit, background, cfg)
        .map(ObjectTransform::centered_at)
        .unwrap_or_else(ObjectTransform::centered)
}
