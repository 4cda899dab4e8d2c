//! Fitting the background into the available display area.

use crate::foundation::core::Size;

/// Result of fitting a background into a container.
///
/// `display_scale` is the ratio of on-screen canvas pixels to background native pixels. It never
/// exceeds `1.0`; `0.0` means the viewport is not displayable yet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportFit {
    pub display_scale: f64,
    /// Canvas element size: native size times `display_scale`.
    pub canvas_size: Size,
}

impl ViewportFit {
    /// State before any background has been loaded.
    pub const EMPTY: Self = Self {
        display_scale: 0.0,
        canvas_size: Size::ZERO,
    };

    /// `display_scale = min(1, min(Aw / W, Ah / H))`.
    ///
    /// Degenerate inputs (zero or negative sizes, non-finite values) yield [`ViewportFit::EMPTY`]
    /// instead of an error.
    pub fn compute(native: Size, available: Size) -> Self {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !usable(native.width) || !usable(native.height) {
            return Self::EMPTY;
        }
        let clamp = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let (aw, ah) = (clamp(available.width), clamp(available.height));

        let display_scale = (aw / native.width).min(ah / native.height).min(1.0);
        Self {
            display_scale,
            canvas_size: Size::new(
                native.width * display_scale,
                native.height * display_scale,
            ),
        }
    }

    /// Fit into a container after reserving `margin_px` of breathing room on each axis.
    pub fn compute_with_margin(native: Size, container: Size, margin_px: f64) -> Self {
        let available = Size::new(
            (container.width - margin_px).max(0.0),
            (container.height - margin_px).max(0.0),
        );
        Self::compute(native, available)
    }

    pub fn is_displayable(&self) -> bool {
        self.display_scale > 0.0
    }

    /// Center of the visible canvas in canvas-local (pre-zoom) coordinates.
    pub fn center(&self) -> Option<(f64, f64)> {
        if !self.is_displayable() {
            return None;
        }
        Some((
            self.canvas_size.width / self.display_scale / 2.0,
            self.canvas_size.height / self.display_scale / 2.0,
        ))
    }

    /// Status-bar text, e.g. `Image: 3000 x 2000 px | View: 27%`.
    pub fn info_label(&self, native: Option<Size>) -> String {
        match native {
            Some(n) => format!(
                "Image: {} x {} px | View: {}%",
                n.width,
                n.height,
                (self.display_scale * 100.0).round()
            ),
            None => "No canvas loaded".to_string(),
        }
    }
}
