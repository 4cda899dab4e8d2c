//! Overlay-editing controls and their synchronization with the selection.

use crate::scene::model::Scene;

/// State of the overlay-editing control surface.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlPanel {
    /// When `false` the controls are dimmed and their input is ignored.
    pub enabled: bool,
    /// Size slider: the selected overlay's scale factor.
    pub size: f64,
    pub padding_enabled: bool,
    /// Raw text of the padding-size field.
    pub padding_input: String,
    /// The padding-size field is only shown while padding is enabled.
    pub padding_field_visible: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            enabled: false,
            size: 1.0,
            padding_enabled: false,
            padding_input: String::new(),
            padding_field_visible: false,
        }
    }
}

impl ControlPanel {
    /// Visual opacity of the control group.
    pub fn opacity(&self) -> f32 {
        if self.enabled { 1.0 } else { 0.5 }
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Reflect the current selection: disabled for the background or nothing, populated from the
    /// selected overlay otherwise.
    pub fn sync_from_selection(&mut self, scene: &Scene) {
        let Some(overlay) = scene.selected_overlay() else {
            self.disable();
            return;
        };

        self.enabled = true;
        self.size = overlay.transform.scale;
        self.padding_enabled = overlay.is_padded();
        self.padding_field_visible = self.padding_enabled;
        if let Some(px) = overlay.padding_px() {
            self.padding_input = format!("{px}");
        }
    }

    /// Mirror an interactive resize into the size slider.
    pub fn reflect_scale(&mut self, scale: f64) {
        self.size = scale;
    }

    /// Padding in pixels from the field text, see [`parse_padding_input`].
    pub fn padding_px(&self, default: u32) -> u32 {
        parse_padding_input(&self.padding_input, default)
    }
}

/// Lenient integer parse of the padding field.
///
/// Leading whitespace and an optional sign are accepted, then as many decimal digits as follow
/// (`"12px"` is 12, `"12.7"` is 12). Text without leading digits, or a negative number, yields
/// `default`. Values beyond `u32::MAX` saturate.
pub fn parse_padding_input(text: &str, default: u32) -> u32 {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        tracing::debug!(input = text, default, "padding input is not a number");
        return default;
    }

    let value = digits[..end].bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    });
    if negative && value != 0 {
        tracing::debug!(input = text, default, "negative padding input");
        return default;
    }
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "../tests/unit/controls.rs"]
mod tests;
