use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{ComposeError, ComposeResult};

/// Which width the initial overlay size is measured against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ReferenceBasis {
    /// The background's native width.
    #[default]
    BackgroundWidth,
    /// The on-screen canvas element width.
    CanvasWidth,
}

/// Editor tunables. Every field has a default, so a partial JSON document is valid.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Subtracted from both container dimensions before fitting.
    pub fit_margin_px: f64,
    /// Initial overlay width as a fraction of the reference basis.
    pub placement_fraction: f64,
    /// Upper bound on the initial overlay width.
    pub placement_max_width_px: f64,
    pub reference_basis: ReferenceBasis,
    /// Padding applied when the padding field is empty or not a number.
    pub default_padding_px: u32,
    pub backing_fill: Rgba8,
    pub export_file_name: String,
    /// Export quality menu entries.
    pub quality_options: Vec<f64>,
    pub default_quality: f64,
    /// Largest exported side, in pixels.
    pub max_export_dimension: u32,
    /// Largest exported area, in pixels.
    pub max_export_pixels: u64,
    /// Load system fonts so SVG `<text>` renders.
    pub svg_system_fonts: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            fit_margin_px: 40.0,
            placement_fraction: 0.2,
            placement_max_width_px: 200.0,
            reference_basis: ReferenceBasis::BackgroundWidth,
            default_padding_px: 10,
            backing_fill: Rgba8::WHITE,
            export_file_name: "image-overlay.png".to_string(),
            quality_options: vec![0.5, 1.0, 2.0, 4.0],
            default_quality: 1.0,
            max_export_dimension: 16_384,
            max_export_pixels: 16_384 * 16_384,
            svg_system_fonts: true,
        }
    }
}

impl EditorConfig {
    /// Read a JSON config file.
    pub fn from_json_path(path: &Path) -> ComposeResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .map_err(|e| ComposeError::validation(format!("parse config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Whether `quality` is an entry of the export quality menu.
    pub fn offers_quality(&self, quality: f64) -> bool {
        self.quality_options
            .iter()
            .any(|q| (q - quality).abs() <= 1e-9)
    }

    pub fn validate(&self) -> ComposeResult<()> {
        if !self.fit_margin_px.is_finite() || self.fit_margin_px < 0.0 {
            return Err(ComposeError::validation("fit_margin_px must be >= 0"));
        }
        if !self.placement_fraction.is_finite() || self.placement_fraction <= 0.0 {
            return Err(ComposeError::validation("placement_fraction must be > 0"));
        }
        if !self.placement_max_width_px.is_finite() || self.placement_max_width_px <= 0.0 {
            return Err(ComposeError::validation(
                "placement_max_width_px must be > 0",
            ));
        }
        if self.quality_options.is_empty() {
            return Err(ComposeError::validation("quality_options must not be empty"));
        }
        if self
            .quality_options
            .iter()
            .chain(std::iter::once(&self.default_quality))
            .any(|q| !q.is_finite() || *q <= 0.0)
        {
            return Err(ComposeError::validation("export qualities must be > 0"));
        }
        if !self.offers_quality(self.default_quality) {
            return Err(ComposeError::validation(format!(
                "default_quality {} is not one of quality_options {:?}",
                self.default_quality, self.quality_options
            )));
        }
        if self.max_export_dimension == 0 || self.max_export_pixels == 0 {
            return Err(ComposeError::validation("export limits must be > 0"));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(ComposeError::validation("export_file_name must not be empty"));
        }
        Ok(())
    }
}
