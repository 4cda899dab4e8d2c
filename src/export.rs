//! Exporting the composition at background-native resolution.
//!
//! The canvas is displayed at `display_scale`, so rasterizing it at
//! `quality / display_scale` yields an image of `background_native_size * quality` regardless of
//! how far the viewport is zoomed out.

use std::io::Cursor;

use crate::{
    assets::decode::unpremultiply_rgba8_in_place,
    foundation::core::{Affine, Size},
    foundation::error::{ComposeError, ComposeResult},
    render::backend::{FrameRGBA, RasterRequest, SceneRasterizer},
    session::Editor,
    viewport::ViewportFit,
};

/// User-chosen export multiplier relative to the background's native resolution.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct ExportQuality(f64);

impl ExportQuality {
    pub const NATIVE: Self = Self(1.0);

    pub fn new(q: f64) -> ComposeResult<Self> {
        if !q.is_finite() || q <= 0.0 {
            return Err(ComposeError::validation(format!(
                "export quality must be a positive number, got {q}"
            )));
        }
        Ok(Self(q))
    }

    /// Parse a quality menu value; anything that is not a positive number means `1`.
    pub fn parse_menu(text: &str) -> Self {
        text.trim()
            .parse::<f64>()
            .ok()
            .and_then(|q| Self::new(q).ok())
            .unwrap_or(Self::NATIVE)
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for ExportQuality {
    fn default() -> Self {
        Self::NATIVE
    }
}

/// `quality * (1 / display_scale)`.
pub fn effective_multiplier(quality: ExportQuality, display_scale: f64) -> ComposeResult<f64> {
    if !display_scale.is_finite() || display_scale <= 0.0 {
        return Err(ComposeError::validation(
            "viewport is not displayable yet; resize the container first",
        ));
    }
    Ok(quality.get() * (1.0 / display_scale))
}

/// Everything derived before pixels are produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportPlan {
    pub quality: ExportQuality,
    pub display_scale: f64,
    pub effective_multiplier: f64,
    /// On-screen canvas element size.
    pub canvas_size: Size,
    /// Output raster size, `background_native * quality` rounded to whole pixels.
    ///
    /// Equal to `canvas_size * effective_multiplier`, but taken from the native size so the
    /// zoom round trip cannot move a half-pixel edge.
    pub width: u32,
    pub height: u32,
}

impl ExportPlan {
    pub fn new(native: Size, fit: &ViewportFit, quality: ExportQuality) -> ComposeResult<Self> {
        let effective_multiplier = effective_multiplier(quality, fit.display_scale)?;
        let to_px = |v: f64| -> ComposeResult<u32> {
            let r = (v * quality.get()).round();
            if !r.is_finite() || r < 0.0 || r > f64::from(u32::MAX) {
                return Err(ComposeError::export_rasterization(format!(
                    "output dimension {r} is out of range"
                )));
            }
            Ok(r as u32)
        };
        Ok(Self {
            quality,
            display_scale: fit.display_scale,
            effective_multiplier,
            canvas_size: fit.canvas_size,
            width: to_px(native.width)?,
            height: to_px(native.height)?,
        })
    }

    /// Canvas-local coordinates map to output pixels through viewport zoom then multiplier.
    pub fn raster_request(&self) -> RasterRequest {
        RasterRequest {
            width: self.width,
            height: self.height,
            world_to_output: Affine::scale(self.display_scale * self.effective_multiplier),
            clear_rgba: None,
        }
    }
}

/// Label and enabled state of the export action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportButton {
    pub label: String,
    pub enabled: bool,
}

impl ExportButton {
    pub const IDLE_LABEL: &'static str = "Download Image";
    pub const BUSY_LABEL: &'static str = "Processing...";

    pub fn is_busy(&self) -> bool {
        !self.enabled
    }
}

impl Default for ExportButton {
    fn default() -> Self {
        Self {
            label: Self::IDLE_LABEL.to_string(),
            enabled: true,
        }
    }
}

/// Encoded export result. The host saves or downloads it under `file_name`.
#[derive(Clone, Debug)]
pub struct ExportedImage {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// An export in progress.
///
/// Created by [`Editor::begin_export`], which has already switched the export button to its busy
/// state so the host can repaint before the blocking [`ExportJob::run`]. Dropping the job, after
/// `run` or instead of it, puts the button back the way it was.
pub struct ExportJob<'a> {
    editor: &'a mut Editor,
    quality: ExportQuality,
    restore: ExportButton,
}

impl std::fmt::Debug for ExportJob<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportJob")
            .field("quality", &self.quality)
            .field("restore", &self.restore)
            .finish()
    }
}

impl<'a> ExportJob<'a> {
    pub(crate) fn start(editor: &'a mut Editor, quality: ExportQuality) -> Self {
        let restore = editor.export_button().clone();
        let button = editor.export_button_mut();
        button.label = ExportButton::BUSY_LABEL.to_string();
        button.enabled = false;
        Self {
            editor,
            quality,
            restore,
        }
    }

    pub fn quality(&self) -> ExportQuality {
        self.quality
    }

    /// Button state while the job is pending.
    pub fn button(&self) -> &ExportButton {
        self.editor.export_button()
    }

    /// Clear the selection, rasterize and encode.
    #[tracing::instrument(skip(self, rasterizer), fields(quality = self.quality.get()))]
    pub fn run(mut self, rasterizer: &mut dyn SceneRasterizer) -> ComposeResult<ExportedImage> {
        let out = self.render(rasterizer);
        if let Err(err) = &out {
            tracing::warn!(error = %err, "export failed");
        }
        out
    }

    fn render(&mut self, rasterizer: &mut dyn SceneRasterizer) -> ComposeResult<ExportedImage> {
        // Selection chrome must not end up in the pixels.
        self.editor.discard_selection();

        let native = self
            .editor
            .scene()
            .background()
            .map(|bg| bg.native_size())
            .ok_or(ComposeError::NoBackgroundLoaded)?;
        let plan = ExportPlan::new(native, self.editor.viewport(), self.quality)?;
        let cfg = self.editor.config();
        let request = plan.raster_request();
        request.check_limits(cfg.max_export_dimension, cfg.max_export_pixels)?;
        let file_name = cfg.export_file_name.clone();

        tracing::info!(
            display_scale = plan.display_scale,
            quality = plan.quality.get(),
            effective_multiplier = plan.effective_multiplier,
            width = plan.width,
            height = plan.height,
            "exporting composition"
        );

        let frame = rasterizer.rasterize(self.editor.scene(), &request)?;
        let png = encode_png(frame)?;
        Ok(ExportedImage {
            file_name,
            width: plan.width,
            height: plan.height,
            png,
        })
    }
}

impl Drop for ExportJob<'_> {
    fn drop(&mut self) {
        *self.editor.export_button_mut() = self.restore.clone();
    }
}

/// Encode a rendered frame as PNG with straight alpha.
pub fn encode_png(frame: FrameRGBA) -> ComposeResult<Vec<u8>> {
    let FrameRGBA {
        width,
        height,
        mut data,
        premultiplied,
    } = frame;
    if premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }
    let img = image::RgbaImage::from_raw(width, height, data).ok_or_else(|| {
        ComposeError::export_rasterization("frame byte length does not match its size")
    })?;

    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| ComposeError::export_rasterization(format!("encode png: {e}")))?;
    Ok(png)
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
