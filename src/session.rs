//! The editing session: one background, a stack of overlays, the viewport they are shown in and
//! the control surface bound to the selection.
//!
//! Every host event (upload completion, container resize, control input, interactive drag) maps
//! to one method on [`Editor`]. Methods that the host may call while they do not apply (e.g. a
//! control edit while the background is selected) return `false`/`None` instead of an error.

use std::sync::Arc;

use crate::{
    assets::{
        decode::{decode_overlay, decode_raster},
        upload::{UploadSlot, UploadTicket, UploadTracker},
    },
    controls::ControlPanel,
    export::{ExportButton, ExportJob, ExportQuality, ExportedImage},
    foundation::config::EditorConfig,
    foundation::core::Size,
    foundation::error::{ComposeError, ComposeResult},
    padding::{PaddingState, set_padding},
    placement::initial_transform,
    render::backend::SceneRasterizer,
    scene::model::{Scene, Selection},
    scene::overlay::OverlayId,
    viewport::ViewportFit,
};

/// A single editor instance. Independent editors share nothing.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    scene: Scene,
    fit: ViewportFit,
    container: Option<Size>,
    controls: ControlPanel,
    uploads: UploadTracker,
    export_button: ExportButton,
}

impl Editor {
    pub fn new(config: EditorConfig) -> ComposeResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            scene: Scene::new(),
            fit: ViewportFit::EMPTY,
            container: None,
            controls: ControlPanel::default(),
            uploads: UploadTracker::new(),
            export_button: ExportButton::default(),
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> &ViewportFit {
        &self.fit
    }

    pub fn container(&self) -> Option<Size> {
        self.container
    }

    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    pub fn export_button(&self) -> &ExportButton {
        &self.export_button
    }

    pub(crate) fn export_button_mut(&mut self) -> &mut ExportButton {
        &mut self.export_button
    }

    fn background_size(&self) -> Option<Size> {
        self.scene.background().map(|bg| bg.native_size())
    }

    // ---- uploads ----

    /// Start decoding a file for `slot`. Any upload still in flight on that slot is superseded.
    pub fn begin_upload(&mut self, slot: UploadSlot) -> UploadTicket {
        self.uploads.begin(slot)
    }

    pub fn upload_in_flight(&self, slot: UploadSlot) -> bool {
        self.uploads.in_flight(slot)
    }

    /// Complete a background upload with the file's bytes.
    ///
    /// Returns `Ok(false)` when the ticket was superseded; the scene is left alone in that case
    /// and on decode failure.
    pub fn finish_background_upload(
        &mut self,
        ticket: UploadTicket,
        bytes: &[u8],
    ) -> ComposeResult<bool> {
        expect_slot(ticket, UploadSlot::Background)?;
        if !self.uploads.finish(ticket) {
            tracing::debug!(?ticket, "dropping superseded background upload");
            return Ok(false);
        }

        let raster = decode_raster(bytes).inspect_err(|err| {
            tracing::warn!(error = %err, "background decode failed");
        })?;
        tracing::debug!(
            width = raster.width,
            height = raster.height,
            "background loaded"
        );
        self.scene.set_background(Arc::new(raster));
        self.refit();
        self.controls.sync_from_selection(&self.scene);
        Ok(true)
    }

    /// Complete an overlay upload. The new overlay is placed at the canvas center, sized relative
    /// to the reference basis, stacked on top and selected.
    ///
    /// Returns `Ok(None)` when the ticket was superseded.
    pub fn finish_overlay_upload(
        &mut self,
        ticket: UploadTicket,
        content_type: &str,
        bytes: &[u8],
    ) -> ComposeResult<Option<OverlayId>> {
        expect_slot(ticket, UploadSlot::Overlay)?;
        if !self.uploads.finish(ticket) {
            tracing::debug!(?ticket, "dropping superseded overlay upload");
            return Ok(None);
        }

        let raster = decode_overlay(content_type, bytes, self.config.svg_system_fonts)
            .inspect_err(|err| {
                tracing::warn!(error = %err, content_type, "overlay decode failed");
            })?;
        let native = Size::new(raster.width_f64(), raster.height_f64());
        let transform = initial_transform(
            native,
            &self.fit,
            self.background_size(),
            &self.config,
        );

        let id = self.scene.add_overlay(Arc::new(raster));
        if let Some(overlay) = self.scene.overlay_mut(id) {
            overlay.transform = transform;
        }
        self.scene.select(Selection::Overlay(id))?;
        self.controls.sync_from_selection(&self.scene);
        tracing::debug!(
            overlay = id.as_u64(),
            scale = transform.scale,
            left = transform.left,
            top = transform.top,
            "overlay added"
        );
        Ok(Some(id))
    }

    /// Begin and finish a background upload in one step.
    pub fn load_background(&mut self, bytes: &[u8]) -> ComposeResult<()> {
        let ticket = self.begin_upload(UploadSlot::Background);
        self.finish_background_upload(ticket, bytes)?;
        Ok(())
    }

    /// Begin and finish an overlay upload in one step.
    pub fn add_overlay(&mut self, content_type: &str, bytes: &[u8]) -> ComposeResult<OverlayId> {
        let ticket = self.begin_upload(UploadSlot::Overlay);
        self.finish_overlay_upload(ticket, content_type, bytes)?
            .ok_or_else(|| ComposeError::validation("overlay upload was superseded"))
    }

    // ---- viewport ----

    /// Container resize notification. The size is remembered; the canvas is refitted only when a
    /// background is loaded. Returns whether a refit happened.
    #[tracing::instrument(skip(self))]
    pub fn resize_container(&mut self, width: f64, height: f64) -> bool {
        self.container = Some(Size::new(width, height));
        if self.scene.background().is_none() {
            return false;
        }
        self.refit();
        true
    }

    fn refit(&mut self) {
        let (Some(native), Some(container)) = (self.background_size(), self.container) else {
            self.fit = ViewportFit::EMPTY;
            return;
        };
        self.fit = ViewportFit::compute_with_margin(native, container, self.config.fit_margin_px);
        tracing::debug!(
            display_scale = self.fit.display_scale,
            canvas_w = self.fit.canvas_size.width,
            canvas_h = self.fit.canvas_size.height,
            "viewport fitted"
        );
    }

    /// Status line describing the background and current zoom.
    pub fn canvas_info(&self) -> String {
        self.fit.info_label(self.background_size())
    }

    // ---- selection ----

    pub fn select_overlay(&mut self, id: OverlayId) -> ComposeResult<()> {
        self.scene.select(Selection::Overlay(id))?;
        self.controls.sync_from_selection(&self.scene);
        Ok(())
    }

    pub fn select_background(&mut self) -> ComposeResult<()> {
        self.scene.select(Selection::Background)?;
        self.controls.sync_from_selection(&self.scene);
        Ok(())
    }

    pub fn discard_selection(&mut self) {
        self.scene.discard_selection();
        self.controls.disable();
    }

    /// The overlay the controls act on, if they are live.
    fn controlled_overlay(&self) -> Option<OverlayId> {
        if !self.controls.enabled {
            return None;
        }
        self.scene.selected_overlay().map(|o| o.id())
    }

    // ---- control surface ----

    /// Size slider input.
    pub fn set_overlay_size(&mut self, scale: f64) -> ComposeResult<bool> {
        let Some(id) = self.controlled_overlay() else {
            return Ok(false);
        };
        let Some(overlay) = self.scene.overlay_mut(id) else {
            return Ok(false);
        };
        let next = overlay.transform.with_scale(scale);
        next.validate()?;
        overlay.transform = next;
        self.controls.size = scale;
        Ok(true)
    }

    /// Padding checkbox. The padding field follows the checkbox's visibility.
    pub fn set_padding_enabled(&mut self, enabled: bool) -> ComposeResult<bool> {
        if self.controlled_overlay().is_none() {
            return Ok(false);
        }
        self.controls.padding_enabled = enabled;
        self.controls.padding_field_visible = enabled;
        self.apply_padding()
    }

    /// Padding-size field edit. The text is coerced, never rejected.
    pub fn set_padding_input(&mut self, text: &str) -> ComposeResult<bool> {
        if self.controlled_overlay().is_none() {
            return Ok(false);
        }
        self.controls.padding_input = text.to_string();
        self.apply_padding()
    }

    fn apply_padding(&mut self) -> ComposeResult<bool> {
        let Some(id) = self.controlled_overlay() else {
            return Ok(false);
        };
        let target = if self.controls.padding_enabled {
            PaddingState::Padded(self.controls.padding_px(self.config.default_padding_px))
        } else {
            PaddingState::Bare
        };
        let swapped = set_padding(&mut self.scene, id, target, self.config.backing_fill)?;
        self.controls.sync_from_selection(&self.scene);
        Ok(swapped)
    }

    /// Delete action: removes the selected overlay. The background cannot be deleted.
    pub fn delete_selected(&mut self) -> Option<OverlayId> {
        let id = self.controlled_overlay()?;
        self.scene.remove_overlay(id)?;
        self.discard_selection();
        tracing::debug!(overlay = id.as_u64(), "overlay deleted");
        Some(id)
    }

    // ---- interactive manipulation ----

    /// Drag-handle resize of the selected overlay; the size slider follows.
    pub fn scale_selected_interactively(&mut self, scale: f64) -> ComposeResult<bool> {
        let Some(overlay) = self.scene.selected_overlay_mut() else {
            return Ok(false);
        };
        let next = overlay.transform.with_scale(scale);
        next.validate()?;
        overlay.transform = next;
        self.controls.reflect_scale(scale);
        Ok(true)
    }

    /// Drag of the selected overlay to canvas-local `(left, top)`.
    pub fn move_selected(&mut self, left: f64, top: f64) -> ComposeResult<bool> {
        let Some(overlay) = self.scene.selected_overlay_mut() else {
            return Ok(false);
        };
        let next = overlay.transform.with_position(left, top);
        next.validate()?;
        overlay.transform = next;
        Ok(true)
    }

    pub fn rotate_selected(&mut self, angle_deg: f64) -> ComposeResult<bool> {
        let Some(overlay) = self.scene.selected_overlay_mut() else {
            return Ok(false);
        };
        let next = overlay.transform.with_angle(angle_deg);
        next.validate()?;
        overlay.transform = next;
        Ok(true)
    }

    // ---- export ----

    /// Export quality menu entries.
    pub fn quality_options(&self) -> &[f64] {
        &self.config.quality_options
    }

    /// Resolve the quality selector. `None` picks the configured default; menu text is parsed with
    /// [`ExportQuality::parse_menu`] and has to name one of [`Editor::quality_options`].
    pub fn export_quality(&self, selected: Option<&str>) -> ComposeResult<ExportQuality> {
        let quality = match selected {
            None => ExportQuality::new(self.config.default_quality)?,
            Some(text) => ExportQuality::parse_menu(text),
        };
        if !self.config.offers_quality(quality.get()) {
            return Err(ComposeError::validation(format!(
                "export quality {} is not one of {:?}",
                quality.get(),
                self.config.quality_options
            )));
        }
        Ok(quality)
    }

    /// First export phase: check the precondition and mark the export button busy.
    ///
    /// Without a background this fails with [`ComposeError::NoBackgroundLoaded`] and leaves every
    /// piece of UI state as it was.
    pub fn begin_export(&mut self, quality: ExportQuality) -> ComposeResult<ExportJob<'_>> {
        if self.scene.background().is_none() {
            tracing::warn!("export requested without a background");
            return Err(ComposeError::NoBackgroundLoaded);
        }
        Ok(ExportJob::start(self, quality))
    }

    /// Both export phases back to back.
    pub fn export(
        &mut self,
        quality: ExportQuality,
        rasterizer: &mut dyn SceneRasterizer,
    ) -> ComposeResult<ExportedImage> {
        self.begin_export(quality)?.run(rasterizer)
    }
}

fn expect_slot(ticket: UploadTicket, slot: UploadSlot) -> ComposeResult<()> {
    if ticket.slot() != slot {
        return Err(ComposeError::validation(format!(
            "{:?} ticket completed on the {slot:?} slot",
            ticket.slot()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
