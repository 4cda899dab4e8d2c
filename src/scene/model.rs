use std::sync::Arc;

use crate::{
    assets::decode::RasterImage,
    foundation::core::{Affine, Rgba8, Size},
    foundation::error::{ComposeError, ComposeResult},
    scene::{
        canvas_image::CanvasImage,
        overlay::{Overlay, OverlayId},
    },
};

/// The currently selected object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Background,
    Overlay(OverlayId),
}

/// A backend-agnostic drawing operation in canvas-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill the rectangle `(0, 0, size)` mapped through `transform`.
    Fill {
        size: Size,
        color: Rgba8,
        transform: Affine,
    },
    /// Draw `raster` at native size mapped through `transform`.
    Image {
        raster: Arc<RasterImage>,
        transform: Affine,
    },
}

/// One background plus any number of independent overlays, at most one of them selected.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    background: Option<CanvasImage>,
    overlays: Vec<Overlay>,
    selection: Option<Selection>,
    next_overlay_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(&self) -> Option<&CanvasImage> {
        self.background.as_ref()
    }

    /// Replace the background wholesale. The background is never user-transformed.
    pub fn set_background(&mut self, raster: Arc<RasterImage>) {
        self.background = Some(CanvasImage::new(raster));
        if self.selection == Some(Selection::Background) {
            self.selection = None;
        }
    }

    /// Overlays in stacking order, bottom first.
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id() == id)
    }

    pub fn overlay_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
        self.overlays.iter_mut().find(|o| o.id() == id)
    }

    /// Create a bare overlay for `raster` on top of the stack. It is not selected.
    pub fn add_overlay(&mut self, raster: Arc<RasterImage>) -> OverlayId {
        self.next_overlay_id += 1;
        let id = OverlayId(self.next_overlay_id);
        self.overlays.push(Overlay::new_bare(id, raster));
        id
    }

    /// Remove an overlay, dropping the selection if it pointed at it.
    pub fn remove_overlay(&mut self, id: OverlayId) -> Option<Overlay> {
        let idx = self.overlays.iter().position(|o| o.id() == id)?;
        if self.selection == Some(Selection::Overlay(id)) {
            self.selection = None;
        }
        Some(self.overlays.remove(idx))
    }

    /// Swap an overlay for a new variant of itself: the old entry leaves the scene and the new one
    /// is added on top and selected.
    pub(crate) fn swap_overlay(&mut self, replacement: Overlay) -> ComposeResult<()> {
        let id = replacement.id();
        self.remove_overlay(id)
            .ok_or_else(|| ComposeError::validation(format!("unknown overlay {id:?}")))?;
        self.overlays.push(replacement);
        self.selection = Some(Selection::Overlay(id));
        Ok(())
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn select(&mut self, selection: Selection) -> ComposeResult<()> {
        match selection {
            Selection::Background if self.background.is_none() => {
                return Err(ComposeError::validation("no background to select"));
            }
            Selection::Overlay(id) if self.overlay(id).is_none() => {
                return Err(ComposeError::validation(format!("unknown overlay {id:?}")));
            }
            _ => {}
        }
        self.selection = Some(selection);
        Ok(())
    }

    pub fn discard_selection(&mut self) {
        self.selection = None;
    }

    /// The selected overlay, if the selection is an overlay.
    pub fn selected_overlay(&self) -> Option<&Overlay> {
        match self.selection? {
            Selection::Overlay(id) => self.overlay(id),
            Selection::Background => None,
        }
    }

    pub fn selected_overlay_mut(&mut self) -> Option<&mut Overlay> {
        match self.selection? {
            Selection::Overlay(id) => self.overlay_mut(id),
            Selection::Background => None,
        }
    }

    /// Background first, then overlays bottom to top.
    pub fn draw_ops(&self) -> Vec<DrawOp> {
        let mut out = Vec::with_capacity(1 + self.overlays.len() * 2);
        if let Some(bg) = &self.background {
            out.push(DrawOp::Image {
                raster: Arc::clone(bg.raster()),
                transform: bg.affine(),
            });
        }
        for overlay in &self.overlays {
            overlay.draw_ops(&mut out);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
