use std::sync::Arc;

use crate::{
    assets::decode::RasterImage,
    foundation::core::{Affine, ObjectTransform, Rgba8, Size, Vec2},
    scene::model::DrawOp,
};

/// Stable identity of an overlay within one scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(pub(crate) u64);

impl OverlayId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Solid rectangle drawn behind a padded overlay, centered on the group origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackingShape {
    pub width: f64,
    pub height: f64,
    pub fill: Rgba8,
}

impl BackingShape {
    /// Backing for an image of native size `image`, grown by `padding_px` on every side.
    pub fn around(image: Size, padding_px: u32, fill: Rgba8) -> Self {
        let pad = f64::from(padding_px) * 2.0;
        Self {
            width: image.width + pad,
            height: image.height + pad,
            fill,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Backing shape plus the image's transform relative to the group center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaddedGroup {
    pub backing: BackingShape,
    /// Always centered on `(0, 0)` with unit scale and no rotation.
    pub image_local: ObjectTransform,
}

impl PaddedGroup {
    /// Padding recovered from the geometry: `(backing.width - image.width) / 2`.
    pub fn padding_px(&self, image: Size) -> f64 {
        (self.backing.width - image.width) / 2.0
    }
}

/// Variant of an overlay: the bare image, or the image wrapped in a padded group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OverlayKind {
    Bare,
    Padded(PaddedGroup),
}

/// A user-added image composited over the background.
///
/// `base` is the unwrapped image this overlay was created from. It is fixed at construction and
/// its pixels are never touched, so padding can be added or removed at any time.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    id: OverlayId,
    base: Arc<RasterImage>,
    kind: OverlayKind,
    /// Outer transform: the image's own transform when bare, the group's when padded.
    pub transform: ObjectTransform,
}

impl Overlay {
    pub(crate) fn new_bare(id: OverlayId, base: Arc<RasterImage>) -> Self {
        Self {
            id,
            base,
            kind: OverlayKind::Bare,
            transform: ObjectTransform::centered(),
        }
    }

    pub(crate) fn with_kind(&self, kind: OverlayKind, transform: ObjectTransform) -> Self {
        Self {
            id: self.id,
            base: Arc::clone(&self.base),
            kind,
            transform,
        }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn base(&self) -> &Arc<RasterImage> {
        &self.base
    }

    pub fn kind(&self) -> &OverlayKind {
        &self.kind
    }

    pub fn is_padded(&self) -> bool {
        matches!(self.kind, OverlayKind::Padded(_))
    }

    pub fn base_size(&self) -> Size {
        Size::new(self.base.width_f64(), self.base.height_f64())
    }

    /// Padding shown by the padding-size control, `None` when bare.
    pub fn padding_px(&self) -> Option<f64> {
        match &self.kind {
            OverlayKind::Bare => None,
            OverlayKind::Padded(g) => Some(g.padding_px(self.base_size())),
        }
    }

    /// Draw operations in back-to-front order, in canvas-local coordinates.
    pub(crate) fn draw_ops(&self, out: &mut Vec<DrawOp>) {
        let base = self.base_size();
        match &self.kind {
            OverlayKind::Bare => out.push(DrawOp::Image {
                raster: Arc::clone(&self.base),
                transform: self.transform.to_affine(base.width, base.height),
            }),
            OverlayKind::Padded(g) => {
                let outer = self.transform.to_affine(g.backing.width, g.backing.height);
                let center = Affine::translate(Vec2::new(
                    g.backing.width / 2.0,
                    g.backing.height / 2.0,
                ));
                out.push(DrawOp::Fill {
                    size: g.backing.size(),
                    color: g.backing.fill,
                    transform: outer,
                });
                out.push(DrawOp::Image {
                    raster: Arc::clone(&self.base),
                    transform: outer * center * g.image_local.to_affine(base.width, base.height),
                });
            }
        }
    }
}
