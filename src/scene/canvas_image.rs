use std::sync::Arc;

use crate::{
    assets::decode::RasterImage,
    foundation::core::{Affine, ObjectTransform, Size},
};

/// A decoded raster placed on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasImage {
    raster: Arc<RasterImage>,
    /// Draw transform in canvas-local coordinates.
    pub transform: ObjectTransform,
}

impl CanvasImage {
    pub fn new(raster: Arc<RasterImage>) -> Self {
        Self {
            raster,
            transform: ObjectTransform::default(),
        }
    }

    pub fn raster(&self) -> &Arc<RasterImage> {
        &self.raster
    }

    /// Native pixel size.
    pub fn native_size(&self) -> Size {
        Size::new(self.raster.width_f64(), self.raster.height_f64())
    }

    pub fn affine(&self) -> Affine {
        let size = self.native_size();
        self.transform.to_affine(size.width, size.height)
    }
}
