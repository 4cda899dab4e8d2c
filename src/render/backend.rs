use crate::{
    foundation::core::Affine,
    foundation::error::{ComposeError, ComposeResult},
    scene::model::Scene,
};

/// A rendered raster as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// What to rasterize: output size and the mapping from canvas-local coordinates to output pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterRequest {
    pub width: u32,
    pub height: u32,
    pub world_to_output: Affine,
    /// If set, the target is cleared to this straight-alpha color before drawing.
    pub clear_rgba: Option<[u8; 4]>,
}

impl RasterRequest {
    /// Reject sizes beyond `max_dimension` per side or `max_pixels` in total.
    pub fn check_limits(&self, max_dimension: u32, max_pixels: u64) -> ComposeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ComposeError::export_rasterization(format!(
                "output size {}x{} is empty",
                self.width, self.height
            )));
        }
        if self.width > max_dimension || self.height > max_dimension {
            return Err(ComposeError::export_rasterization(format!(
                "output size {}x{} exceeds {max_dimension} px per side",
                self.width, self.height
            )));
        }
        let pixels = u64::from(self.width) * u64::from(self.height);
        if pixels > max_pixels {
            return Err(ComposeError::export_rasterization(format!(
                "output size {}x{} exceeds {max_pixels} px in total",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// The rendering engine seam: turns the scene into pixels.
///
/// Implementations draw scene content only; selection chrome is never part of the output.
pub trait SceneRasterizer {
    fn rasterize(&mut self, scene: &Scene, request: &RasterRequest) -> ComposeResult<FrameRGBA>;
}

/// Available rasterizer kinds.
#[derive(Clone, Copy, Debug, Default)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    #[default]
    Cpu,
}

pub fn create_rasterizer(kind: BackendKind) -> Box<dyn SceneRasterizer> {
    match kind {
        BackendKind::Cpu => Box::new(crate::render::cpu::CpuRasterizer::new()),
    }
}
