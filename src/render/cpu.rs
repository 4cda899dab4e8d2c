use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::decode::RasterImage,
    foundation::core::Affine,
    foundation::error::{ComposeError, ComposeResult},
    render::backend::{FrameRGBA, RasterRequest, SceneRasterizer},
    scene::model::{DrawOp, Scene},
};

/// CPU rasterizer built on `vello_cpu`.
///
/// The render context is reused across exports of the same size.
#[derive(Default)]
pub struct CpuRasterizer {
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for CpuRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRasterizer")
            .field("has_ctx", &self.ctx.is_some())
            .finish()
    }
}

impl CpuRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn take_ctx(&mut self, width: u16, height: u16) -> vello_cpu::RenderContext {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        ctx
    }
}

impl SceneRasterizer for CpuRasterizer {
    #[tracing::instrument(skip(self, scene), fields(w = request.width, h = request.height))]
    fn rasterize(&mut self, scene: &Scene, request: &RasterRequest) -> ComposeResult<FrameRGBA> {
        let width: u16 = request.width.try_into().map_err(|_| {
            ComposeError::export_rasterization("output width exceeds the rasterizer limit")
        })?;
        let height: u16 = request.height.try_into().map_err(|_| {
            ComposeError::export_rasterization("output height exceeds the rasterizer limit")
        })?;
        if width == 0 || height == 0 {
            return Err(ComposeError::export_rasterization("output size is empty"));
        }

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let mut ctx = self.take_ctx(width, height);

        if let Some([r, g, b, a]) = request.clear_rgba {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            ));
        }

        let mut paints: HashMap<*const RasterImage, vello_cpu::Image> = HashMap::new();
        for op in scene.draw_ops() {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            match op {
                DrawOp::Fill {
                    size,
                    color,
                    transform,
                } => {
                    ctx.set_transform(affine_to_cpu(request.world_to_output * transform));
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        color.r, color.g, color.b, color.a,
                    ));
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                        0.0,
                        0.0,
                        size.width,
                        size.height,
                    ));
                }
                DrawOp::Image { raster, transform } => {
                    let key = Arc::as_ptr(&raster);
                    let paint = match paints.get(&key) {
                        Some(p) => p.clone(),
                        None => {
                            let p = image_paint(&raster)?;
                            paints.insert(key, p.clone());
                            p
                        }
                    };
                    ctx.set_transform(affine_to_cpu(request.world_to_output * transform));
                    ctx.set_paint(paint);
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                        0.0,
                        0.0,
                        raster.width_f64(),
                        raster.height_f64(),
                    ));
                }
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width: request.width,
            height: request.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_paint(raster: &RasterImage) -> ComposeResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&raster.rgba8_premul, raster.width, raster.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ComposeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ComposeError::export_rasterization("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ComposeError::export_rasterization("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ComposeError::export_rasterization(
            "image byte length mismatch",
        ));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
    for px in bytes.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
