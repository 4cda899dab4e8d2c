use std::sync::Arc;

use crate::{
    assets::svg_raster::render_tree,
    foundation::error::{ComposeError, ComposeResult},
};

/// Decoded raster in premultiplied RGBA8 form.
///
/// Pixel content is immutable once decoded; every scene object that shows it shares the same
/// allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Native width in pixels.
    pub width: u32,
    /// Native height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    /// Wrap already-premultiplied bytes, checking the length against the dimensions.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> ComposeResult<Self> {
        if width == 0 || height == 0 {
            return Err(ComposeError::decode("image has zero width or height"));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| ComposeError::decode("image size overflow"))?;
        if rgba8_premul.len() != expected {
            return Err(ComposeError::decode(
                "image byte length does not match width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    pub fn width_f64(&self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(&self) -> f64 {
        f64::from(self.height)
    }
}

/// How an overlay file is turned into pixels, chosen from its declared content type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlaySource {
    /// Any format the raster decoder understands.
    Raster,
    /// `image/svg+xml`, rasterized at its intrinsic size.
    Svg,
}

impl OverlaySource {
    /// Classify by MIME type. Parameters such as `;charset=utf-8` are ignored.
    pub fn from_content_type(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        if essence.eq_ignore_ascii_case("image/svg+xml") {
            Self::Svg
        } else {
            Self::Raster
        }
    }
}

/// Decode encoded raster bytes (PNG, JPEG, ...) and convert to premultiplied RGBA8.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_raster(bytes: &[u8]) -> ComposeResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ComposeError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    RasterImage::from_premul(width, height, rgba8_premul)
}

/// Parse SVG bytes and rasterize them at the document's intrinsic size.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn rasterize_svg(bytes: &[u8], system_fonts: bool) -> ComposeResult<RasterImage> {
    let mut opts = usvg::Options::default();
    if system_fonts {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        opts.fontdb = Arc::new(db);
    }

    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| ComposeError::decode(format!("parse svg tree: {e}")))?;
    render_tree(&tree)
}

/// Decode an overlay file according to its declared content type.
pub fn decode_overlay(
    content_type: &str,
    bytes: &[u8],
    system_fonts: bool,
) -> ComposeResult<RasterImage> {
    match OverlaySource::from_content_type(content_type) {
        OverlaySource::Svg => rasterize_svg(bytes, system_fonts),
        OverlaySource::Raster => decode_raster(bytes),
    }
}

/// Inverse of premultiplication, for encoders that expect straight alpha.
pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
