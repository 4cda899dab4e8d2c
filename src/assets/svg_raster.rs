use crate::{
    assets::decode::RasterImage,
    foundation::error::{ComposeError, ComposeResult},
};

const MAX_SIDE_PX: u32 = 16_384;

/// Render a parsed SVG document into a premultiplied raster at its intrinsic size.
///
/// Fractional document sizes are rounded up; the drawing is stretched to fill the whole pixmap.
pub fn render_tree(tree: &usvg::Tree) -> ComposeResult<RasterImage> {
    let doc = tree.size();
    let width = intrinsic_px(doc.width())?;
    let height = intrinsic_px(doc.height())?;
    if width > MAX_SIDE_PX || height > MAX_SIDE_PX {
        return Err(ComposeError::decode(format!(
            "svg document is {width}x{height} px, larger than {MAX_SIDE_PX} px per side"
        )));
    }

    let mut target = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ComposeError::decode("cannot allocate svg target"))?;
    let fill = resvg::tiny_skia::Transform::from_scale(
        width as f32 / doc.width(),
        height as f32 / doc.height(),
    );
    resvg::render(tree, fill, &mut target.as_mut());

    // tiny_skia pixmaps are premultiplied RGBA8 already.
    RasterImage::from_premul(width, height, target.take())
}

fn intrinsic_px(v: f32) -> ComposeResult<u32> {
    if !v.is_finite() || v <= 0.0 {
        return Err(ComposeError::decode("svg document has no usable size"));
    }
    Ok((v.ceil() as u32).max(1))
}
