use super::*;
use crate::foundation::core::{ObjectTransform, Rgba8};
use crate::padding::{PaddingState, set_padding};

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> Arc<RasterImage> {
    let data = rgba.repeat((w * h) as usize);
    Arc::new(RasterImage::from_premul(w, h, data).unwrap())
}

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn scene_red_bg_blue_overlay() -> (Scene, crate::scene::overlay::OverlayId) {
    let mut scene = Scene::new();
    scene.set_background(solid(8, 8, [255, 0, 0, 255]));
    let id = scene.add_overlay(solid(4, 4, [0, 0, 255, 255]));
    scene.overlay_mut(id).unwrap().transform = ObjectTransform::centered().with_position(4.0, 4.0);
    (scene, id)
}

fn request(width: u32, height: u32, scale: f64) -> RasterRequest {
    RasterRequest {
        width,
        height,
        world_to_output: Affine::scale(scale),
        clear_rgba: None,
    }
}

#[test]
fn background_and_overlay_land_where_expected() {
    let (scene, _) = scene_red_bg_blue_overlay();
    let frame = CpuRasterizer::new()
        .rasterize(&scene, &request(8, 8, 1.0))
        .unwrap();
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 8 * 8 * 4);

    let corner = px(&frame, 0, 0);
    assert!(corner[0] > 200 && corner[2] < 50, "corner {corner:?}");
    let center = px(&frame, 4, 4);
    assert!(center[2] > 200 && center[0] < 50, "center {center:?}");
}

#[test]
fn world_to_output_scales_the_whole_scene() {
    let (scene, _) = scene_red_bg_blue_overlay();
    let frame = CpuRasterizer::new()
        .rasterize(&scene, &request(16, 16, 2.0))
        .unwrap();
    assert_eq!((frame.width, frame.height), (16, 16));
    let far = px(&frame, 15, 15);
    assert!(far[0] > 200, "far {far:?}");
    let mid = px(&frame, 8, 8);
    assert!(mid[2] > 200, "mid {mid:?}");
    // The overlay spans output 4..12; 3 is still background.
    let edge = px(&frame, 3, 8);
    assert!(edge[0] > 200, "edge {edge:?}");
}

#[test]
fn backing_shape_is_drawn_behind_the_image() {
    let (mut scene, id) = scene_red_bg_blue_overlay();
    set_padding(&mut scene, id, PaddingState::Padded(1), Rgba8::WHITE).unwrap();
    let frame = CpuRasterizer::new()
        .rasterize(&scene, &request(8, 8, 1.0))
        .unwrap();
    let ring = px(&frame, 1, 4);
    assert!(ring.iter().all(|c| *c > 200), "ring {ring:?}");
    let center = px(&frame, 4, 4);
    assert!(center[2] > 200 && center[0] < 50, "center {center:?}");
    let outside = px(&frame, 0, 0);
    assert!(outside[0] > 200 && outside[1] < 50, "outside {outside:?}");
}

#[test]
fn clear_color_shows_through_empty_scene() {
    let scene = Scene::new();
    let mut req = request(2, 2, 1.0);
    req.clear_rgba = Some([0, 255, 0, 255]);
    let frame = CpuRasterizer::new().rasterize(&scene, &req).unwrap();
    let p = px(&frame, 1, 1);
    assert!(p[1] > 200 && p[3] == 255, "{p:?}");
}

#[test]
fn oversized_output_is_a_rasterization_error() {
    let scene = Scene::new();
    let err = CpuRasterizer::new()
        .rasterize(&scene, &request(70_000, 1, 1.0))
        .unwrap_err();
    assert!(matches!(err, ComposeError::ExportRasterization(_)));
}

#[test]
fn context_is_reused_between_same_size_renders() {
    let (scene, _) = scene_red_bg_blue_overlay();
    let mut cpu = CpuRasterizer::new();
    let a = cpu.rasterize(&scene, &request(8, 8, 1.0)).unwrap();
    let b = cpu.rasterize(&scene, &request(8, 8, 1.0)).unwrap();
    assert_eq!(a.data, b.data);
}
