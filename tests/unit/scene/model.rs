use super::*;
use crate::foundation::core::{ObjectTransform, Point};
use crate::scene::overlay::{BackingShape, OverlayKind, PaddedGroup};

fn raster(w: u32, h: u32) -> Arc<RasterImage> {
    Arc::new(RasterImage::from_premul(w, h, vec![255; (w * h * 4) as usize]).unwrap())
}

fn approx(a: Point, b: Point) {
    assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
}

#[test]
fn draw_ops_put_background_first() {
    let mut scene = Scene::new();
    scene.add_overlay(raster(2, 2));
    scene.set_background(raster(10, 10));
    let ops = scene.draw_ops();
    assert_eq!(ops.len(), 2);
    match &ops[0] {
        DrawOp::Image { raster, transform } => {
            assert_eq!(raster.width, 10);
            assert_eq!(*transform, Affine::IDENTITY);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn bare_overlay_is_drawn_centered_on_its_position() {
    let mut scene = Scene::new();
    let id = scene.add_overlay(raster(20, 10));
    scene.overlay_mut(id).unwrap().transform = ObjectTransform::centered()
        .with_position(100.0, 100.0)
        .with_scale(0.5);
    let ops = scene.draw_ops();
    let DrawOp::Image { transform, .. } = &ops[0] else {
        panic!("expected image op");
    };
    approx(*transform * Point::new(10.0, 5.0), Point::new(100.0, 100.0));
    approx(*transform * Point::new(0.0, 0.0), Point::new(95.0, 97.5));
}

#[test]
fn padded_overlay_draws_backing_then_image_sharing_a_center() {
    let mut scene = Scene::new();
    let id = scene.add_overlay(raster(20, 10));
    let overlay = scene.overlay(id).unwrap().clone();
    let base = overlay.base_size();
    let group = PaddedGroup {
        backing: BackingShape::around(base, 5, Rgba8::WHITE),
        image_local: ObjectTransform::centered(),
    };
    let padded = overlay.with_kind(
        OverlayKind::Padded(group),
        ObjectTransform::centered().with_position(50.0, 40.0),
    );
    scene.swap_overlay(padded).unwrap();

    let ops = scene.draw_ops();
    assert_eq!(ops.len(), 2);
    let DrawOp::Fill {
        size, transform, ..
    } = &ops[0]
    else {
        panic!("expected backing fill first");
    };
    assert_eq!(*size, Size::new(30.0, 20.0));
    approx(*transform * Point::new(15.0, 10.0), Point::new(50.0, 40.0));

    let DrawOp::Image { transform, .. } = &ops[1] else {
        panic!("expected image second");
    };
    approx(*transform * Point::new(10.0, 5.0), Point::new(50.0, 40.0));
    approx(*transform * Point::new(0.0, 0.0), Point::new(40.0, 35.0));
}

#[test]
fn swap_moves_overlay_to_top_and_selects_it() {
    let mut scene = Scene::new();
    let a = scene.add_overlay(raster(2, 2));
    let b = scene.add_overlay(raster(2, 2));
    let replacement = scene.overlay(a).unwrap().clone();
    scene.swap_overlay(replacement).unwrap();
    let order: Vec<_> = scene.overlays().iter().map(|o| o.id()).collect();
    assert_eq!(order, vec![b, a]);
    assert_eq!(scene.selection(), Some(Selection::Overlay(a)));
}

#[test]
fn select_validates_targets() {
    let mut scene = Scene::new();
    assert!(scene.select(Selection::Background).is_err());
    scene.set_background(raster(4, 4));
    scene.select(Selection::Background).unwrap();
    assert!(scene.selected_overlay().is_none());

    let ghost = OverlayId(99);
    assert!(scene.select(Selection::Overlay(ghost)).is_err());
}

#[test]
fn removing_selected_overlay_clears_selection() {
    let mut scene = Scene::new();
    let id = scene.add_overlay(raster(2, 2));
    scene.select(Selection::Overlay(id)).unwrap();
    assert!(scene.remove_overlay(id).is_some());
    assert_eq!(scene.selection(), None);
    assert!(scene.remove_overlay(id).is_none());
}

#[test]
fn replacing_background_drops_background_selection() {
    let mut scene = Scene::new();
    scene.set_background(raster(4, 4));
    scene.select(Selection::Background).unwrap();
    scene.set_background(raster(8, 8));
    assert_eq!(scene.selection(), None);
    assert_eq!(scene.background().unwrap().native_size(), Size::new(8.0, 8.0));
}
