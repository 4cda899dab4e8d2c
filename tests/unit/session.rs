use std::io::Cursor;

use super::*;
use crate::scene::overlay::OverlayKind;

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

/// Background 1500x1000 in a container leaving 300x200 after the default 40px margin: zoom 0.2.
fn editor_with_background() -> Editor {
    let mut ed = Editor::new(EditorConfig::default()).unwrap();
    ed.resize_container(340.0, 240.0);
    ed.load_background(&png(1500, 1000, [10, 20, 30, 255])).unwrap();
    ed
}

fn editor_with_overlay() -> (Editor, OverlayId) {
    let mut ed = editor_with_background();
    let id = ed
        .add_overlay("image/png", &png(500, 100, [0, 0, 255, 255]))
        .unwrap();
    (ed, id)
}

#[test]
fn background_load_fits_viewport() {
    let ed = editor_with_background();
    let fit = ed.viewport();
    assert!((fit.display_scale - 0.2).abs() < 1e-12);
    assert!((fit.canvas_size.width - 300.0).abs() < 1e-9);
    assert!((fit.canvas_size.height - 200.0).abs() < 1e-9);
    assert_eq!(ed.canvas_info(), "Image: 1500 x 1000 px | View: 20%");
}

#[test]
fn resize_without_background_is_ignored() {
    let mut ed = Editor::new(EditorConfig::default()).unwrap();
    assert!(!ed.resize_container(800.0, 600.0));
    assert!(!ed.viewport().is_displayable());
    assert_eq!(ed.canvas_info(), "No canvas loaded");
}

#[test]
fn resize_refits_loaded_background() {
    let mut ed = editor_with_background();
    assert!(ed.resize_container(1540.0, 1040.0));
    assert_eq!(ed.viewport().display_scale, 1.0);
}

#[test]
fn new_overlay_is_centered_scaled_and_selected() {
    let (ed, id) = editor_with_overlay();
    let overlay = ed.scene().overlay(id).unwrap();
    // min(1500 * 0.2, 200) / 500
    assert!((overlay.transform.scale - 0.4).abs() < 1e-12);
    assert!((overlay.transform.left - 750.0).abs() < 1e-9);
    assert!((overlay.transform.top - 500.0).abs() < 1e-9);
    assert_eq!(ed.scene().selection(), Some(Selection::Overlay(id)));

    let controls = ed.controls();
    assert!(controls.enabled);
    assert!((controls.size - 0.4).abs() < 1e-12);
    assert!(!controls.padding_enabled);
}

#[test]
fn overlay_without_displayable_viewport_keeps_default_transform() {
    let mut ed = Editor::new(EditorConfig::default()).unwrap();
    let id = ed
        .add_overlay("image/png", &png(50, 50, [0, 0, 0, 255]))
        .unwrap();
    let t = ed.scene().overlay(id).unwrap().transform;
    assert_eq!(t.scale, 1.0);
    assert_eq!((t.left, t.top), (0.0, 0.0));
}

#[test]
fn superseded_upload_is_dropped() {
    let mut ed = Editor::new(EditorConfig::default()).unwrap();
    let first = ed.begin_upload(UploadSlot::Background);
    let second = ed.begin_upload(UploadSlot::Background);

    assert!(!ed
        .finish_background_upload(first, &png(4, 4, [255, 0, 0, 255]))
        .unwrap());
    assert!(ed.scene().background().is_none());
    assert!(ed.upload_in_flight(UploadSlot::Background));

    assert!(ed
        .finish_background_upload(second, &png(6, 3, [0, 255, 0, 255]))
        .unwrap());
    assert_eq!(
        ed.scene().background().unwrap().native_size(),
        Size::new(6.0, 3.0)
    );
    assert!(!ed.upload_in_flight(UploadSlot::Background));
}

#[test]
fn superseded_overlay_upload_adds_nothing() {
    let mut ed = editor_with_background();
    let first = ed.begin_upload(UploadSlot::Overlay);
    let _second = ed.begin_upload(UploadSlot::Overlay);
    let out = ed
        .finish_overlay_upload(first, "image/png", &png(4, 4, [0, 0, 0, 255]))
        .unwrap();
    assert!(out.is_none());
    assert!(ed.scene().overlays().is_empty());
}

#[test]
fn decode_failure_leaves_scene_unchanged() {
    let mut ed = editor_with_background();
    let before = ed.scene().background().unwrap().native_size();

    let err = ed.load_background(b"definitely not an image").unwrap_err();
    assert!(matches!(err, ComposeError::Decode(_)));
    assert_eq!(ed.scene().background().unwrap().native_size(), before);
    assert!(!ed.upload_in_flight(UploadSlot::Background));

    let err = ed.add_overlay("image/svg+xml", b"<svg").unwrap_err();
    assert!(matches!(err, ComposeError::Decode(_)));
    assert!(ed.scene().overlays().is_empty());
}

#[test]
fn ticket_for_the_wrong_slot_is_rejected() {
    let mut ed = Editor::new(EditorConfig::default()).unwrap();
    let ticket = ed.begin_upload(UploadSlot::Overlay);
    let err = ed
        .finish_background_upload(ticket, &png(2, 2, [0, 0, 0, 255]))
        .unwrap_err();
    assert!(matches!(err, ComposeError::Validation(_)));
}

#[test]
fn background_selection_disables_and_ignores_controls() {
    let (mut ed, id) = editor_with_overlay();
    ed.select_background().unwrap();
    assert!(!ed.controls().enabled);

    assert!(!ed.set_overlay_size(2.0).unwrap());
    assert!(!ed.set_padding_enabled(true).unwrap());
    assert!(ed.delete_selected().is_none());
    assert!(!ed.scene().overlay(id).unwrap().is_padded());
    assert_eq!(ed.scene().overlays().len(), 1);
}

#[test]
fn size_slider_scales_selected_overlay() {
    let (mut ed, id) = editor_with_overlay();
    assert!(ed.set_overlay_size(1.5).unwrap());
    assert_eq!(ed.scene().overlay(id).unwrap().transform.scale, 1.5);
    assert_eq!(ed.controls().size, 1.5);

    let err = ed.set_overlay_size(f64::NAN).unwrap_err();
    assert!(matches!(err, ComposeError::Validation(_)));
    assert_eq!(ed.scene().overlay(id).unwrap().transform.scale, 1.5);
}

#[test]
fn padding_controls_drive_the_overlay_variant() {
    let (mut ed, id) = editor_with_overlay();
    ed.move_selected(100.0, 120.0).unwrap();
    ed.rotate_selected(30.0).unwrap();
    let before = ed.scene().overlay(id).unwrap().transform.placement();

    assert!(ed.set_padding_enabled(true).unwrap());
    let overlay = ed.scene().overlay(id).unwrap();
    match overlay.kind() {
        OverlayKind::Padded(group) => {
            assert_eq!(group.backing.width, 520.0);
            assert_eq!(group.backing.height, 120.0);
        }
        OverlayKind::Bare => panic!("expected padded overlay"),
    }
    assert_eq!(overlay.transform.placement(), before);
    assert!(ed.controls().padding_field_visible);
    assert_eq!(ed.controls().padding_input, "10");

    assert!(ed.set_padding_input("25").unwrap());
    assert_eq!(ed.scene().overlay(id).unwrap().padding_px(), Some(25.0));

    assert!(ed.set_padding_input("abc").unwrap());
    assert_eq!(ed.scene().overlay(id).unwrap().padding_px(), Some(10.0));
    assert_eq!(ed.controls().padding_input, "10");

    assert!(ed.set_padding_enabled(false).unwrap());
    let overlay = ed.scene().overlay(id).unwrap();
    assert!(!overlay.is_padded());
    assert_eq!(overlay.transform.placement(), before);
    assert!(!ed.controls().padding_field_visible);
    assert_eq!(ed.scene().selection(), Some(Selection::Overlay(id)));
}

#[test]
fn selecting_padded_overlay_populates_padding_size() {
    let (mut ed, id) = editor_with_overlay();
    ed.set_padding_enabled(true).unwrap();
    ed.set_padding_input("7").unwrap();
    ed.discard_selection();
    assert!(!ed.controls().enabled);

    ed.select_overlay(id).unwrap();
    assert!(ed.controls().enabled);
    assert!(ed.controls().padding_enabled);
    assert_eq!(ed.controls().padding_input, "7");
}

#[test]
fn delete_removes_overlay_and_disables_controls() {
    let (mut ed, id) = editor_with_overlay();
    assert_eq!(ed.delete_selected(), Some(id));
    assert!(ed.scene().overlays().is_empty());
    assert_eq!(ed.scene().selection(), None);
    assert!(!ed.controls().enabled);
    assert!(ed.scene().background().is_some());
}

#[test]
fn interactive_scaling_propagates_to_size_control() {
    let (mut ed, id) = editor_with_overlay();
    assert!(ed.scale_selected_interactively(0.75).unwrap());
    assert_eq!(ed.scene().overlay(id).unwrap().transform.scale, 0.75);
    assert_eq!(ed.controls().size, 0.75);

    ed.discard_selection();
    assert!(!ed.scale_selected_interactively(2.0).unwrap());
    assert!(!ed.move_selected(1.0, 1.0).unwrap());
}

#[test]
fn export_without_background_changes_nothing() {
    let mut ed = Editor::new(EditorConfig::default()).unwrap();
    let id = ed
        .add_overlay("image/png", &png(8, 8, [0, 0, 0, 255]))
        .unwrap();
    assert!(ed.controls().enabled);

    let err = ed.begin_export(ExportQuality::NATIVE).unwrap_err();
    assert!(matches!(err, ComposeError::NoBackgroundLoaded));
    assert_eq!(
        err.user_message(),
        "Please upload a background image first."
    );
    assert_eq!(ed.export_button(), &ExportButton::default());
    assert!(ed.controls().enabled);
    assert_eq!(ed.scene().selection(), Some(Selection::Overlay(id)));
}

#[test]
fn export_quality_follows_the_configured_menu() {
    let cfg = EditorConfig {
        quality_options: vec![1.0, 2.0, 4.0],
        default_quality: 2.0,
        ..EditorConfig::default()
    };
    let ed = Editor::new(cfg).unwrap();
    assert_eq!(ed.quality_options(), &[1.0, 2.0, 4.0]);
    assert_eq!(ed.export_quality(None).unwrap().get(), 2.0);
    assert_eq!(ed.export_quality(Some("4")).unwrap().get(), 4.0);
    assert_eq!(ed.export_quality(Some("abc")).unwrap(), ExportQuality::NATIVE);

    let err = ed.export_quality(Some("3")).unwrap_err();
    assert!(matches!(err, ComposeError::Validation(_)));
    assert!(ed.export_quality(Some("0.5")).is_err());
}

#[test]
fn editors_do_not_share_state() {
    let (a, _) = editor_with_overlay();
    let b = Editor::new(EditorConfig::default()).unwrap();
    assert_eq!(a.scene().overlays().len(), 1);
    assert!(b.scene().overlays().is_empty());
    assert!(b.scene().background().is_none());
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = EditorConfig {
        placement_fraction: -1.0,
        ..EditorConfig::default()
    };
    assert!(Editor::new(cfg).is_err());
}
