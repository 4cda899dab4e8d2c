//! `overlay_compose` places overlay images (raster or SVG) on top of a background image and
//! exports the result as a PNG at the background's native resolution.
//!
//! The API is session-oriented:
//!
//! - Create an [`Editor`] from an [`EditorConfig`]
//! - Feed it host events: uploads, container resizes, control input, interactive drags
//! - Export with [`Editor::begin_export`] and a [`SceneRasterizer`] such as [`CpuRasterizer`]
//!
//! Pixels are premultiplied RGBA8 everywhere except in the encoded PNG.
#![forbid(unsafe_code)]

mod assets;
mod controls;
mod export;
mod foundation;
mod padding;
mod placement;
mod render;
mod scene;
mod session;
mod viewport;

pub use crate::foundation::config::{EditorConfig, ReferenceBasis};
pub use crate::foundation::core::{
    Affine, ObjectTransform, Origin, Placement, Point, Rect, Rgba8, Size, Vec2,
};
pub use crate::foundation::error::{ComposeError, ComposeResult};

pub use crate::assets::decode::{
    OverlaySource, RasterImage, decode_overlay, decode_raster, rasterize_svg,
};
pub use crate::assets::upload::{UploadSlot, UploadTicket, UploadTracker};
pub use crate::controls::{ControlPanel, parse_padding_input};
pub use crate::export::{
    ExportButton, ExportJob, ExportPlan, ExportQuality, ExportedImage, effective_multiplier,
    encode_png,
};
pub use crate::padding::{PaddingState, set_padding};
pub use crate::placement::{initial_placement, initial_scale, initial_transform};
pub use crate::render::backend::{
    BackendKind, FrameRGBA, RasterRequest, SceneRasterizer, create_rasterizer,
};
pub use crate::render::cpu::CpuRasterizer;
pub use crate::scene::canvas_image::CanvasImage;
pub use crate::scene::model::{DrawOp, Scene, Selection};
pub use crate::scene::overlay::{BackingShape, Overlay, OverlayId, OverlayKind, PaddedGroup};
pub use crate::session::Editor;
pub use crate::viewport::ViewportFit;
