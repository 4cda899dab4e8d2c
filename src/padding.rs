//! Wrapping an overlay in a solid backing shape and unwrapping it again.
//!
//! Both directions keep the overlay's on-screen `(scale, left, top, angle)`: the captured
//! placement moves from the image to the group on wrap and back on unwrap. The base image's
//! pixels are shared, never copied or modified.

use crate::{
    foundation::core::{ObjectTransform, Rgba8},
    foundation::error::ComposeResult,
    scene::{
        model::Scene,
        overlay::{BackingShape, Overlay, OverlayId, OverlayKind, PaddedGroup},
    },
};

/// Requested padding variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaddingState {
    Bare,
    Padded(u32),
}

impl PaddingState {
    /// State of an existing overlay.
    pub fn of(overlay: &Overlay) -> Self {
        match overlay.padding_px() {
            None => Self::Bare,
            Some(p) => Self::Padded(p.max(0.0).round() as u32),
        }
    }
}

/// Padded variant of `overlay`. Re-wrapping an already padded overlay replaces its padding.
pub fn wrap(overlay: &Overlay, padding_px: u32, fill: Rgba8) -> Overlay {
    let captured = overlay.transform.placement();
    let group = PaddedGroup {
        backing: BackingShape::around(overlay.base_size(), padding_px, fill),
        image_local: ObjectTransform::centered(),
    };
    overlay.with_kind(
        OverlayKind::Padded(group),
        ObjectTransform::centered_at(captured),
    )
}

/// Bare variant of `overlay`, carrying the group's placement over to the image.
pub fn unwrap(overlay: &Overlay) -> Overlay {
    let captured = overlay.transform.placement();
    overlay.with_kind(OverlayKind::Bare, ObjectTransform::centered_at(captured))
}

/// Variant of `overlay` in `target` state.
pub fn rebuild(overlay: &Overlay, target: PaddingState, fill: Rgba8) -> Overlay {
    match target {
        PaddingState::Bare => unwrap(overlay),
        PaddingState::Padded(px) => wrap(overlay, px, fill),
    }
}

/// Swap overlay `id` in `scene` for its `target` variant. The new variant ends up on top and
/// selected, like any freshly added object.
///
/// Returns `false` when `id` is not in the scene.
pub fn set_padding(
    scene: &mut Scene,
    id: OverlayId,
    target: PaddingState,
    fill: Rgba8,
) -> ComposeResult<bool> {
    let Some(current) = scene.overlay(id) else {
        return Ok(false);
    };
    let next = rebuild(current, target, fill);
    tracing::debug!(
        overlay = id.as_u64(),
        from = ?PaddingState::of(current),
        to = ?target,
        "padding transition"
    );
    scene.swap_overlay(next)?;
    Ok(true)
}

#[cfg(test)]
#[path = "../tests/unit/padding.rs"]
mod tests;
