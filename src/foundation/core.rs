use crate::foundation::error::{ComposeError, ComposeResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Anchor of an object's `left`/`top` relative to its own box, per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Origin {
    /// `left`/`top` address the top-left corner.
    #[default]
    Start,
    /// `left`/`top` address the box center.
    Center,
}

impl Origin {
    fn offset(self, extent: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => extent / 2.0,
        }
    }
}

/// Position, uniform scale and rotation of a scene object.
///
/// Coordinates are canvas-local and pre-zoom, i.e. in background native pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ObjectTransform {
    pub left: f64,
    pub top: f64,
    pub scale: f64,
    /// Clockwise rotation in degrees, about the origin point.
    pub angle_deg: f64,
    pub origin_x: Origin,
    pub origin_y: Origin,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            scale: 1.0,
            angle_deg: 0.0,
            origin_x: Origin::Start,
            origin_y: Origin::Start,
        }
    }
}

impl ObjectTransform {
    /// Identity transform anchored on the box center.
    pub fn centered() -> Self {
        Self {
            origin_x: Origin::Center,
            origin_y: Origin::Center,
            ..Self::default()
        }
    }

    pub fn with_position(mut self, left: f64, top: f64) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_angle(mut self, angle_deg: f64) -> Self {
        self.angle_deg = angle_deg;
        self
    }

    /// The `(scale, left, top, angle)` tuple that padding transitions preserve.
    pub fn placement(self) -> Placement {
        Placement {
            scale: self.scale,
            left: self.left,
            top: self.top,
            angle_deg: self.angle_deg,
        }
    }

    /// Re-anchor on the center and take `placement` verbatim.
    pub fn centered_at(placement: Placement) -> Self {
        Self {
            left: placement.left,
            top: placement.top,
            scale: placement.scale,
            angle_deg: placement.angle_deg,
            origin_x: Origin::Center,
            origin_y: Origin::Center,
        }
    }

    /// Map a `width x height` box whose local origin is its top-left corner into parent space.
    pub fn to_affine(self, width: f64, height: f64) -> Affine {
        let anchor = Vec2::new(self.origin_x.offset(width), self.origin_y.offset(height));

        // T(left, top) * R(angle) * S(scale) * T(-anchor)
        Affine::translate(Vec2::new(self.left, self.top))
            * Affine::rotate(self.angle_deg.to_radians())
            * Affine::scale(self.scale)
            * Affine::translate(-anchor)
    }

    pub fn validate(self) -> ComposeResult<()> {
        let finite = [self.left, self.top, self.scale, self.angle_deg]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(ComposeError::validation("object transform must be finite"));
        }
        if self.scale <= 0.0 {
            return Err(ComposeError::validation("object scale must be > 0"));
        }
        Ok(())
    }
}

/// On-screen placement of an overlay, independent of its anchor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub scale: f64,
    pub left: f64,
    pub top: f64,
    pub angle_deg: f64,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
