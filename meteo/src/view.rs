//! Placement of the projected plane on the canvas.

use meteo_types::{Point2d, Vector2d};
use serde::{Deserialize, Serialize};

/// Affine transform from the projected plane to the canvas.
///
/// A point `(x, y)` in the projected plane is placed on the canvas at
/// `(x * scale + offset.x, -y * scale + offset.y)`: the canvas y axis points down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    scale: f64,
    offset: Vector2d,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vector2d::zeros(),
        }
    }
}

impl ViewTransform {
    /// Creates a new transform. `scale` is the number of canvas units per projected-plane unit.
    pub fn new(scale: f64, offset: Vector2d) -> Self {
        Self { scale, offset }
    }

    /// Canvas units per projected-plane unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Translation of the projected plane origin on the canvas.
    pub fn offset(&self) -> Vector2d {
        self.offset
    }

    /// Converts a projected-plane point into canvas coordinates.
    pub fn plane_to_canvas(&self, plane: Point2d) -> Point2d {
        Point2d::new(
            plane.x * self.scale + self.offset.x,
            -plane.y * self.scale + self.offset.y,
        )
    }

    /// Converts a canvas point into projected-plane coordinates.
    pub fn canvas_to_plane(&self, canvas: Point2d) -> Point2d {
        Point2d::new(
            (canvas.x - self.offset.x) / self.scale,
            (self.offset.y - canvas.y) / self.scale,
        )
    }

    /// Moves the content of the canvas by `delta` canvas units.
    pub fn translate(&self, delta: Vector2d) -> Self {
        Self {
            offset: self.offset + delta,
            ..*self
        }
    }

    /// Multiplies the scale by `factor`, keeping the canvas point `anchor` in place.
    pub fn zoom(&self, factor: f64, anchor: Point2d) -> Self {
        let anchor = anchor.coords;
        Self {
            scale: self.scale * factor,
            offset: anchor - (anchor - self.offset) * factor,
        }
    }

    /// Moves a canvas point computed with the transform `built` to where it would be placed by
    /// `self`.
    ///
    /// Both transforms share the projection, so the conversion is a uniform scale followed by a
    /// translation and does not need the projected coordinates.
    pub fn reproject(&self, built: &ViewTransform, canvas: Point2d) -> Point2d {
        let k = self.scale / built.scale;
        Point2d::new(
            (canvas.x - built.offset.x) * k + self.offset.x,
            (canvas.y - built.offset.y) * k + self.offset.y,
        )
    }
}
