//! Renderable representation of the map.
//!
//! [`MapRenderer`] converts loaded rings into a [`RenderedLayer`] in canvas coordinates, and
//! [`MapSurface`] keeps the layer that is currently displayed. Drawing the layer on screen is
//! the job of the UI backend.

use meteo_types::{Point2d, ProjectionKind};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::view::ViewTransform;

mod renderer;
mod surface;

pub use renderer::{MapRenderer, MapStyle};
pub use surface::MapSurface;

/// Fill of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    /// Fill color.
    pub color: Color,
}

/// Outline of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePaint {
    /// Line color.
    pub color: Color,
    /// Width in canvas units.
    pub width: f64,
}

/// Filled polygon in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    /// Vertices of the polygon. The polygon is implicitly closed.
    pub points: Vec<Point2d>,
    /// Fill of the polygon.
    pub fill: Paint,
    /// Outline, if any.
    pub outline: Option<LinePaint>,
    /// Shapes with greater z-index are drawn on top.
    pub z_index: i32,
}

/// Filled circle in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscShape {
    /// Center of the disc.
    pub center: Point2d,
    /// Radius in canvas units.
    pub radius: f64,
    /// Fill of the disc.
    pub fill: Paint,
    /// Shapes with greater z-index are drawn on top.
    pub z_index: i32,
}

/// Set of shapes built for one projection and view transform.
///
/// A layer is never modified after it is built. Changing the geometry or the projection means
/// building a new layer; changing only the view does not, see [`RenderedLayer::to_view`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLayer {
    polygons: Vec<PolygonShape>,
    background: Option<DiscShape>,
    transform: ViewTransform,
    projection: ProjectionKind,
}

impl RenderedLayer {
    pub(crate) fn new(
        polygons: Vec<PolygonShape>,
        background: Option<DiscShape>,
        transform: ViewTransform,
        projection: ProjectionKind,
    ) -> Self {
        Self {
            polygons,
            background,
            transform,
            projection,
        }
    }

    /// Polygons of the layer.
    pub fn polygons(&self) -> &[PolygonShape] {
        &self.polygons
    }

    /// Disc drawn under the polygons, if any.
    pub fn background(&self) -> Option<&DiscShape> {
        self.background.as_ref()
    }

    /// View transform the layer was built with.
    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    /// Projection the layer was built with.
    pub fn projection(&self) -> ProjectionKind {
        self.projection
    }

    /// Number of shapes in the layer, including the background.
    pub fn shape_count(&self) -> usize {
        self.polygons.len() + usize::from(self.background.is_some())
    }

    /// Converts a canvas point of the layer into the position it takes under `view`.
    pub fn to_view(&self, point: Point2d, view: &ViewTransform) -> Point2d {
        view.reproject(&self.transform, point)
    }

    /// Converts a canvas length of the layer into the length it has under `view`.
    pub fn length_to_view(&self, length: f64, view: &ViewTransform) -> f64 {
        length * view.scale() / self.transform.scale()
    }
}
