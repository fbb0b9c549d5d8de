//! Conversion between geographic and canvas coordinates.

use std::sync::Arc;

use meteo_types::geo::GeoPoint2d;
use meteo_types::{Point2d, ProjectionKind, ProjectionService};

use crate::view::ViewTransform;

/// Converts geographic coordinates to canvas coordinates and back.
///
/// The conversion is a composition of the projection of the given kind and the [`ViewTransform`].
#[derive(Clone)]
pub struct CoordinateMapper {
    projections: Arc<ProjectionService>,
    kind: ProjectionKind,
    view: ViewTransform,
}

impl CoordinateMapper {
    /// Creates a new mapper.
    pub fn new(
        projections: Arc<ProjectionService>,
        kind: ProjectionKind,
        view: ViewTransform,
    ) -> Self {
        Self {
            projections,
            kind,
            view,
        }
    }

    /// Projection used by the mapper.
    pub fn projection_kind(&self) -> ProjectionKind {
        self.kind
    }

    /// View transform used by the mapper.
    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    /// Returns canvas coordinates of the point, or `None` if the point cannot be projected.
    pub fn to_canvas(&self, lon: f64, lat: f64) -> Option<Point2d> {
        let projected = self.projections.forward(self.kind, lon, lat)?;
        Some(self.view.plane_to_canvas(projected))
    }

    /// Returns the geographic point at the given canvas position, or `None` if there is no such
    /// point (for example, outside of the globe in orthographic projection).
    pub fn to_geographic(&self, px: f64, py: f64) -> Option<GeoPoint2d> {
        let plane = self.view.canvas_to_plane(Point2d::new(px, py));
        self.projections.inverse(self.kind, plane.x, plane.y)
    }

    /// Converts a length in projected-plane units (metres) into canvas units.
    pub fn length_to_canvas(&self, value: f64) -> f64 {
        value * self.view.scale()
    }
}
