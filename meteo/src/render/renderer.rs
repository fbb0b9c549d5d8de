use serde::{Deserialize, Serialize};

use meteo_types::{Point2d, ProjectionKind};

use super::{DiscShape, LinePaint, Paint, PolygonShape, RenderedLayer};
use crate::color::Color;
use crate::config::{BLOWUP_GUARD, EARTH_RADIUS_METERS, ORTHOGRAPHIC_CENTER, POLAR_CUTOFF_LAT};
use crate::loader::Ring;
use crate::mapper::CoordinateMapper;

const BACKGROUND_Z_INDEX: i32 = 0;
const LAND_Z_INDEX: i32 = 1;

/// Colors used to render the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    /// Fill color of the polygons.
    pub land: Color,
    /// Fill color of the globe disc in orthographic projection.
    pub water: Color,
    /// Optional outline of the polygons.
    pub outline: Option<LinePaint>,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            land: Color::LAND,
            water: Color::WATER,
            outline: None,
        }
    }
}

/// Builds [`RenderedLayer`]s from rings.
#[derive(Debug, Clone, Default)]
pub struct MapRenderer {
    style: MapStyle,
}

impl MapRenderer {
    /// Creates a renderer with the given style.
    pub fn new(style: MapStyle) -> Self {
        Self { style }
    }

    /// Builds the layer for the rings.
    ///
    /// Points to the south of the polar cutoff latitude, points the projection cannot handle
    /// and points thrown far away from the canvas are dropped. Rings with less than 3 remaining
    /// points are not rendered. In orthographic projection a disc representing the globe is
    /// placed under the polygons.
    pub fn build_layer(&self, rings: &[Ring], mapper: &CoordinateMapper) -> RenderedLayer {
        let polygons: Vec<_> = self.build_polygons(rings, mapper).collect();
        let background = self.background(mapper);

        log::debug!(
            "Built layer with {} polygons out of {} rings in {} projection",
            polygons.len(),
            rings.len(),
            mapper.projection_kind()
        );

        RenderedLayer::new(
            polygons,
            background,
            *mapper.view(),
            mapper.projection_kind(),
        )
    }

    /// Lazily converts the rings into polygon shapes.
    pub fn build_polygons<'a>(
        &'a self,
        rings: &'a [Ring],
        mapper: &'a CoordinateMapper,
    ) -> impl Iterator<Item = PolygonShape> + 'a {
        rings
            .iter()
            .filter_map(move |ring| self.build_polygon(ring, mapper))
    }

    fn build_polygon(&self, ring: &Ring, mapper: &CoordinateMapper) -> Option<PolygonShape> {
        let points: Vec<Point2d> = ring
            .points()
            .iter()
            .filter(|point| point.lat() >= POLAR_CUTOFF_LAT)
            .filter_map(|point| mapper.to_canvas(point.lon(), point.lat()))
            .filter(|point| point.x.abs() <= BLOWUP_GUARD)
            .collect();

        if points.len() < 3 {
            return None;
        }

        Some(PolygonShape {
            points,
            fill: Paint {
                color: self.style.land,
            },
            outline: self.style.outline,
            z_index: LAND_Z_INDEX,
        })
    }

    fn background(&self, mapper: &CoordinateMapper) -> Option<DiscShape> {
        if mapper.projection_kind() != ProjectionKind::Orthographic {
            return None;
        }

        let center = mapper.to_canvas(ORTHOGRAPHIC_CENTER.lon(), ORTHOGRAPHIC_CENTER.lat())?;
        Some(DiscShape {
            center,
            radius: mapper.length_to_canvas(EARTH_RADIUS_METERS),
            fill: Paint {
                color: self.style.water,
            },
            z_index: BACKGROUND_Z_INDEX,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_abs_diff_eq;
    use meteo_types::geo::GeoPoint2d;
    use meteo_types::{ProjectionService, Vector2d};

    use super::*;
    use crate::view::ViewTransform;

    fn ring(points: &[(f64, f64)]) -> Ring {
        Ring::new(
            points
                .iter()
                .map(|&(lon, lat)| GeoPoint2d::lonlat(lon, lat))
                .collect(),
        )
    }

    fn mapper(kind: ProjectionKind, view: ViewTransform) -> CoordinateMapper {
        CoordinateMapper::new(Arc::new(ProjectionService::new()), kind, view)
    }

    fn square() -> Ring {
        ring(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)])
    }

    #[test]
    fn planar_square_is_projected_with_inverted_y() {
        let service = ProjectionService::new();
        let mapper = mapper(ProjectionKind::Planar, ViewTransform::default());
        let layer = MapRenderer::default().build_layer(&[square()], &mapper);

        assert!(layer.background().is_none());
        assert_eq!(layer.polygons().len(), 1);

        let polygon = &layer.polygons()[0];
        assert_eq!(polygon.points.len(), 5);
        assert_eq!(polygon.fill.color, Color::LAND);
        assert_eq!(polygon.z_index, 1);

        for (point, source) in polygon.points.iter().zip(square().points()) {
            let projected = service
                .forward(ProjectionKind::Planar, source.lon(), source.lat())
                .expect("valid point");
            assert_abs_diff_eq!(*point, Point2d::new(projected.x, -projected.y), epsilon = 1e-9);
        }
    }

    #[test]
    fn orthographic_layer_has_globe_disc() {
        let view = ViewTransform::new(2e-4, Vector2d::new(10.0, 20.0));
        let layer =
            MapRenderer::default().build_layer(&[square()], &mapper(ProjectionKind::Orthographic, view));

        let disc = layer.background().expect("disc is present");
        assert_abs_diff_eq!(disc.center, Point2d::new(10.0, 20.0), epsilon = 1e-9);
        assert_abs_diff_eq!(disc.radius, 1274.2, epsilon = 1e-9);
        assert_eq!(disc.fill.color, Color::WATER);
        assert_eq!(disc.z_index, 0);
        assert_eq!(layer.shape_count(), 2);
        assert_eq!(layer.projection(), ProjectionKind::Orthographic);
    }

    #[test]
    fn polar_points_are_dropped() {
        let mapper = mapper(ProjectionKind::Planar, ViewTransform::default());
        let antarctic = ring(&[
            (0.0, -70.0),
            (10.0, -85.0),
            (20.0, -70.0),
            (20.0, -60.0),
            (0.0, -70.0),
        ]);

        let layer = MapRenderer::default().build_layer(&[antarctic], &mapper);
        assert_eq!(layer.polygons()[0].points.len(), 4);

        let deep_south = ring(&[(0.0, -85.0), (10.0, -85.0), (10.0, -81.0), (0.0, -70.0)]);
        let layer = MapRenderer::default().build_layer(&[deep_south], &mapper);
        assert!(layer.polygons().is_empty());
    }

    #[test]
    fn far_side_rings_are_omitted() {
        let mapper = mapper(ProjectionKind::Orthographic, ViewTransform::default());
        let pacific = ring(&[(-150.0, -40.0), (-150.0, -50.0), (-160.0, -50.0), (-150.0, -40.0)]);

        let layer = MapRenderer::default().build_layer(&[pacific, square()], &mapper);
        assert_eq!(layer.polygons().len(), 1);
    }

    #[test]
    fn blown_up_points_are_dropped() {
        let mapper = mapper(ProjectionKind::Planar, ViewTransform::new(1000.0, Vector2d::zeros()));
        let wide = ring(&[(-180.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (180.0, 0.0)]);

        let layer = MapRenderer::default().build_layer(&[wide], &mapper);
        assert_eq!(layer.polygons()[0].points.len(), 3);
    }

    #[test]
    fn style_is_applied() {
        let outline = LinePaint {
            color: Color::BLACK,
            width: 0.5,
        };
        let renderer = MapRenderer::new(MapStyle {
            land: Color::rgb(10, 20, 30),
            water: Color::WATER,
            outline: Some(outline),
        });
        let layer = renderer.build_layer(
            &[square()],
            &mapper(ProjectionKind::Planar, ViewTransform::default()),
        );

        assert_eq!(layer.polygons()[0].fill.color, Color::rgb(10, 20, 30));
        assert_eq!(layer.polygons()[0].outline, Some(outline));
    }

    #[test]
    fn to_view_follows_pan_and_zoom() {
        let built = ViewTransform::new(2e-4, Vector2d::zeros());
        let mapper_built = mapper(ProjectionKind::Planar, built);
        let layer = MapRenderer::default().build_layer(&[square()], &mapper_built);

        let current = built
            .zoom(1.05, Point2d::new(100.0, -50.0))
            .translate(Vector2d::new(30.0, 5.0));
        let mapper_current = mapper(ProjectionKind::Planar, current);

        let expected = mapper_current.to_canvas(10.0, 10.0).expect("valid point");
        let moved = layer.to_view(layer.polygons()[0].points[2], &current);
        assert_abs_diff_eq!(moved, expected, epsilon = 1e-9);
    }
}
