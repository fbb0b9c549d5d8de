use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use geo_types::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Polygon};
use shapefile::{PolygonRing, Shape, ShapeReader};

use super::{GeometryRecord, RecordSource};
use crate::error::MeteoError;

/// Record source reading the `.shp` part of an ESRI shapefile.
pub struct ShapefileSource {
    path: PathBuf,
    reader: ShapeReader<BufReader<File>>,
}

impl std::fmt::Debug for ShapefileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapefileSource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ShapefileSource {
    /// Opens the shapefile and reads its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MeteoError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MeteoError::FileNotFound(path.to_path_buf()));
        }

        let reader = ShapeReader::from_path(path)?;
        log::debug!("Opened shapefile {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            reader,
        })
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for ShapefileSource {
    fn records(&mut self) -> Box<dyn Iterator<Item = Result<GeometryRecord, MeteoError>> + '_> {
        Box::new(
            self.reader
                .iter_shapes()
                .map(|shape| Ok(shape_to_geometry(shape?))),
        )
    }
}

/// Something with planar x and y coordinates. M and Z values are ignored.
trait PlanarPoint {
    fn coord(&self) -> Coord<f64>;
}

impl PlanarPoint for shapefile::Point {
    fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

impl PlanarPoint for shapefile::PointM {
    fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

impl PlanarPoint for shapefile::PointZ {
    fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

fn shape_to_geometry(shape: Shape) -> GeometryRecord {
    let geometry = match shape {
        Shape::NullShape | Shape::Multipatch(_) => return None,
        Shape::Point(p) => Geometry::Point(p.coord().into()),
        Shape::PointM(p) => Geometry::Point(p.coord().into()),
        Shape::PointZ(p) => Geometry::Point(p.coord().into()),
        Shape::Multipoint(mp) => multipoint(mp.points()),
        Shape::MultipointM(mp) => multipoint(mp.points()),
        Shape::MultipointZ(mp) => multipoint(mp.points()),
        Shape::Polyline(line) => polyline(line.parts()),
        Shape::PolylineM(line) => polyline(line.parts()),
        Shape::PolylineZ(line) => polyline(line.parts()),
        Shape::Polygon(polygon) => polygon_geometry(polygon.rings()),
        Shape::PolygonM(polygon) => polygon_geometry(polygon.rings()),
        Shape::PolygonZ(polygon) => polygon_geometry(polygon.rings()),
    };

    Some(geometry)
}

fn line_string<P: PlanarPoint>(points: &[P]) -> LineString<f64> {
    points.iter().map(PlanarPoint::coord).collect()
}

fn multipoint<P: PlanarPoint>(points: &[P]) -> Geometry<f64> {
    Geometry::MultiPoint(MultiPoint::new(
        points.iter().map(|p| p.coord().into()).collect(),
    ))
}

fn polyline<P: PlanarPoint>(parts: &[Vec<P>]) -> Geometry<f64> {
    match parts {
        [single] => Geometry::LineString(line_string(single)),
        _ => Geometry::MultiLineString(MultiLineString::new(
            parts.iter().map(|part| line_string(part)).collect(),
        )),
    }
}

/// Groups the rings of a shapefile polygon: every inner ring belongs to the closest outer ring
/// before it. Inner rings before the first outer ring are dropped.
fn polygon_geometry<P: PlanarPoint>(rings: &[PolygonRing<P>]) -> Geometry<f64> {
    let mut polygons: Vec<Polygon<f64>> = vec![];
    for ring in rings {
        match ring {
            PolygonRing::Outer(points) => {
                polygons.push(Polygon::new(line_string(points), vec![]));
            }
            PolygonRing::Inner(points) => match polygons.last_mut() {
                Some(polygon) => polygon.interiors_push(line_string(points)),
                None => log::debug!("Dropping inner ring without an outer ring"),
            },
        }
    }

    if polygons.len() == 1 {
        if let Some(polygon) = polygons.pop() {
            return Geometry::Polygon(polygon);
        }
    }

    Geometry::MultiPolygon(MultiPolygon::new(polygons))
}
