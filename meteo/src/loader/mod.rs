//! Extraction of polygon rings from geometry records.
//!
//! Records come from a [`RecordSource`], which abstracts away the file format library. The
//! [`GeometryLoader`] turns the records into a flat stream of [`Ring`]s: exterior boundaries of
//! every polygon found in the source.

use std::path::Path;
use std::sync::Arc;

use geo_types::{Geometry, LineString};
use meteo_types::geo::GeoPoint2d;

use crate::error::MeteoError;

mod shp;

pub use shp::ShapefileSource;

/// One record read from a [`RecordSource`].
///
/// `None` stands for a record without geometry, or with a geometry type the source cannot
/// represent.
pub type GeometryRecord = Option<Geometry<f64>>;

/// A stream of geometry records, for example the shapes of a shapefile.
pub trait RecordSource {
    /// Returns an iterator over the records of the source. Reading starts from the current
    /// position of the source, so the iterator is meant to be consumed once.
    fn records(&mut self) -> Box<dyn Iterator<Item = Result<GeometryRecord, MeteoError>> + '_>;
}

/// Closed exterior boundary of a polygon in geographic coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring(Vec<GeoPoint2d>);

impl Ring {
    /// Creates a ring from its points.
    pub fn new(points: Vec<GeoPoint2d>) -> Self {
        Self(points)
    }

    /// Points of the ring.
    pub fn points(&self) -> &[GeoPoint2d] {
        &self.0
    }

    /// Number of points in the ring.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the ring has no points.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&LineString<f64>> for Ring {
    fn from(value: &LineString<f64>) -> Self {
        Self(
            value
                .coords()
                .map(|coord| GeoPoint2d::lonlat(coord.x, coord.y))
                .collect(),
        )
    }
}

/// Counters collected while reading a source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of records read.
    pub records: usize,
    /// Number of rings produced.
    pub rings: usize,
    /// Number of records skipped because they are not polygons.
    pub skipped: usize,
}

/// Rings read from a source together with the loading statistics.
#[derive(Debug, Default, Clone)]
pub struct LoadedGeometry {
    /// Exterior rings of all polygons of the source.
    pub rings: Vec<Ring>,
    /// Loading statistics.
    pub stats: LoadStats,
}

type Opener = dyn Fn(&Path) -> Result<Box<dyn RecordSource>, MeteoError> + Send + Sync;

/// Loads polygon rings from files.
///
/// The loader knows how to open a [`RecordSource`] for a path. Every call to
/// [`GeometryLoader::load`] opens the source again, so the same file can be loaded any number
/// of times.
#[derive(Clone)]
pub struct GeometryLoader {
    open: Arc<Opener>,
}

impl GeometryLoader {
    /// Loader reading ESRI shapefiles.
    pub fn shapefile() -> Self {
        Self::with_opener(|path| Ok(Box::new(ShapefileSource::open(path)?)))
    }

    /// Loader using a custom function to open record sources.
    pub fn with_opener(
        open: impl Fn(&Path) -> Result<Box<dyn RecordSource>, MeteoError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            open: Arc::new(open),
        }
    }

    /// Opens the source at `path` and reads all rings from it.
    ///
    /// Fails if the source cannot be opened or one of its records cannot be read. Records that
    /// are not polygons are skipped.
    pub fn load(&self, path: &Path) -> Result<LoadedGeometry, MeteoError> {
        let mut source = (self.open)(path)?;
        let loaded = Self::collect(source.as_mut())?;

        log::info!(
            "Loaded {} rings from {} records of {} ({} skipped)",
            loaded.stats.rings,
            loaded.stats.records,
            path.display(),
            loaded.stats.skipped,
        );

        Ok(loaded)
    }

    /// Reads all rings of the source.
    pub fn collect(source: &mut dyn RecordSource) -> Result<LoadedGeometry, MeteoError> {
        let mut stream = Self::rings(source);
        let rings = stream.by_ref().collect::<Result<Vec<_>, _>>()?;

        Ok(LoadedGeometry {
            rings,
            stats: stream.stats(),
        })
    }

    /// Returns a lazy stream of the exterior rings of the source.
    pub fn rings(source: &mut dyn RecordSource) -> RingStream<'_> {
        RingStream {
            records: source.records(),
            pending: Vec::new().into_iter(),
            stats: LoadStats::default(),
            failed: false,
        }
    }
}

impl Default for GeometryLoader {
    fn default() -> Self {
        Self::shapefile()
    }
}

/// Single-pass iterator over exterior rings of a [`RecordSource`].
///
/// Single polygons produce one ring, multipolygons produce one ring per member polygon. Interior
/// rings are dropped. After a read error the stream yields the error and ends.
pub struct RingStream<'a> {
    records: Box<dyn Iterator<Item = Result<GeometryRecord, MeteoError>> + 'a>,
    pending: std::vec::IntoIter<Ring>,
    stats: LoadStats,
    failed: bool,
}

impl RingStream<'_> {
    /// Statistics of the records consumed so far.
    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    fn expand(&mut self, record: GeometryRecord) {
        let rings = match record {
            Some(Geometry::Polygon(polygon)) => vec![Ring::from(polygon.exterior())],
            Some(Geometry::MultiPolygon(polygons)) => polygons
                .iter()
                .map(|polygon| Ring::from(polygon.exterior()))
                .collect(),
            other => {
                log::debug!(
                    "Skipping record {} with unsupported geometry {}",
                    self.stats.records,
                    geometry_name(other.as_ref())
                );
                self.stats.skipped += 1;
                return;
            }
        };

        self.pending = rings.into_iter();
    }
}

impl Iterator for RingStream<'_> {
    type Item = Result<Ring, MeteoError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(ring) = self.pending.next() {
                self.stats.rings += 1;
                return Some(Ok(ring));
            }

            if self.failed {
                return None;
            }

            match self.records.next()? {
                Ok(record) => {
                    self.stats.records += 1;
                    self.expand(record);
                }
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

fn geometry_name(geometry: Option<&Geometry<f64>>) -> &'static str {
    match geometry {
        None => "none",
        Some(Geometry::Point(_)) => "point",
        Some(Geometry::Line(_)) => "line",
        Some(Geometry::LineString(_)) => "linestring",
        Some(Geometry::Polygon(_)) => "polygon",
        Some(Geometry::MultiPoint(_)) => "multipoint",
        Some(Geometry::MultiLineString(_)) => "multilinestring",
        Some(Geometry::MultiPolygon(_)) => "multipolygon",
        Some(Geometry::GeometryCollection(_)) => "collection",
        Some(Geometry::Rect(_)) => "rect",
        Some(Geometry::Triangle(_)) => "triangle",
    }
}

/// Record source backed by a vector. Useful for tests and generated data.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    records: Vec<GeometryRecord>,
}

impl MemorySource {
    /// Creates a source serving the given records.
    pub fn new(records: Vec<GeometryRecord>) -> Self {
        Self { records }
    }
}

impl RecordSource for MemorySource {
    fn records(&mut self) -> Box<dyn Iterator<Item = Result<GeometryRecord, MeteoError>> + '_> {
        Box::new(std::mem::take(&mut self.records).into_iter().map(Ok))
    }
}
