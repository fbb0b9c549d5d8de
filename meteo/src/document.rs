//! State of the viewer and the commands changing it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use meteo_types::geo::GeoPoint2d;
use meteo_types::{Point2d, ProjectionKind, ProjectionService};

use crate::config::ViewerConfig;
use crate::error::MeteoError;
use crate::loader::{GeometryLoader, LoadStats, LoadedGeometry, Ring};
use crate::mapper::CoordinateMapper;
use crate::messenger::Messenger;
use crate::render::{MapRenderer, MapSurface};
use crate::view::ViewTransform;

/// Action requested by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Load the shapefile and show it instead of the current one.
    Import(PathBuf),
    /// Switch between planar and orthographic projections.
    SwitchProjection,
    /// Show the map in the given projection.
    SetProjection(ProjectionKind),
}

/// Token identifying a started load. See [`MapDocument::begin_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    version: u64,
    path: PathBuf,
}

impl LoadTicket {
    /// File being loaded.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Result of a finished load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The loaded geometry is displayed.
    Applied(LoadStats),
    /// The document changed after the load started, so the result was thrown away.
    Discarded,
}

/// The shown file, its geometry, the projection and the view, together with the layer
/// rendered from them.
///
/// Every change of the geometry or the projection rebuilds the layer and installs it on the
/// surface in one step. View changes only request a redraw: the installed layer is adjusted to
/// the current view when painted.
pub struct MapDocument {
    path: Option<PathBuf>,
    projection: ProjectionKind,
    view: ViewTransform,
    rings: Vec<Ring>,
    projections: Arc<ProjectionService>,
    loader: GeometryLoader,
    renderer: MapRenderer,
    surface: MapSurface,
    version: u64,
}

impl MapDocument {
    /// Creates an empty document reading shapefiles. The configured shapefile is not loaded
    /// until [`MapDocument::import`] is called.
    pub fn new(config: ViewerConfig) -> Self {
        Self::with_loader(config, GeometryLoader::shapefile())
    }

    /// Creates an empty document using the given loader.
    pub fn with_loader(config: ViewerConfig, loader: GeometryLoader) -> Self {
        Self {
            path: None,
            projection: config.projection,
            view: config.view,
            rings: vec![],
            projections: Arc::new(ProjectionService::new()),
            loader,
            renderer: MapRenderer::new(config.style),
            surface: MapSurface::default(),
            version: 0,
        }
    }

    /// Path of the displayed file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current projection.
    pub fn projection(&self) -> ProjectionKind {
        self.projection
    }

    /// Current view transform.
    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    /// Rings of the displayed file.
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Surface with the rendered layer.
    pub fn surface(&self) -> &MapSurface {
        &self.surface
    }

    /// Loader used for imports. It can be cloned to load files outside of the document.
    pub fn loader(&self) -> &GeometryLoader {
        &self.loader
    }

    /// Sets the messenger notified when the map must be repainted.
    pub fn set_messenger(&mut self, messenger: Option<impl Messenger + 'static>) {
        self.surface.set_messenger(messenger);
    }

    /// Mapper for the current projection and view.
    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.projections.clone(), self.projection, self.view)
    }

    /// Executes the command.
    pub fn execute(&mut self, command: Command) -> Result<(), MeteoError> {
        match command {
            Command::Import(path) => self.import(path).map(|_| ()),
            Command::SwitchProjection => {
                self.switch_projection();
                Ok(())
            }
            Command::SetProjection(kind) => {
                self.set_projection(kind);
                Ok(())
            }
        }
    }

    /// Loads the file and shows it instead of the current one.
    ///
    /// If loading fails, the document is not changed.
    pub fn import(&mut self, path: impl Into<PathBuf>) -> Result<LoadOutcome, MeteoError> {
        let ticket = self.begin_load(path);
        let result = self.loader.load(ticket.path());
        self.finish_load(ticket, result)
    }

    /// Registers the start of a load of the file.
    ///
    /// Any load started earlier becomes stale: its result is discarded by
    /// [`MapDocument::finish_load`].
    pub fn begin_load(&mut self, path: impl Into<PathBuf>) -> LoadTicket {
        self.version += 1;
        let ticket = LoadTicket {
            version: self.version,
            path: path.into(),
        };

        log::debug!(
            "Loading {} (version {})",
            ticket.path.display(),
            ticket.version
        );
        ticket
    }

    /// Applies the result of the load started with `ticket`.
    ///
    /// Returns [`LoadOutcome::Discarded`] if the document was changed after the load started.
    /// A load error is returned as is, leaving the document unchanged.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<LoadedGeometry, MeteoError>,
    ) -> Result<LoadOutcome, MeteoError> {
        if ticket.version != self.version {
            log::debug!(
                "Discarding stale load of {} (version {}, current {})",
                ticket.path.display(),
                ticket.version,
                self.version
            );
            return Ok(LoadOutcome::Discarded);
        }

        let loaded = match result {
            Ok(loaded) => loaded,
            Err(err) => {
                log::error!("Failed to import {}: {err}", ticket.path.display());
                return Err(err);
            }
        };

        log::info!(
            "Imported {} ({} rings)",
            ticket.path.display(),
            loaded.rings.len()
        );

        self.path = Some(ticket.path);
        self.rings = loaded.rings;
        self.rebuild();

        Ok(LoadOutcome::Applied(loaded.stats))
    }

    /// Switches between planar and orthographic projections.
    pub fn switch_projection(&mut self) {
        self.set_projection(self.projection.toggled());
    }

    /// Shows the map in the given projection.
    ///
    /// Loads started before the projection changes are discarded when they finish.
    pub fn set_projection(&mut self, kind: ProjectionKind) {
        if kind == self.projection {
            return;
        }

        self.version += 1;
        log::info!("Switching projection to {kind}");
        self.projection = kind;
        self.rebuild();
    }

    /// Sets the view transform and requests a redraw. The layer is not rebuilt.
    pub fn set_view(&mut self, view: ViewTransform) {
        self.view = view;
        self.surface.request_redraw();
    }

    /// Geographic coordinates of the point under the canvas position, if there is one.
    pub fn pointer_geo(&self, canvas_point: Point2d) -> Option<GeoPoint2d> {
        self.mapper().to_geographic(canvas_point.x, canvas_point.y)
    }

    fn rebuild(&mut self) {
        let layer = self.renderer.build_layer(&self.rings, &self.mapper());
        self.surface.replace(layer);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use geo_types::{polygon, Geometry};
    use meteo_types::Vector2d;

    use super::*;
    use crate::loader::MemorySource;

    fn square(x: f64, y: f64) -> Geometry<f64> {
        Geometry::Polygon(polygon![
            (x: x, y: y),
            (x: x, y: y + 10.0),
            (x: x + 10.0, y: y + 10.0),
            (x: x + 10.0, y: y),
            (x: x, y: y),
        ])
    }

    /// Loader serving in-memory files: `europe.shp`, `asia.shp` and `pole.shp`.
    fn loader() -> GeometryLoader {
        let files: HashMap<&'static str, Vec<Geometry<f64>>> = HashMap::from([
            ("europe.shp", vec![square(0.0, 40.0), square(20.0, 45.0)]),
            ("asia.shp", vec![square(100.0, 30.0)]),
            (
                "pole.shp",
                vec![Geometry::Polygon(polygon![
                    (x: 0.0, y: -85.0),
                    (x: 10.0, y: -85.0),
                    (x: 10.0, y: -89.0),
                    (x: 0.0, y: -85.0),
                ])],
            ),
        ]);

        GeometryLoader::with_opener(move |path| {
            let name = path.to_string_lossy();
            match files.get(name.as_ref()) {
                Some(records) => Ok(Box::new(MemorySource::new(
                    records.iter().cloned().map(Some).collect(),
                ))),
                None => Err(MeteoError::FileNotFound(path.to_path_buf())),
            }
        })
    }

    fn document(projection: ProjectionKind) -> MapDocument {
        let config = ViewerConfig {
            projection,
            view: ViewTransform::new(1.0, Vector2d::zeros()),
            ..Default::default()
        };
        MapDocument::with_loader(config, loader())
    }

    #[test]
    fn import_replaces_geometry() {
        let mut document = document(ProjectionKind::Planar);

        assert_matches!(document.import("europe.shp"), Ok(LoadOutcome::Applied(stats)) => {
            assert_eq!(stats.rings, 2);
        });
        assert_eq!(document.surface().layer().map(|l| l.polygons().len()), Some(2));

        document.import("asia.shp").expect("file exists");
        assert_eq!(document.path(), Some(Path::new("asia.shp")));
        assert_eq!(document.rings().len(), 1);

        let layer = document.surface().layer().expect("layer is built");
        assert_eq!(layer.polygons().len(), 1);
        let expected = document.mapper().to_canvas(100.0, 30.0).expect("valid point");
        assert_abs_diff_eq!(layer.polygons()[0].points[0], expected, epsilon = 1e-9);
    }

    #[test]
    fn failed_import_keeps_previous_state() {
        let mut document = document(ProjectionKind::Planar);
        document.import("europe.shp").expect("file exists");
        let layer_before = document.surface().layer().cloned();

        assert_matches!(
            document.import("missing.shp"),
            Err(MeteoError::FileNotFound(_))
        );

        assert_eq!(document.path(), Some(Path::new("europe.shp")));
        assert_eq!(document.rings().len(), 2);
        assert_eq!(document.surface().layer().cloned(), layer_before);
    }

    #[test]
    fn switching_projection_toggles_globe_disc() {
        let mut document = document(ProjectionKind::Planar);
        document.import("europe.shp").expect("file exists");
        assert!(document.surface().layer().expect("layer").background().is_none());

        document
            .execute(Command::SwitchProjection)
            .expect("switch never fails");
        let layer = document.surface().layer().expect("layer");
        assert_eq!(document.projection(), ProjectionKind::Orthographic);
        assert_eq!(layer.projection(), ProjectionKind::Orthographic);
        assert!(layer.background().is_some());
        assert_eq!(layer.shape_count(), 3);

        document
            .execute(Command::SwitchProjection)
            .expect("switch never fails");
        let layer = document.surface().layer().expect("layer");
        assert!(layer.background().is_none());
        assert_eq!(layer.shape_count(), 2);
    }

    #[test]
    fn set_projection_to_current_keeps_layer() {
        let mut document = document(ProjectionKind::Orthographic);
        document.import("europe.shp").expect("file exists");
        let before = document.surface().layer().cloned();

        document
            .execute(Command::SetProjection(ProjectionKind::Orthographic))
            .expect("switch never fails");
        assert_eq!(document.surface().layer().cloned(), before);
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut document = document(ProjectionKind::Planar);

        let first = document.begin_load("europe.shp");
        let second = document.begin_load("asia.shp");

        let second_result = document.loader().load(second.path());
        assert_matches!(
            document.finish_load(second, second_result),
            Ok(LoadOutcome::Applied(_))
        );

        let first_result = document.loader().load(first.path());
        assert_matches!(
            document.finish_load(first, first_result),
            Ok(LoadOutcome::Discarded)
        );
        assert_eq!(document.path(), Some(Path::new("asia.shp")));
    }

    #[test]
    fn projection_switch_discards_pending_load() {
        let mut document = document(ProjectionKind::Planar);
        let ticket = document.begin_load("europe.shp");
        document.switch_projection();

        let result = document.loader().load(ticket.path());
        assert_matches!(
            document.finish_load(ticket, result),
            Ok(LoadOutcome::Discarded)
        );
        assert!(document.rings().is_empty());
    }

    #[test]
    fn stale_error_is_discarded() {
        let mut document = document(ProjectionKind::Planar);
        let ticket = document.begin_load("missing.shp");
        document.begin_load("europe.shp");

        assert_matches!(
            document.finish_load(ticket, Err(MeteoError::Parse("broken".into()))),
            Ok(LoadOutcome::Discarded)
        );
    }

    #[test]
    fn polar_geometry_is_not_rendered() {
        let mut document = document(ProjectionKind::Planar);
        document.import("pole.shp").expect("file exists");

        assert_eq!(document.rings().len(), 1);
        assert!(document.surface().layer().expect("layer").polygons().is_empty());
    }

    #[test]
    fn view_change_does_not_rebuild_layer() {
        let mut document = document(ProjectionKind::Planar);
        document.import("europe.shp").expect("file exists");
        let before = document.surface().layer().cloned();

        document.set_view(document.view().translate(Vector2d::new(100.0, 50.0)));

        assert_eq!(document.surface().layer().cloned(), before);
        assert_eq!(document.view().offset(), Vector2d::new(100.0, 50.0));
    }

    #[test]
    fn pointer_geo_follows_view() {
        let mut document = document(ProjectionKind::Planar);
        document.set_view(ViewTransform::new(2e-4, Vector2d::new(30.0, -10.0)));

        let canvas = document.mapper().to_canvas(28.0, 47.0).expect("valid point");
        let geo = document.pointer_geo(canvas).expect("valid point");
        assert_abs_diff_eq!(geo, GeoPoint2d::lonlat(28.0, 47.0), epsilon = 1e-7);

        document.switch_projection();
        assert!(document.pointer_geo(Point2d::new(1e6, 1e6)).is_none());
    }
}
