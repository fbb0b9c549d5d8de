//! Configuration of the viewer and process-wide constants.

use std::path::{Path, PathBuf};

use meteo_types::geo::GeoPoint2d;
use meteo_types::{ProjectionKind, Vector2d};
use serde::{Deserialize, Serialize};

use crate::control::ViewControllerConfiguration;
use crate::error::MeteoError;
use crate::render::MapStyle;
use crate::view::ViewTransform;

/// Points to the south of this latitude are not rendered.
pub const POLAR_CUTOFF_LAT: f64 = -80.0;

/// Projected points with the absolute canvas x coordinate above this value are not rendered.
pub const BLOWUP_GUARD: f64 = 1e10;

/// Radius of the globe disc drawn behind the orthographic projection, in metres.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Center of the orthographic projection.
pub const ORTHOGRAPHIC_CENTER: GeoPoint2d = meteo_types::geo::ORTHOGRAPHIC_CENTER;

/// Shapefile loaded on startup if nothing else is configured.
pub const DEFAULT_SHAPEFILE: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/data/ne_50m_admin_0_countries.shp");

/// Initial scale of the view in canvas units per metre.
pub const DEFAULT_SCALE: f64 = 2e-4;

/// Startup configuration of the viewer.
///
/// Every field has a default value, so a configuration file only needs to list the values it
/// changes:
///
/// ```
/// use meteo::config::ViewerConfig;
/// use meteo_types::ProjectionKind;
///
/// let config: ViewerConfig = serde_json::from_str(r#"{"projection": "spherical"}"#).unwrap();
/// assert_eq!(config.projection, ProjectionKind::Orthographic);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Shapefile imported on startup.
    pub shapefile: PathBuf,
    /// Initial projection.
    pub projection: ProjectionKind,
    /// Initial view transform.
    pub view: ViewTransform,
    /// Zoom and pan settings.
    pub controller: ViewControllerConfiguration,
    /// Colors of the map.
    pub style: MapStyle,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            shapefile: PathBuf::from(DEFAULT_SHAPEFILE),
            projection: ProjectionKind::default(),
            view: ViewTransform::new(DEFAULT_SCALE, Vector2d::zeros()),
            controller: ViewControllerConfiguration::default(),
            style: MapStyle::default(),
        }
    }
}

impl ViewerConfig {
    /// Reads the configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MeteoError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MeteoError::FileNotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;

        Ok(config)
    }

    /// Sets the shapefile imported on startup.
    pub fn with_shapefile(mut self, path: impl Into<PathBuf>) -> Self {
        self.shapefile = path.into();
        self
    }

    fn validate(&self) -> Result<(), MeteoError> {
        let controller = &self.controller;
        let (min_scale, max_scale) = (controller.min_scale(), controller.max_scale());
        if !(min_scale > 0.0 && max_scale.is_finite() && min_scale <= max_scale) {
            return Err(MeteoError::Config(format!(
                "invalid scale range [{min_scale}, {max_scale}]"
            )));
        }

        let zoom_step = controller.zoom_step();
        if !(zoom_step.is_finite() && zoom_step > 1.0) {
            return Err(MeteoError::Config(format!(
                "zoom step must be a finite number greater than 1, got {zoom_step}"
            )));
        }

        let scale = self.view.scale();
        if !(min_scale..=max_scale).contains(&scale) {
            return Err(MeteoError::Config(format!(
                "view scale {scale} is outside of [{min_scale}, {max_scale}]"
            )));
        }

        Ok(())
    }
}
