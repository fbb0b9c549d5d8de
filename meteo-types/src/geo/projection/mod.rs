//! Map projections and the service that serves them by name.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cartesian::Point2d;
use crate::error::MeteoTypesError;
use crate::geo::{Datum, GeoPoint2d};

mod mercator;
mod orthographic;

pub use mercator::WorldMercator;
pub use orthographic::Orthographic;

/// Center of the orthographic projection.
pub const ORTHOGRAPHIC_CENTER: GeoPoint2d = GeoPoint2d::lonlat(28.0, 47.0);

/// Conversion between two coordinate spaces.
///
/// Both directions return `None` when the input is outside of the domain of the projection.
pub trait Projection {
    /// Type of the input point.
    type InPoint;
    /// Type of the projected point.
    type OutPoint;

    /// Projects a point.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Reverses the projection.
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}

/// Projection from geographic coordinates into a plane in metres.
pub type GeoProjection = dyn Projection<InPoint = GeoPoint2d, OutPoint = Point2d> + Send + Sync;

/// Projections supported by the viewer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    /// World Mercator on the WGS84 ellipsoid (EPSG:3395).
    #[default]
    #[serde(alias = "mercator")]
    Planar,
    /// Orthographic view of the globe centered at [`ORTHOGRAPHIC_CENTER`].
    #[serde(alias = "spherical")]
    Orthographic,
}

impl ProjectionKind {
    /// All supported projections.
    pub const ALL: [ProjectionKind; 2] = [ProjectionKind::Planar, ProjectionKind::Orthographic];

    /// The other projection.
    pub fn toggled(self) -> Self {
        match self {
            ProjectionKind::Planar => ProjectionKind::Orthographic,
            ProjectionKind::Orthographic => ProjectionKind::Planar,
        }
    }

    /// Canonical name of the projection.
    pub fn name(self) -> &'static str {
        match self {
            ProjectionKind::Planar => "planar",
            ProjectionKind::Orthographic => "orthographic",
        }
    }
}

impl Display for ProjectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectionKind {
    type Err = MeteoTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planar" | "mercator" => Ok(ProjectionKind::Planar),
            "orthographic" | "spherical" => Ok(ProjectionKind::Orthographic),
            _ => Err(MeteoTypesError::UnknownProjection(s.to_string())),
        }
    }
}

/// Holds one instance of every supported projection.
///
/// The service is built once and shared by everything that needs to project coordinates.
pub struct ProjectionService {
    planar: WorldMercator,
    orthographic: Orthographic,
}

impl ProjectionService {
    /// Creates the service with the WGS84 datum.
    pub fn new() -> Self {
        Self::with_datum(Datum::WGS84)
    }

    /// Creates the service with the given datum.
    pub fn with_datum(datum: Datum) -> Self {
        Self {
            planar: WorldMercator::new(datum),
            orthographic: Orthographic::new(ORTHOGRAPHIC_CENTER, datum.semimajor()),
        }
    }

    /// Returns the projection of the given kind.
    pub fn get(&self, kind: ProjectionKind) -> &GeoProjection {
        match kind {
            ProjectionKind::Planar => &self.planar,
            ProjectionKind::Orthographic => &self.orthographic,
        }
    }

    /// Projects `(lon, lat)` into the plane of the given projection.
    pub fn forward(&self, kind: ProjectionKind, lon: f64, lat: f64) -> Option<Point2d> {
        self.get(kind).project(&GeoPoint2d::lonlat(lon, lat))
    }

    /// Converts a point in the plane of the given projection back to `(lon, lat)`.
    pub fn inverse(&self, kind: ProjectionKind, x: f64, y: f64) -> Option<GeoPoint2d> {
        self.get(kind).unproject(&Point2d::new(x, y))
    }

    /// Same as [`ProjectionService::forward`], but the projection is given by name.
    pub fn forward_named(
        &self,
        name: &str,
        lon: f64,
        lat: f64,
    ) -> Result<Option<Point2d>, MeteoTypesError> {
        Ok(self.forward(name.parse()?, lon, lat))
    }

    /// Same as [`ProjectionService::inverse`], but the projection is given by name.
    pub fn inverse_named(
        &self,
        name: &str,
        x: f64,
        y: f64,
    ) -> Result<Option<GeoPoint2d>, MeteoTypesError> {
        Ok(self.inverse(name.parse()?, x, y))
    }
}

impl Default for ProjectionService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("planar".parse::<ProjectionKind>(), Ok(ProjectionKind::Planar));
        assert_eq!("Mercator".parse::<ProjectionKind>(), Ok(ProjectionKind::Planar));
        assert_eq!(
            "spherical".parse::<ProjectionKind>(),
            Ok(ProjectionKind::Orthographic)
        );
        assert_matches!(
            "lambert".parse::<ProjectionKind>(),
            Err(MeteoTypesError::UnknownProjection(name)) if name == "lambert"
        );
    }

    #[test]
    fn toggled_alternates() {
        assert_eq!(ProjectionKind::Planar.toggled(), ProjectionKind::Orthographic);
        assert_eq!(ProjectionKind::Planar.toggled().toggled(), ProjectionKind::Planar);
    }

    #[test]
    fn serde_accepts_aliases() {
        let kind: ProjectionKind = serde_json::from_str(r#""spherical""#).expect("valid");
        assert_eq!(kind, ProjectionKind::Orthographic);
        assert_eq!(
            serde_json::to_string(&ProjectionKind::Planar).expect("serializable"),
            r#""planar""#
        );
    }

    #[test]
    fn forward_named_rejects_unknown_projection() {
        let service = ProjectionService::new();
        assert_matches!(
            service.forward_named("epsg:4326", 0.0, 0.0),
            Err(MeteoTypesError::UnknownProjection(_))
        );
        assert!(service.forward_named("planar", 0.0, 0.0).is_ok());
    }

    #[test]
    fn inverse_named_resolves_aliases() {
        let service = ProjectionService::new();
        let center = service
            .inverse_named("spherical", 0.0, 0.0)
            .expect("known projection")
            .expect("inside of the disc");
        assert_relative_eq!(center.lon(), ORTHOGRAPHIC_CENTER.lon(), epsilon = 1e-9);
        assert_relative_eq!(center.lat(), ORTHOGRAPHIC_CENTER.lat(), epsilon = 1e-9);

        let projected = service
            .forward_named("mercator", 10.0, 20.0)
            .expect("known projection")
            .expect("inside of the domain");
        let restored = service
            .inverse_named("planar", projected.x, projected.y)
            .expect("known projection")
            .expect("inside of the domain");
        assert_relative_eq!(restored.lon(), 10.0, epsilon = 1e-9, max_relative = 1e-6);
        assert_relative_eq!(restored.lat(), 20.0, epsilon = 1e-9, max_relative = 1e-6);

        assert_matches!(
            service.inverse_named("conic", 0.0, 0.0),
            Err(MeteoTypesError::UnknownProjection(_))
        );
    }

    #[test]
    fn forward_is_deterministic() {
        let service = ProjectionService::new();
        for kind in ProjectionKind::ALL {
            let a = service.forward(kind, 30.0, 50.0).expect("visible point");
            let b = service.forward(kind, 30.0, 50.0).expect("visible point");
            assert_eq!(a, b);
        }
    }

    #[test]
    fn planar_round_trip_over_populated_latitudes() {
        let service = ProjectionService::new();
        for lat in (-80..=80).step_by(10) {
            for lon in (-180..=180).step_by(30) {
                let (lon, lat) = (lon as f64, lat as f64);
                let projected = service
                    .forward(ProjectionKind::Planar, lon, lat)
                    .expect("inside of the domain");
                let restored = service
                    .inverse(ProjectionKind::Planar, projected.x, projected.y)
                    .expect("inside of the domain");

                assert_relative_eq!(restored.lon(), lon, epsilon = 1e-9, max_relative = 1e-6);
                assert_relative_eq!(restored.lat(), lat, epsilon = 1e-9, max_relative = 1e-6);
            }
        }
    }
}
