use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::cartesian::Point2d;
use crate::geo::{Datum, GeoPoint2d, Projection};

const MAX_ITERATIONS: usize = 15;
const TOLERANCE: f64 = 1e-12;

/// Mercator projection on an ellipsoid (EPSG:3395 for the WGS84 datum).
///
/// Unlike Web Mercator, the northing accounts for the eccentricity of the ellipsoid, so the
/// inverse has no closed form and is computed iteratively.
#[derive(Debug, Copy, Clone)]
pub struct WorldMercator {
    datum: Datum,
    eccentricity: f64,
}

impl WorldMercator {
    /// Creates a new projection on the given datum.
    pub fn new(datum: Datum) -> Self {
        Self {
            datum,
            eccentricity: datum.eccentricity(),
        }
    }

    fn conformal_factor(&self, lat_rad: f64) -> f64 {
        let e_sin = self.eccentricity * lat_rad.sin();
        ((1.0 - e_sin) / (1.0 + e_sin)).powf(self.eccentricity / 2.0)
    }
}

impl Default for WorldMercator {
    fn default() -> Self {
        Self::new(Datum::WGS84)
    }
}

impl Projection for WorldMercator {
    type InPoint = GeoPoint2d;
    type OutPoint = Point2d;

    fn project(&self, input: &GeoPoint2d) -> Option<Point2d> {
        if input.lat().abs() >= 90.0 {
            return None;
        }

        let a = self.datum.semimajor();
        let lat = input.lat_rad();

        let x = a * input.lon_rad();
        let y = a * ((FRAC_PI_4 + lat / 2.0).tan() * self.conformal_factor(lat)).ln();

        if x.is_finite() && y.is_finite() {
            Some(Point2d::new(x, y))
        } else {
            None
        }
    }

    fn unproject(&self, input: &Point2d) -> Option<GeoPoint2d> {
        let a = self.datum.semimajor();
        let t = (-input.y / a).exp();

        let mut lat = FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..MAX_ITERATIONS {
            let next = FRAC_PI_2 - 2.0 * (t * self.conformal_factor(lat)).atan();
            let converged = (next - lat).abs() < TOLERANCE;
            lat = next;
            if converged {
                break;
            }
        }

        let lon = (input.x / a).to_degrees();
        let lat = lat.to_degrees();

        if lon.is_finite() && lat.is_finite() {
            Some(GeoPoint2d::lonlat(lon, lat))
        } else {
            None
        }
    }
}
