use crate::cartesian::Point2d;
use crate::geo::{GeoPoint2d, Projection};

/// Orthographic projection of a sphere, as seen from an infinite distance above `center`.
///
/// Only the hemisphere facing the viewer can be projected: [`Projection::project`] returns `None`
/// for points on the far side, and [`Projection::unproject`] returns `None` for planar points
/// outside of the disc of radius `radius`.
#[derive(Debug, Copy, Clone)]
pub struct Orthographic {
    center: GeoPoint2d,
    radius: f64,
    sin_lat0: f64,
    cos_lat0: f64,
}

impl Orthographic {
    /// Creates a new projection centered at `center` for a sphere with the given radius in metres.
    pub fn new(center: GeoPoint2d, radius: f64) -> Self {
        let lat0 = center.lat_rad();
        Self {
            center,
            radius,
            sin_lat0: lat0.sin(),
            cos_lat0: lat0.cos(),
        }
    }

    /// Point in the center of the visible hemisphere.
    pub fn center(&self) -> GeoPoint2d {
        self.center
    }

    /// Radius of the sphere.
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Projection for Orthographic {
    type InPoint = GeoPoint2d;
    type OutPoint = Point2d;

    fn project(&self, input: &GeoPoint2d) -> Option<Point2d> {
        let lat = input.lat_rad();
        let dlon = input.lon_rad() - self.center.lon_rad();
        let (sin_lat, cos_lat) = lat.sin_cos();

        let cos_c = self.sin_lat0 * sin_lat + self.cos_lat0 * cos_lat * dlon.cos();
        if cos_c < 0.0 {
            return None;
        }

        let x = self.radius * cos_lat * dlon.sin();
        let y = self.radius * (self.cos_lat0 * sin_lat - self.sin_lat0 * cos_lat * dlon.cos());

        Some(Point2d::new(x, y))
    }

    fn unproject(&self, input: &Point2d) -> Option<GeoPoint2d> {
        let rho = input.x.hypot(input.y);
        if !rho.is_finite() || rho > self.radius {
            return None;
        }

        if rho < f64::EPSILON * self.radius {
            return Some(self.center);
        }

        let c = (rho / self.radius).asin();
        let (sin_c, cos_c) = c.sin_cos();

        let lat = (cos_c * self.sin_lat0 + input.y * sin_c * self.cos_lat0 / rho).asin();
        let dlon = (input.x * sin_c)
            .atan2(rho * cos_c * self.cos_lat0 - input.y * sin_c * self.sin_lat0);

        Some(GeoPoint2d::lonlat(
            normalize_lon(self.center.lon() + dlon.to_degrees()),
            lat.to_degrees(),
        ))
    }
}

fn normalize_lon(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn projection() -> Orthographic {
        Orthographic::new(GeoPoint2d::lonlat(28.0, 47.0), 6_378_137.0)
    }

    #[test]
    fn center_projects_to_origin() {
        let projected = projection()
            .project(&GeoPoint2d::lonlat(28.0, 47.0))
            .expect("visible point");
        assert_abs_diff_eq!(projected, Point2d::new(0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn far_side_is_not_projected() {
        // Antipode of the center.
        assert!(projection()
            .project(&GeoPoint2d::lonlat(-152.0, -47.0))
            .is_none());
    }

    #[test]
    fn projected_points_stay_inside_the_disc() {
        let projection = projection();
        for lon in (-180..180).step_by(15) {
            for lat in (-85..=85).step_by(5) {
                if let Some(p) = projection.project(&GeoPoint2d::lonlat(lon as f64, lat as f64)) {
                    assert!(p.x.hypot(p.y) <= projection.radius() * (1.0 + 1e-12));
                }
            }
        }
    }

    #[test]
    fn round_trip_on_visible_hemisphere() {
        let projection = projection();
        for point in [
            GeoPoint2d::lonlat(28.0, 47.0),
            GeoPoint2d::lonlat(0.0, 51.5),
            GeoPoint2d::lonlat(37.6, 55.7),
            GeoPoint2d::lonlat(31.2, 30.0),
            GeoPoint2d::lonlat(100.0, 60.0),
        ] {
            let projected = projection.project(&point).expect("visible point");
            let restored = projection.unproject(&projected).expect("inside of the disc");
            assert_abs_diff_eq!(restored, point, epsilon = 1e-7);
        }
    }

    #[test]
    fn outside_of_the_disc_has_no_inverse() {
        let projection = projection();
        assert!(projection
            .unproject(&Point2d::new(projection.radius() * 1.01, 0.0))
            .is_none());
        assert!(projection
            .unproject(&Point2d::new(f64::INFINITY, 0.0))
            .is_none());
    }
}
