/// Reference ellipsoid of a celestial body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    semimajor: f64,
    inv_flattening: f64,
}

impl Datum {
    /// World Geodetic System 1984.
    pub const WGS84: Self = Datum {
        semimajor: 6_378_137.0,
        inv_flattening: 298.257223563,
    };

    /// Equatorial radius in metres.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Inverse flattening (`1/f`).
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }

    /// First eccentricity of the ellipsoid.
    pub fn eccentricity(&self) -> f64 {
        let f = 1.0 / self.inv_flattening;
        (f * (2.0 - f)).sqrt()
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wgs84_eccentricity() {
        assert_abs_diff_eq!(Datum::WGS84.eccentricity(), 0.0818191908426, epsilon = 1e-12);
    }
}
