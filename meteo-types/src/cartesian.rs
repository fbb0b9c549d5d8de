//! Points and vectors in cartesian coordinates.
//!
//! Both the projected plane (metres, y axis pointing up) and the canvas (canvas units, y axis
//! pointing down) use these types.

pub use nalgebra::{Point2, Vector2};

/// 2d point with `f64` coordinates.
pub type Point2d = Point2<f64>;

/// 2d vector with `f64` coordinates.
pub type Vector2d = Vector2<f64>;

/// Sum of absolute coordinate differences between two points.
pub fn taxicab_distance(a: &Point2d, b: &Point2d) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxicab_distance_is_symmetric() {
        let a = Point2d::new(1.0, -2.0);
        let b = Point2d::new(-3.0, 4.0);

        assert_eq!(taxicab_distance(&a, &b), 10.0);
        assert_eq!(taxicab_distance(&b, &a), 10.0);
        assert_eq!(taxicab_distance(&a, &a), 0.0);
    }
}
