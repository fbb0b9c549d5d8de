//! Geometry primitives for the MeteoInfo viewer.
//!
//! The crate contains:
//! * [`geo`] - points in geographic coordinates, the reference [`Datum`](geo::Datum) and the
//!   [`Projection`](geo::Projection)s that convert them into a projected plane;
//! * [`cartesian`] - points and vectors in the projected plane and on the canvas;
//! * [`error`] - the crate error type.

pub mod cartesian;
pub mod error;
pub mod geo;

pub use cartesian::{Point2d, Vector2d};
pub use geo::{GeoPoint2d, ProjectionKind, ProjectionService};
