//! Geometries in geographic coordinates (longitude and latitude) (see [`GeoPoint2d`]) and their
//! conversion into a projected plane (see [`Projection`]).

mod datum;
mod point;
pub mod projection;

pub use datum::Datum;
pub use point::GeoPoint2d;
pub use projection::{
    Orthographic, Projection, ProjectionKind, ProjectionService, WorldMercator,
    ORTHOGRAPHIC_CENTER,
};
