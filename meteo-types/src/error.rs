//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeteoTypesError {
    /// The projection name is not one of the supported projections.
    #[error("unknown projection: {0}")]
    UnknownProjection(String),
}
