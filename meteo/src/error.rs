//! Error types used by the crate.

use std::path::PathBuf;

use meteo_types::error::MeteoTypesError;
use thiserror::Error;

/// MeteoInfo error type.
#[derive(Debug, Error)]
pub enum MeteoError {
    /// The shapefile does not exist.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    /// The shapefile exists, but its header or one of its records cannot be decoded.
    #[error("failed to parse shapefile: {0}")]
    Parse(String),
    /// Invalid projection.
    #[error(transparent)]
    Projection(#[from] MeteoTypesError),
    /// Error reading data from the FS.
    #[error("failed to read file")]
    Io(#[from] std::io::Error),
    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<shapefile::Error> for MeteoError {
    fn from(value: shapefile::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

impl From<serde_json::Error> for MeteoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}
