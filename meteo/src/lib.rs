//! Core of the MeteoInfo map viewer: loading polygon shapefiles, projecting them onto a canvas
//! and keeping the pannable and zoomable view of the map.
//!
//! The crate does not draw anything on screen. A UI backend (see the `meteo-egui` crate) owns a
//! [`MapDocument`], feeds user input to an [`EventProcessor`](control::EventProcessor) and paints
//! the [`RenderedLayer`](render::RenderedLayer) installed on the document surface.
//!
//! ```no_run
//! use meteo::config::ViewerConfig;
//! use meteo::{Command, MapDocument};
//!
//! let mut document = MapDocument::new(ViewerConfig::default());
//! document.import("data/ne_50m_admin_0_countries.shp")?;
//! document.execute(Command::SwitchProjection)?;
//!
//! let layer = document.surface().layer().expect("layer is built after import");
//! println!("{} polygons in {}", layer.polygons().len(), layer.projection());
//! # Ok::<(), meteo::MeteoError>(())
//! ```

pub mod color;
pub mod config;
pub mod control;
pub mod document;
pub mod error;
pub mod loader;
pub mod mapper;
pub mod messenger;
pub mod render;
pub mod view;

pub use color::Color;
pub use document::{Command, LoadOutcome, LoadTicket, MapDocument};
pub use error::MeteoError;
pub use mapper::CoordinateMapper;
pub use messenger::Messenger;
pub use view::ViewTransform;

// Reexport meteo_types
pub use meteo_types;
