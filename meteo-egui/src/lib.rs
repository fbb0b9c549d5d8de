//! Egui frontend of the MeteoInfo map viewer.
//!
//! [`EguiMapState`] paints the layer of a [`MapDocument`](meteo::MapDocument) and forwards
//! mouse input to its event handlers. With the `init` feature (enabled by default) the crate
//! also provides the desktop application: a window with a menu, a toolbar and a status bar.

mod egui_map;
mod mesh;

pub use egui_map::EguiMapState;
pub use mesh::LayerMesh;

#[cfg(feature = "init")]
mod app;
#[cfg(feature = "init")]
mod init;
#[cfg(feature = "init")]
pub use app::MeteoApp;
#[cfg(feature = "init")]
pub use init::{load_config, InitBuilder};
