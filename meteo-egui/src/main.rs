//! MeteoInfo desktop viewer.
//!
//! Usage: `meteo-info [SHAPEFILE]`. The configuration file can be given with the
//! `METEO_INFO_CONFIG` environment variable.

use std::path::PathBuf;

use meteo::config::ViewerConfig;
use meteo_egui::{load_config, InitBuilder};

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let shapefile = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match load_config(shapefile.clone()) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Failed to read configuration, using defaults: {err}");
            let config = ViewerConfig::default();
            match shapefile {
                Some(path) => config.with_shapefile(path),
                None => config,
            }
        }
    };

    InitBuilder::new(config).init()
}
