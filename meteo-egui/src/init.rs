use std::path::PathBuf;

use eframe::AppCreator;
use meteo::config::ViewerConfig;
use meteo::control::UserEventHandler;
use meteo::MapDocument;
use tokio::runtime::Runtime;

use crate::{EguiMapState, MeteoApp};

const APP_NAME: &str = "MeteoInfo";

/// Starts the viewer window.
pub struct InitBuilder {
    config: ViewerConfig,
    handlers: Vec<Box<dyn UserEventHandler>>,
    native_options: Option<eframe::NativeOptions>,
}

impl InitBuilder {
    /// Creates a builder for the configuration.
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            handlers: Vec::new(),
            native_options: None,
        }
    }

    /// Sets the eframe options of the window.
    pub fn with_native_options(mut self, options: eframe::NativeOptions) -> Self {
        self.native_options = Some(options);
        self
    }

    /// Adds event handlers called before the default pan and zoom handler.
    pub fn with_handlers(
        mut self,
        handlers: impl IntoIterator<Item = Box<dyn UserEventHandler>>,
    ) -> Self {
        self.handlers.extend(handlers);
        self
    }

    /// Opens the window and runs the event loop until the window is closed.
    pub fn init(self) -> eframe::Result {
        let runtime = Runtime::new().map_err(|err| eframe::Error::AppCreation(Box::new(err)))?;
        let handle = runtime.handle().clone();
        std::thread::spawn(move || runtime.block_on(std::future::pending::<()>()));

        let native_options = self.native_options.unwrap_or_else(|| eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(APP_NAME)
                .with_inner_size([1024.0, 768.0]),
            ..Default::default()
        });

        let shapefile = self.config.shapefile.clone();
        let controller = self.config.controller;
        let document = MapDocument::new(self.config);

        let app_creator: AppCreator<'static> = Box::new(move |cc: &eframe::CreationContext<'_>| {
            let state =
                EguiMapState::new(document, cc.egui_ctx.clone(), self.handlers, controller);
            let mut app = MeteoApp::new(state, handle);
            app.import(&cc.egui_ctx, shapefile);

            let app: Box<dyn eframe::App> = Box::new(app);
            Ok(app)
        });

        eframe::run_native(APP_NAME, native_options, app_creator)
    }
}

/// Reads the viewer configuration from the file named by the `METEO_INFO_CONFIG` environment
/// variable, falling back to the defaults. `shapefile` overrides the configured startup file.
pub fn load_config(shapefile: Option<PathBuf>) -> Result<ViewerConfig, meteo::MeteoError> {
    let config = match std::env::var_os("METEO_INFO_CONFIG") {
        Some(path) => {
            log::info!("Reading configuration from {}", PathBuf::from(&path).display());
            ViewerConfig::from_json_file(path)?
        }
        None => ViewerConfig::default(),
    };

    Ok(match shapefile {
        Some(path) => config.with_shapefile(path),
        None => config,
    })
}
