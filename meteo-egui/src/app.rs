use std::path::{Path, PathBuf};

use egui::{Context, Key, KeyboardShortcut, Modifiers};
use meteo::loader::LoadedGeometry;
use meteo::{Command, LoadOutcome, LoadTicket, MeteoError};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::EguiMapState;

const IMPORT_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::O);
const EXIT_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Q);

type LoadMessage = (LoadTicket, Result<LoadedGeometry, MeteoError>);

/// Action triggered from the menu, the toolbar or a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Import,
    SwitchProjection,
    Exit,
}

/// Desktop shell of the viewer: menu, toolbar, map and status bar.
pub struct MeteoApp {
    map: EguiMapState,
    runtime: Handle,
    loads_sender: UnboundedSender<LoadMessage>,
    loads: UnboundedReceiver<LoadMessage>,
    pending_loads: usize,
    error: Option<String>,
}

impl MeteoApp {
    /// Creates the app. Files are loaded on blocking tasks of the `runtime`.
    pub fn new(map: EguiMapState, runtime: Handle) -> Self {
        let (loads_sender, loads) = unbounded_channel();
        Self {
            map,
            runtime,
            loads_sender,
            loads,
            pending_loads: 0,
            error: None,
        }
    }

    /// Starts loading the shapefile in background. The map is updated when the load finishes,
    /// unless another file is imported or the projection is switched before that.
    pub fn import(&mut self, ctx: &Context, path: PathBuf) {
        let document = self.map.document_mut();
        let ticket = document.begin_load(path);
        let loader = document.loader().clone();
        let sender = self.loads_sender.clone();
        let ctx = ctx.clone();

        self.pending_loads += 1;
        self.runtime.spawn_blocking(move || {
            let result = loader.load(ticket.path());
            if sender.send((ticket, result)).is_err() {
                log::debug!("Load finished after the application was closed");
            }
            ctx.request_repaint();
        });
    }

    fn receive_loads(&mut self) {
        while let Ok((ticket, result)) = self.loads.try_recv() {
            self.pending_loads = self.pending_loads.saturating_sub(1);

            let path = ticket.path().to_path_buf();
            match self.map.document_mut().finish_load(ticket, result) {
                Ok(LoadOutcome::Applied(stats)) => {
                    log::debug!("Applied {}: {stats:?}", path.display());
                }
                Ok(LoadOutcome::Discarded) => {}
                Err(err) => self.show_error(format!("Cannot open {}: {err}", path.display())),
            }
        }
    }

    fn apply(&mut self, ctx: &Context, action: Action) {
        match action {
            Action::Import => {
                if let Some(path) = pick_shapefile(self.map.document().path()) {
                    self.import(ctx, path);
                }
            }
            Action::SwitchProjection => {
                if let Err(err) = self.map.document_mut().execute(Command::SwitchProjection) {
                    self.show_error(err.to_string());
                }
            }
            Action::Exit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }

    fn show_error(&mut self, message: String) {
        log::warn!("{message}");
        self.error = Some(message);
    }

    fn menu(&self, ui: &mut egui::Ui) -> Option<Action> {
        let mut action = None;
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                let import = egui::Button::new("Import...")
                    .shortcut_text(ui.ctx().format_shortcut(&IMPORT_SHORTCUT));
                if ui.add(import).clicked() {
                    action = Some(Action::Import);
                    ui.close_menu();
                }

                ui.separator();

                let exit = egui::Button::new("Exit")
                    .shortcut_text(ui.ctx().format_shortcut(&EXIT_SHORTCUT));
                if ui.add(exit).clicked() {
                    action = Some(Action::Exit);
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Switch projection").clicked() {
                    action = Some(Action::SwitchProjection);
                    ui.close_menu();
                }
            });
        });

        action
    }

    fn toolbar(&self, ui: &mut egui::Ui) -> Option<Action> {
        let mut action = None;
        ui.horizontal(|ui| {
            if ui.button("Open").on_hover_text("Import shapefile").clicked() {
                action = Some(Action::Import);
            }
            if ui
                .button("Switch")
                .on_hover_text("Switch between planar and orthographic projections")
                .clicked()
            {
                action = Some(Action::SwitchProjection);
            }
            if ui.button("Exit").clicked() {
                action = Some(Action::Exit);
            }
        });

        action
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let document = self.map.document();
            ui.label(format!("Projection: {}", document.projection()));

            if let Some(path) = document.path() {
                ui.separator();
                ui.label(file_name(path));
            }

            if let Some(position) = self.map.pointer_geo() {
                ui.separator();
                ui.label(format!(
                    "Lon: {:.4} Lat: {:.4}",
                    position.lon(),
                    position.lat()
                ));
            }

            if self.pending_loads > 0 {
                ui.separator();
                ui.spinner();
            }
        });
    }

    fn error_window(&mut self, ctx: &Context) {
        let Some(message) = &self.error else {
            return;
        };

        let mut open = true;
        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if !open || dismissed {
            self.error = None;
        }
    }
}

impl eframe::App for MeteoApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.receive_loads();

        let mut actions = vec![];
        if ctx.input_mut(|input| input.consume_shortcut(&IMPORT_SHORTCUT)) {
            actions.push(Action::Import);
        }
        if ctx.input_mut(|input| input.consume_shortcut(&EXIT_SHORTCUT)) {
            actions.push(Action::Exit);
        }

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            actions.extend(self.menu(ui));
        });
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            actions.extend(self.toolbar(ui));
        });
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            self.status_bar(ui);
        });
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.map.render(ui);
            });

        self.error_window(ctx);

        for action in actions {
            self.apply(ctx, action);
        }
    }
}

fn pick_shapefile(current: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .add_filter("Shapefile", &["shp"])
        .set_title("Import shapefile");
    if let Some(dir) = current.and_then(Path::parent) {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_file()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
