use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use egui::{Event, Pos2, Rect, Sense, Shape, Stroke, Ui};
use meteo::control::{
    EventProcessor, Modifiers, MouseButton, RawUserEvent, UserEventHandler, ViewController,
    ViewControllerConfiguration,
};
use meteo::meteo_types::geo::GeoPoint2d;
use meteo::meteo_types::Point2d;
use meteo::render::RenderedLayer;
use meteo::{MapDocument, Messenger};

use crate::mesh::{color32, LayerMesh};

/// Map document shown in an egui widget, together with the input state of the widget.
pub struct EguiMapState {
    document: MapDocument,
    event_processor: EventProcessor,
    requires_redraw: Arc<AtomicBool>,
    mesh: Option<LayerMesh>,
    pointer: Option<Point2d>,
}

impl EguiMapState {
    /// Creates the state. `handlers` are called before the [`ViewController`] that pans and
    /// zooms the map.
    pub fn new(
        mut document: MapDocument,
        ctx: egui::Context,
        handlers: impl IntoIterator<Item = Box<dyn UserEventHandler>>,
        controller: ViewControllerConfiguration,
    ) -> Self {
        let requires_redraw = Arc::new(AtomicBool::new(true));
        document.set_messenger(Some(MapStateMessenger {
            context: ctx,
            requires_redraw: requires_redraw.clone(),
        }));

        let mut event_processor = EventProcessor::default();
        for handler in handlers {
            event_processor.add_handler_boxed(handler);
        }
        event_processor.add_handler(ViewController::new(controller));

        Self {
            document,
            event_processor,
            requires_redraw,
            mesh: None,
            pointer: None,
        }
    }

    /// The map document.
    pub fn document(&self) -> &MapDocument {
        &self.document
    }

    /// The map document.
    pub fn document_mut(&mut self) -> &mut MapDocument {
        &mut self.document
    }

    /// Geographic coordinates under the mouse pointer, if it is over the map.
    pub fn pointer_geo(&self) -> Option<GeoPoint2d> {
        self.pointer
            .and_then(|pointer| self.document.pointer_geo(pointer))
    }

    /// Shows the map in all the available space of the `ui`.
    pub fn render(&mut self, ui: &mut Ui) {
        let available_size = ui.available_size().floor();
        let (rect, response) = ui.allocate_exact_size(available_size, Sense::click_and_drag());
        let center = rect.center();

        if self.event_processor.is_dragging() || response.contains_pointer() {
            let (events, modifiers) =
                ui.input(|input_state| (input_state.events.clone(), input_state.modifiers));
            self.process_events(&events, modifiers, center);
        }

        self.pointer = response
            .hover_pos()
            .map(|pos| Point2d::new((pos.x - center.x) as f64, (pos.y - center.y) as f64));

        self.requires_redraw.store(false, Ordering::Relaxed);
        self.paint(ui, rect);
    }

    fn paint(&mut self, ui: &Ui, rect: Rect) {
        let painter = ui.painter_at(rect);
        let surface = self.document.surface();
        let Some(layer) = surface.layer() else {
            return;
        };

        let stale = match &self.mesh {
            Some(mesh) => mesh.generation() != surface.generation(),
            None => true,
        };
        if stale {
            self.mesh = Some(LayerMesh::new(layer, surface.generation()));
        }

        let view = self.document.view();
        let origin = rect.center();

        if let Some(disc) = layer.background() {
            painter.circle_filled(
                to_screen(layer.to_view(disc.center, view), origin),
                layer.length_to_view(disc.radius, view) as f32,
                color32(disc.fill.color),
            );
        }

        if let Some(mesh) = &self.mesh {
            painter.add(Shape::mesh(mesh.to_mesh(view, origin)));
        }

        Self::paint_outlines(&painter, layer, view, origin);
    }

    fn paint_outlines(
        painter: &egui::Painter,
        layer: &RenderedLayer,
        view: &meteo::ViewTransform,
        origin: Pos2,
    ) {
        for polygon in layer.polygons() {
            let Some(outline) = polygon.outline else {
                continue;
            };

            let points = polygon
                .points
                .iter()
                .map(|point| to_screen(layer.to_view(*point, view), origin))
                .collect();
            painter.add(Shape::closed_line(
                points,
                Stroke::new(outline.width as f32, color32(outline.color)),
            ));
        }
    }

    fn process_events(&mut self, events: &[Event], modifiers: egui::Modifiers, origin: Pos2) {
        let modifiers = convert_modifiers(modifiers);
        if modifiers != self.event_processor.modifiers() {
            self.event_processor
                .handle(RawUserEvent::ModifiersChanged(modifiers), &mut self.document);
        }

        for event in events {
            if let Some(raw_event) = convert_event(event, origin) {
                self.event_processor.handle(raw_event, &mut self.document);
            }
        }
    }
}

fn to_screen(point: Point2d, origin: Pos2) -> Pos2 {
    Pos2::new(origin.x + point.x as f32, origin.y + point.y as f32)
}

fn convert_modifiers(modifiers: egui::Modifiers) -> Modifiers {
    Modifiers {
        ctrl: modifiers.command || modifiers.ctrl,
        shift: modifiers.shift,
        alt: modifiers.alt,
    }
}

/// Converts an egui event into a raw map event. Pointer positions are given relative to `origin`,
/// the center of the map widget.
fn convert_event(event: &Event, origin: Pos2) -> Option<RawUserEvent> {
    match event {
        Event::PointerButton {
            button, pressed, ..
        } => {
            let button = match button {
                egui::PointerButton::Primary => MouseButton::Left,
                egui::PointerButton::Secondary => MouseButton::Right,
                egui::PointerButton::Middle => MouseButton::Middle,
                _ => MouseButton::Other,
            };

            Some(match pressed {
                true => RawUserEvent::ButtonPressed(button),
                false => RawUserEvent::ButtonReleased(button),
            })
        }
        Event::PointerMoved(position) => Some(RawUserEvent::PointerMoved(Point2d::new(
            (position.x - origin.x) as f64,
            (position.y - origin.y) as f64,
        ))),
        Event::MouseWheel { delta, .. } => {
            let scroll = delta.y as f64;
            if scroll.abs() < 0.0001 {
                return None;
            }

            Some(RawUserEvent::Scroll(scroll))
        }
        _ => None,
    }
}

#[derive(Debug, Clone)]
struct MapStateMessenger {
    requires_redraw: Arc<AtomicBool>,
    context: egui::Context,
}

impl Messenger for MapStateMessenger {
    fn request_redraw(&self) {
        if !self.requires_redraw.swap(true, Ordering::Relaxed) {
            self.context.request_repaint();
        }
    }
}
