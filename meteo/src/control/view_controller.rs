use serde::{Deserialize, Serialize};

use super::{EventPropagation, Modifiers, MouseButton, UserEvent, UserEventHandler};
use crate::document::MapDocument;
use crate::view::ViewTransform;

/// Modifier key that must be held for the mouse wheel to zoom the map.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomModifier {
    /// Wheel always zooms.
    None,
    /// Zoom with Ctrl + wheel.
    #[default]
    Ctrl,
    /// Zoom with Shift + wheel.
    Shift,
    /// Zoom with Alt + wheel.
    Alt,
}

impl ZoomModifier {
    /// Returns true if the required key is held.
    pub fn is_held(&self, modifiers: &Modifiers) -> bool {
        match self {
            ZoomModifier::None => true,
            ZoomModifier::Ctrl => modifiers.ctrl,
            ZoomModifier::Shift => modifiers.shift,
            ZoomModifier::Alt => modifiers.alt,
        }
    }
}

/// Configuration of a [`ViewController`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewControllerConfiguration {
    min_scale: f64,
    max_scale: f64,
    zoom_step: f64,
    zoom_modifier: ZoomModifier,
}

impl Default for ViewControllerConfiguration {
    fn default() -> Self {
        Self {
            min_scale: 7e-5,
            max_scale: 1e-2,
            zoom_step: 1.05,
            zoom_modifier: ZoomModifier::Ctrl,
        }
    }
}

impl ViewControllerConfiguration {
    /// Minimum allowed scale (canvas units per metre). Zooming out further is ignored.
    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    /// Sets minimum allowed scale.
    pub fn with_min_scale(mut self, scale: f64) -> Self {
        self.min_scale = scale;
        self
    }

    /// Sets minimum allowed scale.
    pub fn set_min_scale(&mut self, scale: f64) {
        self.min_scale = scale;
    }

    /// Maximum allowed scale (canvas units per metre). Zooming in further is ignored.
    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// Sets maximum allowed scale.
    pub fn with_max_scale(mut self, scale: f64) -> Self {
        self.max_scale = scale;
        self
    }

    /// Sets maximum allowed scale.
    pub fn set_max_scale(&mut self, scale: f64) {
        self.max_scale = scale;
    }

    /// Scale multiplier applied on every scroll event.
    ///
    /// Scrolling up multiplies the scale by this value, scrolling down divides it.
    pub fn zoom_step(&self) -> f64 {
        self.zoom_step
    }

    /// Sets scale multiplier applied on every scroll event.
    pub fn with_zoom_step(mut self, step: f64) -> Self {
        self.zoom_step = step;
        self
    }

    /// Sets scale multiplier applied on every scroll event.
    pub fn set_zoom_step(&mut self, step: f64) {
        self.zoom_step = step;
    }

    /// Modifier key required for zooming.
    pub fn zoom_modifier(&self) -> ZoomModifier {
        self.zoom_modifier
    }

    /// Sets modifier key required for zooming.
    pub fn with_zoom_modifier(mut self, modifier: ZoomModifier) -> Self {
        self.zoom_modifier = modifier;
        self
    }

    /// Sets modifier key required for zooming.
    pub fn set_zoom_modifier(&mut self, modifier: ZoomModifier) {
        self.zoom_modifier = modifier;
    }

    fn allows_scale(&self, scale: f64) -> bool {
        scale >= self.min_scale && scale <= self.max_scale
    }
}

/// Event handler panning the map with left or middle button drag and zooming it with the
/// mouse wheel.
#[derive(Default, Copy, Clone, PartialEq, Debug)]
pub struct ViewController {
    config: ViewControllerConfiguration,
}

impl ViewController {
    /// Creates a new controller with the given configuration.
    pub fn new(config: ViewControllerConfiguration) -> Self {
        Self { config }
    }

    /// Returns the view zoomed by one step around `anchor`, or `None` if the result falls out of
    /// the allowed scale range or the delta is zero.
    pub fn zoom_target(
        &self,
        view: &ViewTransform,
        delta: f64,
        anchor: meteo_types::Point2d,
    ) -> Option<ViewTransform> {
        let factor = if delta > 0.0 {
            self.config.zoom_step
        } else if delta < 0.0 {
            1.0 / self.config.zoom_step
        } else {
            return None;
        };

        let target = view.zoom(factor, anchor);
        self.config.allows_scale(target.scale()).then_some(target)
    }
}

impl UserEventHandler for ViewController {
    fn handle(&self, event: &UserEvent, document: &mut MapDocument) -> EventPropagation {
        match event {
            UserEvent::DragStarted(MouseButton::Left | MouseButton::Middle, _) => {
                EventPropagation::Consume
            }
            UserEvent::Drag(MouseButton::Left | MouseButton::Middle, delta, _) => {
                let target = document.view().translate(*delta);
                document.set_view(target);
                EventPropagation::Stop
            }
            UserEvent::Scroll(delta, mouse_event) => {
                if !self.config.zoom_modifier.is_held(&mouse_event.modifiers) {
                    return EventPropagation::Propagate;
                }

                match self.zoom_target(
                    document.view(),
                    *delta,
                    mouse_event.canvas_pointer_position,
                ) {
                    Some(target) => document.set_view(target),
                    None => log::trace!("Ignoring zoom by {delta}"),
                }

                EventPropagation::Stop
            }
            _ => EventPropagation::Propagate,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use meteo_types::{Point2d, Vector2d};

    use super::*;
    use crate::config::ViewerConfig;
    use crate::control::{EventProcessor, MouseButtonsState, MouseEvent, RawUserEvent};

    fn scroll(delta: f64, ctrl: bool) -> UserEvent {
        UserEvent::Scroll(
            delta,
            MouseEvent {
                canvas_pointer_position: Point2d::new(0.0, 0.0),
                buttons: MouseButtonsState::default(),
                modifiers: Modifiers {
                    ctrl,
                    ..Default::default()
                },
            },
        )
    }

    fn document_with_scale(scale: f64) -> MapDocument {
        let mut document = MapDocument::new(ViewerConfig::default());
        document.set_view(ViewTransform::new(scale, Vector2d::zeros()));
        document
    }

    #[test]
    fn scroll_zooms_by_step() {
        let controller = ViewController::default();
        let mut document = document_with_scale(1e-3);

        assert_eq!(
            controller.handle(&scroll(1.0, true), &mut document),
            EventPropagation::Stop
        );
        assert_relative_eq!(document.view().scale(), 1.05e-3);

        controller.handle(&scroll(-3.0, true), &mut document);
        assert_relative_eq!(document.view().scale(), 1e-3);
    }

    #[test]
    fn scroll_without_modifier_is_ignored() {
        let controller = ViewController::default();
        let mut document = document_with_scale(1e-3);

        assert_eq!(
            controller.handle(&scroll(1.0, false), &mut document),
            EventPropagation::Propagate
        );
        assert_relative_eq!(document.view().scale(), 1e-3);

        let controller = ViewController::new(
            ViewControllerConfiguration::default().with_zoom_modifier(ZoomModifier::None),
        );
        controller.handle(&scroll(1.0, false), &mut document);
        assert_relative_eq!(document.view().scale(), 1.05e-3);
    }

    #[test]
    fn zero_scroll_is_ignored() {
        let controller = ViewController::default();
        let mut document = document_with_scale(1e-3);

        controller.handle(&scroll(0.0, true), &mut document);
        assert_relative_eq!(document.view().scale(), 1e-3);
    }

    #[test]
    fn zoom_out_of_range_is_rejected() {
        let controller = ViewController::default();

        let mut document = document_with_scale(0.0099);
        controller.handle(&scroll(1.0, true), &mut document);
        assert_relative_eq!(document.view().scale(), 0.0099);
        controller.handle(&scroll(-1.0, true), &mut document);
        assert_relative_eq!(document.view().scale(), 0.0099 / 1.05);

        let mut document = document_with_scale(7.2e-5);
        controller.handle(&scroll(-1.0, true), &mut document);
        assert_relative_eq!(document.view().scale(), 7.2e-5);
    }

    #[test]
    fn repeated_zoom_stays_in_range() {
        let config = ViewControllerConfiguration::default();
        let mut processor = EventProcessor::default();
        processor.add_handler(ViewController::new(config));

        let mut document = document_with_scale(1e-3);
        processor.handle(
            RawUserEvent::ModifiersChanged(Modifiers {
                ctrl: true,
                ..Default::default()
            }),
            &mut document,
        );

        for delta in [1.0, -1.0] {
            for _ in 0..200 {
                processor.handle(RawUserEvent::Scroll(delta), &mut document);
                let scale = document.view().scale();
                assert!(
                    (config.min_scale()..=config.max_scale()).contains(&scale),
                    "scale {scale} after scroll by {delta}"
                );
            }
        }

        assert!(document.view().scale() < config.min_scale() * config.zoom_step());
    }

    #[test]
    fn zoom_keeps_point_under_pointer() {
        let controller = ViewController::default();
        let view = ViewTransform::new(1e-3, Vector2d::new(10.0, -20.0));
        let anchor = Point2d::new(150.0, 80.0);

        let target = controller
            .zoom_target(&view, 1.0, anchor)
            .expect("scale in range");

        let plane = view.canvas_to_plane(anchor);
        let moved = target.plane_to_canvas(plane);
        assert_relative_eq!(moved.x, anchor.x, epsilon = 1e-9);
        assert_relative_eq!(moved.y, anchor.y, epsilon = 1e-9);
    }

    #[test]
    fn drag_pans_the_view() {
        let mut processor = EventProcessor::default();
        processor.add_handler(ViewController::default());

        let mut document = document_with_scale(1e-3);
        processor.handle(RawUserEvent::PointerMoved(Point2d::new(0.0, 0.0)), &mut document);
        processor.handle(RawUserEvent::ButtonPressed(MouseButton::Left), &mut document);
        processor.handle(RawUserEvent::PointerMoved(Point2d::new(10.0, 5.0)), &mut document);
        processor.handle(RawUserEvent::PointerMoved(Point2d::new(25.0, -5.0)), &mut document);
        processor.handle(RawUserEvent::ButtonReleased(MouseButton::Left), &mut document);

        assert_eq!(document.view().offset(), Vector2d::new(25.0, -5.0));
        assert_relative_eq!(document.view().scale(), 1e-3);
    }

    #[test]
    fn right_button_does_not_pan() {
        let mut processor = EventProcessor::default();
        processor.add_handler(ViewController::default());

        let mut document = document_with_scale(1e-3);
        processor.handle(RawUserEvent::ButtonPressed(MouseButton::Right), &mut document);
        processor.handle(RawUserEvent::PointerMoved(Point2d::new(40.0, 40.0)), &mut document);

        assert_eq!(document.view().offset(), Vector2d::zeros());
    }
}
