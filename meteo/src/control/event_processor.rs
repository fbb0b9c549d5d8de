use meteo_types::cartesian::taxicab_distance;
use meteo_types::Point2d;

use super::{
    EventPropagation, Modifiers, MouseButton, MouseButtonsState, MouseEvent, RawUserEvent, UserEvent,
    UserEventHandler,
};
use crate::document::MapDocument;

const DRAG_THRESHOLD: f64 = 3.0;

/// Converts [`RawUserEvent`]s into [`UserEvent`]s and dispatches them to the handlers.
#[derive(Default)]
pub struct EventProcessor {
    handlers: Vec<Box<dyn UserEventHandler>>,
    pointer_position: Point2d,
    pointer_pressed_position: Point2d,
    buttons_state: MouseButtonsState,
    modifiers: Modifiers,
    drag_target: Option<usize>,
    drag_button: Option<MouseButton>,
}

impl EventProcessor {
    /// Adds a handler to the end of the handler list.
    pub fn add_handler(&mut self, handler: impl UserEventHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Adds a boxed handler to the end of the handler list.
    pub fn add_handler_boxed(&mut self, handler: Box<dyn UserEventHandler>) {
        self.handlers.push(handler);
    }

    /// Last known pointer position in canvas coordinates.
    pub fn pointer_position(&self) -> Point2d {
        self.pointer_position
    }

    /// Currently held modifier keys.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Returns true if a handler owns an ongoing drag.
    pub fn is_dragging(&self) -> bool {
        self.drag_target.is_some()
    }

    /// Processes the event, calling the handlers in order until one of them stops propagation.
    pub fn handle(&mut self, event: RawUserEvent, document: &mut MapDocument) {
        for user_event in self.process(event) {
            let mut drag_start = None;

            for (index, handler) in self.handlers.iter().enumerate() {
                if matches!(user_event, UserEvent::Drag(..) | UserEvent::DragEnded(..))
                    && self.drag_target != Some(index)
                {
                    continue;
                }

                match handler.handle(&user_event, document) {
                    EventPropagation::Propagate => {}
                    EventPropagation::Stop => break,
                    EventPropagation::Consume => {
                        if let UserEvent::DragStarted(button, _) = user_event {
                            drag_start = Some((index, button));

                            let delta = self.pointer_position - self.pointer_pressed_position;
                            handler.handle(
                                &UserEvent::Drag(button, delta, self.mouse_event()),
                                document,
                            );
                        }

                        break;
                    }
                }
            }

            if let Some((index, button)) = drag_start {
                self.drag_target = Some(index);
                self.drag_button = Some(button);
            }

            if matches!(user_event, UserEvent::DragEnded(..)) {
                self.drag_target = None;
                self.drag_button = None;
            }
        }
    }

    fn process(&mut self, event: RawUserEvent) -> Vec<UserEvent> {
        match event {
            RawUserEvent::ButtonPressed(button) => {
                self.buttons_state.set_pressed(button);
                self.pointer_pressed_position = self.pointer_position;

                vec![UserEvent::ButtonPressed(button, self.mouse_event())]
            }
            RawUserEvent::ButtonReleased(button) => {
                self.buttons_state.set_released(button);
                let mut events = vec![UserEvent::ButtonReleased(button, self.mouse_event())];

                if self.drag_target.is_some() && self.drag_button == Some(button) {
                    events.push(UserEvent::DragEnded(button, self.mouse_event()));
                }

                events
            }
            RawUserEvent::PointerMoved(position) => {
                let prev_position = self.pointer_position;
                self.pointer_position = position;

                let mut events = vec![UserEvent::PointerMoved(self.mouse_event())];
                if let Some(button) = self.buttons_state.single_pressed() {
                    if self.drag_target.is_none()
                        && taxicab_distance(&position, &self.pointer_pressed_position)
                            > DRAG_THRESHOLD
                    {
                        events.push(UserEvent::DragStarted(
                            button,
                            self.mouse_event_at(self.pointer_pressed_position),
                        ));
                    }

                    if self.drag_target.is_some() {
                        events.push(UserEvent::Drag(
                            button,
                            position - prev_position,
                            self.mouse_event(),
                        ));
                    }
                }

                events
            }
            RawUserEvent::Scroll(delta) => vec![UserEvent::Scroll(delta, self.mouse_event())],
            RawUserEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers;
                vec![]
            }
        }
    }

    fn mouse_event(&self) -> MouseEvent {
        self.mouse_event_at(self.pointer_position)
    }

    fn mouse_event_at(&self, canvas_pointer_position: Point2d) -> MouseEvent {
        MouseEvent {
            canvas_pointer_position,
            buttons: self.buttons_state,
            modifiers: self.modifiers,
        }
    }
}
