//! Interactivity of the map view.
//!
//! User interaction handling is done in several steps:
//! 1. A UI backend converts its input events into [`RawUserEvent`]s.
//! 2. [`EventProcessor`] keeps track of the input state (pointer position, pressed buttons and
//!    modifier keys) and turns raw events into [`UserEvent`]s.
//! 3. The processor gives every user event to its [`UserEventHandler`]s in order, until one of
//!    them stops the propagation. [`ViewController`] is the handler that pans and zooms the map.

use meteo_types::{Point2d, Vector2d};

use crate::document::MapDocument;

mod event_processor;
mod view_controller;

pub use event_processor::EventProcessor;
pub use view_controller::{ViewController, ViewControllerConfiguration, ZoomModifier};

/// User input handler.
pub trait UserEventHandler {
    /// Handle the event.
    fn handle(&self, event: &UserEvent, document: &mut MapDocument) -> EventPropagation;
}

impl<T> UserEventHandler for T
where
    T: for<'a> Fn(&'a UserEvent, &'a mut MapDocument) -> EventPropagation,
{
    fn handle(&self, event: &UserEvent, document: &mut MapDocument) -> EventPropagation {
        self(event, document)
    }
}

/// Input event as reported by a UI backend, without any state information.
#[derive(Debug, Clone, PartialEq)]
pub enum RawUserEvent {
    /// A mouse button was pressed.
    ButtonPressed(MouseButton),
    /// A mouse button was released.
    ButtonReleased(MouseButton),
    /// Mouse pointer was moved to the given canvas position.
    PointerMoved(Point2d),
    /// Mouse wheel or touchpad scroll. Positive values scroll up.
    Scroll(f64),
    /// State of the modifier keys changed.
    ModifiersChanged(Modifiers),
}

/// User interaction event, given to [`UserEventHandler`]s.
#[derive(Debug, Clone, PartialEq)]
pub enum UserEvent {
    /// A mouse button was pressed.
    ButtonPressed(MouseButton, MouseEvent),
    /// A mouse button was released.
    ButtonReleased(MouseButton, MouseEvent),
    /// Mouse pointer moved.
    PointerMoved(MouseEvent),
    /// User pressed a mouse button and moves the pointer around without releasing it.
    ///
    /// The handler that returns [`EventPropagation::Consume`] for this event receives all the
    /// following [`UserEvent::Drag`] events until the button is released.
    DragStarted(MouseButton, MouseEvent),
    /// Pointer moved while dragging. The vector is the pointer offset in canvas units since the
    /// previous drag event.
    Drag(MouseButton, Vector2d, MouseEvent),
    /// Mouse button was released while dragging.
    DragEnded(MouseButton, MouseEvent),
    /// Scroll with the given delta. Positive values scroll up.
    Scroll(f64, MouseEvent),
}

/// Value returned by an [`UserEventHandler`] to indicate the status of the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPropagation {
    /// Event should be propagated to the next handler.
    Propagate,
    /// Event should not be propagated to the next handler.
    Stop,
    /// Event should not be propagated to the next handler, and the current handler becomes the
    /// owner of the drag started by the event.
    Consume,
}

/// Mouse button.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Wheel button.
    Middle,
    /// Secondary button.
    Right,
    /// Any other button.
    Other,
}

/// State of the mouse and the keyboard modifiers at the moment of the event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Pointer position in canvas coordinates.
    pub canvas_pointer_position: Point2d,
    /// State of the mouse buttons.
    pub buttons: MouseButtonsState,
    /// Modifier keys held.
    pub modifiers: Modifiers,
}

/// Modifier keys state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    /// Control key, or Command on macOS.
    pub ctrl: bool,
    /// Shift key.
    pub shift: bool,
    /// Alt key.
    pub alt: bool,
}

/// State of a mouse button.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum MouseButtonState {
    /// Button is pressed.
    Pressed,
    /// Button is not pressed.
    #[default]
    Released,
}

/// State of all mouse buttons.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct MouseButtonsState {
    /// State of the left mouse button.
    pub left: MouseButtonState,
    /// State of the middle mouse button.
    pub middle: MouseButtonState,
    /// State of the right mouse button.
    pub right: MouseButtonState,
}

impl MouseButtonsState {
    pub(crate) fn set_pressed(&mut self, button: MouseButton) {
        self.set_state(button, MouseButtonState::Pressed);
    }

    pub(crate) fn set_released(&mut self, button: MouseButton) {
        self.set_state(button, MouseButtonState::Released);
    }

    fn set_state(&mut self, button: MouseButton, state: MouseButtonState) {
        match button {
            MouseButton::Left => self.left = state,
            MouseButton::Middle => self.middle = state,
            MouseButton::Right => self.right = state,
            MouseButton::Other => {}
        }
    }

    /// Returns the pressed button if exactly one button is pressed.
    pub fn single_pressed(&self) -> Option<MouseButton> {
        let pressed: Vec<MouseButton> = [
            (self.left, MouseButton::Left),
            (self.middle, MouseButton::Middle),
            (self.right, MouseButton::Right),
        ]
        .into_iter()
        .filter(|(state, _)| *state == MouseButtonState::Pressed)
        .map(|(_, button)| button)
        .collect();

        match pressed[..] {
            [button] => Some(button),
            _ => None,
        }
    }
}
