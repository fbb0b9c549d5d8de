//! Repaint notifications from the map to the UI backend.

/// Notifies the application that the map must be painted again.
pub trait Messenger: Send + Sync {
    /// Requests a repaint.
    fn request_redraw(&self);
}

impl<T: Fn() + Send + Sync> Messenger for T {
    fn request_redraw(&self) {
        self()
    }
}
