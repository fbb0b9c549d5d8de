use crate::messenger::Messenger;

use super::RenderedLayer;

/// Holder of the layer that is currently displayed.
///
/// The layer is always replaced as a whole, so readers never observe a partially built layer.
#[derive(Default)]
pub struct MapSurface {
    layer: Option<RenderedLayer>,
    generation: u64,
    messenger: Option<Box<dyn Messenger>>,
}

impl MapSurface {
    /// Creates an empty surface.
    pub fn new(messenger: Option<Box<dyn Messenger>>) -> Self {
        Self {
            layer: None,
            generation: 0,
            messenger,
        }
    }

    /// Layer currently displayed.
    pub fn layer(&self) -> Option<&RenderedLayer> {
        self.layer.as_ref()
    }

    /// Number of times the content of the surface was changed. Backends can use it to invalidate
    /// data cached for the layer.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Installs a new layer and returns the previous one.
    pub fn replace(&mut self, layer: RenderedLayer) -> Option<RenderedLayer> {
        let previous = self.layer.replace(layer);
        self.generation += 1;
        self.request_redraw();
        previous
    }

    /// Removes the layer from the surface.
    pub fn clear(&mut self) -> Option<RenderedLayer> {
        let previous = self.layer.take();
        if previous.is_some() {
            self.generation += 1;
            self.request_redraw();
        }
        previous
    }

    /// Sets the messenger notified when the surface content changes.
    pub fn set_messenger(&mut self, messenger: Option<impl Messenger + 'static>) {
        self.messenger = messenger.map(|m| Box::new(m) as Box<dyn Messenger>);
    }

    /// Asks the UI backend to repaint the surface.
    pub fn request_redraw(&self) {
        log::trace!("Requesting redraw");
        if let Some(messenger) = &self.messenger {
            messenger.request_redraw();
        }
    }
}
