//! Window stand-ins for running without a display.

use std::sync::Arc;

use portico_common::{Point, Size};
use portico_host::window::{BrowserView, NativeWindow};
use tracing::debug;

pub struct HeadlessView;

impl BrowserView for HeadlessView {
    fn request_focus(&self) {
        debug!("view focused");
    }
}

/// Logs each window operation instead of performing it.
pub struct HeadlessWindow {
    title: String,
}

impl HeadlessWindow {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl NativeWindow for HeadlessWindow {
    fn add_child_view(&self, _view: Arc<dyn BrowserView>) {
        debug!(window = %self.title, "child view added");
    }

    fn set_position(&self, position: Point) {
        debug!(window = %self.title, x = position.x, y = position.y, "window moved");
    }

    fn set_size(&self, size: Size) {
        debug!(window = %self.title, width = size.width, height = size.height, "window resized");
    }

    fn show(&self) {
        debug!(window = %self.title, "window shown");
    }

    fn apply_center_hint(&self) {
        debug!(window = %self.title, "center hint applied");
    }
}
