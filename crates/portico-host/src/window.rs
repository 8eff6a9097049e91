//! Top-level window setup for a browser view.

use std::sync::Arc;

use portico_common::{Point, Size};
use portico_config::schema::WindowConfig;
use tracing::debug;

/// Placement applied when the window is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOptions {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
    pub center_screen: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self::from(&WindowConfig::default())
    }
}

impl From<&WindowConfig> for WindowOptions {
    fn from(config: &WindowConfig) -> Self {
        Self {
            x: config.x,
            y: config.y,
            width: config.width,
            height: config.height,
            visible: config.visible,
            center_screen: config.center_screen,
        }
    }
}

/// The view that hosts a browser inside a window.
pub trait BrowserView: Send + Sync {
    fn request_focus(&self);
}

/// Native window operations used while setting up a new window.
pub trait NativeWindow {
    fn add_child_view(&self, view: Arc<dyn BrowserView>);
    fn set_position(&self, position: Point);
    fn set_size(&self, size: Size);
    fn show(&self);

    /// Ask the window system to center the window. Advisory only.
    fn apply_center_hint(&self);
}

/// Places a browser view into its top-level window once the window exists.
pub struct WindowDelegate {
    view: Arc<dyn BrowserView>,
    options: WindowOptions,
}

impl WindowDelegate {
    /// Create a delegate that will host `view` with `options`.
    pub fn new(view: Arc<dyn BrowserView>, options: WindowOptions) -> Self {
        Self { view, options }
    }

    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    /// Attach the view, place the window, then give the view focus.
    pub fn on_window_created(&self, window: &dyn NativeWindow) {
        let o = &self.options;
        debug!(x = o.x, y = o.y, width = o.width, height = o.height, "window created");

        window.add_child_view(Arc::clone(&self.view));
        window.set_position(Point { x: o.x, y: o.y });
        window.set_size(Size {
            width: o.width,
            height: o.height,
        });
        if o.visible {
            window.show();
        }
        if o.center_screen {
            window.apply_center_hint();
        }
        self.view.request_focus();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn push(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    struct View(Arc<Mutex<Vec<String>>>);

    impl BrowserView for View {
        fn request_focus(&self) {
            self.0.lock().unwrap().push("focus".into());
        }
    }

    impl NativeWindow for Recorder {
        fn add_child_view(&self, _view: Arc<dyn BrowserView>) {
            self.push("add_child_view".into());
        }
        fn set_position(&self, position: Point) {
            self.push(format!("position {} {}", position.x, position.y));
        }
        fn set_size(&self, size: Size) {
            self.push(format!("size {}x{}", size.width, size.height));
        }
        fn show(&self) {
            self.push("show".into());
        }
        fn apply_center_hint(&self) {
            self.push("center".into());
        }
    }

    fn run(options: WindowOptions) -> Vec<String> {
        let window = Recorder::default();
        let view = Arc::new(View(Arc::clone(&window.calls)));
        WindowDelegate::new(view, options).on_window_created(&window);
        let calls = window.calls.lock().unwrap().clone();
        calls
    }

    #[test]
    fn visible_centered_window_gets_every_step_in_order() {
        let calls = run(WindowOptions {
            x: 10,
            y: 20,
            width: 800,
            height: 600,
            visible: true,
            center_screen: true,
        });
        assert_eq!(
            calls,
            vec![
                "add_child_view",
                "position 10 20",
                "size 800x600",
                "show",
                "center",
                "focus"
            ]
        );
    }

    #[test]
    fn hidden_window_is_not_shown_but_still_focused() {
        let calls = run(WindowOptions {
            visible: false,
            center_screen: false,
            ..WindowOptions::default()
        });
        assert_eq!(
            calls,
            vec!["add_child_view", "position 0 0", "size 1024x768", "focus"]
        );
    }

    #[test]
    fn options_follow_window_config() {
        let config = WindowConfig {
            x: -5,
            width: 640,
            center_screen: false,
            ..Default::default()
        };
        let options = WindowOptions::from(&config);
        assert_eq!(options.x, -5);
        assert_eq!(options.width, 640);
        assert_eq!(options.height, 768);
        assert!(!options.center_screen);
    }
}
