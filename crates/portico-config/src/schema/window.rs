//! Top-level window placement.

use serde::{Deserialize, Serialize};

/// Where and how the browser window appears when it is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub x: i32,
    pub y: i32,
    /// Valid range: 1-16384.
    pub width: u32,
    /// Valid range: 1-16384.
    pub height: u32,
    pub visible: bool,
    /// Ask the window system to center the window on screen.
    pub center_screen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Portico".into(),
            x: 0,
            y: 0,
            width: 1024,
            height: 768,
            visible: true,
            center_screen: true,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
