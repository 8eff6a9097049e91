//! Browser client settings.

use serde::{Deserialize, Serialize};

/// Per-window browser client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Render handler kind bound to every browser this client opens.
    pub render_handler: String,
    pub start_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            render_handler: "default".into(),
            start_url: "about:blank".into(),
        }
    }
}
