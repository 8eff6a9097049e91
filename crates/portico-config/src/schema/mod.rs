//! Configuration schema types for Portico.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults below.

mod client;
mod engine;
mod system;
mod window;

pub use client::*;
pub use engine::*;
pub use system::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Portico.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PorticoConfig {
    pub engine: EngineConfig,
    pub window: WindowConfig,
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
