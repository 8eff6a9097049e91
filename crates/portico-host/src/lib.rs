//! Browser engine host for Portico.
//!
//! Provides:
//! - The engine seam (`Engine`, `Browser`, `Frame`, `ScriptContext`)
//! - A controller owning the engine UI thread and its task queue
//! - Render handler registration and per-browser binding
//! - The UI-side browser client and window delegate
//! - An in-process loopback engine for running without a real engine

pub mod client;
pub mod controller;
pub mod engine;
pub mod handler;
pub mod ipc;
pub mod loopback;
pub mod registry;
pub mod task;
pub mod tracker;
pub mod window;

#[cfg(test)]
mod testing;

pub use client::BrowserClient;
pub use controller::{Controller, ControllerBuilder, ControllerState};
pub use engine::{Browser, BrowserRef, Engine, EngineSettings, Frame, FrameRef, ScriptContext};
pub use handler::RenderHandler;
pub use ipc::{MessageValue, ProcessId, ProcessMessage};
pub use loopback::LoopbackEngine;
pub use registry::RenderHandlerRegistry;
pub use window::{WindowDelegate, WindowOptions};
