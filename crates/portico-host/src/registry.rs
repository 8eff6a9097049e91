use std::collections::HashMap;

use portico_common::{BindError, HandlerKind};
use tracing::{debug, warn};

use crate::engine::BrowserRef;
use crate::handler::{HandlerFactory, RenderHandler};

/// Maps handler kinds to the factories that build them.
///
/// Filled once before the engine starts and read-only afterwards.
#[derive(Default)]
pub struct RenderHandlerRegistry {
    factories: HashMap<HandlerKind, HandlerFactory>,
}

impl RenderHandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `kind`, replacing any earlier registration.
    pub fn register<F>(&mut self, kind: impl Into<HandlerKind>, factory: F)
    where
        F: Fn(&BrowserRef) -> Box<dyn RenderHandler> + Send + Sync + 'static,
    {
        let kind = kind.into();
        if kind.is_reserved() {
            warn!(
                handler = %kind,
                "handler kind shadows the reserved protocol message name"
            );
        }
        if self.factories.insert(kind.clone(), Box::new(factory)).is_some() {
            debug!(handler = %kind, "render handler factory replaced");
        } else {
            debug!(handler = %kind, "render handler factory registered");
        }
    }

    /// Build a new handler of `kind` for `browser`.
    pub fn create(
        &self,
        kind: &HandlerKind,
        browser: &BrowserRef,
    ) -> Result<Box<dyn RenderHandler>, BindError> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| BindError::UnknownHandler(kind.to_string()))?;
        Ok(factory(browser))
    }

    /// Whether a factory is registered under `kind`.
    pub fn contains(&self, kind: &HandlerKind) -> bool {
        self.factories.contains_key(kind)
    }

    /// Fail on the first of `kinds` that has no factory.
    pub fn ensure_registered<'a>(
        &self,
        kinds: impl IntoIterator<Item = &'a HandlerKind>,
    ) -> Result<(), BindError> {
        for kind in kinds {
            if !self.contains(kind) {
                return Err(BindError::UnknownHandler(kind.to_string()));
            }
        }
        Ok(())
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<HandlerKind> {
        let mut kinds: Vec<_> = self.factories.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
