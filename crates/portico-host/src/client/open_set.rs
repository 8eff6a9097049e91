use std::collections::HashMap;

use portico_common::BrowserId;
use tracing::warn;

use crate::engine::{Browser, BrowserRef};

/// Outcome of [`OpenBrowserSet::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    NotOpen,
}

/// Browsers a client currently has open, in opening order.
///
/// Slots are tombstoned on removal so iteration order is stable; the arena
/// is compacted once tombstones outnumber live entries.
#[derive(Default)]
pub struct OpenBrowserSet {
    slots: Vec<Option<BrowserRef>>,
    index: HashMap<BrowserId, usize>,
}

const COMPACT_MIN_SLOTS: usize = 16;

impl OpenBrowserSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `browser`. Returns `false` if that same browser is already open.
    pub fn insert(&mut self, browser: BrowserRef) -> bool {
        let id = browser.id();
        if let Some(&slot) = self.index.get(&id) {
            if let Some(existing) = &self.slots[slot] {
                if existing.is_same(browser.as_ref()) {
                    return false;
                }
            }
            warn!(browser_id = %id, "browser id reused while still open; replacing entry");
            self.slots[slot] = None;
        }
        self.index.insert(id, self.slots.len());
        self.slots.push(Some(browser));
        true
    }

    /// Remove the entry that [`Browser::is_same`] as `browser`.
    pub fn remove(&mut self, browser: &dyn Browser) -> Removal {
        let id = browser.id();
        let Some(&slot) = self.index.get(&id) else {
            return Removal::NotOpen;
        };
        match &self.slots[slot] {
            Some(existing) if existing.is_same(browser) => {}
            _ => return Removal::NotOpen,
        }

        self.slots[slot] = None;
        self.index.remove(&id);
        self.maybe_compact();
        Removal::Removed
    }

    /// Whether this exact browser, not just its id, is open.
    pub fn contains(&self, browser: &dyn Browser) -> bool {
        self.index
            .get(&browser.id())
            .and_then(|&slot| self.slots[slot].as_ref())
            .is_some_and(|existing| existing.is_same(browser))
    }

    /// Open browsers in opening order.
    pub fn iter(&self) -> impl Iterator<Item = &BrowserRef> {
        self.slots.iter().flatten()
    }

    /// Owned copies of every open browser, in opening order.
    pub fn snapshot(&self) -> Vec<BrowserRef> {
        self.iter().cloned().collect()
    }

    /// Number of open browsers.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn maybe_compact(&mut self) {
        let live = self.index.len();
        if self.slots.len() < COMPACT_MIN_SLOTS || self.slots.len() - live <= live {
            return;
        }
        self.slots.retain(Option::is_some);
        self.index.clear();
        for (slot, browser) in self.slots.iter().enumerate() {
            if let Some(browser) = browser {
                self.index.insert(browser.id(), slot);
            }
        }
    }
}
