//! Instream (ad) presentation
//!
//! While an ad plays, the container carries the ads flag and never the live
//! flag. [`InstreamSwitcher`] applies those flags and remembers what it
//! displaced so that leaving instream restores the container exactly.

use std::cell::Cell;

use crate::dom::{classes, Element, ElementExt};

#[derive(Debug, Default)]
pub struct InstreamSwitcher {
    active: Cell<bool>,
    live_before: Cell<bool>,
}

impl InstreamSwitcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Apply ad flags; returns false when already in instream
    pub fn enter(&self, container: &dyn Element) -> bool {
        if self.active.replace(true) {
            return false;
        }
        self.live_before.set(container.has_class(classes::LIVE));
        container.toggle_class(classes::ADS, true);
        container.toggle_class(classes::LIVE, false);
        true
    }

    /// Remove ad flags and restore the live flag
    ///
    /// `live` overrides the remembered flag when the caller can derive it
    /// from the current stream. Returns false when not in instream.
    pub fn exit(&self, container: &dyn Element, live: Option<bool>) -> bool {
        if !self.active.replace(false) {
            return false;
        }
        container.toggle_class(classes::ADS, false);
        container.toggle_class(classes::ADS_HIDE_CONTROLS, false);
        container.toggle_class(classes::LIVE, live.unwrap_or(self.live_before.get()));
        true
    }
}
