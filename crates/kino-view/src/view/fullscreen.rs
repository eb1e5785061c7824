//! Fullscreen wiring

use std::rc::Rc;
use tracing::{debug, info};

use super::ViewInner;
use crate::dom::{classes, ElementExt};
use crate::fullscreen::{resolve_fullscreen, select_strategy, FullscreenEffect};
use crate::model::{truthy, Attr, Change};

impl ViewInner {
    /// Pick the strategy and listen for document fullscreen changes
    pub(super) fn setup_fullscreen(&self) {
        let Some(api) = self.fullscreen_api.borrow().clone() else {
            return;
        };
        let strategy = select_strategy(
            &self.config.platform,
            api.clone(),
            self.container().clone(),
            self.model.clone(),
        );
        info!(kind = ?strategy.kind(), "Fullscreen strategy selected");
        *self.strategy.borrow_mut() = Some(Rc::from(strategy));

        let weak = self.this.clone();
        api.bind(Rc::new(move || {
            if let Some(view) = weak.upgrade() {
                if !view.destroyed.get() {
                    view.on_fullscreen_change(None);
                }
            }
        }));
    }

    /// Model `fullscreen` changed: carry it out
    pub(super) fn on_fullscreen(&self, change: &Change) {
        let enter = truthy(&change.value);

        // Let native controls adjust volume after a muted autostart
        if enter && self.model.get_bool(Attr::AutostartMuted) {
            if let Some(controls) = self.current_controls() {
                controls.unmute_autoplay(&self.api, &self.model);
            }
        }

        let Some(strategy) = self.current_strategy() else {
            return;
        };
        debug!(enter, kind = ?strategy.kind(), "Applying fullscreen");
        if strategy.apply(enter) == FullscreenEffect::MirrorClass {
            self.toggle_dom_fullscreen(enter);
        }
    }

    fn toggle_dom_fullscreen(&self, enter: bool) {
        self.container().toggle_class(classes::FULLSCREEN, enter);
        self.host.set_scroll_locked(enter);

        if enter {
            // Start the control bar's fade-out timer
            if let Some(controls) = self.current_controls() {
                controls.user_active();
            }
        }
        self.resize_media(None, None);
        self.responsive_listener();
    }

    /// Document or provider fullscreen changed, possibly from outside the player
    pub(super) fn on_fullscreen_change(&self, event_state: Option<bool>) {
        let model_state = self.model.get_bool(Attr::Fullscreen);
        let native = self.current_strategy().and_then(|s| s.native_state());

        if let Some(state) = resolve_fullscreen(model_state, event_state, native) {
            debug!(state, "Syncing fullscreen from native change");
            self.model.set(Attr::Fullscreen, state);
        }

        self.responsive_listener();
        let weak = self.this.clone();
        self.media_resize.schedule(move || {
            if let Some(view) = weak.upgrade() {
                if !view.destroyed.get() {
                    view.resize_media(None, None);
                }
            }
        });
    }
}
