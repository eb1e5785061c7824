//! Display and logo clicks

use std::rc::Rc;
use tracing::debug;

use super::ViewInner;
use crate::dom::{classes, ElementExt};
use crate::events::{ClickEvent, LogoClick, Publisher, ViewEvent};
use crate::model::Attr;
use crate::types::{MediaType, PlaybackState, Reason};

impl ViewInner {
    pub(super) fn bind_click_handler(&self) {
        let Some(handler) = self.click_handler.borrow().clone() else {
            return;
        };
        let weak = self.this.clone();
        let id = handler.on(Rc::new(move |event: &ClickEvent| {
            if let Some(view) = weak.upgrade() {
                if !view.destroyed.get() {
                    view.on_display_event(*event);
                }
            }
        }));
        self.click_subscription.set(Some(id));
    }

    pub(super) fn bind_logo(&self) {
        let weak = self.this.clone();
        let id = self.logo.on(Rc::new(move |event: &LogoClick| {
            if let Some(view) = weak.upgrade() {
                if !view.destroyed.get() {
                    view.on_logo_click(event);
                }
            }
        }));
        self.logo_subscription.set(Some(id));
    }

    fn on_display_event(&self, event: ClickEvent) {
        let controls = self.current_controls();
        match event {
            ClickEvent::Click => {
                self.events.emit(&ViewEvent::DisplayClick);
                if let Some(controls) = controls {
                    if controls.settings_menu_visible() {
                        controls.close_settings_menu();
                    } else {
                        self.api.play_toggle(Reason::Interaction);
                    }
                }
            }
            ClickEvent::Tap => self.on_tap(),
            ClickEvent::DoubleClick => {
                if controls.is_some() {
                    self.api.set_fullscreen(None);
                }
            }
            ClickEvent::Move | ClickEvent::Over => {
                if let Some(controls) = controls {
                    controls.user_active();
                }
            }
        }
    }

    fn on_tap(&self) {
        self.events.emit(&ViewEvent::DisplayClick);

        let controls = self.current_controls();
        if let Some(controls) = &controls {
            if controls.settings_menu_visible() {
                controls.close_settings_menu();
            }
        }

        let state = self.model.state();
        let controls_enabled = self.model.get_bool(Attr::Controls);
        let instream = self.model.get_bool(Attr::Instream);

        if controls_enabled
            && (matches!(state, PlaybackState::Idle | PlaybackState::Complete)
                || (instream && state == PlaybackState::Paused))
        {
            self.api.play_toggle(Reason::Interaction);
        }

        if controls_enabled && state == PlaybackState::Paused {
            // Tapping paused media toggles the controls, except over ads,
            // while casting and for audio
            if instream || self.model.get_bool(Attr::CastActive) || self.model.media_type() == MediaType::Audio {
                return;
            }
            // Without an instance the flag stays set until one attaches
            if controls.is_none() {
                return;
            }
            self.container().flip_class(classes::CONTROLS_HIDDEN);
            self.captions.render_cues(true);
        } else if let Some(controls) = controls {
            if controls.showing() {
                controls.user_inactive();
            } else {
                controls.user_active();
            }
        }
    }

    fn on_logo_click(&self, event: &LogoClick) {
        match &event.link {
            None => {
                if self.model.get_bool(Attr::Controls) {
                    self.api.play_toggle(Reason::Interaction);
                }
            }
            Some(link) => {
                debug!(link = %link, "Opening logo link");
                self.api.pause(Reason::Interaction);
                self.api.set_fullscreen(Some(false));
                self.host.open_link(link, event.target.as_deref());
            }
        }
    }
}
