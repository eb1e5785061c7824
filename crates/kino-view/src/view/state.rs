//! Playback state, error surface, media type and visibility

use serde_json::Value;
use tracing::{debug, warn};

use super::ViewInner;
use crate::dom::{classes, Element, ElementExt};
use crate::model::{truthy, Attr, Change};
use crate::presentation::{CaptionsVisibility, ClassTiming, PresentationContext, StatePresentation};
use crate::types::{MediaType, PlaybackState};
use crate::visibility::{became_visible, compute_visibility};

/// Message carried by an `errorEvent` value
fn error_message(value: &Value) -> String {
    match value {
        Value::String(message) => message.clone(),
        other => other
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

impl ViewInner {
    pub(super) fn on_state_change(&self, change: &Change) {
        if !self.is_setup.get() {
            return;
        }
        let state = PlaybackState::from_value(&change.value);

        if PlaybackState::from_value(&change.previous) == PlaybackState::Error {
            self.remove_error_surface();
        }
        if state == PlaybackState::Error && self.error_element.borrow().is_none() {
            let error = self.model.get(Attr::ErrorEvent);
            if truthy(&error) {
                self.render_error_surface(&error_message(&error));
            }
        }

        match ClassTiming::for_state(state) {
            ClassTiming::Immediate => {
                self.state_frame.cancel();
                self.state_update(state);
            }
            ClassTiming::NextFrame => {
                let weak = self.this.clone();
                self.state_frame.schedule(move || {
                    if let Some(view) = weak.upgrade() {
                        if !view.destroyed.get() {
                            view.state_update(state);
                        }
                    }
                });
            }
        }
    }

    /// Apply the presentation for `state`
    pub(super) fn state_update(&self, state: PlaybackState) {
        let ctx = PresentationContext {
            media_type: self.model.media_type(),
            controls_enabled: self.model.get_bool(Attr::Controls),
            controls_showing: self.current_controls().map(|c| c.showing()),
        };
        let presentation = StatePresentation::for_state(state, ctx);
        let container = self.container();

        if presentation.reveal_controls {
            container.toggle_class(classes::CONTROLS_HIDDEN, false);
        }
        container.replace_prefixed_class(classes::STATE_PREFIX, &presentation.state_class);

        if presentation.show_poster {
            self.set_poster_image();
        }
        match presentation.captions {
            CaptionsVisibility::Hide => self.captions.hide(),
            CaptionsVisibility::Show => self.captions.show(),
        }
        if presentation.render_cues_now {
            self.captions.render_cues(true);
        }
    }

    /// Re-apply the current state and styles
    pub(super) fn refresh_presentation(&self) {
        self.state_update(self.model.state());
        self.update_styles();
    }

    pub(super) fn on_error_event(&self, change: &Change) {
        if !truthy(&change.value) {
            self.title.playlist_item(&self.model.get(Attr::PlaylistItem));
            return;
        }
        self.render_error_surface(&error_message(&change.value));
    }

    fn render_error_surface(&self, message: &str) {
        self.remove_error_surface();
        warn!(error = message, "Showing error surface");

        let element = self.error_surface.render(&self.model, message);
        self.title.hide();
        let container = self.container();
        container.append_child(&element);
        container.toggle_class(classes::AUDIO_PLAYER, self.model.get_bool(Attr::AudioMode));
        *self.error_element.borrow_mut() = Some(element);
    }

    pub(super) fn remove_error_surface(&self) {
        let element = self.error_element.borrow_mut().take();
        if let Some(element) = element {
            debug!("Removing error surface");
            self.container().remove_child(&element);
        }
    }

    pub(super) fn on_media_type_change(&self, change: &Change) {
        let audio = MediaType::from_value(&change.value) == MediaType::Audio;
        let flash = self
            .model
            .provider()
            .map(|p| p.name().starts_with("flash"))
            .unwrap_or(false);

        // Each audio item in a playlist shows its poster
        if audio {
            self.set_poster_image();
        }
        let container = self.container();
        container.toggle_class(classes::MEDIA_AUDIO, audio);

        // Below the media the preview lets native captions show through;
        // above it, it covers the media for audio
        let preview = self.preview.element();
        if audio && !flash {
            container.insert_before(&preview, Some(&self.layout.media));
        } else {
            container.insert_after(&preview, &self.layout.media);
        }
    }

    fn set_poster_image(&self) {
        let item = self.model.get(Attr::PlaylistItem);
        self.preview.set_image(item.get("image").and_then(Value::as_str));
    }

    /// Mobile: expose the item title on the media element
    pub(super) fn set_media_title_attribute(&self, change: &Change) {
        let Some(media) = self.model.provider().and_then(|p| p.media_element()) else {
            return;
        };
        let title = change.value.get("title").and_then(Value::as_str).unwrap_or_default();
        media.set_attribute("title", title);
    }

    pub(super) fn update_visibility(&self) {
        let visibility = compute_visibility(&self.model, &**self.container(), &*self.host);
        self.model.set(Attr::Visibility, visibility);
    }

    pub(super) fn redraw(&self, change: &Change) {
        if became_visible(&change.previous, &change.value) {
            self.refresh_presentation();
        }
    }

    pub(super) fn on_stretching_change(&self, change: &Change) {
        if let Some(mode) = change.value.as_str() {
            self.container()
                .replace_prefixed_class(classes::STRETCH_PREFIX, &format!("{}{}", classes::STRETCH_PREFIX, mode));
        }
    }

    pub(super) fn on_aspect_ratio_change(&self, change: &Change) {
        self.container().toggle_class(classes::ASPECT_MODE, truthy(&change.value));
        self.layout.aspect.set_style("padding-top", change.value.as_str());
    }
}
