//! Measurement, layout classes and sizing

use tracing::{debug, instrument};

use super::ViewInner;
use crate::bounds::Measurement;
use crate::breakpoint::{is_audio_mode, LayoutFlags};
use crate::dom::{classes, Element, ElementExt};
use crate::events::ViewEvent;
use crate::model::Attr;
use crate::types::{Dimension, SafeRegion};

impl ViewInner {
    /// Measure the container and commit its size to the model
    pub(super) fn update_bounds(&self) {
        self.resize_frame.cancel();

        let container = self.container();
        let in_dom = container.is_connected();
        let measured = Measurement::from_rect(container.bounds(), in_dom);
        let decision = self.bounds.borrow().decide(measured);

        if decision.rearm {
            // No usable size yet; look again once the player is laid out
            self.responsive_listener();
        }
        if let Some((width, height)) = decision.commit {
            self.model.set(Attr::ContainerWidth, width);
            self.model.set(Attr::ContainerHeight, height);
        }
        self.model.set(Attr::InDom, in_dom);

        if in_dom {
            self.registry.observe(&container.id());
        }
    }

    /// Propagate the committed size to classes, controls, media and captions
    pub(super) fn update_styles(&self) {
        let width = self.model.get_u32(Attr::ContainerWidth);
        let height = self.model.get_u32(Attr::ContainerHeight);

        if self.model.get_bool(Attr::Controls) {
            self.update_container_styles(width, height);
        }
        if let Some(controls) = self.current_controls() {
            controls.resize(width.unwrap_or(0), height.unwrap_or(0));
        }
        self.resize_media(width, height);
        self.captions.resize();
    }

    /// Emit resize and breakpoint notifications for a new committed size
    pub(super) fn check_resized(&self) {
        let width = self.model.get_u32(Attr::ContainerWidth).unwrap_or(0);
        let height = self.model.get_u32(Attr::ContainerHeight).unwrap_or(0);

        let notice = self.bounds.borrow_mut().check_resized(width, height);
        let Some(notice) = notice else {
            return;
        };

        debug!(width, height, "Container resized");
        self.events.emit(&ViewEvent::Resize { width, height });
        if let Some(breakpoint) = notice.breakpoint {
            debug!(%breakpoint, "Breakpoint changed");
            self.events.emit(&ViewEvent::Breakpoint {
                breakpoint: breakpoint.tier(),
            });
        }
    }

    /// Re-measure on the next frame, replacing any pending request
    pub(super) fn responsive_listener(&self) {
        let weak = self.this.clone();
        self.resize_frame.schedule(move || {
            if let Some(view) = weak.upgrade() {
                view.responsive_update();
            }
        });
    }

    pub(super) fn responsive_update(&self) {
        if !self.is_setup.get() || self.destroyed.get() {
            return;
        }
        self.update_bounds();
        self.update_styles();
        self.check_resized();
    }

    /// Breakpoint, small-player, portrait and audio-player classes
    pub(super) fn update_container_styles(&self, width: Option<u32>, height: Option<u32>) {
        let audio_mode = is_audio_mode(&self.model, self.config.controlbar_only_height);
        let flags = LayoutFlags::compute(&self.classifier, width, height, audio_mode);
        let container = self.container();

        if let Some(breakpoint) = flags.breakpoint {
            container.replace_prefixed_class(classes::BREAKPOINT_PREFIX, &breakpoint.class_name());
            container.toggle_class(classes::SMALL_PLAYER, flags.small_player);
            container.toggle_class(classes::PORTRAIT, flags.portrait);
        }
        container.toggle_class(classes::AUDIO_PLAYER, flags.audio_mode);
        self.model.set(Attr::AudioMode, flags.audio_mode);
    }

    /// Write player dimensions to the container style
    pub(super) fn resize_player(&self, width: Option<Dimension>, height: Option<Dimension>, reset_aspect: bool) {
        if height.is_some() && reset_aspect {
            self.model.set(Attr::AspectRatio, serde_json::Value::Null);
        }

        let container = self.container();
        if let Some(width) = &width {
            container.set_style("width", Some(width.to_css().as_str()));
        }
        if !self.model.get_bool(Attr::AspectRatio) {
            if let Some(height) = &height {
                // Zero hides the player; other pixel heights never go below the control bar
                let height = match height {
                    Dimension::Pixels(px) if *px != 0 => Dimension::Pixels((*px).max(self.config.controlbar_only_height)),
                    other => other.clone(),
                };
                container.set_style("height", Some(height.to_css().as_str()));
            }
        }

        if let (Some(width), Some(height)) = (&width, &height) {
            self.model.set(Attr::Width, width.to_value());
            self.model.set(Attr::Height, height.to_value());
        }
    }

    #[instrument(skip(self))]
    pub(super) fn resize(&self, width: Dimension, height: Dimension) {
        self.resize_player(Some(width), Some(height), true);
        self.responsive_update();
    }

    /// Fit preview and provider into the container
    ///
    /// Missing or zero dimensions fall back to the committed size; with no
    /// usable size nothing is resized.
    pub(super) fn resize_media(&self, width: Option<u32>, height: Option<u32>) {
        let committed = |w: Option<u32>, attr: Attr| {
            w.filter(|px| *px > 0)
                .or_else(|| self.model.get_u32(attr))
                .filter(|px| *px > 0)
        };
        let (Some(width), Some(height)) = (
            committed(width, Attr::ContainerWidth),
            committed(height, Attr::ContainerHeight),
        ) else {
            return;
        };

        let stretching = self.model.get_str(Attr::Stretching).unwrap_or_default();
        self.preview.resize(width, height, &stretching);
        if let Some(provider) = self.model.provider() {
            provider.resize(width, height, &stretching);
        }
    }

    pub(super) fn safe_region(&self, exclude_controlbar: bool) -> SafeRegion {
        let (width, height) = self.bounds.borrow().last_size().unwrap_or((0, 0));
        let mut region = SafeRegion {
            x: 0,
            y: 0,
            width,
            height,
        };
        if let Some(controls) = self.current_controls() {
            if exclude_controlbar {
                region.height = region.height.saturating_sub(controls.controlbar_height());
            }
        }
        region
    }
}
