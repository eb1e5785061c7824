//! Fullscreen strategies
//!
//! Browsers disagree on how a player goes fullscreen. One strategy is
//! chosen per view at setup:
//!
//! - [`DomFullscreen`]: Fullscreen API on the container, mirrored by a class
//! - [`LegacyClassToggle`]: class only, for browsers without the API
//! - [`ProviderDelegated`]: the media element goes fullscreen (mobile)
//!
//! [`resolve_fullscreen`] decides whether an observed change has to be
//! written back to the model.

use std::rc::Rc;

use crate::collaborators::FullscreenApi;
use crate::config::Platform;
use crate::dom::ElementRef;
use crate::model::PlayerModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenKind {
    Dom,
    LegacyClassToggle,
    ProviderDelegated,
}

/// Follow-up the view performs after a strategy handled a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenEffect {
    /// Mirror the state on the container class and re-layout
    MirrorClass,
    /// The media element handles presentation itself
    Delegated,
}

pub trait FullscreenStrategy {
    fn kind(&self) -> FullscreenKind;

    /// Enter or leave fullscreen
    fn apply(&self, enter: bool) -> FullscreenEffect;

    /// Current native state, or `None` when there is nothing to query
    fn native_state(&self) -> Option<bool>;
}

/// Fullscreen API on the player container
pub struct DomFullscreen {
    api: Rc<dyn FullscreenApi>,
    container: ElementRef,
}

impl DomFullscreen {
    pub fn new(api: Rc<dyn FullscreenApi>, container: ElementRef) -> Self {
        Self { api, container }
    }

    fn is_container_fullscreen(&self) -> bool {
        self.api.fullscreen_element_id().as_deref() == Some(self.container.id().as_str())
    }
}

impl FullscreenStrategy for DomFullscreen {
    fn kind(&self) -> FullscreenKind {
        FullscreenKind::Dom
    }

    fn apply(&self, enter: bool) -> FullscreenEffect {
        // Never re-request the state the document is already in
        match (enter, self.is_container_fullscreen()) {
            (true, false) => self.api.request(&self.container),
            (false, true) => self.api.exit(),
            _ => {}
        }
        FullscreenEffect::MirrorClass
    }

    fn native_state(&self) -> Option<bool> {
        Some(self.is_container_fullscreen())
    }
}

/// Class-only fullscreen
pub struct LegacyClassToggle;

impl FullscreenStrategy for LegacyClassToggle {
    fn kind(&self) -> FullscreenKind {
        FullscreenKind::LegacyClassToggle
    }

    fn apply(&self, _enter: bool) -> FullscreenEffect {
        FullscreenEffect::MirrorClass
    }

    fn native_state(&self) -> Option<bool> {
        None
    }
}

/// Media-element fullscreen through the active provider
pub struct ProviderDelegated {
    model: Rc<PlayerModel>,
}

impl ProviderDelegated {
    pub fn new(model: Rc<PlayerModel>) -> Self {
        Self { model }
    }
}

impl FullscreenStrategy for ProviderDelegated {
    fn kind(&self) -> FullscreenKind {
        FullscreenKind::ProviderDelegated
    }

    fn apply(&self, enter: bool) -> FullscreenEffect {
        match self.model.provider() {
            Some(provider) => provider.set_fullscreen(enter),
            None => tracing::debug!(enter, "No provider for media fullscreen"),
        }
        FullscreenEffect::Delegated
    }

    fn native_state(&self) -> Option<bool> {
        self.model.provider().map(|p| p.get_fullscreen())
    }
}

/// Pick the strategy for this page
pub fn select_strategy(
    platform: &Platform,
    api: Rc<dyn FullscreenApi>,
    container: ElementRef,
    model: Rc<PlayerModel>,
) -> Box<dyn FullscreenStrategy> {
    if api.supports_dom_fullscreen() {
        Box::new(DomFullscreen::new(api, container))
    } else if platform.legacy_fullscreen {
        Box::new(LegacyClassToggle)
    } else {
        Box::new(ProviderDelegated::new(model))
    }
}

/// New model value after a fullscreen change, if it differs from the model
///
/// An explicit state carried by the event wins over the native query; with
/// neither, the model is already authoritative.
pub fn resolve_fullscreen(model_state: bool, event_state: Option<bool>, native: Option<bool>) -> Option<bool> {
    let current = event_state.or(native).unwrap_or(model_state);
    (current != model_state).then_some(current)
}
