//! Collaborator contracts
//!
//! Markup, caption rendering, preview images, the logo and the media
//! provider live outside this crate. The view only drives them through
//! these narrow traits.

use serde_json::Value;
use std::rc::Rc;

use crate::dom::ElementRef;
use crate::events::{ClickEvent, LogoClick, Publisher};
use crate::model::PlayerModel;
use crate::types::Reason;

/// Media provider (HTML5 video, cast, ...) reachable through the model
pub trait MediaProvider {
    fn name(&self) -> String {
        String::new()
    }

    /// Fit the rendered media into `width` x `height` using `stretching`
    fn resize(&self, width: u32, height: u32, stretching: &str);

    /// Request media-element fullscreen
    fn set_fullscreen(&self, fullscreen: bool);

    /// Whether the media element itself is fullscreen
    fn get_fullscreen(&self) -> bool;

    /// Move the media element into `container`
    fn set_container(&self, container: ElementRef);

    /// The underlying media element, when the provider has one
    fn media_element(&self) -> Option<ElementRef> {
        None
    }
}

/// Player API surface the view calls back into
pub trait PlayerApi {
    fn play_toggle(&self, reason: Reason);
    fn pause(&self, reason: Reason);
    /// Set fullscreen, or toggle it with `None`
    fn set_fullscreen(&self, state: Option<bool>);
}

/// Poster image region
pub trait Preview {
    fn setup(&self, element: ElementRef);
    fn resize(&self, width: u32, height: u32, stretching: &str);
    fn set_image(&self, image: Option<&str>);
    fn element(&self) -> ElementRef;
}

/// Title region
pub trait Title {
    fn setup(&self, element: ElementRef);
    fn playlist_item(&self, item: &Value);
    fn hide(&self);
    fn element(&self) -> ElementRef;
}

/// Caption renderer; cue timing is its own business
pub trait CaptionsRenderer {
    fn setup(&self, player_id: &str, style: &Value);
    fn resize(&self);
    fn show(&self);
    fn hide(&self);
    fn render_cues(&self, immediate: bool);
    fn clear(&self);
    fn destroy(&self);
    fn element(&self) -> ElementRef;
}

/// Logo overlay
pub trait Logo: Publisher<LogoClick> {
    fn setup(&self);
    fn set_container(&self, container: ElementRef);
    fn element(&self) -> ElementRef;
    fn destroy(&self);
}

/// Builds the error presentation
pub trait ErrorSurface {
    fn render(&self, model: &PlayerModel, message: &str) -> ElementRef;
}

/// Pointer handling on the media display
pub trait ClickHandler: Publisher<ClickEvent> {
    /// Drop handlers installed for ad interaction
    fn revert_alternate_click_handlers(&self);
    fn destroy(&self);
}

/// Document-level Fullscreen API
pub trait FullscreenApi {
    fn supports_dom_fullscreen(&self) -> bool;
    fn request(&self, element: &ElementRef);
    fn exit(&self);
    /// Id of the element currently fullscreen, if any
    fn fullscreen_element_id(&self) -> Option<String>;
    /// Call `on_change` on every document fullscreen change
    fn bind(&self, on_change: Rc<dyn Fn()>);
    /// Remove document listeners
    fn destroy(&self);
}
