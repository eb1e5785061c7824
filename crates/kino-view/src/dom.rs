//! DOM abstraction
//!
//! The engine never touches a concrete DOM. It mutates elements through the
//! [`Element`] trait, which `kino-wasm` implements over `web_sys::HtmlElement`
//! and [`crate::headless::MemoryElement`] implements in memory.

use std::any::Any;
use std::rc::Rc;

use crate::types::Rect;

/// Shared handle to an element
pub type ElementRef = Rc<dyn Element>;

/// Callback attached to an element event
pub type DomListener = Rc<dyn Fn()>;

/// Handle for a registered DOM listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// DOM events the view listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEvent {
    PointerMove,
    PointerDown,
    KeyDown,
}

impl DomEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomEvent::PointerMove => "mousemove",
            DomEvent::PointerDown => "mousedown",
            DomEvent::KeyDown => "keydown",
        }
    }
}

/// Minimal element surface used by the view
pub trait Element {
    fn id(&self) -> String;

    fn has_class(&self, name: &str) -> bool;
    fn add_class(&self, name: &str);
    fn remove_class(&self, name: &str);
    fn class_names(&self) -> Vec<String>;

    /// Set an inline style property, or remove it with `None`
    fn set_style(&self, property: &str, value: Option<&str>);
    fn style(&self, property: &str) -> Option<String>;

    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);
    fn attribute(&self, name: &str) -> Option<String>;

    /// Bounding rectangle relative to the viewport
    fn bounds(&self) -> Rect;
    /// Whether the element is attached to the document
    fn is_connected(&self) -> bool;

    fn append_child(&self, child: &ElementRef);
    fn remove_child(&self, child: &ElementRef);
    /// Insert `child` before `reference`, or append when `reference` is `None`
    fn insert_before(&self, child: &ElementRef, reference: Option<&ElementRef>);
    /// Insert `child` right after `reference`
    fn insert_after(&self, child: &ElementRef, reference: &ElementRef);
    fn contains(&self, child: &ElementRef) -> bool;

    fn add_listener(&self, event: DomEvent, listener: DomListener) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);

    fn as_any(&self) -> &dyn Any;
}

/// Class-list helpers that skip writes when the DOM already matches
pub trait ElementExt: Element {
    /// Add or remove `name` so that its presence equals `on`
    fn toggle_class(&self, name: &str, on: bool) {
        match (on, self.has_class(name)) {
            (true, false) => self.add_class(name),
            (false, true) => self.remove_class(name),
            _ => {}
        }
    }

    /// Flip the presence of `name`
    fn flip_class(&self, name: &str) {
        let on = !self.has_class(name);
        self.toggle_class(name, on);
    }

    /// Replace every class starting with `prefix` by `replacement`
    fn replace_prefixed_class(&self, prefix: &str, replacement: &str) {
        for name in self.class_names() {
            if name.starts_with(prefix) && name != replacement {
                self.remove_class(&name);
            }
        }
        self.toggle_class(replacement, true);
    }

    /// First class starting with `prefix`
    fn prefixed_class(&self, prefix: &str) -> Option<String> {
        self.class_names().into_iter().find(|name| name.starts_with(prefix))
    }
}

impl<T: Element + ?Sized> ElementExt for T {}

/// Class names applied to the player container
pub mod classes {
    pub const CONTROLS_HIDDEN: &str = "kino-flag-controls-hidden";
    pub const SMALL_PLAYER: &str = "kino-flag-small-player";
    pub const PORTRAIT: &str = "kino-orientation-portrait";
    pub const AUDIO_PLAYER: &str = "kino-flag-audio-player";
    pub const MEDIA_AUDIO: &str = "kino-flag-media-audio";
    pub const FULLSCREEN: &str = "kino-flag-fullscreen";
    pub const LIVE: &str = "kino-flag-live";
    pub const ADS: &str = "kino-flag-ads";
    pub const ADS_HIDE_CONTROLS: &str = "kino-flag-ads-hide-controls";
    pub const DRAGGING: &str = "kino-flag-dragging";
    pub const PLAY_REJECTED: &str = "kino-flag-play-rejected";
    pub const FLASH_BLOCKED: &str = "kino-flag-flash-blocked";
    pub const ASPECT_MODE: &str = "kino-flag-aspect-mode";
    pub const NO_FOCUS: &str = "kino-no-focus";
    pub const LEGACY: &str = "kino-legacy";

    pub const STATE_PREFIX: &str = "kino-state-";
    pub const BREAKPOINT_PREFIX: &str = "kino-breakpoint-";
    pub const STRETCH_PREFIX: &str = "kino-stretch-";
    pub const SKIN_PREFIX: &str = "kino-skin-";
}
