//! Player model - observed key-value store
//!
//! The view never owns playback state. It reads and writes named attributes
//! on a [`PlayerModel`] and reacts to change notifications, which are
//! delivered synchronously in emission order. Setting an attribute to its
//! current value notifies nobody.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::collaborators::MediaProvider;
use crate::dom::ElementRef;
use crate::events::{Emitter, Listener, Publisher, SubscriptionId};
use crate::types::{MediaType, PlaybackState, StreamType};

/// Named model attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attr {
    Id,
    State,
    Controls,
    Fullscreen,
    ContainerWidth,
    ContainerHeight,
    Width,
    Height,
    Visibility,
    IntersectionRatio,
    ActiveTab,
    Instream,
    MediaType,
    StreamType,
    Scrubbing,
    PlayRejected,
    AutostartMuted,
    Autostart,
    ErrorEvent,
    #[serde(rename = "aspectratio")]
    AspectRatio,
    Stretching,
    FlashBlocked,
    HideAdsControls,
    AudioMode,
    AltText,
    InDom,
    TouchMode,
    #[serde(rename = "iFrame")]
    Iframe,
    PlaylistItem,
    VisualQuality,
    Captions,
    Skin,
    CastActive,
}

impl std::fmt::Display for Attr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_value(self) {
            Ok(Value::String(name)) => f.write_str(&name),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// Loose truthiness used for flag-like attributes
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A single attribute change
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub attr: Attr,
    pub value: Value,
    pub previous: Value,
}

/// Model events that are not attribute changes
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    /// The provider entered or left native fullscreen; `state` is set when
    /// the provider knows it
    NativeFullscreen { state: Option<bool> },
    /// The view finished its DOM setup
    ViewSetup,
}

/// Handle for an attribute subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelSubscription {
    pub attr: Attr,
    id: SubscriptionId,
}

/// Observable player model
pub struct PlayerModel {
    values: RefCell<HashMap<Attr, Value>>,
    channels: RefCell<HashMap<Attr, Rc<Emitter<Change>>>>,
    events: Emitter<ModelEvent>,
    provider: RefCell<Option<Rc<dyn MediaProvider>>>,
    media_container: RefCell<Option<ElementRef>>,
    destroyed: Cell<bool>,
}

impl PlayerModel {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            values: RefCell::new(HashMap::new()),
            channels: RefCell::new(HashMap::new()),
            events: Emitter::new(),
            provider: RefCell::new(None),
            media_container: RefCell::new(None),
            destroyed: Cell::new(false),
        })
    }

    /// Create a model seeded with attributes, without notifying
    pub fn with_attrs(attrs: impl IntoIterator<Item = (Attr, Value)>) -> Rc<Self> {
        let model = Self::new();
        model.values.borrow_mut().extend(attrs);
        model
    }

    pub fn get(&self, attr: Attr) -> Value {
        self.values.borrow().get(&attr).cloned().unwrap_or(Value::Null)
    }

    /// Truthiness of an attribute
    pub fn get_bool(&self, attr: Attr) -> bool {
        truthy(&self.get(attr))
    }

    pub fn get_f64(&self, attr: Attr) -> Option<f64> {
        self.get(attr).as_f64()
    }

    pub fn get_u32(&self, attr: Attr) -> Option<u32> {
        self.get_f64(attr).map(|v| v.max(0.0).round() as u32)
    }

    pub fn get_str(&self, attr: Attr) -> Option<String> {
        match self.get(attr) {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn id(&self) -> String {
        self.get_str(Attr::Id).unwrap_or_default()
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState::from_value(&self.get(Attr::State))
    }

    pub fn media_type(&self) -> MediaType {
        MediaType::from_value(&self.get(Attr::MediaType))
    }

    pub fn stream_type(&self) -> StreamType {
        StreamType::from_value(&self.get(Attr::StreamType))
    }

    /// Set an attribute and notify its listeners if the value changed
    pub fn set(&self, attr: Attr, value: impl Into<Value>) {
        let value = value.into();
        let previous = {
            let mut values = self.values.borrow_mut();
            let previous = values.get(&attr).cloned().unwrap_or(Value::Null);
            if previous == value {
                return;
            }
            values.insert(attr, value.clone());
            previous
        };

        let channel = self.channels.borrow().get(&attr).cloned();
        if let Some(channel) = channel {
            channel.emit(&Change {
                attr,
                value,
                previous,
            });
        }
    }

    /// Subscribe to changes of `attr`
    pub fn on(&self, attr: Attr, listener: impl Fn(&Change) + 'static) -> ModelSubscription {
        self.on_rc(attr, Rc::new(listener))
    }

    pub fn on_rc(&self, attr: Attr, listener: Listener<Change>) -> ModelSubscription {
        let channel = self
            .channels
            .borrow_mut()
            .entry(attr)
            .or_insert_with(|| Rc::new(Emitter::new()))
            .clone();
        ModelSubscription {
            attr,
            id: channel.subscribe_rc(listener),
        }
    }

    /// Subscribe to `attr` and immediately deliver its current value
    pub fn change(&self, attr: Attr, listener: impl Fn(&Change) + 'static) -> ModelSubscription {
        let listener: Listener<Change> = Rc::new(listener);
        let subscription = self.on_rc(attr, listener.clone());
        listener(&Change {
            attr,
            value: self.get(attr),
            previous: Value::Null,
        });
        subscription
    }

    pub fn off(&self, subscription: ModelSubscription) -> bool {
        let channel = self.channels.borrow().get(&subscription.attr).cloned();
        channel.map(|c| c.unsubscribe(subscription.id)).unwrap_or(false)
    }

    /// Number of listeners subscribed to `attr`
    pub fn listener_count(&self, attr: Attr) -> usize {
        self.channels.borrow().get(&attr).map(|c| c.len()).unwrap_or(0)
    }

    /// Emit a model event
    pub fn trigger(&self, event: ModelEvent) {
        self.events.emit(&event);
    }

    pub fn provider(&self) -> Option<Rc<dyn MediaProvider>> {
        self.provider.borrow().clone()
    }

    pub fn set_provider(&self, provider: Option<Rc<dyn MediaProvider>>) {
        *self.provider.borrow_mut() = provider;
    }

    /// Element the provider renders its media into
    pub fn media_container(&self) -> Option<ElementRef> {
        self.media_container.borrow().clone()
    }

    pub fn set_media_container(&self, container: ElementRef) {
        *self.media_container.borrow_mut() = Some(container);
    }

    /// Drop every listener; values stay readable
    pub fn destroy(&self) {
        self.destroyed.set(true);
        let channels: Vec<Rc<Emitter<Change>>> = self.channels.borrow_mut().drain().map(|(_, c)| c).collect();
        for channel in channels {
            channel.clear();
        }
        self.events.clear();
        *self.provider.borrow_mut() = None;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }
}

impl Publisher<ModelEvent> for PlayerModel {
    fn emitter(&self) -> &Emitter<ModelEvent> {
        &self.events
    }
}
