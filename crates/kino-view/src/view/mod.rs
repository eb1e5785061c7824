//! View - the presentation engine
//!
//! [`View`] owns the player container and keeps it in step with the
//! [`PlayerModel`]: layout classes and breakpoints, visibility, playback
//! state classes, fullscreen, the controls lifecycle and instream mode.
//!
//! All state lives in one shared inner struct. Model listeners, DOM
//! listeners and deferred callbacks only hold weak references to it, and
//! every one of them is inert once the view is destroyed.

mod controls;
mod fullscreen;
mod instream;
mod interaction;
mod layout;
mod state;

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug, info, instrument, warn};

use crate::bounds::BoundsTracker;
use crate::breakpoint::{Breakpoint, BreakpointClassifier};
use crate::collaborators::{CaptionsRenderer, ClickHandler, ErrorSurface, FullscreenApi, Logo, PlayerApi, Preview, Title};
use crate::config::ViewConfig;
use crate::controls::{Controls, ControlsGeneration, ControlsModuleCache};
use crate::dom::{classes, Element, ElementExt, ElementRef, ListenerId};
use crate::error::{Result, ViewError};
use crate::events::{Emitter, Publisher, SubscriptionId, ViewEvent};
use crate::focus::NoFocusFlag;
use crate::fullscreen::{FullscreenKind, FullscreenStrategy};
use crate::host::Host;
use crate::instream::InstreamSwitcher;
use crate::model::{truthy, Attr, Change, ModelEvent, ModelSubscription, PlayerModel};
use crate::registry::{RegistryKey, ViewRegistry};
use crate::scheduler::ScheduledSlot;
use crate::types::{Dimension, SafeRegion};

/// Regions of the player markup the view drives directly
#[derive(Clone)]
pub struct PlayerLayout {
    pub container: ElementRef,
    /// Element the provider renders media into
    pub media: ElementRef,
    pub preview: ElementRef,
    pub title: ElementRef,
    /// Overlay layer above the media; pointer moves here wake the controls
    pub overlays: ElementRef,
    /// Sizer used while an aspect ratio is active
    pub aspect: ElementRef,
}

/// Collaborators and shared services handed to a view
#[derive(Clone)]
pub struct ViewServices {
    pub host: Rc<dyn Host>,
    pub api: Rc<dyn PlayerApi>,
    pub preview: Rc<dyn Preview>,
    pub title: Rc<dyn Title>,
    pub captions: Rc<dyn CaptionsRenderer>,
    pub logo: Rc<dyn Logo>,
    pub error_surface: Rc<dyn ErrorSurface>,
    pub click_handler: Rc<dyn ClickHandler>,
    pub fullscreen: Rc<dyn FullscreenApi>,
    pub controls: Rc<ControlsModuleCache>,
    pub registry: Rc<ViewRegistry>,
}

/// Listeners that exist only while a controls instance is attached
struct ControlsBinding {
    events: SubscriptionId,
    stream_type: ModelSubscription,
    overlay_move: ListenerId,
}

struct ViewInner {
    this: Weak<ViewInner>,
    config: ViewConfig,
    classifier: BreakpointClassifier,
    model: Rc<PlayerModel>,
    layout: PlayerLayout,

    host: Rc<dyn Host>,
    api: Rc<dyn PlayerApi>,
    preview: Rc<dyn Preview>,
    title: Rc<dyn Title>,
    captions: Rc<dyn CaptionsRenderer>,
    logo: Rc<dyn Logo>,
    error_surface: Rc<dyn ErrorSurface>,
    controls_module: Rc<ControlsModuleCache>,
    registry: Rc<ViewRegistry>,
    events: Emitter<ViewEvent>,

    is_setup: Cell<bool>,
    initialized: Cell<bool>,
    destroyed: Cell<bool>,
    registry_key: Cell<Option<RegistryKey>>,

    bounds: RefCell<BoundsTracker>,
    resize_frame: ScheduledSlot,
    state_frame: ScheduledSlot,
    media_resize: ScheduledSlot,

    fullscreen_api: RefCell<Option<Rc<dyn FullscreenApi>>>,
    strategy: RefCell<Option<Rc<dyn FullscreenStrategy>>>,
    focus: RefCell<Option<NoFocusFlag>>,
    click_handler: RefCell<Option<Rc<dyn ClickHandler>>>,
    click_subscription: Cell<Option<SubscriptionId>>,
    logo_subscription: Cell<Option<SubscriptionId>>,

    controls: RefCell<Option<Rc<dyn Controls>>>,
    controls_binding: RefCell<Option<ControlsBinding>>,
    controls_generation: ControlsGeneration,
    instream: InstreamSwitcher,
    error_element: RefCell<Option<ElementRef>>,
    model_subscriptions: RefCell<Vec<ModelSubscription>>,
    model_events: Cell<Option<SubscriptionId>>,
}

/// Presentation engine for one player instance
#[derive(Clone)]
pub struct View {
    inner: Rc<ViewInner>,
}

impl View {
    /// Create a view; nothing touches the DOM until [`View::setup`]
    pub fn new(config: ViewConfig, model: Rc<PlayerModel>, layout: PlayerLayout, services: ViewServices) -> Result<Self> {
        config.validate()?;
        let classifier = BreakpointClassifier::from_config(&config);
        let settle = config.fullscreen_settle_delay();

        let inner = Rc::new_cyclic(|this| ViewInner {
            this: this.clone(),
            bounds: RefCell::new(BoundsTracker::new(classifier.clone())),
            classifier,
            model,
            layout,
            resize_frame: ScheduledSlot::frame(services.host.clone()),
            state_frame: ScheduledSlot::frame(services.host.clone()),
            media_resize: ScheduledSlot::timeout(services.host.clone(), settle),
            config,
            host: services.host,
            api: services.api,
            preview: services.preview,
            title: services.title,
            captions: services.captions,
            logo: services.logo,
            error_surface: services.error_surface,
            controls_module: services.controls,
            registry: services.registry,
            events: Emitter::new(),
            is_setup: Cell::new(false),
            initialized: Cell::new(false),
            destroyed: Cell::new(false),
            registry_key: Cell::new(None),
            fullscreen_api: RefCell::new(Some(services.fullscreen)),
            strategy: RefCell::new(None),
            focus: RefCell::new(None),
            click_handler: RefCell::new(Some(services.click_handler)),
            click_subscription: Cell::new(None),
            logo_subscription: Cell::new(None),
            controls: RefCell::new(None),
            controls_binding: RefCell::new(None),
            controls_generation: ControlsGeneration::new(),
            instream: InstreamSwitcher::new(),
            error_element: RefCell::new(None),
            model_subscriptions: RefCell::new(Vec::new()),
            model_events: Cell::new(None),
        });

        Ok(Self { inner })
    }

    /// Attach collaborators to the markup and start observing the model
    pub fn setup(&self) -> Result<()> {
        self.inner.setup()
    }

    /// First measurement and the playback-driven subscriptions
    pub fn init(&self) -> Result<()> {
        self.inner.init()
    }

    pub fn is_setup(&self) -> bool {
        self.inner.is_setup.get()
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    /// Apply player dimensions and re-layout synchronously
    pub fn resize(&self, width: impl Into<Dimension>, height: impl Into<Dimension>) {
        if self.inner.is_live() {
            self.inner.resize(width.into(), height.into());
        }
    }

    pub fn update_bounds(&self) {
        if self.inner.is_live() {
            self.inner.update_bounds();
        }
    }

    pub fn update_styles(&self) {
        if self.inner.is_live() {
            self.inner.update_styles();
        }
    }

    pub fn check_resized(&self) {
        if self.inner.is_live() {
            self.inner.check_resized();
        }
    }

    /// Resize preview and provider to the committed container size
    pub fn resize_media(&self) {
        if self.inner.is_live() {
            self.inner.resize_media(None, None);
        }
    }

    /// Attach a controls instance; a different attached one is detached first
    pub fn add_controls(&self, controls: Rc<dyn Controls>) {
        if self.inner.is_live() {
            self.inner.add_controls(controls);
        }
    }

    pub fn remove_controls(&self) {
        if self.inner.is_live() {
            self.inner.remove_controls();
        }
    }

    /// Request controls on or off; enabling again retries a failed load
    pub fn set_controls_enabled(&self, enabled: bool) {
        if self.inner.is_live() {
            self.inner.set_controls_enabled(enabled);
        }
    }

    pub fn set_alt_text(&self, text: &str) {
        if self.inner.is_live() {
            self.inner.set_alt_text(text);
        }
    }

    /// Re-create the captions renderer with a new style
    pub fn set_captions(&self, style: &Value) {
        if self.inner.is_live() {
            self.inner.set_captions(style);
        }
    }

    /// Player area not covered by the control bar
    pub fn get_safe_region(&self, exclude_controlbar: bool) -> SafeRegion {
        self.inner.safe_region(exclude_controlbar)
    }

    pub fn element(&self) -> ElementRef {
        self.inner.layout.container.clone()
    }

    pub fn get_container(&self) -> ElementRef {
        self.element()
    }

    pub fn controls_container(&self) -> Option<ElementRef> {
        self.inner.current_controls().map(|c| c.element())
    }

    pub fn controls(&self) -> Option<Rc<dyn Controls>> {
        self.inner.current_controls()
    }

    /// Display click handler, until the view is destroyed
    pub fn click_handler(&self) -> Option<Rc<dyn ClickHandler>> {
        self.inner.click_handler.borrow().clone()
    }

    pub fn breakpoint(&self) -> Option<Breakpoint> {
        self.inner.bounds.borrow().breakpoint()
    }

    pub fn fullscreen_kind(&self) -> Option<FullscreenKind> {
        self.inner.strategy.borrow().as_ref().map(|s| s.kind())
    }

    pub fn model(&self) -> &Rc<PlayerModel> {
        &self.inner.model
    }

    pub fn config(&self) -> &ViewConfig {
        &self.inner.config
    }

    /// Listen to view events
    pub fn subscribe(&self, listener: impl Fn(&ViewEvent) + 'static) -> SubscriptionId {
        self.inner.events.subscribe(listener)
    }

    /// Release everything the view acquired; later calls do nothing
    pub fn destroy(&self) {
        self.inner.destroy();
    }
}

impl Publisher<ViewEvent> for View {
    fn emitter(&self) -> &Emitter<ViewEvent> {
        &self.inner.events
    }
}

impl ViewInner {
    fn is_live(&self) -> bool {
        if self.destroyed.get() {
            debug!("Ignoring call on destroyed view");
            return false;
        }
        true
    }

    fn container(&self) -> &ElementRef {
        &self.layout.container
    }

    fn current_controls(&self) -> Option<Rc<dyn Controls>> {
        self.controls.borrow().clone()
    }

    fn current_strategy(&self) -> Option<Rc<dyn FullscreenStrategy>> {
        self.strategy.borrow().clone()
    }

    /// Subscribe `handler` to `attr`; the subscription dies with the view
    fn watch(&self, attr: Attr, handler: fn(&ViewInner, &Change)) {
        let subscription = self.subscribe_attr(attr, handler, false);
        self.model_subscriptions.borrow_mut().push(subscription);
    }

    /// Like [`ViewInner::watch`], also running `handler` with the current value
    fn watch_now(&self, attr: Attr, handler: fn(&ViewInner, &Change)) {
        let subscription = self.subscribe_attr(attr, handler, true);
        self.model_subscriptions.borrow_mut().push(subscription);
    }

    fn subscribe_attr(&self, attr: Attr, handler: fn(&ViewInner, &Change), immediate: bool) -> ModelSubscription {
        let weak = self.this.clone();
        let listener = move |change: &Change| {
            if let Some(view) = weak.upgrade() {
                if !view.destroyed.get() {
                    handler(&view, change);
                }
            }
        };
        if immediate {
            self.model.change(attr, listener)
        } else {
            self.model.on(attr, listener)
        }
    }

    /// Mirror a flag-like attribute onto a container class
    fn mirror_flag(&self, attr: Attr, class: &'static str, immediate: bool) {
        let weak = self.this.clone();
        let listener = move |change: &Change| {
            if let Some(view) = weak.upgrade() {
                if !view.destroyed.get() {
                    view.container().toggle_class(class, truthy(&change.value));
                }
            }
        };
        let subscription = if immediate {
            self.model.change(attr, listener)
        } else {
            self.model.on(attr, listener)
        };
        self.model_subscriptions.borrow_mut().push(subscription);
    }

    #[instrument(skip(self), fields(id = %self.model.id()))]
    fn setup(&self) -> Result<()> {
        if self.destroyed.get() {
            return Err(ViewError::Destroyed);
        }
        if self.is_setup.get() {
            warn!("View already set up");
            return Ok(());
        }

        let container = self.container().clone();
        self.preview.setup(self.layout.preview.clone());
        self.title.setup(self.layout.title.clone());

        self.logo.setup();
        self.logo.set_container(container.clone());
        self.bind_logo();

        self.captions.setup(&self.model.id(), &self.model.get(Attr::Captions));
        // Captions sit behind the controls and stay visible when they hide
        container.insert_before(&self.captions.element(), Some(&self.title.element()));

        self.bind_click_handler();
        *self.focus.borrow_mut() = Some(NoFocusFlag::attach(container.clone()));
        self.setup_fullscreen();

        self.watch(Attr::ErrorEvent, ViewInner::on_error_event);
        self.mirror_flag(Attr::HideAdsControls, classes::ADS_HIDE_CONTROLS, false);
        self.mirror_flag(Attr::Scrubbing, classes::DRAGGING, false);
        self.mirror_flag(Attr::PlayRejected, classes::PLAY_REJECTED, false);
        self.bind_model_events();
        self.watch(Attr::MediaType, ViewInner::on_media_type_change);
        self.watch(Attr::VisualQuality, |view, _| view.resize_media(None, None));
        self.watch_now(Attr::Stretching, ViewInner::on_stretching_change);
        self.mirror_flag(Attr::FlashBlocked, classes::FLASH_BLOCKED, true);

        let width = Dimension::from_value(&self.model.get(Attr::Width));
        let height = Dimension::from_value(&self.model.get(Attr::Height));
        self.resize_player(width.clone(), height.clone(), false);
        self.watch_now(Attr::AspectRatio, ViewInner::on_aspect_ratio_change);
        if self.model.get_bool(Attr::Controls) {
            let pixels = |d: &Option<Dimension>| d.as_ref().and_then(Dimension::pixels);
            self.update_container_styles(pixels(&width), pixels(&height));
        }
        // Hidden until a controls instance attaches
        container.toggle_class(classes::CONTROLS_HIDDEN, true);

        if self.config.platform.legacy_fullscreen {
            container.toggle_class(classes::LEGACY, true);
        }

        let skin = self.model.get(Attr::Skin);
        if let Some(name) = skin.get("name").and_then(Value::as_str) {
            container.replace_prefixed_class(classes::SKIN_PREFIX, &format!("{}{}", classes::SKIN_PREFIX, name));
        }

        self.model.set_media_container(self.layout.media.clone());
        self.model.set(Attr::Iframe, self.config.platform.iframe);
        self.model.set(Attr::ActiveTab, self.host.is_tab_active());
        let touch_mode = self.config.platform.mobile
            && match &height {
                Some(Dimension::Css(_)) => true,
                Some(Dimension::Pixels(px)) => *px >= self.config.controlbar_only_height,
                None => false,
            };
        self.model.set(Attr::TouchMode, touch_mode);

        self.registry_key.set(Some(self.registry.add()));
        self.is_setup.set(true);
        self.model.trigger(ModelEvent::ViewSetup);

        let in_dom = container.is_connected();
        if in_dom {
            self.registry.observe(&container.id());
        }
        self.model.set(Attr::InDom, in_dom);

        info!(in_dom, "View setup complete");
        Ok(())
    }

    fn bind_model_events(&self) {
        let weak = self.this.clone();
        let id = self.model.emitter().subscribe(move |event: &ModelEvent| {
            let Some(view) = weak.upgrade() else {
                return;
            };
            if view.destroyed.get() {
                return;
            }
            if let ModelEvent::NativeFullscreen { state } = event {
                view.on_fullscreen_change(*state);
            }
        });
        self.model_events.set(Some(id));
    }

    #[instrument(skip(self), fields(id = %self.model.id()))]
    fn init(&self) -> Result<()> {
        if self.destroyed.get() {
            return Err(ViewError::Destroyed);
        }
        if !self.is_setup.get() {
            return Err(ViewError::NotSetup);
        }
        if self.initialized.replace(true) {
            warn!("View already initialized");
            return Ok(());
        }

        self.update_bounds();

        self.watch(Attr::Fullscreen, ViewInner::on_fullscreen);
        self.watch(Attr::ActiveTab, |view, _| view.update_visibility());
        self.watch(Attr::Fullscreen, |view, _| view.update_visibility());
        self.watch(Attr::IntersectionRatio, |view, _| view.update_visibility());
        self.watch(Attr::Visibility, ViewInner::redraw);
        self.watch(Attr::Instream, ViewInner::on_instream_change);

        self.update_visibility();

        // The first player always draws so its assets load
        if self.registry.size() == 1 && !self.model.get_bool(Attr::Visibility) {
            debug!("Forcing initial draw of hidden player");
            self.refresh_presentation();
        }

        self.watch_now(Attr::State, ViewInner::on_state_change);
        self.watch_now(Attr::Controls, ViewInner::on_controls_change);
        if self.config.platform.mobile {
            self.watch_now(Attr::PlaylistItem, ViewInner::set_media_title_attribute);
        }

        // Always notify the first size; the player reports ready on it
        self.bounds.borrow_mut().reset();
        self.check_resized();
        Ok(())
    }

    fn set_captions(&self, style: &Value) {
        self.captions.clear();
        self.captions.setup(&self.model.id(), style);
        self.captions.resize();
    }

    #[instrument(skip(self), fields(id = %self.model.id()))]
    fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        info!("Destroying view");

        self.controls_generation.invalidate();
        let subscriptions: Vec<ModelSubscription> = self.model_subscriptions.borrow_mut().drain(..).collect();
        for subscription in subscriptions {
            self.model.off(subscription);
        }
        if let Some(id) = self.model_events.take() {
            self.model.emitter().unsubscribe(id);
        }
        self.model.destroy();

        let container = self.container().clone();
        self.registry.unobserve(&container.id());
        if let Some(key) = self.registry_key.take() {
            self.registry.remove(key);
        }
        self.is_setup.set(false);
        self.events.clear();

        self.resize_frame.cancel();
        self.state_frame.cancel();
        self.media_resize.cancel();

        if let Some(focus) = self.focus.borrow_mut().take() {
            focus.release();
        }
        let fullscreen_api = self.fullscreen_api.borrow_mut().take();
        if let Some(api) = fullscreen_api {
            api.destroy();
        }
        self.strategy.borrow_mut().take();

        let controls = self.controls.borrow_mut().take();
        let binding = self.controls_binding.borrow_mut().take();
        if let Some(controls) = controls {
            if let Some(binding) = binding {
                controls.off(binding.events);
                self.layout.overlays.remove_listener(binding.overlay_move);
            }
            controls.disable(&self.model);
        }

        let click_handler = self.click_handler.borrow_mut().take();
        if let Some(handler) = click_handler {
            if let Some(id) = self.click_subscription.take() {
                handler.off(id);
            }
            handler.destroy();
        }

        self.captions.destroy();
        if let Some(id) = self.logo_subscription.take() {
            self.logo.off(id);
        }
        self.logo.destroy();
    }
}
