//! Recording collaborators and a harness for driving a headless view

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use tokio::sync::oneshot;

use kino_view::headless::{HeadlessLayout, ManualHost, MemoryElement};
use kino_view::{
    Attr, CaptionsRenderer, ClickEvent, ClickHandler, Controls, ControlsEvent, ControlsFactory, ControlsLoader,
    ControlsModuleCache, Element, ElementRef, Emitter, ErrorSurface, FullscreenApi, Logo, LogoClick, MediaProvider, PlayerApi,
    PlayerModel, Preview, Publisher, Reason, Title, View, ViewConfig, ViewEvent, ViewRegistry, ViewServices,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Collaborators
// ============================================================================

#[derive(Default)]
pub struct RecordingProvider {
    pub resizes: RefCell<Vec<(u32, u32, String)>>,
    pub containers: RefCell<Vec<String>>,
    pub fullscreen: Cell<bool>,
    pub fullscreen_requests: RefCell<Vec<bool>>,
    pub media: RefCell<Option<Rc<MemoryElement>>>,
}

impl MediaProvider for RecordingProvider {
    fn name(&self) -> String {
        "html5".to_string()
    }

    fn resize(&self, width: u32, height: u32, stretching: &str) {
        self.resizes.borrow_mut().push((width, height, stretching.to_string()));
    }

    fn set_fullscreen(&self, fullscreen: bool) {
        self.fullscreen_requests.borrow_mut().push(fullscreen);
        self.fullscreen.set(fullscreen);
    }

    fn get_fullscreen(&self) -> bool {
        self.fullscreen.get()
    }

    fn set_container(&self, container: ElementRef) {
        self.containers.borrow_mut().push(container.id());
    }

    fn media_element(&self) -> Option<ElementRef> {
        self.media.borrow().clone().map(|m| m as ElementRef)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    PlayToggle,
    Pause,
    Fullscreen(Option<bool>),
}

#[derive(Default)]
pub struct RecordingApi {
    pub calls: RefCell<Vec<ApiCall>>,
}

impl RecordingApi {
    pub fn take(&self) -> Vec<ApiCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }
}

impl PlayerApi for RecordingApi {
    fn play_toggle(&self, reason: Reason) {
        assert_eq!(reason, Reason::Interaction);
        self.calls.borrow_mut().push(ApiCall::PlayToggle);
    }

    fn pause(&self, _reason: Reason) {
        self.calls.borrow_mut().push(ApiCall::Pause);
    }

    fn set_fullscreen(&self, state: Option<bool>) {
        self.calls.borrow_mut().push(ApiCall::Fullscreen(state));
    }
}

pub struct StubPreview {
    element: Rc<MemoryElement>,
    pub images: RefCell<Vec<Option<String>>>,
    pub resizes: RefCell<Vec<(u32, u32)>>,
}

impl Preview for StubPreview {
    fn setup(&self, _element: ElementRef) {}

    fn resize(&self, width: u32, height: u32, _stretching: &str) {
        self.resizes.borrow_mut().push((width, height));
    }

    fn set_image(&self, image: Option<&str>) {
        self.images.borrow_mut().push(image.map(str::to_string));
    }

    fn element(&self) -> ElementRef {
        self.element.clone()
    }
}

pub struct StubTitle {
    element: Rc<MemoryElement>,
    pub hidden: Cell<usize>,
    pub items: RefCell<Vec<Value>>,
}

impl Title for StubTitle {
    fn setup(&self, _element: ElementRef) {}

    fn playlist_item(&self, item: &Value) {
        self.items.borrow_mut().push(item.clone());
    }

    fn hide(&self) {
        self.hidden.set(self.hidden.get() + 1);
    }

    fn element(&self) -> ElementRef {
        self.element.clone()
    }
}

pub struct StubCaptions {
    pub element: Rc<MemoryElement>,
    pub visible: Cell<Option<bool>>,
    pub cue_renders: Cell<usize>,
    pub setups: RefCell<Vec<Value>>,
    pub resizes: Cell<usize>,
    pub clears: Cell<usize>,
    pub destroyed: Cell<bool>,
}

impl StubCaptions {
    fn new() -> Self {
        Self {
            element: MemoryElement::with_class("captions", "kino-captions"),
            visible: Cell::new(None),
            cue_renders: Cell::new(0),
            setups: RefCell::new(Vec::new()),
            resizes: Cell::new(0),
            clears: Cell::new(0),
            destroyed: Cell::new(false),
        }
    }
}

impl CaptionsRenderer for StubCaptions {
    fn setup(&self, _player_id: &str, style: &Value) {
        self.setups.borrow_mut().push(style.clone());
    }

    fn resize(&self) {
        self.resizes.set(self.resizes.get() + 1);
    }

    fn show(&self) {
        self.visible.set(Some(true));
    }

    fn hide(&self) {
        self.visible.set(Some(false));
    }

    fn render_cues(&self, _immediate: bool) {
        self.cue_renders.set(self.cue_renders.get() + 1);
    }

    fn clear(&self) {
        self.clears.set(self.clears.get() + 1);
    }

    fn destroy(&self) {
        self.destroyed.set(true);
    }

    fn element(&self) -> ElementRef {
        self.element.clone()
    }
}

pub struct StubLogo {
    pub element: Rc<MemoryElement>,
    events: Emitter<LogoClick>,
    pub container: RefCell<Option<String>>,
    pub destroyed: Cell<usize>,
}

impl StubLogo {
    fn new() -> Self {
        Self {
            element: MemoryElement::with_class("logo", "kino-logo"),
            events: Emitter::new(),
            container: RefCell::new(None),
            destroyed: Cell::new(0),
        }
    }

    pub fn click(&self, link: Option<&str>, target: Option<&str>) {
        self.events.emit(&LogoClick {
            link: link.map(str::to_string),
            target: target.map(str::to_string),
        });
    }
}

impl Publisher<LogoClick> for StubLogo {
    fn emitter(&self) -> &Emitter<LogoClick> {
        &self.events
    }
}

impl Logo for StubLogo {
    fn setup(&self) {}

    fn set_container(&self, container: ElementRef) {
        *self.container.borrow_mut() = Some(container.id());
    }

    fn element(&self) -> ElementRef {
        self.element.clone()
    }

    fn destroy(&self) {
        self.destroyed.set(self.destroyed.get() + 1);
    }
}

#[derive(Default)]
pub struct StubErrorSurface {
    pub messages: RefCell<Vec<String>>,
}

impl ErrorSurface for StubErrorSurface {
    fn render(&self, _model: &PlayerModel, message: &str) -> ElementRef {
        self.messages.borrow_mut().push(message.to_string());
        MemoryElement::with_class("error", "kino-error-msg")
    }
}

#[derive(Default)]
pub struct StubClickHandler {
    events: Emitter<ClickEvent>,
    pub reverts: Cell<usize>,
    pub destroyed: Cell<bool>,
}

impl StubClickHandler {
    pub fn fire(&self, event: ClickEvent) {
        self.events.emit(&event);
    }
}

impl Publisher<ClickEvent> for StubClickHandler {
    fn emitter(&self) -> &Emitter<ClickEvent> {
        &self.events
    }
}

impl ClickHandler for StubClickHandler {
    fn revert_alternate_click_handlers(&self) {
        self.reverts.set(self.reverts.get() + 1);
    }

    fn destroy(&self) {
        self.destroyed.set(true);
    }
}

/// Document fullscreen that reports changes synchronously
pub struct FakeFullscreen {
    supported: bool,
    element: RefCell<Option<String>>,
    on_change: RefCell<Option<Rc<dyn Fn()>>>,
    pub requests: Cell<usize>,
    pub exits: Cell<usize>,
    pub destroyed: Cell<bool>,
}

impl FakeFullscreen {
    pub fn new(supported: bool) -> Self {
        Self {
            supported,
            element: RefCell::new(None),
            on_change: RefCell::new(None),
            requests: Cell::new(0),
            exits: Cell::new(0),
            destroyed: Cell::new(false),
        }
    }

    fn notify(&self) {
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    /// The user left fullscreen through the browser
    pub fn external_exit(&self) {
        *self.element.borrow_mut() = None;
        self.notify();
    }
}

impl FullscreenApi for FakeFullscreen {
    fn supports_dom_fullscreen(&self) -> bool {
        self.supported
    }

    fn request(&self, element: &ElementRef) {
        self.requests.set(self.requests.get() + 1);
        *self.element.borrow_mut() = Some(element.id());
        self.notify();
    }

    fn exit(&self) {
        self.exits.set(self.exits.get() + 1);
        *self.element.borrow_mut() = None;
        self.notify();
    }

    fn fullscreen_element_id(&self) -> Option<String> {
        self.element.borrow().clone()
    }

    fn bind(&self, on_change: Rc<dyn Fn()>) {
        *self.on_change.borrow_mut() = Some(on_change);
    }

    fn destroy(&self) {
        self.on_change.borrow_mut().take();
        self.destroyed.set(true);
    }
}

// ============================================================================
// Controls
// ============================================================================

pub struct RecordingControls {
    element: Rc<MemoryElement>,
    logo_container: Rc<MemoryElement>,
    events: Emitter<ControlsEvent>,
    pub log: RefCell<Vec<String>>,
    pub showing: Cell<bool>,
    pub settings_open: Cell<bool>,
}

impl RecordingControls {
    pub fn new(id: &str) -> Rc<Self> {
        Rc::new(Self {
            element: MemoryElement::with_class(id, "kino-controls"),
            logo_container: MemoryElement::new(format!("{}-logo", id)),
            events: Emitter::new(),
            log: RefCell::new(Vec::new()),
            showing: Cell::new(true),
            settings_open: Cell::new(false),
        })
    }

    fn record(&self, entry: impl Into<String>) {
        self.log.borrow_mut().push(entry.into());
    }

    pub fn count(&self, entry: &str) -> usize {
        self.log.borrow().iter().filter(|e| *e == entry).count()
    }

    pub fn emit(&self, event: ControlsEvent) {
        self.events.emit(&event);
    }

    pub fn subscribers(&self) -> usize {
        self.events.len()
    }
}

impl Publisher<ControlsEvent> for RecordingControls {
    fn emitter(&self) -> &Emitter<ControlsEvent> {
        &self.events
    }
}

impl Controls for RecordingControls {
    fn enable(&self, _api: Rc<dyn PlayerApi>, _model: Rc<PlayerModel>) {
        self.record("enable");
    }

    fn disable(&self, _model: &PlayerModel) {
        self.record("disable");
    }

    fn resize(&self, width: u32, height: u32) {
        self.record(format!("resize {}x{}", width, height));
    }

    fn add_active_listeners(&self, _element: &ElementRef) {
        self.record("add_active_listeners");
    }

    fn remove_active_listeners(&self, _element: &ElementRef) {
        self.record("remove_active_listeners");
    }

    fn setup_instream(&self) {
        self.record("setup_instream");
    }

    fn destroy_instream(&self, _model: &PlayerModel) {
        self.record("destroy_instream");
    }

    fn unmute_autoplay(&self, _api: &Rc<dyn PlayerApi>, _model: &PlayerModel) {
        self.record("unmute_autoplay");
    }

    fn controlbar_height(&self) -> u32 {
        40
    }

    fn logo_container(&self) -> Option<ElementRef> {
        Some(self.logo_container.clone())
    }

    fn element(&self) -> ElementRef {
        self.element.clone()
    }

    fn showing(&self) -> bool {
        self.showing.get()
    }

    fn user_active(&self) {
        self.record("user_active");
        self.showing.set(true);
    }

    fn user_inactive(&self) {
        self.record("user_inactive");
        self.showing.set(false);
    }

    fn settings_menu_visible(&self) -> bool {
        self.settings_open.get()
    }

    fn close_settings_menu(&self) {
        self.record("close_settings_menu");
        self.settings_open.set(false);
    }
}

#[derive(Default)]
pub struct CountingFactory {
    pub created: RefCell<Vec<Rc<RecordingControls>>>,
}

impl CountingFactory {
    pub fn count(&self) -> usize {
        self.created.borrow().len()
    }

    pub fn last(&self) -> Option<Rc<RecordingControls>> {
        self.created.borrow().last().cloned()
    }
}

impl ControlsFactory for CountingFactory {
    fn create(&self, _container: ElementRef) -> Rc<dyn Controls> {
        let controls = RecordingControls::new(&format!("controls-{}", self.count()));
        self.created.borrow_mut().push(controls.clone());
        controls
    }
}

/// Loader whose outcomes are scripted; the first load may wait on a gate
pub struct ScriptedLoader {
    factory: Rc<CountingFactory>,
    outcomes: RefCell<VecDeque<bool>>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
    pub calls: Rc<Cell<usize>>,
}

#[async_trait(?Send)]
impl ControlsLoader for ScriptedLoader {
    async fn load(&self) -> anyhow::Result<Rc<dyn ControlsFactory>> {
        self.calls.set(self.calls.get() + 1);
        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let succeed = self.outcomes.borrow_mut().pop_front().unwrap_or(true);
        if succeed {
            Ok(self.factory.clone() as Rc<dyn ControlsFactory>)
        } else {
            Err(anyhow::anyhow!("controls bundle unreachable"))
        }
    }
}

// ============================================================================
// Harness
// ============================================================================

/// How the controls module becomes available
pub enum ModuleSource {
    Preloaded,
    /// Loaded on demand; `false` entries fail
    Loader { outcomes: Vec<bool>, gated: bool },
}

pub struct HarnessOptions {
    pub config: ViewConfig,
    pub attrs: Vec<(Attr, Value)>,
    pub connected: bool,
    pub size: (f64, f64),
    pub fullscreen_supported: bool,
    pub module: ModuleSource,
    pub registry: Option<Rc<ViewRegistry>>,
    pub id: String,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            config: ViewConfig::default(),
            attrs: Vec::new(),
            connected: true,
            size: (640.0, 360.0),
            fullscreen_supported: true,
            module: ModuleSource::Preloaded,
            registry: None,
            id: "player".to_string(),
        }
    }
}

pub struct Harness {
    pub view: View,
    pub model: Rc<PlayerModel>,
    pub layout: HeadlessLayout,
    pub host: Rc<ManualHost>,
    pub api: Rc<RecordingApi>,
    pub provider: Rc<RecordingProvider>,
    pub preview: Rc<StubPreview>,
    pub title: Rc<StubTitle>,
    pub captions: Rc<StubCaptions>,
    pub logo: Rc<StubLogo>,
    pub errors: Rc<StubErrorSurface>,
    pub click: Rc<StubClickHandler>,
    pub fullscreen: Rc<FakeFullscreen>,
    pub factory: Rc<CountingFactory>,
    pub module: Rc<ControlsModuleCache>,
    pub loader_calls: Rc<Cell<usize>>,
    pub gate: RefCell<Option<oneshot::Sender<()>>>,
    pub registry: Rc<ViewRegistry>,
    pub events: Rc<RefCell<Vec<ViewEvent>>>,
}

pub fn default_attrs(id: &str) -> Vec<(Attr, Value)> {
    vec![
        (Attr::Id, json!(id)),
        (Attr::State, json!("idle")),
        (Attr::Controls, json!(true)),
        (Attr::MediaType, json!("video")),
        (Attr::Width, json!(640)),
        (Attr::Height, json!(360)),
        (Attr::Stretching, json!("uniform")),
        (
            Attr::PlaylistItem,
            json!({"title": "Big Buck Bunny", "image": "poster.jpg"}),
        ),
    ]
}

impl Harness {
    /// Build a view and set it up, without initializing it
    pub fn build(options: HarnessOptions) -> Self {
        init_tracing();

        let layout = HeadlessLayout::new(&options.id);
        layout.container.set_connected(options.connected);
        layout.container.set_size(options.size.0, options.size.1);

        let mut attrs = default_attrs(&options.id);
        attrs.extend(options.attrs);
        let model = PlayerModel::with_attrs(attrs);

        let provider = Rc::new(RecordingProvider::default());
        model.set_provider(Some(provider.clone() as Rc<dyn MediaProvider>));

        let factory = Rc::new(CountingFactory::default());
        let loader_calls = Rc::new(Cell::new(0));
        let mut gate_tx = None;
        let module = match options.module {
            ModuleSource::Preloaded => ControlsModuleCache::preloaded(factory.clone()),
            ModuleSource::Loader { outcomes, gated } => {
                let gate = if gated {
                    let (tx, rx) = oneshot::channel();
                    gate_tx = Some(tx);
                    Some(rx)
                } else {
                    None
                };
                ControlsModuleCache::new(Box::new(ScriptedLoader {
                    factory: factory.clone(),
                    outcomes: RefCell::new(outcomes.into()),
                    gate: RefCell::new(gate),
                    calls: loader_calls.clone(),
                }))
            }
        };

        let host = Rc::new(ManualHost::new());
        let api = Rc::new(RecordingApi::default());
        let preview = Rc::new(StubPreview {
            element: layout.preview.clone(),
            images: RefCell::new(Vec::new()),
            resizes: RefCell::new(Vec::new()),
        });
        let title = Rc::new(StubTitle {
            element: layout.title.clone(),
            hidden: Cell::new(0),
            items: RefCell::new(Vec::new()),
        });
        let captions = Rc::new(StubCaptions::new());
        let logo = Rc::new(StubLogo::new());
        let errors = Rc::new(StubErrorSurface::default());
        let click = Rc::new(StubClickHandler::default());
        let fullscreen = Rc::new(FakeFullscreen::new(options.fullscreen_supported));
        let registry = options.registry.unwrap_or_else(ViewRegistry::new);

        let services = ViewServices {
            host: host.clone(),
            api: api.clone(),
            preview: preview.clone(),
            title: title.clone(),
            captions: captions.clone(),
            logo: logo.clone(),
            error_surface: errors.clone(),
            click_handler: click.clone(),
            fullscreen: fullscreen.clone(),
            controls: module.clone(),
            registry: registry.clone(),
        };

        let view = View::new(options.config, model.clone(), layout.layout(), services).expect("valid config");

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        view.subscribe(move |event: &ViewEvent| sink.borrow_mut().push(event.clone()));

        view.setup().expect("setup");

        Self {
            view,
            model,
            layout,
            host,
            api,
            provider,
            preview,
            title,
            captions,
            logo,
            errors,
            click,
            fullscreen,
            factory,
            module,
            loader_calls,
            gate: RefCell::new(gate_tx),
            registry,
            events,
        }
    }

    /// Build, set up and initialize a view
    pub fn start(options: HarnessOptions) -> Self {
        let harness = Self::build(options);
        harness.view.init().expect("init");
        harness
    }

    pub fn new() -> Self {
        Self::start(HarnessOptions::default())
    }

    pub fn open_gate(&self) {
        if let Some(tx) = self.gate.borrow_mut().take() {
            let _ = tx.send(());
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.layout.container.has_class(class)
    }

    pub fn sorted_classes(&self) -> Vec<String> {
        let mut classes = self.layout.container.class_names();
        classes.sort();
        classes
    }

    pub fn take_events(&self) -> Vec<ViewEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn resizes(&self) -> Vec<(u32, u32)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Resize { width, height } => Some((*width, *height)),
                _ => None,
            })
            .collect()
    }

    pub fn breakpoints(&self) -> Vec<u8> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Breakpoint { breakpoint } => Some(*breakpoint),
                _ => None,
            })
            .collect()
    }

    pub fn error_events(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, ViewEvent::Error { .. }))
            .count()
    }

    pub fn controls(&self) -> Option<Rc<RecordingControls>> {
        self.factory.last()
    }
}
