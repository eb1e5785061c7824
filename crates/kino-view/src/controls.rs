//! Controls subsystem contracts and lifecycle helpers
//!
//! The interactive controls (control bar, settings menu, ...) ship as a
//! separately loaded module. The view asks a [`ControlsModuleCache`] for the
//! module's [`ControlsFactory`]; the first request runs the
//! [`ControlsLoader`], later ones reuse the result. A failed load is not
//! cached, so the next enable request retries.
//!
//! Because the load is asynchronous, the desired state can change while it
//! is in flight. Every enable request takes a [`ControlsTicket`] from the
//! view's [`ControlsGeneration`]; a completed load is only honored when its
//! ticket is still current.

use async_trait::async_trait;
use std::cell::Cell;
use std::rc::Rc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::collaborators::PlayerApi;
use crate::dom::ElementRef;
use crate::error::{Result, ViewError};
use crate::events::{ControlsEvent, Publisher};
use crate::model::PlayerModel;

/// A live controls instance
pub trait Controls: Publisher<ControlsEvent> {
    fn enable(&self, api: Rc<dyn PlayerApi>, model: Rc<PlayerModel>);
    fn disable(&self, model: &PlayerModel);
    fn resize(&self, width: u32, height: u32);

    /// Treat interaction with `element` as user activity
    fn add_active_listeners(&self, element: &ElementRef);
    fn remove_active_listeners(&self, element: &ElementRef);

    fn setup_instream(&self);
    fn destroy_instream(&self, model: &PlayerModel);

    /// Unmute a muted autostart, e.g. when entering fullscreen
    fn unmute_autoplay(&self, api: &Rc<dyn PlayerApi>, model: &PlayerModel);

    fn controlbar_height(&self) -> u32;

    /// Where the logo should live while controls are shown
    fn logo_container(&self) -> Option<ElementRef>;
    fn element(&self) -> ElementRef;

    /// Whether the control bar is currently visible
    fn showing(&self) -> bool;
    fn user_active(&self);
    fn user_inactive(&self);

    fn settings_menu_visible(&self) -> bool {
        false
    }

    fn close_settings_menu(&self) {}
}

/// Entry point of a loaded controls module
pub trait ControlsFactory {
    fn create(&self, container: ElementRef) -> Rc<dyn Controls>;
}

/// Fetches the controls module
#[async_trait(?Send)]
pub trait ControlsLoader {
    async fn load(&self) -> anyhow::Result<Rc<dyn ControlsFactory>>;
}

/// Memoized controls module, shared by every view on a page
pub struct ControlsModuleCache {
    loader: Box<dyn ControlsLoader>,
    module: OnceCell<Rc<dyn ControlsFactory>>,
    attempts: Cell<u32>,
}

impl ControlsModuleCache {
    pub fn new(loader: Box<dyn ControlsLoader>) -> Rc<Self> {
        Rc::new(Self {
            loader,
            module: OnceCell::new(),
            attempts: Cell::new(0),
        })
    }

    /// Cache that starts out with a loaded module
    pub fn preloaded(factory: Rc<dyn ControlsFactory>) -> Rc<Self> {
        struct Ready(Rc<dyn ControlsFactory>);

        #[async_trait(?Send)]
        impl ControlsLoader for Ready {
            async fn load(&self) -> anyhow::Result<Rc<dyn ControlsFactory>> {
                Ok(self.0.clone())
            }
        }

        let cache = Self::new(Box::new(Ready(factory.clone())));
        // Only fails when already set, which a new cell never is
        let _ = cache.module.set(factory);
        cache
    }

    /// The module, if a load already finished
    pub fn cached(&self) -> Option<Rc<dyn ControlsFactory>> {
        self.module.get().cloned()
    }

    /// Load the module once; concurrent callers share the same load
    pub async fn load(&self) -> Result<Rc<dyn ControlsFactory>> {
        let module = self
            .module
            .get_or_try_init(|| async {
                let attempt = self.attempts.get() + 1;
                self.attempts.set(attempt);
                debug!(attempt, "Loading controls module");
                self.loader.load().await
            })
            .await;

        match module {
            Ok(factory) => {
                info!("Controls module ready");
                Ok(factory.clone())
            }
            Err(cause) => {
                warn!(error = %cause, "Controls module failed to load");
                Err(ViewError::controls_load(cause))
            }
        }
    }

    /// Number of times the loader was invoked
    pub fn load_attempts(&self) -> u32 {
        self.attempts.get()
    }
}

/// Snapshot of the controls generation taken by an enable request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlsTicket(u64);

/// Generation counter invalidating stale enable requests
#[derive(Debug, Default)]
pub struct ControlsGeneration {
    current: Cell<u64>,
}

impl ControlsGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request; earlier tickets become stale
    pub fn issue(&self) -> ControlsTicket {
        self.invalidate();
        ControlsTicket(self.current.get())
    }

    /// Make every outstanding ticket stale
    pub fn invalidate(&self) {
        self.current.set(self.current.get() + 1);
    }

    pub fn is_current(&self, ticket: ControlsTicket) -> bool {
        self.current.get() == ticket.0
    }
}
