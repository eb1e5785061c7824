//! Controls lifecycle wiring

use std::rc::Rc;
use tracing::{debug, info, instrument, warn};

use super::{ControlsBinding, ViewInner};
use crate::controls::{Controls, ControlsFactory, ControlsTicket};
use crate::dom::{classes, DomEvent, Element, ElementExt};
use crate::error::Result;
use crate::events::{ControlsEvent, Publisher, ViewEvent};
use crate::model::{truthy, Attr, Change};
use crate::types::{PlaybackState, StreamType};

/// Same instance, ignoring vtable identity
fn same_controls(a: &Rc<dyn Controls>, b: &Rc<dyn Controls>) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

impl ViewInner {
    pub(super) fn on_controls_change(&self, change: &Change) {
        if truthy(&change.value) {
            self.enable_controls();
        } else {
            self.disable_controls();
        }
    }

    pub(super) fn set_controls_enabled(&self, enabled: bool) {
        // Before init the model subscription picks the value up
        if !self.initialized.get() || self.model.get_bool(Attr::Controls) != enabled {
            self.model.set(Attr::Controls, enabled);
        } else if enabled {
            self.enable_controls();
        } else {
            self.disable_controls();
        }
    }

    fn enable_controls(&self) {
        if self.current_controls().is_some() {
            return;
        }
        let ticket = self.controls_generation.issue();

        if let Some(factory) = self.controls_module.cached() {
            self.instantiate_controls(&factory);
            return;
        }

        debug!("Controls module not loaded yet");
        let weak = self.this.clone();
        let module = self.controls_module.clone();
        self.host.spawn_local(Box::pin(async move {
            let result = module.load().await;
            if let Some(view) = weak.upgrade() {
                view.finish_controls_load(ticket, result);
            }
        }));
    }

    fn disable_controls(&self) {
        self.controls_generation.invalidate();
        self.remove_controls();
    }

    fn finish_controls_load(&self, ticket: ControlsTicket, result: Result<Rc<dyn ControlsFactory>>) {
        if self.destroyed.get() || !self.controls_generation.is_current(ticket) {
            debug!("Discarding stale controls load");
            return;
        }
        match result {
            Ok(factory) => {
                if self.model.get_bool(Attr::Controls) && self.current_controls().is_none() {
                    self.instantiate_controls(&factory);
                }
            }
            Err(err) => {
                warn!(error = %err, "Controls unavailable");
                self.events.emit(&ViewEvent::Error {
                    message: "Controls failed to load".to_string(),
                    reason: Rc::new(err),
                });
            }
        }
    }

    fn instantiate_controls(&self, factory: &Rc<dyn ControlsFactory>) {
        let controls = factory.create(self.container().clone());
        self.add_controls(controls);
    }

    #[instrument(skip(self, controls))]
    pub(super) fn add_controls(&self, controls: Rc<dyn Controls>) {
        if let Some(existing) = self.current_controls() {
            if same_controls(&existing, &controls) {
                return;
            }
            self.remove_controls();
        }
        *self.controls.borrow_mut() = Some(controls.clone());

        let container = self.container();
        container.toggle_class(classes::CONTROLS_HIDDEN, false);

        let stream_type = self.subscribe_attr(Attr::StreamType, ViewInner::set_live_mode, true);

        controls.enable(self.api.clone(), self.model.clone());
        let logo = self.logo.element();
        controls.add_active_listeners(&logo);
        if let Some(logo_container) = controls.logo_container() {
            self.logo.set_container(logo_container);
        }

        // Bring a late instance up to the current size
        let last_size = self.bounds.borrow().last_size();
        if let Some((width, height)) = last_size.filter(|(_, h)| *h > 0) {
            self.update_container_styles(Some(width), Some(height));
            controls.resize(width, height);
            self.captions.render_cues(true);
        }

        let weak = self.this.clone();
        let events = controls.on(Rc::new(move |event: &ControlsEvent| {
            if let Some(view) = weak.upgrade() {
                if !view.destroyed.get() {
                    view.on_controls_event(event);
                }
            }
        }));

        if self.model.get_bool(Attr::Instream) {
            controls.setup_instream();
        }

        let weak = self.this.clone();
        let overlay_move = self.layout.overlays.add_listener(
            DomEvent::PointerMove,
            Rc::new(move || {
                if let Some(controls) = weak.upgrade().and_then(|view| view.current_controls()) {
                    controls.user_active();
                }
            }),
        );

        *self.controls_binding.borrow_mut() = Some(ControlsBinding {
            events,
            stream_type,
            overlay_move,
        });
        info!("Controls attached");
    }

    #[instrument(skip(self))]
    pub(super) fn remove_controls(&self) {
        self.logo.set_container(self.container().clone());

        let controls = self.controls.borrow_mut().take();
        let binding = self.controls_binding.borrow_mut().take();
        if let Some(binding) = binding {
            self.model.off(binding.stream_type);
            self.layout.overlays.remove_listener(binding.overlay_move);
            if let Some(controls) = &controls {
                controls.off(binding.events);
            }
        }
        if let Some(controls) = controls {
            controls.remove_active_listeners(&self.logo.element());
            controls.disable(&self.model);
            info!("Controls detached");
        }

        self.container().toggle_class(classes::CONTROLS_HIDDEN, true);
    }

    fn on_controls_event(&self, event: &ControlsEvent) {
        if matches!(event, ControlsEvent::UserActive | ControlsEvent::UserInactive) {
            let state = self.model.state();
            if matches!(state, PlaybackState::Playing | PlaybackState::Buffering) {
                self.captions.render_cues(true);
            }
        }
        self.events.emit(&ViewEvent::Controls(event.clone()));
    }

    /// Live flag follows `streamType` outside of instream
    fn set_live_mode(&self, change: &Change) {
        if self.model.get_bool(Attr::Instream) {
            return;
        }
        let live = StreamType::from_value(&change.value).is_live();
        self.container().toggle_class(classes::LIVE, live);
    }
}
