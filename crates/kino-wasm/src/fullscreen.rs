//! DocumentFullscreen - the document Fullscreen API

use std::cell::RefCell;
use std::rc::Rc;

use kino_view::{ElementRef, FullscreenApi};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Document;

use crate::dom::WebElement;
use crate::log_js_error;

const CHANGE_EVENTS: [&str; 2] = ["fullscreenchange", "webkitfullscreenchange"];

pub struct DocumentFullscreen {
    document: Document,
    listener: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl DocumentFullscreen {
    pub fn new(document: Document) -> Rc<Self> {
        Rc::new(Self {
            document,
            listener: RefCell::new(None),
        })
    }

    /// Fullscreen API of the current document, if there is one
    pub fn current() -> Option<Rc<Self>> {
        let document = web_sys::window()?.document()?;
        Some(Self::new(document))
    }

    fn unbind(&self) {
        let listener = self.listener.borrow_mut().take();
        if let Some(listener) = listener {
            for event in CHANGE_EVENTS {
                if let Err(err) = self
                    .document
                    .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
                {
                    log_js_error("remove fullscreen listener", &err);
                }
            }
        }
    }
}

impl FullscreenApi for DocumentFullscreen {
    fn supports_dom_fullscreen(&self) -> bool {
        self.document.fullscreen_enabled()
    }

    fn request(&self, element: &ElementRef) {
        let Some(web) = element.as_any().downcast_ref::<WebElement>() else {
            web_sys::console::warn_1(&"[Kino WASM] fullscreen request: not a DOM element".into());
            return;
        };
        if let Err(err) = web.html().request_fullscreen() {
            log_js_error("request fullscreen", &err);
        }
    }

    fn exit(&self) {
        self.document.exit_fullscreen();
    }

    fn fullscreen_element_id(&self) -> Option<String> {
        self.document.fullscreen_element().map(|element| element.id())
    }

    fn bind(&self, on_change: Rc<dyn Fn()>) {
        self.unbind();
        let listener = Closure::<dyn FnMut()>::new(move || on_change());
        for event in CHANGE_EVENTS {
            if let Err(err) = self
                .document
                .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
            {
                log_js_error("add fullscreen listener", &err);
            }
        }
        *self.listener.borrow_mut() = Some(listener);
    }

    fn destroy(&self) {
        self.unbind();
    }
}
