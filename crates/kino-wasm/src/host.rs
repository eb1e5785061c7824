//! BrowserHost - `Host` over the window event loop

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use kino_view::host::{Host, LocalTask, Task, TaskHandle};
use kino_view::Rect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Window};

use crate::log_js_error;

#[derive(Clone, Copy)]
enum Kind {
    Frame,
    Timeout,
}

struct Scheduled {
    kind: Kind,
    js_id: i32,
    callback: Closure<dyn FnMut()>,
}

/// Host backed by `requestAnimationFrame`, `setTimeout` and the page
pub struct BrowserHost {
    window: Window,
    document: Document,
    next_handle: Cell<u64>,
    pending: Rc<RefCell<HashMap<u64, Scheduled>>>,
    // Fired or cancelled callbacks, dropped once no callback is running
    spent: Rc<RefCell<Vec<Closure<dyn FnMut()>>>>,
}

impl BrowserHost {
    /// Host for the current window, if there is one
    pub fn new() -> Option<Rc<Self>> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Rc::new(Self {
            window,
            document,
            next_handle: Cell::new(1),
            pending: Rc::new(RefCell::new(HashMap::new())),
            spent: Rc::new(RefCell::new(Vec::new())),
        }))
    }

    fn schedule(&self, kind: Kind, task: Task, delay: Duration) -> TaskHandle {
        let handle = TaskHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);

        let pending = self.pending.clone();
        let spent = self.spent.clone();
        let mut task = Some(task);
        let callback = Closure::<dyn FnMut()>::new(move || {
            // Host callbacks never nest, so nothing in `spent` is running
            drop(spent.take());
            if let Some(task) = task.take() {
                task();
            }
            let finished = pending.borrow_mut().remove(&handle.0);
            if let Some(finished) = finished {
                spent.borrow_mut().push(finished.callback);
            }
        });

        let function = callback.as_ref().unchecked_ref();
        let registered = match kind {
            Kind::Frame => self.window.request_animation_frame(function),
            Kind::Timeout => {
                let millis = delay.as_millis().min(i32::MAX as u128) as i32;
                self.window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(function, millis)
            }
        };

        match registered {
            Ok(js_id) => {
                self.pending.borrow_mut().insert(handle.0, Scheduled { kind, js_id, callback });
            }
            Err(err) => log_js_error("schedule callback", &err),
        }
        handle
    }

    fn cancel(&self, handle: TaskHandle) {
        let cancelled = self.pending.borrow_mut().remove(&handle.0);
        let Some(cancelled) = cancelled else {
            return;
        };
        match cancelled.kind {
            Kind::Frame => {
                if let Err(err) = self.window.cancel_animation_frame(cancelled.js_id) {
                    log_js_error("cancel frame", &err);
                }
            }
            Kind::Timeout => self.window.clear_timeout_with_handle(cancelled.js_id),
        }
        // May be the callback currently running
        self.spent.borrow_mut().push(cancelled.callback);
    }
}

impl Host for BrowserHost {
    fn request_frame(&self, task: Task) -> TaskHandle {
        self.schedule(Kind::Frame, task, Duration::ZERO)
    }

    fn cancel_frame(&self, handle: TaskHandle) {
        self.cancel(handle);
    }

    fn set_timeout(&self, task: Task, delay: Duration) -> TaskHandle {
        self.schedule(Kind::Timeout, task, delay)
    }

    fn clear_timeout(&self, handle: TaskHandle) {
        self.cancel(handle);
    }

    fn spawn_local(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn is_tab_active(&self) -> bool {
        !self.document.hidden()
    }

    fn viewport(&self) -> Rect {
        let dimension = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Rect::new(
            0.0,
            0.0,
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }

    fn set_scroll_locked(&self, locked: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let style = body.style();
        let result = if locked {
            style.set_property("overflow", "hidden")
        } else {
            style.remove_property("overflow").map(|_| ())
        };
        if let Err(err) = result {
            log_js_error("scroll lock", &err);
        }
    }

    fn open_link(&self, url: &str, target: Option<&str>) {
        if let Err(err) = self
            .window
            .open_with_url_and_target(url, target.unwrap_or("_blank"))
        {
            log_js_error("open link", &err);
        }
    }
}
