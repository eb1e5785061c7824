//! WebElement - `Element` over a live DOM node

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use kino_view::dom::{DomEvent, DomListener, Element, ElementRef, ListenerId};
use kino_view::Rect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Node};

use crate::log_js_error;

struct Registered {
    event: DomEvent,
    callback: Closure<dyn FnMut()>,
}

/// A DOM element driven by the view engine
pub struct WebElement {
    element: HtmlElement,
    next_listener: Cell<u64>,
    listeners: RefCell<HashMap<ListenerId, Registered>>,
    // Removed callbacks may still be running, so they live as long as the element
    spent: RefCell<Vec<Closure<dyn FnMut()>>>,
}

impl WebElement {
    pub fn new(element: HtmlElement) -> Rc<Self> {
        Rc::new(Self {
            element,
            next_listener: Cell::new(0),
            listeners: RefCell::new(HashMap::new()),
            spent: RefCell::new(Vec::new()),
        })
    }

    /// Look up an element of the current document by id
    pub fn by_id(id: &str) -> Option<Rc<Self>> {
        let document = web_sys::window()?.document()?;
        let element = document.get_element_by_id(id)?;
        element.dyn_into::<HtmlElement>().ok().map(Self::new)
    }

    /// First descendant of `self` matching `selector`
    pub fn query(&self, selector: &str) -> Option<Rc<Self>> {
        match self.element.query_selector(selector) {
            Ok(found) => found?.dyn_into::<HtmlElement>().ok().map(Self::new),
            Err(err) => {
                log_js_error("invalid selector", &err);
                None
            }
        }
    }

    pub fn html(&self) -> &HtmlElement {
        &self.element
    }

    /// The DOM node behind an engine element, when it is a `WebElement`
    pub fn node_of(element: &ElementRef) -> Option<&Node> {
        element
            .as_any()
            .downcast_ref::<WebElement>()
            .map(|web| -> &Node { &web.element })
    }

    fn with_node(&self, child: &ElementRef, context: &str, f: impl FnOnce(&Node) -> Result<Node, JsValue>) {
        match Self::node_of(child) {
            Some(node) => {
                if let Err(err) = f(node) {
                    log_js_error(context, &err);
                }
            }
            None => web_sys::console::warn_1(&format!("[Kino WASM] {}: not a DOM element", context).into()),
        }
    }
}

impl Element for WebElement {
    fn id(&self) -> String {
        self.element.id()
    }

    fn has_class(&self, name: &str) -> bool {
        self.element.class_list().contains(name)
    }

    fn add_class(&self, name: &str) {
        if let Err(err) = self.element.class_list().add_1(name) {
            log_js_error("add class", &err);
        }
    }

    fn remove_class(&self, name: &str) {
        if let Err(err) = self.element.class_list().remove_1(name) {
            log_js_error("remove class", &err);
        }
    }

    fn class_names(&self) -> Vec<String> {
        let list = self.element.class_list();
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }

    fn set_style(&self, property: &str, value: Option<&str>) {
        let style = self.element.style();
        let result = match value {
            Some(value) => style.set_property(property, value),
            None => style.remove_property(property).map(|_| ()),
        };
        if let Err(err) = result {
            log_js_error("set style", &err);
        }
    }

    fn style(&self, property: &str) -> Option<String> {
        self.element
            .style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let Err(err) = self.element.set_attribute(name, value) {
            log_js_error("set attribute", &err);
        }
    }

    fn remove_attribute(&self, name: &str) {
        if let Err(err) = self.element.remove_attribute(name) {
            log_js_error("remove attribute", &err);
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn bounds(&self) -> Rect {
        let rect = self.element.get_bounding_client_rect();
        Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
    }

    fn is_connected(&self) -> bool {
        self.element.is_connected()
    }

    fn append_child(&self, child: &ElementRef) {
        self.with_node(child, "append child", |node| self.element.append_child(node));
    }

    fn remove_child(&self, child: &ElementRef) {
        let Some(node) = Self::node_of(child) else {
            return;
        };
        let parent: &Node = &self.element;
        if node.parent_node().as_ref() == Some(parent) {
            if let Err(err) = self.element.remove_child(node) {
                log_js_error("remove child", &err);
            }
        }
    }

    fn insert_before(&self, child: &ElementRef, reference: Option<&ElementRef>) {
        let reference = reference.and_then(Self::node_of);
        self.with_node(child, "insert before", |node| self.element.insert_before(node, reference));
    }

    fn insert_after(&self, child: &ElementRef, reference: &ElementRef) {
        let next = Self::node_of(reference).and_then(|node| node.next_sibling());
        self.with_node(child, "insert after", |node| self.element.insert_before(node, next.as_ref()));
    }

    fn contains(&self, child: &ElementRef) -> bool {
        Self::node_of(child)
            .map(|node| self.element.contains(Some(node)))
            .unwrap_or(false)
    }

    fn add_listener(&self, event: DomEvent, listener: DomListener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);

        let callback = Closure::<dyn FnMut()>::new(move || listener());
        if let Err(err) = self
            .element
            .add_event_listener_with_callback(event.name(), callback.as_ref().unchecked_ref())
        {
            log_js_error("add listener", &err);
        }
        self.listeners.borrow_mut().insert(id, Registered { event, callback });
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        let removed = self.listeners.borrow_mut().remove(&id);
        if let Some(registered) = removed {
            if let Err(err) = self
                .element
                .remove_event_listener_with_callback(registered.event.name(), registered.callback.as_ref().unchecked_ref())
            {
                log_js_error("remove listener", &err);
            }
            self.spent.borrow_mut().push(registered.callback);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for WebElement {
    fn drop(&mut self) {
        let ids: Vec<ListenerId> = self.listeners.borrow().keys().copied().collect();
        for id in ids {
            self.remove_listener(id);
        }
    }
}
