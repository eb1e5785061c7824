//! Focus outline suppression
//!
//! Pointer users should not see keyboard focus rings. The container gets
//! the no-focus class on pointer down and loses it on the next key press.

use std::rc::Rc;

use crate::dom::{classes, DomEvent, ElementExt, ElementRef, ListenerId};

pub struct NoFocusFlag {
    element: ElementRef,
    listeners: Vec<ListenerId>,
}

impl NoFocusFlag {
    pub fn attach(element: ElementRef) -> Self {
        let weak = Rc::downgrade(&element);
        let on_pointer = Rc::new(move || {
            if let Some(el) = weak.upgrade() {
                el.toggle_class(classes::NO_FOCUS, true);
            }
        });
        let weak = Rc::downgrade(&element);
        let on_key = Rc::new(move || {
            if let Some(el) = weak.upgrade() {
                el.toggle_class(classes::NO_FOCUS, false);
            }
        });

        let listeners = vec![
            element.add_listener(DomEvent::PointerDown, on_pointer),
            element.add_listener(DomEvent::KeyDown, on_key),
        ];
        Self { element, listeners }
    }

    /// Remove the listeners
    pub fn release(self) {
        for id in self.listeners {
            self.element.remove_listener(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::headless::MemoryElement;

    #[test]
    fn test_pointer_then_key() {
        let container = MemoryElement::new("player");
        let flag = NoFocusFlag::attach(container.clone());

        container.dispatch(DomEvent::PointerDown);
        assert!(container.has_class(classes::NO_FOCUS));
        container.dispatch(DomEvent::KeyDown);
        assert!(!container.has_class(classes::NO_FOCUS));

        flag.release();
        assert_eq!(container.listener_count(DomEvent::PointerDown), 0);
        container.dispatch(DomEvent::PointerDown);
        assert!(!container.has_class(classes::NO_FOCUS));
    }
}
