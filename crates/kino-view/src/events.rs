//! Event emission for the view and its collaborators
//!
//! Every component that notifies listeners owns an [`Emitter`] and exposes it
//! through the [`Publisher`] trait. Listeners are called synchronously in
//! subscription order. The listener list is snapshotted before dispatch, so a
//! listener may subscribe, unsubscribe or emit again without deadlocking.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::ViewError;

/// Listener callback
pub type Listener<E> = Rc<dyn Fn(&E)>;

/// Handle returned by [`Emitter::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Single-threaded event emitter
pub struct Emitter<E> {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, Listener<E>)>>,
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Register a listener
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> SubscriptionId {
        self.subscribe_rc(Rc::new(listener))
    }

    /// Register an already shared listener
    pub fn subscribe_rc(&self, listener: Listener<E>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Remove a listener, returning whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Deliver an event to every listener
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    /// Drop every listener
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Implemented by every component that notifies listeners
pub trait Publisher<E> {
    fn emitter(&self) -> &Emitter<E>;

    fn on(&self, listener: Listener<E>) -> SubscriptionId {
        self.emitter().subscribe_rc(listener)
    }

    fn off(&self, id: SubscriptionId) -> bool {
        self.emitter().unsubscribe(id)
    }
}

/// Events emitted by the controls subsystem
#[derive(Debug, Clone, PartialEq)]
pub enum ControlsEvent {
    /// The user interacted with the player
    UserActive,
    /// The control bar faded out
    UserInactive,
    /// Any other controls notification, forwarded verbatim
    Other { name: String, data: serde_json::Value },
}

/// Events emitted by the view
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// Committed container size changed
    Resize { width: u32, height: u32 },
    /// Breakpoint tier changed
    Breakpoint { breakpoint: u8 },
    /// The media display was clicked or tapped
    DisplayClick,
    /// Non-fatal failure
    Error { message: String, reason: Rc<ViewError> },
    /// Forwarded from the controls instance
    Controls(ControlsEvent),
}

/// Pointer events on the media display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickEvent {
    Click,
    Tap,
    DoubleClick,
    Move,
    Over,
}

/// Click on the logo
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogoClick {
    pub link: Option<String>,
    pub target: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_in_subscription_order() {
        let emitter = Emitter::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = seen.clone();
        emitter.subscribe(move |v| first.borrow_mut().push(("a", *v)));
        let second = seen.clone();
        emitter.subscribe(move |v| second.borrow_mut().push(("b", *v)));

        emitter.emit(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let emitter = Emitter::<()>::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let id = emitter.subscribe(move |_| c.set(c.get() + 1));

        emitter.emit(&());
        assert!(emitter.unsubscribe(id));
        assert!(!emitter.unsubscribe(id));
        emitter.emit(&());
        assert_eq!(count.get(), 1);
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_listener_may_reenter() {
        let emitter = Rc::new(Emitter::<u32>::new());
        let count = Rc::new(Cell::new(0));

        let inner = emitter.clone();
        let c = count.clone();
        emitter.subscribe(move |v| {
            c.set(c.get() + 1);
            if *v > 0 {
                inner.emit(&(v - 1));
            }
        });

        emitter.emit(&2);
        assert_eq!(count.get(), 3);
    }
}
