//! Host platform primitives
//!
//! The view runs on a single-threaded event loop. Everything it needs from
//! that loop (animation frames, timers, local tasks) and from the
//! surrounding page (tab activity, viewport geometry, scroll locking, link
//! opening) comes through [`Host`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::types::Rect;

/// Deferred callback
pub type Task = Box<dyn FnOnce()>;

/// Future spawned on the host's local executor
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Handle to a pending frame callback or timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub u64);

pub trait Host {
    /// Run `task` before the next repaint
    fn request_frame(&self, task: Task) -> TaskHandle;
    fn cancel_frame(&self, handle: TaskHandle);

    /// Run `task` after `delay`
    fn set_timeout(&self, task: Task, delay: Duration) -> TaskHandle;
    fn clear_timeout(&self, handle: TaskHandle);

    /// Drive a future to completion on the event loop
    fn spawn_local(&self, task: LocalTask);

    /// Whether the browser tab is in the foreground
    fn is_tab_active(&self) -> bool;

    /// Visible viewport in the same coordinates as [`crate::dom::Element::bounds`]
    fn viewport(&self) -> Rect;

    /// Lock document scrolling while the player covers the page
    fn set_scroll_locked(&self, locked: bool);

    fn open_link(&self, url: &str, target: Option<&str>);
}
