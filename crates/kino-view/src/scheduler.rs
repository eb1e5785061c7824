//! Single-slot deferred work
//!
//! A [`ScheduledSlot`] holds at most one pending callback. Scheduling again
//! cancels the pending one first, so bursts of triggers collapse into one
//! run. Each schedule bumps a generation; a callback whose generation is no
//! longer current does nothing even if the host fires it after cancellation.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::host::{Host, TaskHandle};

/// What the slot defers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferral {
    /// Next animation frame
    Frame,
    /// Fixed timer delay
    Timeout(Duration),
}

#[derive(Default)]
struct SlotState {
    handle: Cell<Option<TaskHandle>>,
    generation: Cell<u64>,
}

/// Schedule-replacing, cancellable deferred callback
pub struct ScheduledSlot {
    host: Rc<dyn Host>,
    deferral: Deferral,
    state: Rc<SlotState>,
}

impl ScheduledSlot {
    pub fn new(host: Rc<dyn Host>, deferral: Deferral) -> Self {
        Self {
            host,
            deferral,
            state: Rc::new(SlotState::default()),
        }
    }

    pub fn frame(host: Rc<dyn Host>) -> Self {
        Self::new(host, Deferral::Frame)
    }

    pub fn timeout(host: Rc<dyn Host>, delay: Duration) -> Self {
        Self::new(host, Deferral::Timeout(delay))
    }

    /// Replace any pending callback with `task`
    pub fn schedule(&self, task: impl FnOnce() + 'static) {
        self.cancel();

        let generation = self.state.generation.get();
        let state = Rc::downgrade(&self.state);
        let wrapped = Box::new(move || {
            let Some(state) = state.upgrade() else {
                return;
            };
            if state.generation.get() != generation {
                return;
            }
            state.handle.set(None);
            state.generation.set(generation + 1);
            task();
        });

        let handle = match self.deferral {
            Deferral::Frame => self.host.request_frame(wrapped),
            Deferral::Timeout(delay) => self.host.set_timeout(wrapped, delay),
        };
        // A host may run the task synchronously; only record it if still pending
        if self.state.generation.get() == generation {
            self.state.handle.set(Some(handle));
        }
    }

    /// Drop the pending callback, if any
    pub fn cancel(&self) {
        if let Some(handle) = self.state.handle.take() {
            match self.deferral {
                Deferral::Frame => self.host.cancel_frame(handle),
                Deferral::Timeout(_) => self.host.clear_timeout(handle),
            }
        }
        self.state.generation.set(self.state.generation.get() + 1);
    }

    pub fn is_pending(&self) -> bool {
        self.state.handle.get().is_some()
    }
}

impl Drop for ScheduledSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::ManualHost;
    use std::cell::RefCell;

    #[test]
    fn test_schedule_replaces_pending() {
        let host = Rc::new(ManualHost::new());
        let slot = ScheduledSlot::frame(host.clone());
        let runs = Rc::new(RefCell::new(Vec::new()));

        for i in 0..5 {
            let runs = runs.clone();
            slot.schedule(move || runs.borrow_mut().push(i));
        }
        assert!(slot.is_pending());
        assert_eq!(host.pending_frames(), 1);

        host.run_frames();
        assert_eq!(*runs.borrow(), vec![4]);
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_cancel_makes_callback_inert() {
        let host = Rc::new(ManualHost::new());
        let slot = ScheduledSlot::timeout(host.clone(), Duration::from_millis(200));
        let fired = Rc::new(Cell::new(false));

        let f = fired.clone();
        slot.schedule(move || f.set(true));
        slot.cancel();
        host.advance(Duration::from_millis(500));

        assert!(!fired.get());
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_timeout_waits_for_delay() {
        let host = Rc::new(ManualHost::new());
        let slot = ScheduledSlot::timeout(host.clone(), Duration::from_millis(200));
        let fired = Rc::new(Cell::new(0));

        let f = fired.clone();
        slot.schedule(move || f.set(f.get() + 1));
        host.advance(Duration::from_millis(150));
        assert_eq!(fired.get(), 0);
        host.advance(Duration::from_millis(50));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_reschedule_from_inside_callback() {
        let host = Rc::new(ManualHost::new());
        let slot = Rc::new(ScheduledSlot::frame(host.clone()));
        let count = Rc::new(Cell::new(0));

        let inner = Rc::downgrade(&slot);
        let c = count.clone();
        slot.schedule(move || {
            c.set(c.get() + 1);
            if let Some(slot) = inner.upgrade() {
                let c = c.clone();
                slot.schedule(move || c.set(c.get() + 10));
            }
        });

        host.run_frames();
        assert_eq!(count.get(), 1);
        assert!(slot.is_pending());
        host.run_frames();
        assert_eq!(count.get(), 11);
    }
}
