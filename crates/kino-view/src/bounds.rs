//! Container bounds tracking
//!
//! Decides what a fresh measurement of the container means: whether it
//! should be committed to the model, whether the view must keep watching
//! for a first non-zero size, and whether a resize or breakpoint
//! notification is due.

use crate::breakpoint::{Breakpoint, BreakpointClassifier};
use crate::types::Rect;

/// One measurement of the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub width: u32,
    pub height: u32,
    /// Attached to the document
    pub in_dom: bool,
}

impl Measurement {
    /// Round a bounding rectangle to whole pixels
    pub fn from_rect(rect: Rect, in_dom: bool) -> Self {
        Self {
            width: rect.width.max(0.0).round() as u32,
            height: rect.height.max(0.0).round() as u32,
            in_dom,
        }
    }
}

/// Outcome of [`BoundsTracker::decide`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsDecision {
    /// Dimensions to write to the model
    pub commit: Option<(u32, u32)>,
    /// Schedule another measurement on the next frame
    pub rearm: bool,
    pub in_dom: bool,
}

/// Notification produced by [`BoundsTracker::check_resized`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeNotice {
    pub width: u32,
    pub height: u32,
    /// Set only when the tier changed
    pub breakpoint: Option<Breakpoint>,
}

/// Last notified size and tier
#[derive(Debug, Clone)]
pub struct BoundsTracker {
    classifier: BreakpointClassifier,
    last: Option<(u32, u32)>,
    breakpoint: Option<Breakpoint>,
}

impl BoundsTracker {
    pub fn new(classifier: BreakpointClassifier) -> Self {
        Self {
            classifier,
            last: None,
            breakpoint: None,
        }
    }

    /// True once a size with both dimensions non-zero was notified
    pub fn has_established_size(&self) -> bool {
        matches!(self.last, Some((w, h)) if w > 0 && h > 0)
    }

    pub fn decide(&self, measured: Measurement) -> BoundsDecision {
        let size = (measured.width, measured.height);

        if self.last == Some(size) {
            return BoundsDecision {
                commit: None,
                rearm: !self.has_established_size(),
                in_dom: measured.in_dom,
            };
        }

        let degenerate = measured.width == 0 || measured.height == 0;
        // 0x0 is only trusted while attached
        let commit = (measured.width > 0 || measured.height > 0 || measured.in_dom).then_some(size);

        BoundsDecision {
            commit,
            rearm: degenerate && !self.has_established_size(),
            in_dom: measured.in_dom,
        }
    }

    /// Compare committed dimensions to the last notified ones
    pub fn check_resized(&mut self, width: u32, height: u32) -> Option<ResizeNotice> {
        if self.last == Some((width, height)) {
            return None;
        }
        self.last = Some((width, height));

        let breakpoint = self.classifier.classify(width);
        let changed = self.breakpoint != Some(breakpoint);
        self.breakpoint = Some(breakpoint);

        Some(ResizeNotice {
            width,
            height,
            breakpoint: changed.then_some(breakpoint),
        })
    }

    /// Forget the notified size so the next check always notifies
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn last_size(&self) -> Option<(u32, u32)> {
        self.last
    }

    pub fn breakpoint(&self) -> Option<Breakpoint> {
        self.breakpoint
    }

    pub fn classifier(&self) -> &BreakpointClassifier {
        &self.classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(width: u32, height: u32, in_dom: bool) -> Measurement {
        Measurement { width, height, in_dom }
    }

    #[test]
    fn test_rounds_rect() {
        let m = Measurement::from_rect(Rect::new(0.0, 0.0, 639.6, 359.4), true);
        assert_eq!((m.width, m.height), (640, 359));
    }

    #[test]
    fn test_detached_zero_is_not_committed() {
        let tracker = BoundsTracker::new(BreakpointClassifier::default());
        let decision = tracker.decide(measured(0, 0, false));
        assert_eq!(decision.commit, None);
        assert!(decision.rearm);
    }

    #[test]
    fn test_attached_zero_is_committed() {
        let tracker = BoundsTracker::new(BreakpointClassifier::default());
        let decision = tracker.decide(measured(0, 0, true));
        assert_eq!(decision.commit, Some((0, 0)));
        assert!(decision.rearm);
    }

    #[test]
    fn test_detached_nonzero_is_committed() {
        let tracker = BoundsTracker::new(BreakpointClassifier::default());
        let decision = tracker.decide(measured(640, 0, false));
        assert_eq!(decision.commit, Some((640, 0)));
        assert!(decision.rearm);
    }

    #[test]
    fn test_same_size_is_noop_once_established() {
        let mut tracker = BoundsTracker::new(BreakpointClassifier::default());
        tracker.check_resized(640, 360);
        let decision = tracker.decide(measured(640, 360, true));
        assert_eq!(decision.commit, None);
        assert!(!decision.rearm);
    }

    #[test]
    fn test_same_zero_size_keeps_watching() {
        let mut tracker = BoundsTracker::new(BreakpointClassifier::default());
        tracker.check_resized(0, 0);
        let decision = tracker.decide(measured(0, 0, false));
        assert_eq!(decision.commit, None);
        assert!(decision.rearm);
    }

    #[test]
    fn test_resize_and_breakpoint_notices() {
        let mut tracker = BoundsTracker::new(BreakpointClassifier::new(vec![400, 800, 1200]));

        let first = tracker.check_resized(640, 360).unwrap();
        assert_eq!(first.breakpoint, Some(Breakpoint(1)));

        let second = tracker.check_resized(1280, 720).unwrap();
        assert_eq!((second.width, second.height), (1280, 720));
        assert_eq!(second.breakpoint, Some(Breakpoint(3)));

        assert_eq!(tracker.check_resized(1280, 720), None);

        // Same tier, new height: resize without breakpoint
        let third = tracker.check_resized(1300, 700).unwrap();
        assert_eq!(third.breakpoint, None);
    }

    #[test]
    fn test_burst_with_same_final_size_notifies_once() {
        let mut tracker = BoundsTracker::new(BreakpointClassifier::default());
        tracker.check_resized(640, 360);

        let mut resizes = 0;
        let mut breakpoints = 0;
        for _ in 0..10 {
            if let Some(notice) = tracker.check_resized(1280, 720) {
                resizes += 1;
                breakpoints += notice.breakpoint.is_some() as usize;
            }
        }
        assert_eq!(resizes, 1);
        assert_eq!(breakpoints, 1);
    }

    #[test]
    fn test_reset_forces_notice() {
        let mut tracker = BoundsTracker::new(BreakpointClassifier::default());
        tracker.check_resized(640, 360);
        tracker.reset();
        let notice = tracker.check_resized(640, 360).unwrap();
        assert_eq!(notice.breakpoint, None);
    }
}
