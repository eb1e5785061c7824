//! Visibility tracking
//!
//! Folds tab activity, fullscreen and viewport intersection into a single
//! 0.0-1.0 signal that is written back onto the model.

use serde_json::Value;

use crate::dom::Element;
use crate::host::Host;
use crate::model::{Attr, PlayerModel};
use crate::types::Rect;

/// Inputs to the visibility signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityInputs {
    pub fullscreen: bool,
    pub active_tab: bool,
    /// Ratio reported by an intersection observer, if any
    pub intersection_ratio: Option<f64>,
}

impl VisibilityInputs {
    pub fn from_model(model: &PlayerModel) -> Self {
        Self {
            fullscreen: model.get_bool(Attr::Fullscreen),
            active_tab: model.get_bool(Attr::ActiveTab),
            intersection_ratio: model.get_f64(Attr::IntersectionRatio),
        }
    }

    /// Resolve the signal; `geometry` is only consulted when no ratio was reported
    pub fn resolve(&self, geometry: impl FnOnce() -> f64) -> f64 {
        if self.fullscreen {
            return 1.0;
        }
        if !self.active_tab {
            return 0.0;
        }
        self.intersection_ratio.unwrap_or_else(geometry).clamp(0.0, 1.0)
    }
}

/// Fraction of `element` inside `viewport`
pub fn geometric_ratio(element: Rect, viewport: Rect) -> f64 {
    let area = element.area();
    if area <= 0.0 {
        return 0.0;
    }
    element.intersection(&viewport).area() / area
}

/// Compute visibility for the container from the model and host geometry
pub fn compute_visibility(model: &PlayerModel, container: &dyn Element, host: &dyn Host) -> f64 {
    VisibilityInputs::from_model(model).resolve(|| geometric_ratio(container.bounds(), host.viewport()))
}

/// Visibility went from falsy to truthy
pub fn became_visible(previous: &Value, current: &Value) -> bool {
    let visible = |v: &Value| v.as_f64().map(|x| x > 0.0).unwrap_or(false);
    visible(current) && !visible(previous)
}
