//! Breakpoint classification
//!
//! Maps a container width to an ordered tier. The tier selects layout
//! density classes; tiers below 2 get the small-player flag.

use serde::{Deserialize, Serialize};

use crate::config::ViewConfig;
use crate::dom::classes;
use crate::model::{Attr, PlayerModel};
use crate::types::Dimension;

/// Ordered layout tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Breakpoint(pub u8);

impl Breakpoint {
    pub fn tier(&self) -> u8 {
        self.0
    }

    pub fn is_small(&self) -> bool {
        self.0 < 2
    }

    pub fn class_name(&self) -> String {
        format!("{}{}", classes::BREAKPOINT_PREFIX, self.0)
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Width-to-tier classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointClassifier {
    thresholds: Vec<u32>,
}

impl BreakpointClassifier {
    /// Thresholds must be ascending; see [`ViewConfig::validate`]
    pub fn new(thresholds: Vec<u32>) -> Self {
        Self { thresholds }
    }

    pub fn from_config(config: &ViewConfig) -> Self {
        Self::new(config.breakpoints.clone())
    }

    /// Tier for `width`: the number of thresholds at or below it
    pub fn classify(&self, width: u32) -> Breakpoint {
        let tier = self.thresholds.partition_point(|&threshold| threshold <= width);
        Breakpoint(tier.min(u8::MAX as usize) as u8)
    }

    pub fn tier_count(&self) -> usize {
        self.thresholds.len() + 1
    }
}

impl Default for BreakpointClassifier {
    fn default() -> Self {
        Self::from_config(&ViewConfig::default())
    }
}

/// Layout classes derived from container dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutFlags {
    /// Present only when both dimensions are known pixel values
    pub breakpoint: Option<Breakpoint>,
    pub small_player: bool,
    pub portrait: bool,
    pub audio_mode: bool,
}

impl LayoutFlags {
    pub fn compute(
        classifier: &BreakpointClassifier,
        width: Option<u32>,
        height: Option<u32>,
        audio_mode: bool,
    ) -> Self {
        match (width, height) {
            (Some(width), Some(height)) => {
                let breakpoint = classifier.classify(width);
                Self {
                    breakpoint: Some(breakpoint),
                    small_player: breakpoint.is_small(),
                    portrait: height > width,
                    audio_mode,
                }
            }
            _ => Self {
                breakpoint: None,
                small_player: false,
                portrait: false,
                audio_mode,
            },
        }
    }
}

/// Whether the player is only tall enough for its control bar
pub fn is_audio_mode(model: &PlayerModel, controlbar_only_height: u32) -> bool {
    if model.get_bool(Attr::AspectRatio) {
        return false;
    }
    let height = Dimension::from_value(&model.get(Attr::Height));
    if matches!(&height, Some(h) if h.is_percentage()) {
        return false;
    }
    let vertical_pixels = height
        .and_then(|h| h.pixels())
        .filter(|px| *px > 0)
        .or_else(|| model.get_u32(Attr::ContainerHeight));

    match vertical_pixels {
        Some(px) if px > 0 => px <= controlbar_only_height,
        _ => false,
    }
}
