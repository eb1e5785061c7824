//! Core types for Kino View

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Playback state as published by the player model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Nothing loaded or playback reset
    #[default]
    Idle,
    /// Waiting for media data
    Buffering,
    /// Media is playing
    Playing,
    /// Playback paused
    Paused,
    /// Playlist finished
    Complete,
    /// Playback failed
    Error,
}

impl PlaybackState {
    /// States in which the poster is shown and captions are hidden
    pub fn is_at_rest(&self) -> bool {
        matches!(
            self,
            PlaybackState::Idle | PlaybackState::Error | PlaybackState::Complete
        )
    }

    /// States in which captions must stay legible under the control bar
    pub fn is_active(&self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Buffering)
    }

    /// Parse from a model value, falling back to idle
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// Name used in the `state-*` class
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Buffering => "buffering",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Complete => "complete",
            PlaybackState::Error => "error",
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media type of the current playlist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Video,
    Audio,
    #[serde(other)]
    Other,
}

impl MediaType {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => MediaType::Video,
            other => serde_json::from_value(other.clone()).unwrap_or(MediaType::Other),
        }
    }
}

/// Stream type reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StreamType {
    #[default]
    Vod,
    Live,
    Dvr,
}

impl StreamType {
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    pub fn is_live(&self) -> bool {
        *self == StreamType::Live
    }
}

/// A player dimension: pixels or a CSS length such as "100%"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Pixels(u32),
    Css(String),
}

impl Dimension {
    /// Read a dimension from a model value
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(|v| Dimension::Pixels(v.max(0.0).round() as u32)),
            Value::String(s) => Some(Dimension::Css(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Dimension::Pixels(px) => Value::from(*px),
            Dimension::Css(s) => Value::from(s.as_str()),
        }
    }

    /// Pixel value, if this dimension is a plain number
    pub fn pixels(&self) -> Option<u32> {
        match self {
            Dimension::Pixels(px) => Some(*px),
            Dimension::Css(s) => s.trim().strip_suffix("px").unwrap_or(s.trim()).parse().ok(),
        }
    }

    pub fn is_percentage(&self) -> bool {
        matches!(self, Dimension::Css(s) if s.contains('%'))
    }

    /// Value written to the container's style
    pub fn to_css(&self) -> String {
        match self {
            Dimension::Pixels(px) => format!("{}px", px),
            Dimension::Css(s) => s.clone(),
        }
    }
}

impl From<u32> for Dimension {
    fn from(px: u32) -> Self {
        Dimension::Pixels(px)
    }
}

impl From<&str> for Dimension {
    fn from(css: &str) -> Self {
        Dimension::Css(css.to_string())
    }
}

/// On-screen rectangle in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlapping region of two rectangles
    pub fn intersection(&self, other: &Rect) -> Rect {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        Rect::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0))
    }
}

/// Region of the player not covered by the control bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SafeRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Why the player API was invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    Interaction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_parsing() {
        assert_eq!(PlaybackState::from_value(&json!("paused")), PlaybackState::Paused);
        assert_eq!(PlaybackState::from_value(&json!("bogus")), PlaybackState::Idle);
        assert_eq!(PlaybackState::Complete.to_string(), "complete");
        assert!(PlaybackState::Error.is_at_rest());
        assert!(PlaybackState::Buffering.is_active());
    }

    #[test]
    fn test_media_and_stream_types() {
        assert_eq!(MediaType::from_value(&json!("audio")), MediaType::Audio);
        assert_eq!(MediaType::from_value(&json!("image")), MediaType::Other);
        assert!(StreamType::from_value(&json!("LIVE")).is_live());
        assert!(!StreamType::from_value(&Value::Null).is_live());
    }

    #[test]
    fn test_dimension_pixels() {
        assert_eq!(Dimension::from_value(&json!(360)), Some(Dimension::Pixels(360)));
        assert_eq!(Dimension::from("40px").pixels(), Some(40));
        assert_eq!(Dimension::from("100%").pixels(), None);
        assert!(Dimension::from("100%").is_percentage());
        assert_eq!(Dimension::Pixels(640).to_css(), "640px");
    }

    #[test]
    fn test_rect_intersection() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        let half_visible = Rect::new(0.0, 400.0, 400.0, 400.0);
        let overlap = viewport.intersection(&half_visible);
        assert_eq!(overlap.area(), 400.0 * 200.0);
        let outside = Rect::new(900.0, 0.0, 100.0, 100.0);
        assert_eq!(viewport.intersection(&outside).area(), 0.0);
    }
}
