//! View configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, ViewError};

/// Platform capabilities detected once per page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Platform {
    /// Mobile browser (media-element fullscreen, touch mode)
    pub mobile: bool,
    /// Browser without the Fullscreen API that still supports class-based fullscreen
    pub legacy_fullscreen: bool,
    /// Player is embedded in an iframe
    pub iframe: bool,
}

/// Configuration for a view instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Ascending width thresholds; tier N starts at `breakpoints[N - 1]`
    pub breakpoints: Vec<u32>,
    /// Height at or below which only the control bar is shown
    pub controlbar_only_height: u32,
    /// Delay before re-measuring media after a fullscreen change (ms)
    pub fullscreen_settle_delay_ms: u64,
    /// Platform capabilities
    pub platform: Platform,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            breakpoints: vec![320, 420, 540, 640, 800, 960, 1280],
            controlbar_only_height: 44,
            fullscreen_settle_delay_ms: 200,
            platform: Platform::default(),
        }
    }
}

impl ViewConfig {
    /// Minimum number of breakpoint tiers
    pub const MIN_TIERS: usize = 4;

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ViewConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Config for mobile browsers
    pub fn mobile() -> Self {
        Self {
            platform: Platform {
                mobile: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.breakpoints.len() + 1 < Self::MIN_TIERS {
            return Err(ViewError::InvalidConfig(format!(
                "need at least {} breakpoint thresholds, got {}",
                Self::MIN_TIERS - 1,
                self.breakpoints.len()
            )));
        }
        if self.breakpoints.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ViewError::InvalidConfig(
                "breakpoint thresholds must be strictly ascending".to_string(),
            ));
        }
        if self.breakpoints.len() > u8::MAX as usize {
            return Err(ViewError::InvalidConfig("too many breakpoint thresholds".to_string()));
        }
        Ok(())
    }

    pub fn fullscreen_settle_delay(&self) -> Duration {
        Duration::from_millis(self.fullscreen_settle_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fullscreen_settle_delay(), Duration::from_millis(200));
        assert_eq!(config.controlbar_only_height, 44);
        assert!(!config.platform.mobile);
    }

    #[test]
    fn test_from_json_partial() {
        let config = ViewConfig::from_json(r#"{"breakpoints":[400,800,1200],"platform":{"mobile":true}}"#).unwrap();
        assert_eq!(config.breakpoints, vec![400, 800, 1200]);
        assert!(config.platform.mobile);
        assert_eq!(config.fullscreen_settle_delay_ms, 200);
    }

    #[test]
    fn test_rejects_bad_breakpoints() {
        let err = ViewConfig::from_json(r#"{"breakpoints":[400,300,1200]}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");

        let err = ViewConfig::from_json(r#"{"breakpoints":[400,800]}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");

        let err = ViewConfig::from_json("not json").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_PARSE");
    }
}
