//! JS-facing view configuration

use kino_view::{Platform, ViewConfig};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::platform::detect_platform;

/// Configuration for a browser view
#[wasm_bindgen]
#[derive(Clone, Serialize, Deserialize)]
pub struct WasmViewConfig {
    /// Ascending breakpoint width thresholds
    breakpoints: Vec<u32>,
    /// Height at or below which only the control bar shows
    pub controlbar_only_height: u32,
    /// Delay before re-measuring media after fullscreen changes (ms)
    pub fullscreen_settle_delay_ms: u32,
    pub mobile: bool,
    pub legacy_fullscreen: bool,
    pub iframe: bool,
}

#[wasm_bindgen]
impl WasmViewConfig {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::from(&ViewConfig::default())
    }

    /// Defaults with the platform of the current window
    #[wasm_bindgen]
    pub fn detect() -> Self {
        let mut config = Self::new();
        if let Some(window) = web_sys::window() {
            config.set_platform(detect_platform(&window));
        }
        config
    }

    /// Config for touch devices
    #[wasm_bindgen]
    pub fn mobile_preset() -> Self {
        Self::from(&ViewConfig::mobile())
    }

    #[wasm_bindgen(getter)]
    pub fn breakpoints(&self) -> Vec<u32> {
        self.breakpoints.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_breakpoints(&mut self, breakpoints: Vec<u32>) {
        self.breakpoints = breakpoints;
    }

    /// Check the config, returning the reason it is invalid
    #[wasm_bindgen]
    pub fn validate(&self) -> Result<(), JsValue> {
        self.to_view_config()
            .validate()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Convert to a plain JS object
    #[wasm_bindgen]
    pub fn to_object(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self).map_err(JsValue::from)
    }

    /// Convert to JSON string
    #[wasm_bindgen]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl WasmViewConfig {
    fn set_platform(&mut self, platform: Platform) {
        self.mobile = platform.mobile;
        self.legacy_fullscreen = platform.legacy_fullscreen;
        self.iframe = platform.iframe;
    }

    /// Engine configuration
    pub fn to_view_config(&self) -> ViewConfig {
        ViewConfig {
            breakpoints: self.breakpoints.clone(),
            controlbar_only_height: self.controlbar_only_height,
            fullscreen_settle_delay_ms: u64::from(self.fullscreen_settle_delay_ms),
            platform: Platform {
                mobile: self.mobile,
                legacy_fullscreen: self.legacy_fullscreen,
                iframe: self.iframe,
            },
        }
    }
}

impl From<&ViewConfig> for WasmViewConfig {
    fn from(config: &ViewConfig) -> Self {
        Self {
            breakpoints: config.breakpoints.clone(),
            controlbar_only_height: config.controlbar_only_height,
            fullscreen_settle_delay_ms: config.fullscreen_settle_delay_ms.min(u64::from(u32::MAX)) as u32,
            mobile: config.platform.mobile,
            legacy_fullscreen: config.platform.legacy_fullscreen,
            iframe: config.platform.iframe,
        }
    }
}

impl Default for WasmViewConfig {
    fn default() -> Self {
        Self::new()
    }
}
