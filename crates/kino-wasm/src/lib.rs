//! Kino WASM - Browser bindings for the Kino view engine
//!
//! Binds the engine's platform traits to the real browser:
//! - [`WebElement`]: `Element` over `web_sys::HtmlElement`
//! - [`BrowserHost`]: animation frames, timers, local tasks, page state
//! - [`DocumentFullscreen`]: the document Fullscreen API
//! - [`detect_platform`]: mobile, legacy-fullscreen and iframe detection
//! - [`WasmViewConfig`]: JS-facing view configuration
//!
//! The view itself is built from Rust: a player crate compiled to wasm
//! supplies its collaborators (provider, title, captions and so on) and
//! passes these types to [`kino_view::View::new`]. Only the configuration,
//! platform detection and version are exported to JavaScript.
//!
//! ## Usage
//!
//! ```javascript
//! import init, { WasmViewConfig } from '@kino/wasm';
//!
//! await init();
//! const config = WasmViewConfig.detect();
//! ```
//!
//! ```rust,ignore
//! let host = BrowserHost::new().ok_or(ViewError::NotSetup)?;
//! let fullscreen = DocumentFullscreen::current().ok_or(ViewError::NotSetup)?;
//! let container = WebElement::by_id("player").ok_or(ViewError::NotSetup)?;
//! let config = WasmViewConfig::detect().to_view_config();
//! ```

use wasm_bindgen::prelude::*;

mod config;
mod dom;
mod fullscreen;
mod host;
mod platform;

pub use config::WasmViewConfig;
pub use dom::WebElement;
pub use fullscreen::DocumentFullscreen;
pub use host::BrowserHost;
pub use platform::{classify_user_agent, detect_platform};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&format!("[Kino WASM] Initialized (kino-view {})", kino_view::VERSION).into());
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Report a failed browser call without interrupting the engine
pub(crate) fn log_js_error(context: &str, err: &JsValue) {
    web_sys::console::warn_2(&format!("[Kino WASM] {}", context).into(), err);
}
