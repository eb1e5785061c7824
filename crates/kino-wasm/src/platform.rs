//! Platform detection

use kino_view::Platform;
use web_sys::Window;

const MOBILE_MARKERS: [&str; 6] = ["Android", "iPhone", "iPad", "iPod", "IEMobile", "Mobile"];

/// Platform traits derivable from the user agent alone
///
/// Legacy fullscreen covers desktop browsers without the Fullscreen API;
/// mobile browsers fall back to media-element fullscreen instead.
pub fn classify_user_agent(user_agent: &str, fullscreen_api: bool) -> Platform {
    let mobile = MOBILE_MARKERS.iter().any(|marker| user_agent.contains(marker));
    Platform {
        mobile,
        legacy_fullscreen: !mobile && !fullscreen_api,
        iframe: false,
    }
}

/// Detect the platform of `window`
pub fn detect_platform(window: &Window) -> Platform {
    let user_agent = window.navigator().user_agent().unwrap_or_default();
    let fullscreen_api = window
        .document()
        .map(|document| document.fullscreen_enabled())
        .unwrap_or(false);

    let mut platform = classify_user_agent(&user_agent, fullscreen_api);
    platform.iframe = match window.top() {
        Ok(Some(top)) => !js_sys::Object::is(&top, window),
        _ => true,
    };
    platform
}
