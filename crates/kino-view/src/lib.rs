//! Kino View - Presentation Engine for Kino
//!
//! This crate keeps the player's on-screen container in sync with a
//! continuously changing playback model:
//! - Container measurement, resize and breakpoint notifications
//! - Visibility from tab activity, fullscreen and viewport intersection
//! - Playback state classes, poster and caption visibility, error surface
//! - Fullscreen across DOM, legacy and media-element strategies
//! - Lazily loaded, swappable controls
//! - Instream (ad) mode that reverts cleanly
//!
//! The engine never touches a browser directly. It drives elements through
//! [`dom::Element`] and the event loop through [`host::Host`]; `kino-wasm`
//! binds both to `web-sys`, and [`headless`] provides in-memory versions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Kino View                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐           │
//! │  │    Bounds    │  │  Breakpoint  │  │  Visibility  │           │
//! │  │   Tracker    │  │  Classifier  │  │   Tracker    │           │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘           │
//! │         │                 │                 │                   │
//! │         └─────────────────┼─────────────────┘                   │
//! │                           │                                     │
//! │  ┌──────────────┐  ┌──────┴──────┐  ┌──────────────┐            │
//! │  │ Presentation │──│    View     │──│  Fullscreen  │            │
//! │  │    Mapper    │  │   Engine    │  │  Strategies  │            │
//! │  └──────────────┘  └──────┬──────┘  └──────────────┘            │
//! │                           │                                     │
//! │  ┌──────────────┐  ┌──────┴──────┐  ┌──────────────┐            │
//! │  │   Controls   │  │   Player    │  │   Instream   │            │
//! │  │ Module Cache │  │    Model    │  │   Switcher   │            │
//! │  └──────────────┘  └─────────────┘  └──────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod bounds;
pub mod breakpoint;
pub mod collaborators;
pub mod config;
pub mod controls;
pub mod dom;
pub mod error;
pub mod events;
pub mod focus;
pub mod fullscreen;
pub mod headless;
pub mod host;
pub mod instream;
pub mod model;
pub mod presentation;
pub mod registry;
pub mod scheduler;
pub mod types;
pub mod view;
pub mod visibility;

pub use breakpoint::{Breakpoint, BreakpointClassifier};
pub use collaborators::{
    CaptionsRenderer, ClickHandler, ErrorSurface, FullscreenApi, Logo, MediaProvider, PlayerApi, Preview, Title,
};
pub use config::{Platform, ViewConfig};
pub use controls::{Controls, ControlsFactory, ControlsLoader, ControlsModuleCache};
pub use dom::{Element, ElementExt, ElementRef};
pub use error::{Result, ViewError};
pub use events::{ClickEvent, ControlsEvent, Emitter, LogoClick, Publisher, ViewEvent};
pub use fullscreen::{FullscreenKind, FullscreenStrategy};
pub use host::Host;
pub use model::{Attr, Change, ModelEvent, PlayerModel};
pub use registry::ViewRegistry;
pub use types::*;
pub use view::{PlayerLayout, View, ViewServices};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the view library
pub fn init() {
    tracing::info!(version = VERSION, "Kino View initialized");
}
