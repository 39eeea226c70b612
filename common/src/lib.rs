//! Display core for the YatraMate handlebar status display.
//!
//! This crate contains everything between the phone link and the panel,
//! independent of the display driver and the BLE stack:
//!
//! - [`context`]: the six display contexts
//! - [`screen_state`]: active-context state machine
//! - [`maneuver`]: instruction token to glyph category/orientation/color
//! - [`geometry`]: glyph polylines on the 170x140 canvas
//! - [`navigation`]: navigation display controller
//! - [`screens`]: welcome, idle and call presenters
//! - [`ui`]: event routing across all of the above
//! - [`surface`]: the widget layer the core draws through
//! - [`scene`] and [`render`]: in-memory surface and its rasterizer
//! - [`animations`], [`styles`], [`colors`], [`config`]: look and timing
//! - [`log_buffer`]: lock-guarded ring buffer behind the `log_*!` macros
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` (tests run on the host with `std`). Nothing
//! allocates: strings and element storage are `heapless` with fixed
//! capacities, and time comes in as plain milliseconds.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod log_buffer;

pub mod animations;
pub mod colors;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod geometry;
pub mod maneuver;
pub mod navigation;
pub mod render;
pub mod scene;
pub mod screen_state;
pub mod screens;
pub mod styles;
pub mod surface;
pub mod ui;

// Re-export commonly used items
pub use context::Context;
pub use error::{Error, Result};
pub use events::{CallInfo, Event, MissedCallInfo, NavigationUpdate};
pub use maneuver::{Classification, GlyphCategory, Orientation, classify};
pub use scene::Scene;
pub use screen_state::ScreenStateMachine;
pub use surface::{ElementId, PresentationSurface, UiAction};
pub use ui::Ui;
