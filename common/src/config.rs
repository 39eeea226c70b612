//! Display, layout and timing configuration constants.
//!
//! Everything here is `const` so layout arithmetic happens at compile time.
//! Groups that depend on each other carry `const` assertions: a bad edit
//! (e.g. a glyph canvas wider than the panel) fails the build instead of
//! drawing off-screen.

use embedded_graphics::prelude::{Point, Size};

// =============================================================================
// Display
// =============================================================================

/// Panel width in pixels (172x320 portrait IPS).
pub const SCREEN_WIDTH: u32 = 172;

/// Panel height in pixels.
pub const SCREEN_HEIGHT: u32 = 320;

// =============================================================================
// Navigation Layout
// =============================================================================

/// Width of the logical glyph canvas (the arrow/icon zone).
pub const GLYPH_CANVAS_WIDTH: i32 = 170;

/// Height of the logical glyph canvas.
pub const GLYPH_CANVAS_HEIGHT: i32 = 140;

/// Where the glyph canvas's top-left corner sits on the navigation root.
pub const GLYPH_ORIGIN: Point = Point::new((SCREEN_WIDTH as i32 - GLYPH_CANVAS_WIDTH) / 2, 60);

const _: () = assert!(GLYPH_CANVAS_WIDTH <= SCREEN_WIDTH as i32);
const _: () = assert!(GLYPH_ORIGIN.y + GLYPH_CANVAS_HEIGHT <= NAV_DISTANCE_Y);

/// Stroke width of glyph lines.
pub const GLYPH_LINE_WIDTH: u32 = 8;

/// Stroke width of the destination flag.
pub const FLAG_LINE_WIDTH: u32 = 6;

/// ETA banner offset from the top.
pub const NAV_ETA_Y: i32 = 30;

/// Distance label offset from the top.
pub const NAV_DISTANCE_Y: i32 = 200;

/// Maneuver text offset from the top.
pub const NAV_MANEUVER_Y: i32 = 250;

/// Width shared by the navigation text fields.
pub const NAV_TEXT_WIDTH: u32 = 170;

// =============================================================================
// Navigation Behaviour
// =============================================================================

/// Below this distance (meters, exclusive) the critical alert is raised.
pub const ALERT_DISTANCE_M: i32 = 100;

/// From this distance (meters, inclusive) the label switches to kilometers.
pub const KM_THRESHOLD_M: i32 = 1000;

const _: () = assert!(ALERT_DISTANCE_M < KM_THRESHOLD_M);

/// Maximum number of bytes of an instruction that take part in classification.
pub const INSTRUCTION_MAX_LEN: usize = 63;

// =============================================================================
// Animation Timings (milliseconds)
// =============================================================================

/// Half period of the opacity pulse (fade in, then the same time to fade out).
pub const PULSE_HALF_PERIOD_MS: u32 = 800;

/// Lowest opacity reached by a pulse (~30%).
pub const PULSE_MIN_OPA: i32 = 77;

/// Full opacity.
pub const OPA_COVER: i32 = 255;

/// Missed-call card slide-in time.
pub const SLIDE_IN_MS: u32 = 400;

/// Missed-call card slide-out time.
pub const SLIDE_OUT_MS: u32 = 300;

/// Time for one full spinner revolution.
pub const SPINNER_PERIOD_MS: u32 = 2000;

// =============================================================================
// Call Screens
// =============================================================================

/// Missed-call card resting position above the panel (hidden).
pub const MISSED_CARD_HIDDEN_Y: i32 = -220;

/// Missed-call card position once slid in.
pub const MISSED_CARD_SHOWN_Y: i32 = 40;

/// Missed-call card size.
pub const MISSED_CARD_SIZE: Size = Size::new(150, 200);

/// Avatar circle diameter on call screens.
pub const AVATAR_SIZE: u32 = 80;

/// Dismiss button size.
pub const DISMISS_BUTTON_SIZE: Size = Size::new(120, 50);

/// Hang-up button size (round).
pub const HANGUP_BUTTON_SIZE: Size = Size::new(70, 70);

const _: () = assert!(MISSED_CARD_HIDDEN_Y + (MISSED_CARD_SIZE.height as i32) < 0);
const _: () = assert!(MISSED_CARD_SHOWN_Y + (MISSED_CARD_SIZE.height as i32) <= SCREEN_HEIGHT as i32);

// =============================================================================
// Reference Scene Capacity
// =============================================================================

/// Elements a [`Scene`](crate::scene::Scene) can hold (all six contexts fit with room to spare).
pub const MAX_ELEMENTS: usize = 96;

/// Maximum characters stored per text element.
pub const MAX_TEXT_LEN: usize = 48;

/// Maximum points stored per line element.
pub const MAX_LINE_POINTS: usize = 16;
