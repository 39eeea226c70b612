//! Color constants for the status display.
//!
//! The panel is driven in RGB565 (5 bits red, 6 bits green, 5 bits blue), so
//! every color here is an `Rgb565` that needs no conversion on flush. Pure
//! colors come from the `RgbColor` trait constants; the rest are tuned for
//! daylight readability on a small IPS panel.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

/// Pure black. Root backgrounds, button text.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white. Primary text.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red. Destination flag, critical alert, missed-call accents.
pub const RED: Rgb565 = Rgb565::RED;

/// Pure green. Straight arrows, connected indicators.
pub const GREEN: Rgb565 = Rgb565::GREEN;

/// Pure cyan. Buttons and avatar borders.
pub const CYAN: Rgb565 = Rgb565::CYAN;

/// Pure yellow. Roundabout glyphs, maneuver and ETA text.
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

/// Magenta. U-turn glyphs.
pub const MAGENTA: Rgb565 = Rgb565::MAGENTA;

// =============================================================================
// Custom Colors
// =============================================================================

/// Orange for lateral maneuvers (turns, keep, slight, sharp). 0xFD20.
pub const ORANGE: Rgb565 = Rgb565::new(31, 41, 0);

/// Secondary background (status bars, avatars). 0x3186.
pub const GRAY_DARK: Rgb565 = Rgb565::new(6, 12, 6);

/// Card background on the missed-call screen (~#1a1a1a).
pub const GRAY_CARD: Rgb565 = Rgb565::new(3, 6, 3);

/// Secondary text (phone numbers, hints). ~#808080.
pub const GRAY: Rgb565 = Rgb565::new(16, 32, 16);

/// Dim text (timestamps). ~#666666.
pub const GRAY_DIM: Rgb565 = Rgb565::new(12, 25, 12);

/// Hint text on the idle screen. ~#9EC1FF.
pub const SKY: Rgb565 = Rgb565::new(19, 48, 31);

/// Status bar once connected. ~#1E824C.
pub const GREEN_DARK: Rgb565 = Rgb565::new(3, 32, 9);

/// BLE indicator dot. ~#9AF59A.
pub const GREEN_LIGHT: Rgb565 = Rgb565::new(19, 61, 19);
