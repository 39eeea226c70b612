//! Property animations and color helpers.
//!
//! Animations are fire-and-forget: a presenter builds an [`Animation`],
//! hands it to the presentation surface and never looks at it again. The
//! surface samples [`Animation::value_at`] with the time elapsed since the
//! animation started, so motion speed does not depend on frame rate.
//!
//! # Timeline
//!
//! ```text
//! |<-- duration_ms -->|<-- playback_ms -->|   (repeat if Infinite)
//! from ------------> to ---------------> from
//! ```
//!
//! With `playback_ms == 0` the animation ends (or restarts) at `to`.
//!
//! # Color Helpers
//!
//! Opacity is emulated on RGB565 by blending toward the background color
//! with [`blend_opacity`], which builds on [`lerp_rgb565`].

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{IntoStorage, RgbColor};

use crate::config::{OPA_COVER, PULSE_HALF_PERIOD_MS, PULSE_MIN_OPA, SPINNER_PERIOD_MS};

/// Animated element property.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnimProperty {
    /// Opacity, 0 (transparent) ..= 255 (opaque).
    Opacity,
    /// Vertical offset in pixels.
    OffsetY,
    /// Rotation in degrees (spinners).
    Angle,
}

/// Repeat behaviour.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Repeat {
    /// Run one cycle and rest at the final value.
    Once,
    /// Loop until stopped or superseded.
    Infinite,
}

/// A linear property animation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Animation {
    /// Animated property.
    pub property: AnimProperty,
    /// Start value.
    pub from: i32,
    /// Value reached after `duration_ms`.
    pub to: i32,
    /// Forward time.
    pub duration_ms: u32,
    /// Time to run back from `to` to `from`; zero disables playback.
    pub playback_ms: u32,
    /// Repeat behaviour.
    pub repeat: Repeat,
}

impl Animation {
    /// Opacity pulse: ~30% to 100% and back, forever.
    pub const fn pulse() -> Self {
        Self {
            property: AnimProperty::Opacity,
            from: PULSE_MIN_OPA,
            to: OPA_COVER,
            duration_ms: PULSE_HALF_PERIOD_MS,
            playback_ms: PULSE_HALF_PERIOD_MS,
            repeat: Repeat::Infinite,
        }
    }

    /// One-shot vertical slide.
    pub const fn slide_y(
        from: i32,
        to: i32,
        duration_ms: u32,
    ) -> Self {
        Self {
            property: AnimProperty::OffsetY,
            from,
            to,
            duration_ms,
            playback_ms: 0,
            repeat: Repeat::Once,
        }
    }

    /// Continuous spinner rotation, one revolution per period.
    pub const fn spinner() -> Self {
        Self {
            property: AnimProperty::Angle,
            from: 0,
            to: 360,
            duration_ms: SPINNER_PERIOD_MS,
            playback_ms: 0,
            repeat: Repeat::Infinite,
        }
    }

    /// Length of one cycle.
    #[inline]
    pub const fn cycle_ms(&self) -> u32 { self.duration_ms.saturating_add(self.playback_ms) }

    /// Whether a one-shot animation has run its course.
    #[inline]
    pub const fn is_finished(
        &self,
        elapsed_ms: u32,
    ) -> bool {
        matches!(self.repeat, Repeat::Once) && elapsed_ms >= self.cycle_ms()
    }

    /// Value at rest once finished (or after being stopped).
    #[inline]
    pub const fn final_value(&self) -> i32 { if self.playback_ms > 0 { self.from } else { self.to } }

    /// Property value `elapsed_ms` after start.
    pub fn value_at(
        &self,
        elapsed_ms: u32,
    ) -> i32 {
        let cycle = self.cycle_ms();
        if cycle == 0 || self.is_finished(elapsed_ms) {
            return self.final_value();
        }

        let t = match self.repeat {
            Repeat::Once => elapsed_ms,
            Repeat::Infinite => elapsed_ms % cycle,
        };

        if t < self.duration_ms {
            lerp_i32(self.from, self.to, t, self.duration_ms)
        } else {
            lerp_i32(self.to, self.from, t - self.duration_ms, self.playback_ms)
        }
    }
}

/// Integer linear interpolation, `num / den` of the way from `a` to `b`.
fn lerp_i32(
    a: i32,
    b: i32,
    num: u32,
    den: u32,
) -> i32 {
    if den == 0 {
        return b;
    }
    let delta = i64::from(b) - i64::from(a);
    (i64::from(a) + delta * i64::from(num) / i64::from(den)) as i32
}

// =============================================================================
// Color Interpolation Helpers
// =============================================================================

/// Linear interpolation between two Rgb565 colors.
///
/// Uses integer math with fixed-point for efficiency. `t_fixed` is the
/// fraction in 1/256 steps (0 = `from`, 256 = `to`).
pub fn lerp_rgb565(
    from: Rgb565,
    to: Rgb565,
    t_fixed: i32,
) -> Rgb565 {
    let from_raw = from.into_storage();
    let to_raw = to.into_storage();

    let from_r = i32::from((from_raw >> 11) & 0x1F);
    let from_g = i32::from((from_raw >> 5) & 0x3F);
    let from_b = i32::from(from_raw & 0x1F);

    let to_r = i32::from((to_raw >> 11) & 0x1F);
    let to_g = i32::from((to_raw >> 5) & 0x3F);
    let to_b = i32::from(to_raw & 0x1F);

    let t_fixed = t_fixed.clamp(0, 256);
    let step = |delta: i32| -> i32 { (delta * t_fixed) / 256 };

    let r = (from_r + step(to_r - from_r)).clamp(0, 31);
    let g = (from_g + step(to_g - from_g)).clamp(0, 63);
    let b = (from_b + step(to_b - from_b)).clamp(0, 31);

    Rgb565::new(r as u8, g as u8, b as u8)
}

/// Color of `fg` drawn at `opacity` (0..=255) over `bg`.
#[inline]
pub fn blend_opacity(
    fg: Rgb565,
    bg: Rgb565,
    opacity: i32,
) -> Rgb565 {
    match opacity {
        o if o >= OPA_COVER => fg,
        o if o <= 0 => bg,
        o => lerp_rgb565(bg, fg, o * 256 / OPA_COVER),
    }
}

/// Background assumed under transparent elements.
pub const DEFAULT_BACKDROP: Rgb565 = Rgb565::BLACK;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, RED, WHITE};

    #[test]
    fn test_pulse_timeline() {
        let pulse = Animation::pulse();
        assert_eq!(pulse.value_at(0), PULSE_MIN_OPA);
        assert_eq!(pulse.value_at(PULSE_HALF_PERIOD_MS), OPA_COVER);
        assert_eq!(pulse.value_at(2 * PULSE_HALF_PERIOD_MS), PULSE_MIN_OPA);
        // Halfway up
        let mid = pulse.value_at(PULSE_HALF_PERIOD_MS / 2);
        assert!(mid > PULSE_MIN_OPA && mid < OPA_COVER);
        // Never finishes
        assert!(!pulse.is_finished(1_000_000));
    }

    #[test]
    fn test_slide_is_one_shot() {
        let slide = Animation::slide_y(-220, 40, 400);
        assert_eq!(slide.value_at(0), -220);
        assert_eq!(slide.value_at(200), -90);
        assert_eq!(slide.value_at(400), 40);
        assert_eq!(slide.value_at(5000), 40);
        assert!(slide.is_finished(400));
        assert!(!slide.is_finished(399));
    }

    #[test]
    fn test_spinner_wraps() {
        let spin = Animation::spinner();
        assert_eq!(spin.value_at(0), 0);
        assert_eq!(spin.value_at(SPINNER_PERIOD_MS / 2), 180);
        assert_eq!(spin.value_at(SPINNER_PERIOD_MS), 0);
    }

    #[test]
    fn test_zero_duration_jumps_to_end() {
        let anim = Animation::slide_y(0, 10, 0);
        assert_eq!(anim.value_at(0), 10);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp_rgb565(BLACK, WHITE, 0), BLACK);
        assert_eq!(lerp_rgb565(BLACK, WHITE, 256), WHITE);
        assert_eq!(lerp_rgb565(BLACK, WHITE, 1000), WHITE);
    }

    #[test]
    fn test_blend_opacity() {
        assert_eq!(blend_opacity(RED, BLACK, OPA_COVER), RED);
        assert_eq!(blend_opacity(RED, BLACK, 0), BLACK);
        let half = blend_opacity(RED, BLACK, 128);
        assert_ne!(half, RED);
        assert_ne!(half, BLACK);
    }
}
