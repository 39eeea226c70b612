//! Fonts, text styles and the color theme.
//!
//! Presenters never construct fonts or pick raw colors for semantic roles.
//! Labels carry a [`FontRole`] that the renderer resolves to a `MonoFont`
//! here, and glyph colors are semantic [`GlyphColor`] tokens mapped to
//! RGB565 by the [`Theme`].
//!
//! Style setup happens once per context. Instead of hidden function-local
//! statics, the [`StyleRegistry`] is created at startup, passed into every
//! presenter's `create`, and records which contexts already initialized
//! their styles.

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::Rgb565,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::{PROFONT_10_POINT, PROFONT_12_POINT, PROFONT_14_POINT, PROFONT_18_POINT, PROFONT_24_POINT};

use crate::colors::{CYAN, GREEN, MAGENTA, ORANGE, RED, WHITE, YELLOW};
use crate::context::Context;
use crate::maneuver::GlyphColor;

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Text centered on a point. Used for labels with a fixed box.
pub const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

/// Text hanging from its top-left corner. Used for labels sized to their text.
pub const LEFT_ALIGNED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();

// =============================================================================
// Fonts
// =============================================================================

/// Size class of a label's font.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontRole {
    /// Hints and footers (6x10).
    Tiny,
    /// Secondary text: numbers, timestamps.
    Small,
    /// Body text.
    #[default]
    Normal,
    /// Names and status lines.
    Medium,
    /// Titles and ETA.
    Large,
    /// Distance readout and avatar initials.
    Huge,
}

impl FontRole {
    /// Font used to draw this role.
    pub const fn font(self) -> &'static MonoFont<'static> {
        match self {
            Self::Tiny => &FONT_6X10,
            Self::Small => &PROFONT_10_POINT,
            Self::Normal => &PROFONT_12_POINT,
            Self::Medium => &PROFONT_14_POINT,
            Self::Large => &PROFONT_18_POINT,
            Self::Huge => &PROFONT_24_POINT,
        }
    }

    /// Text style for this role in the given color.
    #[inline]
    pub const fn style(
        self,
        color: Rgb565,
    ) -> MonoTextStyle<'static, Rgb565> {
        MonoTextStyle::new(self.font(), color)
    }

    /// Pixel width of `chars` characters.
    #[inline]
    pub const fn text_width(
        self,
        chars: u32,
    ) -> u32 {
        let font = self.font();
        font.character_size.width * chars + font.character_spacing * chars.saturating_sub(1)
    }

    /// Line height in pixels.
    #[inline]
    pub const fn line_height(self) -> u32 { self.font().character_size.height }
}

// =============================================================================
// Theme
// =============================================================================

/// Maps semantic color tokens to panel colors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Theme {
    /// Straight-ahead glyphs.
    pub straight: Rgb565,
    /// U-turn glyphs.
    pub uturn: Rgb565,
    /// Roundabout glyphs.
    pub roundabout: Rgb565,
    /// Lateral maneuvers.
    pub turn: Rgb565,
    /// Destination flag and critical alert.
    pub alert: Rgb565,
    /// Glyphs with no specific accent.
    pub default: Rgb565,
    /// Normal distance text.
    pub distance: Rgb565,
    /// Maneuver and ETA text.
    pub info: Rgb565,
    /// Buttons and avatar borders.
    pub accent: Rgb565,
}

impl Theme {
    /// Daylight theme used on the panel.
    pub const DEFAULT: Self = Self {
        straight: GREEN,
        uturn: MAGENTA,
        roundabout: YELLOW,
        turn: ORANGE,
        alert: RED,
        default: GREEN,
        distance: WHITE,
        info: YELLOW,
        accent: CYAN,
    };

    /// RGB565 value of a glyph color token.
    pub const fn glyph_color(
        &self,
        token: GlyphColor,
    ) -> Rgb565 {
        match token {
            GlyphColor::Straight => self.straight,
            GlyphColor::UTurn => self.uturn,
            GlyphColor::Roundabout => self.roundabout,
            GlyphColor::Turn => self.turn,
            GlyphColor::Destination => self.alert,
            GlyphColor::Default => self.default,
        }
    }
}

impl Default for Theme {
    fn default() -> Self { Self::DEFAULT }
}

// =============================================================================
// Style Registry
// =============================================================================

/// Per-context style initialization guards plus the shared theme.
#[derive(Debug)]
pub struct StyleRegistry {
    theme: Theme,
    initialized: [bool; Context::COUNT],
}

impl StyleRegistry {
    /// Registry with nothing initialized yet.
    pub const fn new(theme: Theme) -> Self {
        Self {
            theme,
            initialized: [false; Context::COUNT],
        }
    }

    /// Active theme.
    #[inline]
    pub const fn theme(&self) -> &Theme { &self.theme }

    /// Marks the styles of `context` initialized.
    ///
    /// Returns `true` only on the first call for that context.
    pub fn init_once(
        &mut self,
        context: Context,
    ) -> bool {
        let slot = &mut self.initialized[context.index()];
        if *slot {
            false
        } else {
            *slot = true;
            true
        }
    }

    /// Whether `context` already initialized its styles.
    #[inline]
    pub const fn is_initialized(
        &self,
        context: Context,
    ) -> bool {
        self.initialized[context.index()]
    }
}

impl Default for StyleRegistry {
    fn default() -> Self { Self::new(Theme::DEFAULT) }
}

// =============================================================================
// Unit Tests
// =============================================================================
