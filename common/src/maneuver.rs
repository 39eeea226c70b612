//! Maneuver classification.
//!
//! Turns a free-form instruction token from the phone (`"turn_slight_right"`,
//! `"roundabout-2"`, `"UTURN"`) into a [`Classification`]: which glyph to
//! draw, which way it faces and which semantic color it gets.
//!
//! # Normalization
//!
//! The instruction is bounded to [`INSTRUCTION_MAX_LEN`] bytes (cut on a
//! character boundary) and ASCII-lowercased. Nothing about the input can
//! make classification fail.
//!
//! # Resolution
//!
//! Token presence is tested by substring, then [`RULES`] is walked in order
//! and the first matching rule decides the category:
//!
//! | # | Condition                      | Category                    |
//! |---|--------------------------------|-----------------------------|
//! | 1 | U-turn                         | `UTurn` (always right-hand) |
//! | 2 | keep + laterality              | `KeepLeft` / `KeepRight`    |
//! | 3 | sharp + laterality             | `SharpLeft` / `SharpRight`  |
//! | 4 | (slight or keep) + laterality  | `SlightLeft` / `SlightRight`|
//! | 5 | roundabout                     | `Roundabout(exit)`          |
//! | 6 | laterality                     | `TurnLeft` / `TurnRight`    |
//! | 7 | destination                    | `Destination`               |
//! | 8 | straight                       | `Straight`                  |
//! | - | anything else                  | `None`                      |
//!
//! When both sides are named, `right` wins in rules 2-4 and 6.
//!
//! Color is a separate axis driven by tokens, not by the category, so e.g.
//! `"continue_left"` is a left turn drawn in the straight accent.

use heapless::String;

use crate::config::INSTRUCTION_MAX_LEN;

// =============================================================================
// Types
// =============================================================================

/// Exit position of a roundabout glyph.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExitSide {
    /// Exit tick on the left of the ring.
    Left,
    /// Exit tick on top of the ring.
    Straight,
    /// Exit tick on the right of the ring.
    Right,
}

/// The glyph family to draw.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GlyphCategory {
    /// Render nothing.
    #[default]
    None,
    Straight,
    TurnLeft,
    TurnRight,
    SlightLeft,
    SlightRight,
    SharpLeft,
    SharpRight,
    KeepLeft,
    KeepRight,
    UTurn,
    Roundabout(ExitSide),
    Destination,
}

impl GlyphCategory {
    /// Short name for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Straight => "straight",
            Self::TurnLeft => "turn-left",
            Self::TurnRight => "turn-right",
            Self::SlightLeft => "slight-left",
            Self::SlightRight => "slight-right",
            Self::SharpLeft => "sharp-left",
            Self::SharpRight => "sharp-right",
            Self::KeepLeft => "keep-left",
            Self::KeepRight => "keep-right",
            Self::UTurn => "u-turn",
            Self::Roundabout(ExitSide::Left) => "roundabout-left",
            Self::Roundabout(ExitSide::Straight) => "roundabout",
            Self::Roundabout(ExitSide::Right) => "roundabout-right",
            Self::Destination => "destination",
        }
    }
}

/// Which way a glyph faces.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    Left,
    Right,
    /// Symmetric glyphs.
    #[default]
    Neutral,
}

/// Semantic glyph color, mapped to RGB565 by the theme.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GlyphColor {
    Straight,
    UTurn,
    Roundabout,
    /// Any lateral maneuver.
    Turn,
    /// Destination and alert accent.
    Destination,
    #[default]
    Default,
}

/// Result of classifying one instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Classification {
    pub category: GlyphCategory,
    pub orientation: Orientation,
    pub color: GlyphColor,
}

// =============================================================================
// Tokens
// =============================================================================

const KEEP: &[&str] = &["keep_", "keep ", "keep-", "bear_", "bear ", "bear-"];
const UTURN: &[&str] = &["uturn", "u_turn", "u-turn", "u turn", "turn_around", "turn around"];
const ROUNDABOUT: &[&str] = &["roundabout", "rotary", "circle"];
const STRAIGHT: &[&str] = &["straight", "forward", "continue"];
const DESTINATION: &[&str] = &["destination", "arrived", "end"];

/// Token presence flags of a normalized instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Tokens {
    pub left: bool,
    pub right: bool,
    pub keep: bool,
    pub slight: bool,
    pub sharp: bool,
    pub uturn: bool,
    pub roundabout: bool,
    pub straight: bool,
    pub destination: bool,
}

impl Tokens {
    /// Scan a normalized (lowercase) instruction.
    pub fn scan(normalized: &str) -> Self {
        let any = |set: &[&str]| set.iter().any(|t| normalized.contains(t));
        Self {
            left: normalized.contains("left"),
            right: normalized.contains("right"),
            keep: any(KEEP),
            slight: normalized.contains("slight"),
            sharp: normalized.contains("sharp"),
            uturn: any(UTURN),
            roundabout: any(ROUNDABOUT),
            straight: any(STRAIGHT),
            destination: any(DESTINATION),
        }
    }

    /// Either laterality token present.
    #[inline]
    pub const fn lateral(&self) -> bool { self.left || self.right }

    /// Token-driven color, first match wins.
    pub const fn color(&self) -> GlyphColor {
        if self.straight {
            GlyphColor::Straight
        } else if self.uturn {
            GlyphColor::UTurn
        } else if self.roundabout {
            GlyphColor::Roundabout
        } else if self.keep || self.sharp || self.slight || self.lateral() {
            GlyphColor::Turn
        } else if self.destination {
            GlyphColor::Destination
        } else {
            GlyphColor::Default
        }
    }
}

// =============================================================================
// Rules
// =============================================================================

/// One row of the resolution table.
pub struct Rule {
    /// Short name for logs and tests.
    pub name: &'static str,
    /// Whether the rule applies.
    pub applies: fn(&Tokens) -> bool,
    /// Category and orientation when it does.
    pub resolve: fn(&Tokens) -> (GlyphCategory, Orientation),
}

const fn sided(
    t: &Tokens,
    left: GlyphCategory,
    right: GlyphCategory,
) -> (GlyphCategory, Orientation) {
    if t.right { (right, Orientation::Right) } else { (left, Orientation::Left) }
}

/// Ordered resolution table; the first rule that applies wins.
pub const RULES: &[Rule] = &[
    Rule {
        name: "uturn",
        applies: |t| t.uturn,
        // Always drawn as a right-hand loop regardless of laterality
        resolve: |_| (GlyphCategory::UTurn, Orientation::Right),
    },
    Rule {
        name: "keep",
        applies: |t| t.keep && t.lateral(),
        resolve: |t| sided(t, GlyphCategory::KeepLeft, GlyphCategory::KeepRight),
    },
    Rule {
        name: "sharp",
        applies: |t| t.sharp && t.lateral(),
        resolve: |t| sided(t, GlyphCategory::SharpLeft, GlyphCategory::SharpRight),
    },
    Rule {
        name: "slight",
        // `keep` inputs never get here, rule 2 takes them
        applies: |t| (t.slight || t.keep) && t.lateral(),
        resolve: |t| sided(t, GlyphCategory::SlightLeft, GlyphCategory::SlightRight),
    },
    Rule {
        name: "roundabout",
        applies: |t| t.roundabout,
        resolve: |t| {
            if t.left {
                (GlyphCategory::Roundabout(ExitSide::Left), Orientation::Left)
            } else if t.right {
                (GlyphCategory::Roundabout(ExitSide::Right), Orientation::Right)
            } else {
                (GlyphCategory::Roundabout(ExitSide::Straight), Orientation::Neutral)
            }
        },
    },
    Rule {
        name: "turn",
        applies: Tokens::lateral,
        resolve: |t| sided(t, GlyphCategory::TurnLeft, GlyphCategory::TurnRight),
    },
    Rule {
        name: "destination",
        applies: |t| t.destination,
        resolve: |_| (GlyphCategory::Destination, Orientation::Neutral),
    },
    Rule {
        name: "straight",
        applies: |t| t.straight,
        resolve: |_| (GlyphCategory::Straight, Orientation::Neutral),
    },
];

// =============================================================================
// Classification
// =============================================================================

/// Longest prefix of `s` that fits in `max` bytes without splitting a character.
pub fn bounded(
    s: &str,
    max: usize,
) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Bounded, ASCII-lowercased copy of an instruction.
pub fn normalize(instruction: &str) -> String<INSTRUCTION_MAX_LEN> {
    let mut out = String::new();
    for c in bounded(instruction, INSTRUCTION_MAX_LEN).chars() {
        // Cannot overflow: the input is already bounded to capacity
        let _ = out.push(c.to_ascii_lowercase());
    }
    out
}

/// Classify an instruction. Absent or empty input yields `None`.
pub fn classify(instruction: Option<&str>) -> Classification {
    let Some(instruction) = instruction.filter(|s| !s.is_empty()) else {
        return Classification::default();
    };

    let normalized = normalize(instruction);
    let tokens = Tokens::scan(&normalized);

    let (category, orientation) = RULES
        .iter()
        .find(|rule| (rule.applies)(&tokens))
        .map_or((GlyphCategory::None, Orientation::Neutral), |rule| (rule.resolve)(&tokens));

    Classification {
        category,
        orientation,
        color: tokens.color(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn category(s: &str) -> GlyphCategory { classify(Some(s)).category }

    #[test]
    fn test_plain_laterality_is_a_turn() {
        assert_eq!(category("turn_left"), GlyphCategory::TurnLeft);
        assert_eq!(category("turn_right"), GlyphCategory::TurnRight);
        assert_eq!(category("LEFT"), GlyphCategory::TurnLeft);
        assert_eq!(classify(Some("right")).orientation, Orientation::Right);
    }

    #[test]
    fn test_right_wins_for_plain_turns() {
        for s in ["left_then_right", "right_then_left", "turn right, then left"] {
            let c = classify(Some(s));
            assert_eq!(c.category, GlyphCategory::TurnRight, "{s}");
            assert_eq!(c.orientation, Orientation::Right, "{s}");
        }
    }

    #[test]
    fn test_keep_has_priority_over_slight() {
        assert_eq!(category("keep_left"), GlyphCategory::KeepLeft);
        assert_eq!(category("keep_slight_right"), GlyphCategory::KeepRight);
        assert_eq!(category("bear-right"), GlyphCategory::KeepRight);
        assert_eq!(category("Keep Left"), GlyphCategory::KeepLeft);
    }

    #[test]
    fn test_right_tested_first_in_modifier_rules() {
        assert_eq!(category("keep_left_right"), GlyphCategory::KeepRight);
        assert_eq!(category("sharp left or right"), GlyphCategory::SharpRight);
    }

    #[test]
    fn test_keep_without_separator_is_not_keep() {
        // "keepleft" lacks the separator the keep tokens need
        assert_eq!(category("keepleft"), GlyphCategory::TurnLeft);
    }

    #[test]
    fn test_slight_and_sharp() {
        assert_eq!(category("turn_slight_right"), GlyphCategory::SlightRight);
        assert_eq!(category("turn_slight_left"), GlyphCategory::SlightLeft);
        assert_eq!(category("turn_sharp_left"), GlyphCategory::SharpLeft);
        assert_eq!(category("sharp-right"), GlyphCategory::SharpRight);
    }

    #[test]
    fn test_modifier_without_laterality_falls_through() {
        assert_eq!(category("slight"), GlyphCategory::None);
        assert_eq!(category("sharp_straight"), GlyphCategory::Straight);
    }

    #[test]
    fn test_uturn_is_always_right_hand() {
        for s in ["uturn", "u_turn_left", "U-TURN", "make a u turn", "turn_around", "turn around left"] {
            let c = classify(Some(s));
            assert_eq!(c.category, GlyphCategory::UTurn, "{s}");
            assert_eq!(c.orientation, Orientation::Right, "{s}");
            assert_eq!(c.color, GlyphColor::UTurn, "{s}");
        }
    }

    #[test]
    fn test_roundabout_exit_side() {
        assert_eq!(category("roundabout-2"), GlyphCategory::Roundabout(ExitSide::Straight));
        assert_eq!(category("roundabout_left"), GlyphCategory::Roundabout(ExitSide::Left));
        assert_eq!(category("rotary_right"), GlyphCategory::Roundabout(ExitSide::Right));
        assert_eq!(category("traffic circle"), GlyphCategory::Roundabout(ExitSide::Straight));
    }

    #[test]
    fn test_destination_and_straight() {
        assert_eq!(category("destination"), GlyphCategory::Destination);
        assert_eq!(category("arrived"), GlyphCategory::Destination);
        assert_eq!(category("end"), GlyphCategory::Destination);
        assert_eq!(category("straight"), GlyphCategory::Straight);
        assert_eq!(category("go_forward"), GlyphCategory::Straight);
        assert_eq!(category("continue"), GlyphCategory::Straight);
    }

    #[test]
    fn test_unknown_and_empty_are_none() {
        assert_eq!(classify(Some("merge")), Classification::default());
        assert_eq!(classify(Some("")).category, GlyphCategory::None);
        assert_eq!(classify(None).category, GlyphCategory::None);
        assert_eq!(classify(None).color, GlyphColor::Default);
    }

    #[test]
    fn test_color_follows_tokens() {
        assert_eq!(classify(Some("straight")).color, GlyphColor::Straight);
        assert_eq!(classify(Some("roundabout_left")).color, GlyphColor::Roundabout);
        assert_eq!(classify(Some("turn_left")).color, GlyphColor::Turn);
        assert_eq!(classify(Some("keep_right")).color, GlyphColor::Turn);
        assert_eq!(classify(Some("arrived")).color, GlyphColor::Destination);
        // Shape and color are independent axes
        let c = classify(Some("continue_left"));
        assert_eq!(c.category, GlyphCategory::TurnLeft);
        assert_eq!(c.color, GlyphColor::Straight);
    }

    #[test]
    fn test_oversized_input_is_bounded() {
        let mut long = "x".repeat(200);
        long.push_str("left");
        // The laterality token lies past the bound and is ignored
        assert_eq!(category(&long), GlyphCategory::None);
        assert_eq!(normalize(&long).len(), INSTRUCTION_MAX_LEN);
    }

    #[test]
    fn test_non_ascii_input_is_safe() {
        let s = "é".repeat(40); // 80 bytes, two per char
        let n = normalize(&s);
        assert!(n.len() <= INSTRUCTION_MAX_LEN);
        assert_eq!(n.len() % 2, 0);
        assert_eq!(category("Überholen_LEFT"), GlyphCategory::TurnLeft);
    }

    #[test]
    fn test_bounded() {
        assert_eq!(bounded("abc", 10), "abc");
        assert_eq!(bounded("abcdef", 3), "abc");
        assert_eq!(bounded("aé", 2), "a");
    }

    #[test]
    fn test_rule_order() {
        let names: std::vec::Vec<&str> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            ["uturn", "keep", "sharp", "slight", "roundabout", "turn", "destination", "straight"]
        );
    }
}
