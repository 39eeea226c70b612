//! Glyph geometry builder.
//!
//! Pure function from `(category, orientation)` to the line parts of a
//! navigation glyph. Coordinates are integers in a fixed logical canvas of
//! [`GLYPH_CANVAS_WIDTH`] x [`GLYPH_CANVAS_HEIGHT`] pixels, origin top-left;
//! placing the canvas on screen is the caller's job.
//!
//! # Parts
//!
//! | Part          | Used by                                           |
//! |---------------|---------------------------------------------------|
//! | `Shaft`       | arrows (main shaft, neck or exit leg), exit tick  |
//! | `HeadLeft`    | every arrow head                                  |
//! | `HeadRight`   | every arrow head                                  |
//! | `Path`        | slight/sharp/keep bends, U-turn stem+arc, ring    |
//! | `FlagPole`    | destination                                       |
//! | `FlagPennant` | destination                                       |
//!
//! Left-facing glyphs are the right-facing ones mirrored around the canvas
//! center line.
//!
//! # Arrow Heads
//!
//! Heads on bent paths follow the final segment: with `a = atan2(dy, dx)`
//! the wings sit at `tip + L * (cos(a ± 2.2), sin(a ± 2.2))`, trailing the
//! tip. Trig goes through `micromath` so the same code runs on target.

use core::f32::consts::PI;

use embedded_graphics::prelude::Point;
use heapless::Vec;
use micromath::F32;

use crate::config::{GLYPH_CANVAS_HEIGHT, GLYPH_CANVAS_WIDTH};
use crate::maneuver::{ExitSide, GlyphCategory, Orientation};

/// Maximum points in one glyph part.
pub const GLYPH_MAX_POINTS: usize = 16;

/// Owned point sequence of one part.
pub type Polyline = Vec<Point, GLYPH_MAX_POINTS>;

/// Angle between the shaft direction and each head wing.
const WING_ANGLE: f32 = 2.2;

/// Wing length of computed heads.
const WING_LENGTH: f32 = 16.0;

/// Length of the neck shaft that ends at a computed head's tip.
const NECK_LENGTH: f32 = 17.0;

/// Points on the U-turn arc (180 degrees).
const UTURN_ARC_POINTS: usize = 8;

/// U-turn arc radius.
const UTURN_RADIUS: f32 = 30.0;

/// Points on the roundabout ring (closed, 30 degree steps).
const RING_POINTS: usize = 13;

/// Roundabout ring radius.
const RING_RADIUS: f32 = 40.0;

/// Roundabout ring center.
const RING_CENTER: Point = Point::new(85, 70);

/// Wing offset of the fixed roundabout exit heads.
const EXIT_WING: i32 = 8;

const _: () = assert!(UTURN_ARC_POINTS + 1 <= GLYPH_MAX_POINTS);
const _: () = assert!(RING_POINTS <= GLYPH_MAX_POINTS);

// =============================================================================
// Geometry
// =============================================================================

/// Identifies one drawable part of a glyph.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GlyphPart {
    Shaft,
    HeadLeft,
    HeadRight,
    Path,
    FlagPole,
    FlagPennant,
}

impl GlyphPart {
    /// Every part, in drawing order.
    pub const ALL: [Self; 6] = [
        Self::Path,
        Self::Shaft,
        Self::HeadLeft,
        Self::HeadRight,
        Self::FlagPole,
        Self::FlagPennant,
    ];

    /// Whether the part belongs to the destination flag.
    #[inline]
    pub const fn is_flag(self) -> bool { matches!(self, Self::FlagPole | Self::FlagPennant) }
}

/// Line parts of one glyph. Absent parts are not drawn.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct GlyphGeometry {
    pub shaft: Option<Polyline>,
    pub head_left: Option<Polyline>,
    pub head_right: Option<Polyline>,
    pub path: Option<Polyline>,
    pub flag_pole: Option<Polyline>,
    pub flag_pennant: Option<Polyline>,
}

impl GlyphGeometry {
    /// Points of one part.
    pub fn part(
        &self,
        part: GlyphPart,
    ) -> Option<&[Point]> {
        let slot = match part {
            GlyphPart::Shaft => &self.shaft,
            GlyphPart::HeadLeft => &self.head_left,
            GlyphPart::HeadRight => &self.head_right,
            GlyphPart::Path => &self.path,
            GlyphPart::FlagPole => &self.flag_pole,
            GlyphPart::FlagPennant => &self.flag_pennant,
        };
        slot.as_ref().map(Polyline::as_slice)
    }

    /// Whether nothing would be drawn.
    pub fn is_empty(&self) -> bool { GlyphPart::ALL.iter().all(|&p| self.part(p).is_none()) }

    /// Mirror every point around the vertical center line of the canvas.
    #[must_use]
    fn mirrored(mut self) -> Self {
        for slot in [
            &mut self.shaft,
            &mut self.head_left,
            &mut self.head_right,
            &mut self.path,
            &mut self.flag_pole,
            &mut self.flag_pennant,
        ] {
            if let Some(points) = slot {
                for p in points.iter_mut() {
                    p.x = GLYPH_CANVAS_WIDTH - p.x;
                }
            }
        }
        self
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Rounds half away from zero.
fn round_i32(v: f32) -> i32 { if v >= 0.0 { (v + 0.5) as i32 } else { (v - 0.5) as i32 } }

fn poly(points: &[Point]) -> Polyline { points.iter().take(GLYPH_MAX_POINTS).copied().collect() }

fn seg(
    a: (i32, i32),
    b: (i32, i32),
) -> Option<Polyline> {
    Some(poly(&[Point::new(a.0, a.1), Point::new(b.0, b.1)]))
}

/// Point at `length` along `angle` from `origin`.
fn polar(
    origin: Point,
    angle: f32,
    length: f32,
) -> Point {
    Point::new(
        origin.x + round_i32(F32(angle).cos().0 * length),
        origin.y + round_i32(F32(angle).sin().0 * length),
    )
}

/// Bent arrow: the path itself, a neck shaft and a head aligned with the
/// final segment.
fn bent_arrow(points: &[Point]) -> GlyphGeometry {
    let n = points.len();
    let (prev, tip) = (points[n - 2], points[n - 1]);
    let angle = F32((tip.y - prev.y) as f32).atan2(F32((tip.x - prev.x) as f32)).0;

    GlyphGeometry {
        path: Some(poly(points)),
        shaft: Some(poly(&[polar(tip, angle + PI, NECK_LENGTH), tip])),
        head_left: Some(poly(&[polar(tip, angle - WING_ANGLE, WING_LENGTH), tip])),
        head_right: Some(poly(&[polar(tip, angle + WING_ANGLE, WING_LENGTH), tip])),
        ..GlyphGeometry::default()
    }
}

// =============================================================================
// Builders
// =============================================================================

fn straight() -> GlyphGeometry {
    GlyphGeometry {
        shaft: seg((85, 120), (85, 25)),
        head_left: seg((70, 25), (85, 10)),
        head_right: seg((100, 25), (85, 10)),
        ..GlyphGeometry::default()
    }
}

fn turn_right() -> GlyphGeometry {
    GlyphGeometry {
        shaft: seg((20, 70), (140, 70)),
        head_left: seg((130, 55), (148, 70)),
        head_right: seg((130, 85), (148, 70)),
        ..GlyphGeometry::default()
    }
}

fn slight_right() -> GlyphGeometry { bent_arrow(&[Point::new(85, 130), Point::new(115, 90), Point::new(130, 40)]) }

fn sharp_right() -> GlyphGeometry { bent_arrow(&[Point::new(85, 130), Point::new(85, 50), Point::new(135, 95)]) }

fn keep_right() -> GlyphGeometry {
    bent_arrow(&[
        Point::new(85, 130),
        Point::new(85, 75),
        Point::new(105, 55),
        Point::new(105, 30),
    ])
}

/// Right-hand U-turn: stem up, arc over to the right, exit leg down.
fn uturn_right() -> GlyphGeometry {
    let stem_bottom = Point::new(85, 130);
    let stem_top = Point::new(85, 95);
    let center = Point::new(stem_top.x + UTURN_RADIUS as i32, stem_top.y);

    let mut path = Polyline::new();
    path.push(stem_bottom).ok();
    for i in 0..UTURN_ARC_POINTS {
        let t = i as f32 / (UTURN_ARC_POINTS - 1) as f32;
        path.push(polar(center, PI * (1.0 + t), UTURN_RADIUS)).ok();
    }

    let leg_top = Point::new(center.x + UTURN_RADIUS as i32, center.y);
    let tip = Point::new(leg_top.x, leg_top.y + 20);
    let down = PI / 2.0;

    GlyphGeometry {
        path: Some(path),
        shaft: Some(poly(&[leg_top, tip])),
        head_left: Some(poly(&[polar(tip, down - WING_ANGLE, WING_LENGTH), tip])),
        head_right: Some(poly(&[polar(tip, down + WING_ANGLE, WING_LENGTH), tip])),
        ..GlyphGeometry::default()
    }
}

fn roundabout(exit: ExitSide) -> GlyphGeometry {
    let mut ring = Polyline::new();
    for i in 0..RING_POINTS {
        let angle = i as f32 * (2.0 * PI / (RING_POINTS - 1) as f32);
        ring.push(polar(RING_CENTER, angle, RING_RADIUS)).ok();
    }

    let (cx, cy, r, w) = (RING_CENTER.x, RING_CENTER.y, RING_RADIUS as i32, EXIT_WING);
    let (shaft, head_left, head_right) = match exit {
        ExitSide::Straight => (
            seg((cx, cy - r), (cx, cy - r - 15)),
            seg((cx - w, cy - r - 7), (cx, cy - r - 15)),
            seg((cx + w, cy - r - 7), (cx, cy - r - 15)),
        ),
        ExitSide::Left => (
            seg((cx - r, cy), (cx - r - 15, cy)),
            seg((cx - r - 7, cy - w), (cx - r - 15, cy)),
            seg((cx - r - 7, cy + w), (cx - r - 15, cy)),
        ),
        ExitSide::Right => (
            seg((cx + r, cy), (cx + r + 15, cy)),
            seg((cx + r + 7, cy - w), (cx + r + 15, cy)),
            seg((cx + r + 7, cy + w), (cx + r + 15, cy)),
        ),
    };

    GlyphGeometry {
        path: Some(ring),
        shaft,
        head_left,
        head_right,
        ..GlyphGeometry::default()
    }
}

fn destination() -> GlyphGeometry {
    GlyphGeometry {
        flag_pole: seg((57, 105), (57, 39)),
        flag_pennant: Some(poly(&[
            Point::new(57, 39),
            Point::new(57, 63),
            Point::new(93, 51),
            Point::new(57, 39),
        ])),
        ..GlyphGeometry::default()
    }
}

/// Build the glyph for a category.
///
/// `orientation` only matters for U-turns (the arc side); every other
/// category already carries its side. `Neutral` U-turns loop right.
pub fn build(
    category: GlyphCategory,
    orientation: Orientation,
) -> GlyphGeometry {
    match category {
        GlyphCategory::None => GlyphGeometry::default(),
        GlyphCategory::Straight => straight(),
        GlyphCategory::TurnRight => turn_right(),
        GlyphCategory::TurnLeft => turn_right().mirrored(),
        GlyphCategory::SlightRight => slight_right(),
        GlyphCategory::SlightLeft => slight_right().mirrored(),
        GlyphCategory::SharpRight => sharp_right(),
        GlyphCategory::SharpLeft => sharp_right().mirrored(),
        GlyphCategory::KeepRight => keep_right(),
        GlyphCategory::KeepLeft => keep_right().mirrored(),
        GlyphCategory::UTurn => match orientation {
            Orientation::Left => uturn_right().mirrored(),
            Orientation::Right | Orientation::Neutral => uturn_right(),
        },
        GlyphCategory::Roundabout(exit) => roundabout(exit),
        GlyphCategory::Destination => destination(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CATEGORIES: [GlyphCategory; 15] = [
        GlyphCategory::None,
        GlyphCategory::Straight,
        GlyphCategory::TurnLeft,
        GlyphCategory::TurnRight,
        GlyphCategory::SlightLeft,
        GlyphCategory::SlightRight,
        GlyphCategory::SharpLeft,
        GlyphCategory::SharpRight,
        GlyphCategory::KeepLeft,
        GlyphCategory::KeepRight,
        GlyphCategory::UTurn,
        GlyphCategory::Roundabout(ExitSide::Left),
        GlyphCategory::Roundabout(ExitSide::Straight),
        GlyphCategory::Roundabout(ExitSide::Right),
        GlyphCategory::Destination,
    ];

    fn near(a: Point, b: Point) -> bool { (a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1 }

    /// Dot product of (wing - tip) with the final path direction.
    fn trails(wing: Point, tip: Point, prev: Point) -> bool {
        let (wx, wy) = (wing.x - tip.x, wing.y - tip.y);
        let (dx, dy) = (tip.x - prev.x, tip.y - prev.y);
        wx * dx + wy * dy < 0
    }

    #[test]
    fn test_none_is_empty() {
        assert!(build(GlyphCategory::None, Orientation::Neutral).is_empty());
    }

    #[test]
    fn test_all_points_inside_canvas() {
        for category in ALL_CATEGORIES {
            for orientation in [Orientation::Left, Orientation::Right, Orientation::Neutral] {
                let g = build(category, orientation);
                for part in GlyphPart::ALL {
                    for p in g.part(part).unwrap_or(&[]) {
                        assert!(
                            (0..=GLYPH_CANVAS_WIDTH).contains(&p.x) && (0..=GLYPH_CANVAS_HEIGHT).contains(&p.y),
                            "{category:?} {part:?} {p:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        for category in ALL_CATEGORIES {
            assert_eq!(build(category, Orientation::Right), build(category, Orientation::Right));
        }
    }

    #[test]
    fn test_straight_is_centered_and_symmetric() {
        let g = build(GlyphCategory::Straight, Orientation::Neutral);
        assert_eq!(g.part(GlyphPart::Shaft), Some(&[Point::new(85, 120), Point::new(85, 25)][..]));
        let left = g.part(GlyphPart::HeadLeft).unwrap();
        let right = g.part(GlyphPart::HeadRight).unwrap();
        assert_eq!(left[1], right[1]);
        assert_eq!(85 - left[0].x, right[0].x - 85);
        assert!(g.path.is_none());
    }

    #[test]
    fn test_turns_are_mirrored() {
        let right = build(GlyphCategory::TurnRight, Orientation::Right);
        let left = build(GlyphCategory::TurnLeft, Orientation::Left);
        assert_eq!(right.part(GlyphPart::HeadLeft).unwrap()[1], Point::new(148, 70));
        assert_eq!(left.part(GlyphPart::HeadLeft).unwrap()[1], Point::new(22, 70));
        for part in GlyphPart::ALL {
            let (r, l) = (right.part(part), left.part(part));
            assert_eq!(r.is_some(), l.is_some());
            if let (Some(r), Some(l)) = (r, l) {
                for (a, b) in r.iter().zip(l) {
                    assert_eq!(a.x, GLYPH_CANVAS_WIDTH - b.x);
                    assert_eq!(a.y, b.y);
                }
            }
        }
    }

    #[test]
    fn test_bent_arrows_have_trailing_wings() {
        for category in [
            GlyphCategory::SlightLeft,
            GlyphCategory::SlightRight,
            GlyphCategory::SharpLeft,
            GlyphCategory::SharpRight,
            GlyphCategory::KeepLeft,
            GlyphCategory::KeepRight,
        ] {
            let g = build(category, Orientation::Neutral);
            let path = g.part(GlyphPart::Path).unwrap();
            assert!((3..=4).contains(&path.len()), "{category:?}");
            let (prev, tip) = (path[path.len() - 2], path[path.len() - 1]);

            for head in [GlyphPart::HeadLeft, GlyphPart::HeadRight] {
                let wing = g.part(head).unwrap();
                assert_eq!(wing[1], tip, "{category:?}");
                assert!(trails(wing[0], tip, prev), "{category:?} {head:?}");
            }

            let neck = g.part(GlyphPart::Shaft).unwrap();
            assert_eq!(neck[1], tip);
            assert!(trails(neck[0], tip, prev));
        }
    }

    #[test]
    fn test_bent_arrow_categories_are_distinct() {
        let slight = build(GlyphCategory::SlightRight, Orientation::Right);
        let sharp = build(GlyphCategory::SharpRight, Orientation::Right);
        let keep = build(GlyphCategory::KeepRight, Orientation::Right);
        assert_ne!(slight.path, sharp.path);
        assert_ne!(slight.path, keep.path);
        assert_ne!(sharp.path, keep.path);
    }

    #[test]
    fn test_keep_head_is_symmetric() {
        // Final segment is vertical, so the wings mirror each other
        let g = build(GlyphCategory::KeepRight, Orientation::Right);
        let a = g.part(GlyphPart::HeadLeft).unwrap()[0];
        let b = g.part(GlyphPart::HeadRight).unwrap()[0];
        assert!((a.y - b.y).abs() <= 1);
        assert!(((a.x - 105) + (b.x - 105)).abs() <= 1);
    }

    #[test]
    fn test_uturn_arc() {
        let g = build(GlyphCategory::UTurn, Orientation::Right);
        let path = g.part(GlyphPart::Path).unwrap();
        assert_eq!(path.len(), 1 + UTURN_ARC_POINTS);
        assert_eq!(path[0], Point::new(85, 130));
        assert!(near(path[1], Point::new(85, 95)));
        assert!(near(path[UTURN_ARC_POINTS], Point::new(145, 95)));
        // Arc bulges upward
        assert!(path[1..].iter().all(|p| p.y <= 95));
        assert!(path[1..].iter().any(|p| p.y <= 66));

        // Exit leg points down
        let leg = g.part(GlyphPart::Shaft).unwrap();
        assert!(leg[1].y > leg[0].y);
    }

    #[test]
    fn test_uturn_orientation_mirrors_arc_center() {
        let right = build(GlyphCategory::UTurn, Orientation::Right);
        let left = build(GlyphCategory::UTurn, Orientation::Left);
        let neutral = build(GlyphCategory::UTurn, Orientation::Neutral);
        assert_eq!(right, neutral);
        let r_end = right.part(GlyphPart::Path).unwrap()[UTURN_ARC_POINTS];
        let l_end = left.part(GlyphPart::Path).unwrap()[UTURN_ARC_POINTS];
        assert!(r_end.x > 85);
        assert!(l_end.x < 85);
    }

    #[test]
    fn test_roundabout_ring_and_exits() {
        let top = build(GlyphCategory::Roundabout(ExitSide::Straight), Orientation::Neutral);
        let ring = top.part(GlyphPart::Path).unwrap();
        assert_eq!(ring.len(), RING_POINTS);
        assert!(near(ring[0], ring[RING_POINTS - 1]));
        assert!(near(ring[0], Point::new(125, 70)));
        assert_eq!(top.part(GlyphPart::Shaft), Some(&[Point::new(85, 30), Point::new(85, 15)][..]));

        let left = build(GlyphCategory::Roundabout(ExitSide::Left), Orientation::Left);
        assert_eq!(left.part(GlyphPart::Shaft), Some(&[Point::new(45, 70), Point::new(30, 70)][..]));

        let right = build(GlyphCategory::Roundabout(ExitSide::Right), Orientation::Right);
        assert_eq!(right.part(GlyphPart::Shaft), Some(&[Point::new(125, 70), Point::new(140, 70)][..]));
    }

    #[test]
    fn test_destination_uses_only_flag_parts() {
        let g = build(GlyphCategory::Destination, Orientation::Neutral);
        for part in GlyphPart::ALL {
            assert_eq!(g.part(part).is_some(), part.is_flag(), "{part:?}");
        }
        let pennant = g.part(GlyphPart::FlagPennant).unwrap();
        assert_eq!(pennant.first(), pennant.last());
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_i32(1.5), 2);
        assert_eq!(round_i32(-1.5), -2);
        assert_eq!(round_i32(0.49), 0);
        assert_eq!(round_i32(-0.49), 0);
    }
}
