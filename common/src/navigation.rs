//! Navigation display controller.
//!
//! Owns the navigation context's elements: one line element per glyph part,
//! the distance readout, the maneuver text and the ETA banner. It keeps the
//! last accepted instruction, the current classification, the distance and
//! the critical-alert flag.
//!
//! # Update Rules
//!
//! | Operation          | Absent input | Empty input               | Otherwise                         |
//! |--------------------|--------------|---------------------------|-----------------------------------|
//! | `update_direction` | no-op        | hide glyph, clear cache   | classify, build, show, cache      |
//! | `update_distance`  | -            | `<= 0` clears text, alert | format, recompute alert           |
//! | `update_maneuver`  | no-op        | clears text               | replace text                      |
//! | `update_eta`       | no-op        | clears text               | replace text                      |
//!
//! Re-submitting the cached instruction is a no-op. The alert pulse starts
//! only when the alert flag flips on, never on repeated near distances.
//!
//! Missing or invalidated elements are skipped; remaining fields still
//! update.

use core::fmt::Write;

use embedded_graphics::prelude::{Point, Size};
use heapless::String;

use crate::animations::Animation;
use crate::colors::BLACK;
use crate::config::{
    ALERT_DISTANCE_M,
    FLAG_LINE_WIDTH,
    GLYPH_LINE_WIDTH,
    GLYPH_ORIGIN,
    INSTRUCTION_MAX_LEN,
    KM_THRESHOLD_M,
    NAV_DISTANCE_Y,
    NAV_ETA_Y,
    NAV_MANEUVER_Y,
    NAV_TEXT_WIDTH,
};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::events::NavigationUpdate;
use crate::geometry::{self, GlyphGeometry, GlyphPart};
use crate::maneuver::{self, Classification, GlyphCategory};
use crate::styles::{FontRole, StyleRegistry, Theme};
use crate::surface::{Align, ElementId, ElementSpec, PresentationSurface};
use crate::{log_debug, log_error, log_info};

/// Formatted distance readout.
pub type DistanceText = String<16>;

/// Format meters for the distance label: `"<N> m"` below 1 km, otherwise
/// kilometers with one decimal rounded half-up (`1450` -> `"1.5 km"`).
///
/// Rounding is done on integer meters, so exact halves always round up
/// (`1050` -> `"1.1 km"`, `1250` -> `"1.3 km"`). Formatting the quotient as
/// a float would instead depend on its binary representation and give
/// `"1.0 km"` and `"1.2 km"` for those two.
///
/// Returns an empty string for `meters <= 0`.
pub fn format_distance(meters: i32) -> DistanceText {
    let mut out = DistanceText::new();
    if meters <= 0 {
        return out;
    }
    // Fits: i32::MAX formats to at most 14 bytes
    if meters < KM_THRESHOLD_M {
        let _ = write!(out, "{meters} m");
    } else {
        let tenths = (i64::from(meters) + 50) / 100;
        let _ = write!(out, "{}.{} km", tenths / 10, tenths % 10);
    }
    out
}

/// Controller for the navigation context.
pub struct NavigationDisplay {
    root: Option<ElementId>,
    parts: [Option<ElementId>; GlyphPart::ALL.len()],
    distance_label: Option<ElementId>,
    maneuver_label: Option<ElementId>,
    eta_label: Option<ElementId>,
    instruction: String<INSTRUCTION_MAX_LEN>,
    classification: Classification,
    distance: i32,
    critical_alert: bool,
    theme: Theme,
}

impl NavigationDisplay {
    /// Controller with no elements yet.
    pub const fn new() -> Self {
        Self {
            root: None,
            parts: [None; GlyphPart::ALL.len()],
            distance_label: None,
            maneuver_label: None,
            eta_label: None,
            instruction: String::new(),
            classification: Classification {
                category: GlyphCategory::None,
                orientation: maneuver::Orientation::Neutral,
                color: maneuver::GlyphColor::Default,
            },
            distance: 0,
            critical_alert: false,
            theme: Theme::DEFAULT,
        }
    }

    /// Build the navigation elements under `root`.
    ///
    /// The glyph starts hidden. Flag parts are created on first use.
    pub fn create<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        root: ElementId,
        styles: &mut StyleRegistry,
    ) -> Result<()> {
        if !surface.is_valid(root) {
            log_error!("nav: create without root");
            return Err(Error::MissingRoot(Context::Navigation));
        }
        if styles.init_once(Context::Navigation) {
            log_debug!("nav: styles ready");
        }
        self.theme = *styles.theme();
        self.root = Some(root);

        // Opaque so nothing from another context bleeds through
        surface.set_background(root, Some(BLACK))?;

        for part in GlyphPart::ALL {
            if !part.is_flag() {
                self.parts[part_index(part)] = Some(self.create_part(surface, root, part)?);
            }
        }

        let text_box = |y: i32, font: FontRole, color| {
            ElementSpec::label(Align::TopMid, Point::new(0, y), font, color)
                .with_size(Size::new(NAV_TEXT_WIDTH, font.line_height()))
        };
        self.eta_label = Some(surface.create_element(root, &text_box(NAV_ETA_Y, FontRole::Large, self.theme.info))?);
        self.distance_label =
            Some(surface.create_element(root, &text_box(NAV_DISTANCE_Y, FontRole::Huge, self.theme.distance))?);
        self.maneuver_label =
            Some(surface.create_element(root, &text_box(NAV_MANEUVER_Y, FontRole::Normal, self.theme.info))?);

        log_info!("nav: created");
        Ok(())
    }

    fn create_part<S: PresentationSurface>(
        &self,
        surface: &mut S,
        root: ElementId,
        part: GlyphPart,
    ) -> Result<ElementId> {
        let width = if part.is_flag() { FLAG_LINE_WIDTH } else { GLYPH_LINE_WIDTH };
        let spec = ElementSpec::line(GLYPH_ORIGIN, width, self.theme.default).hidden();
        Ok(surface.create_element(root, &spec)?)
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Show the glyph for a new instruction.
    pub fn update_direction<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        instruction: Option<&str>,
    ) {
        let Some(instruction) = instruction else {
            return;
        };
        let instruction = maneuver::bounded(instruction, INSTRUCTION_MAX_LEN);
        if instruction == self.instruction.as_str() {
            return;
        }

        self.instruction.clear();
        if instruction.is_empty() {
            self.classification = Classification::default();
            self.hide_glyph(surface);
            log_debug!("nav: blank direction");
            return;
        }
        // Cannot overflow: bounded to capacity above
        let _ = self.instruction.push_str(instruction);

        self.classification = maneuver::classify(Some(instruction));
        let geometry = geometry::build(self.classification.category, self.classification.orientation);
        self.show_glyph(surface, &geometry);
        log_info!("nav: {} -> {}", instruction, self.classification.category.name());
    }

    /// Update the distance readout and the critical alert.
    pub fn update_distance<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        meters: i32,
    ) {
        self.distance = meters;
        if let Some(label) = self.distance_label {
            surface.set_text(label, &format_distance(meters)).ok();
        }

        let alert = meters > 0 && meters < ALERT_DISTANCE_M;
        if alert != self.critical_alert {
            self.set_critical_alert(surface, alert);
        }
    }

    /// Replace the maneuver text.
    pub fn update_maneuver<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        text: Option<&str>,
    ) {
        if let (Some(text), Some(label)) = (text, self.maneuver_label) {
            surface.set_text(label, text).ok();
        }
    }

    /// Replace the ETA banner.
    pub fn update_eta<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        text: Option<&str>,
    ) {
        if let (Some(text), Some(label)) = (text, self.eta_label) {
            surface.set_text(label, text).ok();
        }
    }

    /// Apply every present field of an update, in field order.
    pub fn apply<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        update: &NavigationUpdate,
    ) {
        self.update_direction(surface, update.instruction.as_deref());
        if let Some(meters) = update.distance_m {
            self.update_distance(surface, meters);
        }
        self.update_maneuver(surface, update.maneuver.as_deref());
        self.update_eta(surface, update.eta.as_deref());
    }

    /// Reset texts, cache, alert and glyph.
    pub fn clear<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
    ) {
        for label in [self.distance_label, self.maneuver_label, self.eta_label].into_iter().flatten() {
            surface.set_text(label, "").ok();
        }
        self.instruction.clear();
        self.classification = Classification::default();
        self.distance = 0;
        if self.critical_alert {
            self.set_critical_alert(surface, false);
        }
        self.hide_glyph(surface);
        log_info!("nav: cleared");
    }

    // =========================================================================
    // Glyph and alert
    // =========================================================================

    fn show_glyph<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        geometry: &GlyphGeometry,
    ) {
        let color = self.theme.glyph_color(self.classification.color);
        for part in GlyphPart::ALL {
            let index = part_index(part);
            match geometry.part(part) {
                Some(points) => {
                    if self.parts[index].is_none() {
                        if let Some(root) = self.root {
                            self.parts[index] = self.create_part(surface, root, part).ok();
                        }
                    }
                    if let Some(id) = self.parts[index] {
                        surface.set_points(id, points).ok();
                        surface.set_color(id, color).ok();
                        surface.set_visible(id, true).ok();
                    }
                }
                None => {
                    if let Some(id) = self.parts[index] {
                        surface.set_visible(id, false).ok();
                    }
                }
            }
        }
    }

    fn hide_glyph<S: PresentationSurface>(
        &self,
        surface: &mut S,
    ) {
        for id in self.parts.iter().flatten() {
            surface.set_visible(*id, false).ok();
        }
    }

    fn set_critical_alert<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        on: bool,
    ) {
        self.critical_alert = on;
        let Some(label) = self.distance_label else {
            return;
        };
        if on {
            surface.set_color(label, self.theme.alert).ok();
            surface.animate(label, Animation::pulse()).ok();
            log_info!("nav: critical alert");
        } else {
            surface.stop_animations(label).ok();
            surface.set_color(label, self.theme.distance).ok();
            log_debug!("nav: alert cleared");
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether the near-turn alert is raised.
    #[inline]
    pub const fn critical_alert(&self) -> bool { self.critical_alert }

    /// Category of the current glyph.
    #[inline]
    pub const fn category(&self) -> GlyphCategory { self.classification.category }

    /// Current classification.
    #[inline]
    pub const fn classification(&self) -> Classification { self.classification }

    /// Last accepted instruction (bounded), empty when none.
    #[inline]
    pub fn instruction(&self) -> &str { self.instruction.as_str() }

    /// Last distance in meters.
    #[inline]
    pub const fn distance(&self) -> i32 { self.distance }

    /// Element drawing one glyph part, once created.
    #[inline]
    pub const fn part_element(
        &self,
        part: GlyphPart,
    ) -> Option<ElementId> {
        self.parts[part_index(part)]
    }

    /// Distance label element.
    #[inline]
    pub const fn distance_label(&self) -> Option<ElementId> { self.distance_label }

    /// Maneuver label element.
    #[inline]
    pub const fn maneuver_label(&self) -> Option<ElementId> { self.maneuver_label }

    /// ETA label element.
    #[inline]
    pub const fn eta_label(&self) -> Option<ElementId> { self.eta_label }
}

impl Default for NavigationDisplay {
    fn default() -> Self { Self::new() }
}

const fn part_index(part: GlyphPart) -> usize {
    match part {
        GlyphPart::Path => 0,
        GlyphPart::Shaft => 1,
        GlyphPart::HeadLeft => 2,
        GlyphPart::HeadRight => 3,
        GlyphPart::FlagPole => 4,
        GlyphPart::FlagPennant => 5,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{ORANGE, RED, WHITE};
    use crate::scene::Scene;

    fn setup() -> (Scene, NavigationDisplay) {
        let mut scene = Scene::new();
        let root = scene.create_root(BLACK).unwrap();
        let mut nav = NavigationDisplay::new();
        nav.create(&mut scene, root, &mut StyleRegistry::default()).unwrap();
        scene.load_root(root).unwrap();
        (scene, nav)
    }

    fn shown(scene: &Scene, nav: &NavigationDisplay) -> std::vec::Vec<GlyphPart> {
        GlyphPart::ALL
            .into_iter()
            .filter(|&p| nav.part_element(p).is_some_and(|id| scene.is_visible(id)))
            .collect()
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(500).as_str(), "500 m");
        assert_eq!(format_distance(999).as_str(), "999 m");
        assert_eq!(format_distance(1000).as_str(), "1.0 km");
        assert_eq!(format_distance(1500).as_str(), "1.5 km");
        assert_eq!(format_distance(1450).as_str(), "1.5 km");
        assert_eq!(format_distance(1449).as_str(), "1.4 km");
        assert_eq!(format_distance(12_345).as_str(), "12.3 km");
    }

    #[test]
    fn test_format_distance_exact_halves_round_up() {
        assert_eq!(format_distance(1050).as_str(), "1.1 km");
        assert_eq!(format_distance(1250).as_str(), "1.3 km");
        assert_eq!(format_distance(1049).as_str(), "1.0 km");
        assert_eq!(format_distance(9950).as_str(), "10.0 km");
        assert_eq!(format_distance(0).as_str(), "");
        assert_eq!(format_distance(-5).as_str(), "");
        assert_eq!(format_distance(i32::MAX).as_str(), "2147483.6 km");
    }

    #[test]
    fn test_create_requires_root() {
        let mut scene = Scene::new();
        let root = scene.create_root(BLACK).unwrap();
        scene.destroy(root);
        let mut nav = NavigationDisplay::new();
        let err = nav.create(&mut scene, root, &mut StyleRegistry::default());
        assert_eq!(err, Err(Error::MissingRoot(Context::Navigation)));
    }

    #[test]
    fn test_glyph_starts_hidden() {
        let (scene, nav) = setup();
        assert!(shown(&scene, &nav).is_empty());
        assert_eq!(nav.category(), GlyphCategory::None);
        // Flag parts are lazy
        assert!(nav.part_element(GlyphPart::FlagPole).is_none());
    }

    #[test]
    fn test_update_direction_shows_relevant_parts() {
        let (mut scene, mut nav) = setup();
        nav.update_direction(&mut scene, Some("turn_left"));
        assert_eq!(nav.category(), GlyphCategory::TurnLeft);
        assert_eq!(shown(&scene, &nav), [GlyphPart::Shaft, GlyphPart::HeadLeft, GlyphPart::HeadRight]);
        let shaft = nav.part_element(GlyphPart::Shaft).unwrap();
        assert_eq!(scene.color(shaft), Some(ORANGE));

        nav.update_direction(&mut scene, Some("turn_slight_right"));
        assert_eq!(nav.category(), GlyphCategory::SlightRight);
        assert_eq!(
            shown(&scene, &nav),
            [GlyphPart::Path, GlyphPart::Shaft, GlyphPart::HeadLeft, GlyphPart::HeadRight]
        );
    }

    #[test]
    fn test_destination_creates_flag_lazily_and_reuses_it() {
        let (mut scene, mut nav) = setup();
        nav.update_direction(&mut scene, Some("arrived"));
        assert_eq!(shown(&scene, &nav), [GlyphPart::FlagPole, GlyphPart::FlagPennant]);
        let pole = nav.part_element(GlyphPart::FlagPole).unwrap();
        assert_eq!(scene.color(pole), Some(RED));

        nav.update_direction(&mut scene, Some("straight"));
        assert!(!scene.is_visible(pole));

        let before = scene.len();
        nav.update_direction(&mut scene, Some("destination"));
        assert_eq!(scene.len(), before);
        assert_eq!(nav.part_element(GlyphPart::FlagPole), Some(pole));
        assert!(scene.is_visible(pole));
    }

    #[test]
    fn test_same_instruction_is_noop() {
        let (mut scene, mut nav) = setup();
        nav.update_direction(&mut scene, Some("turn_right"));
        let shaft = nav.part_element(GlyphPart::Shaft).unwrap();
        // Tamper with the element; a real update would restore it
        scene.set_visible(shaft, false).unwrap();
        nav.update_direction(&mut scene, Some("turn_right"));
        assert!(!scene.is_visible(shaft));
        assert_eq!(nav.instruction(), "turn_right");
    }

    #[test]
    fn test_idempotence_compares_bounded_instruction() {
        let (mut scene, mut nav) = setup();
        let base = "turn_left_".repeat(10);
        nav.update_direction(&mut scene, Some(&base));
        let shaft = nav.part_element(GlyphPart::Shaft).unwrap();
        scene.set_visible(shaft, false).unwrap();
        // Differs only past the bound
        let longer = std::format!("{base}xyz");
        nav.update_direction(&mut scene, Some(&longer));
        assert!(!scene.is_visible(shaft));
    }

    #[test]
    fn test_absent_direction_is_noop_and_empty_hides() {
        let (mut scene, mut nav) = setup();
        nav.update_direction(&mut scene, Some("straight"));
        nav.update_direction(&mut scene, None);
        assert_eq!(nav.category(), GlyphCategory::Straight);

        nav.update_direction(&mut scene, Some(""));
        assert_eq!(nav.category(), GlyphCategory::None);
        assert!(shown(&scene, &nav).is_empty());
        assert_eq!(nav.instruction(), "");

        // The same instruction is accepted again after a blank
        nav.update_direction(&mut scene, Some("straight"));
        assert_eq!(nav.category(), GlyphCategory::Straight);
    }

    #[test]
    fn test_unknown_instruction_hides_glyph() {
        let (mut scene, mut nav) = setup();
        nav.update_direction(&mut scene, Some("turn_left"));
        nav.update_direction(&mut scene, Some("merge"));
        assert_eq!(nav.category(), GlyphCategory::None);
        assert!(shown(&scene, &nav).is_empty());
    }

    #[test]
    fn test_distance_text() {
        let (mut scene, mut nav) = setup();
        let label = nav.distance_label().unwrap();
        nav.update_distance(&mut scene, 1500);
        assert_eq!(scene.text(label), Some("1.5 km"));
        nav.update_distance(&mut scene, 500);
        assert_eq!(scene.text(label), Some("500 m"));
        nav.update_distance(&mut scene, 0);
        assert_eq!(scene.text(label), Some(""));
        assert!(!nav.critical_alert());
    }

    #[test]
    fn test_alert_pulses_once_on_transition() {
        let (mut scene, mut nav) = setup();
        let label = nav.distance_label().unwrap();

        nav.update_distance(&mut scene, 150);
        assert!(!nav.critical_alert());
        let started = scene.animations_started();

        nav.update_distance(&mut scene, 50);
        assert!(nav.critical_alert());
        assert_eq!(scene.animations_started(), started + 1);
        assert_eq!(scene.animation(label), Some(Animation::pulse()));
        assert_eq!(scene.color(label), Some(RED));

        nav.update_distance(&mut scene, 30);
        assert!(nav.critical_alert());
        assert_eq!(scene.animations_started(), started + 1);

        nav.update_distance(&mut scene, 0);
        assert!(!nav.critical_alert());
        assert_eq!(scene.animation(label), None);
        assert_eq!(scene.color(label), Some(WHITE));
    }

    #[test]
    fn test_alert_boundaries() {
        let (mut scene, mut nav) = setup();
        nav.update_distance(&mut scene, 100);
        assert!(!nav.critical_alert());
        nav.update_distance(&mut scene, 99);
        assert!(nav.critical_alert());
        nav.update_distance(&mut scene, 1);
        assert!(nav.critical_alert());
        nav.update_distance(&mut scene, -1);
        assert!(!nav.critical_alert());
    }

    #[test]
    fn test_maneuver_and_eta() {
        let (mut scene, mut nav) = setup();
        nav.update_maneuver(&mut scene, Some("Turn onto Main St"));
        nav.update_eta(&mut scene, Some("ETA 12:45"));
        nav.update_maneuver(&mut scene, None);
        nav.update_eta(&mut scene, None);
        assert_eq!(scene.text(nav.maneuver_label().unwrap()), Some("Turn onto Main St"));
        assert_eq!(scene.text(nav.eta_label().unwrap()), Some("ETA 12:45"));
    }

    #[test]
    fn test_clear() {
        let (mut scene, mut nav) = setup();
        nav.update_direction(&mut scene, Some("uturn"));
        nav.update_distance(&mut scene, 40);
        nav.update_maneuver(&mut scene, Some("Make a U-turn"));
        nav.update_eta(&mut scene, Some("5 min"));

        nav.clear(&mut scene);
        assert!(!nav.critical_alert());
        assert_eq!(nav.category(), GlyphCategory::None);
        assert_eq!(nav.instruction(), "");
        assert!(shown(&scene, &nav).is_empty());
        for label in [nav.distance_label(), nav.maneuver_label(), nav.eta_label()] {
            assert_eq!(scene.text(label.unwrap()), Some(""));
        }
        assert_eq!(scene.animation(nav.distance_label().unwrap()), None);
    }

    #[test]
    fn test_missing_elements_are_skipped() {
        let (mut scene, mut nav) = setup();
        scene.destroy(nav.maneuver_label().unwrap());
        let update = NavigationUpdate::new()
            .with_instruction("turn_right")
            .with_distance(700)
            .with_maneuver("Turn right")
            .with_eta("ETA 10:00");
        nav.apply(&mut scene, &update);
        assert_eq!(nav.category(), GlyphCategory::TurnRight);
        assert_eq!(scene.text(nav.distance_label().unwrap()), Some("700 m"));
        assert_eq!(scene.text(nav.eta_label().unwrap()), Some("ETA 10:00"));
    }

    #[test]
    fn test_uncreated_controller_tolerates_updates() {
        let mut scene = Scene::new();
        let mut nav = NavigationDisplay::new();
        nav.update_direction(&mut scene, Some("turn_left"));
        nav.update_distance(&mut scene, 50);
        nav.update_eta(&mut scene, Some("x"));
        nav.clear(&mut scene);
        assert!(!nav.critical_alert());
        assert!(scene.is_empty());
    }
}
