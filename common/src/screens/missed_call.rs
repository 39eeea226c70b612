//! Missed-call context.
//!
//! A notification card parked above the panel. [`MissedCallScreen::show`]
//! slides it down into view and [`MissedCallScreen::hide`] slides it back
//! up from wherever it currently is. The OK button and any tap on the
//! backdrop dismiss it.

use core::fmt::Write;

use embedded_graphics::prelude::{Point, Size};
use heapless::String;

use super::{Presenter, name_or, prepare_root, set_text, set_visible, shown_number};
use crate::animations::Animation;
use crate::colors::{BLACK, CYAN, GRAY, GRAY_CARD, GRAY_DIM, RED, WHITE};
use crate::config::{MISSED_CARD_HIDDEN_Y, MISSED_CARD_SHOWN_Y, MISSED_CARD_SIZE, SLIDE_IN_MS, SLIDE_OUT_MS};
use crate::context::Context;
use crate::error::Result;
use crate::events::MissedCallInfo;
use crate::styles::{FontRole, StyleRegistry};
use crate::surface::{Align, ElementId, ElementSpec, PresentationSurface, UiAction};
use crate::{log_debug, log_info, log_warn};

const UNKNOWN_CALLER: &str = "Unknown Caller";

const BADGE_SIZE: u32 = 30;
const OK_BUTTON_SIZE: Size = Size::new(120, 35);

/// Sliding card with caller, count badge and timestamp.
#[derive(Debug, Default)]
pub struct MissedCallScreen {
    card: Option<ElementId>,
    badge: Option<ElementId>,
    badge_text: Option<ElementId>,
    name: Option<ElementId>,
    number: Option<ElementId>,
    timestamp: Option<ElementId>,
    ok: Option<ElementId>,
}

impl MissedCallScreen {
    pub const fn new() -> Self {
        Self {
            card: None,
            badge: None,
            badge_text: None,
            name: None,
            number: None,
            timestamp: None,
            ok: None,
        }
    }

    /// Fill the card. The badge shows only for repeated calls.
    pub fn update<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        missed: &MissedCallInfo,
    ) {
        set_text(surface, self.name, name_or(&missed.name, UNKNOWN_CALLER));
        set_text(surface, self.number, shown_number(&missed.number));
        set_text(surface, self.timestamp, &missed.timestamp);

        if missed.count > 1 {
            let mut count = String::<8>::new();
            // u16 fits
            let _ = write!(count, "{}", missed.count);
            set_text(surface, self.badge_text, &count);
            set_visible(surface, self.badge, true);
        } else {
            set_visible(surface, self.badge, false);
        }
    }

    /// Slide the card in from above the panel.
    pub fn slide_in<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
    ) {
        let Some(card) = self.card.filter(|&card| surface.is_valid(card)) else {
            log_warn!("missed: no card to show");
            return;
        };
        surface.set_offset(card, Point::new(0, MISSED_CARD_HIDDEN_Y)).ok();
        surface
            .animate(card, Animation::slide_y(MISSED_CARD_HIDDEN_Y, MISSED_CARD_SHOWN_Y, SLIDE_IN_MS))
            .ok();
        log_debug!("missed: slide in");
    }

    /// Slide the card out, starting from its current position.
    pub fn slide_out<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
    ) {
        let Some(card) = self.card.filter(|&card| surface.is_valid(card)) else {
            log_warn!("missed: no card to hide");
            return;
        };
        let from = surface.offset(card).map_or(MISSED_CARD_SHOWN_Y, |p| p.y);
        surface.animate(card, Animation::slide_y(from, MISSED_CARD_HIDDEN_Y, SLIDE_OUT_MS)).ok();
        log_debug!("missed: slide out from {}", from);
    }

    #[inline]
    pub const fn card(&self) -> Option<ElementId> { self.card }

    #[inline]
    pub const fn name_label(&self) -> Option<ElementId> { self.name }

    #[inline]
    pub const fn number_label(&self) -> Option<ElementId> { self.number }

    #[inline]
    pub const fn timestamp_label(&self) -> Option<ElementId> { self.timestamp }

    #[inline]
    pub const fn badge(&self) -> Option<ElementId> { self.badge }

    #[inline]
    pub const fn badge_label(&self) -> Option<ElementId> { self.badge_text }

    #[inline]
    pub const fn ok_button(&self) -> Option<ElementId> { self.ok }
}

impl Presenter for MissedCallScreen {
    const CONTEXT: Context = Context::MissedCall;

    fn create<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        root: ElementId,
        styles: &mut StyleRegistry,
    ) -> Result<()> {
        prepare_root(surface, root, Self::CONTEXT, styles)?;
        // Tap anywhere
        surface.set_action(root, UiAction::DismissMissedCall)?;

        let card = surface.create_element(
            root,
            &ElementSpec::panel(Align::TopMid, Point::new(0, MISSED_CARD_HIDDEN_Y), MISSED_CARD_SIZE, GRAY_CARD)
                .with_border(RED, 2)
                .with_radius(12),
        )?;
        self.card = Some(card);

        let icon = surface.create_element(
            card,
            &ElementSpec::label(Align::TopMid, Point::new(0, 10), FontRole::Huge, RED),
        )?;
        surface.set_text(icon, "!")?;

        let badge = surface.create_element(
            card,
            &ElementSpec::panel(Align::TopRight, Point::new(-10, 10), Size::new_equal(BADGE_SIZE), RED)
                .with_radius(BADGE_SIZE / 2)
                .hidden(),
        )?;
        let badge_text = surface.create_element(
            badge,
            &ElementSpec::label(Align::Center, Point::zero(), FontRole::Normal, WHITE),
        )?;
        surface.set_text(badge_text, "1")?;
        self.badge = Some(badge);
        self.badge_text = Some(badge_text);

        let row = |y: i32, font: FontRole, color| {
            ElementSpec::label(Align::Center, Point::new(0, y), font, color)
                .with_size(Size::new(MISSED_CARD_SIZE.width, font.line_height()))
        };
        let name = surface.create_element(card, &row(-30, FontRole::Medium, WHITE))?;
        surface.set_text(name, "Missed Call")?;
        self.name = Some(name);
        self.number = Some(surface.create_element(card, &row(0, FontRole::Normal, GRAY))?);
        self.timestamp = Some(surface.create_element(card, &row(20, FontRole::Small, GRAY_DIM))?);

        let ok = surface.create_element(
            card,
            &ElementSpec::button(Align::BottomMid, Point::new(0, -10), OK_BUTTON_SIZE, CYAN).with_radius(20),
        )?;
        surface.set_action(ok, UiAction::DismissMissedCall)?;
        let caption = surface.create_element(
            ok,
            &ElementSpec::label(Align::Center, Point::zero(), FontRole::Medium, BLACK),
        )?;
        surface.set_text(caption, "OK")?;
        self.ok = Some(ok);

        log_info!("missed: created");
        Ok(())
    }

    fn show<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
    ) {
        self.slide_in(surface);
    }

    fn hide<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
    ) {
        self.slide_out(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    fn setup() -> (Scene, MissedCallScreen) {
        let mut scene = Scene::new();
        let root = scene.create_root(BLACK).unwrap();
        let mut missed = MissedCallScreen::new();
        missed.create(&mut scene, root, &mut StyleRegistry::default()).unwrap();
        scene.load_root(root).unwrap();
        (scene, missed)
    }

    fn card_y(
        scene: &Scene,
        missed: &MissedCallScreen,
    ) -> i32 {
        scene.offset(missed.card().unwrap()).unwrap().y
    }

    #[test]
    fn test_card_starts_off_screen() {
        let (scene, missed) = setup();
        assert_eq!(card_y(&scene, &missed), MISSED_CARD_HIDDEN_Y);
        let bounds = scene.bounds(missed.card().unwrap()).unwrap();
        assert!(bounds.bottom_right().unwrap().y < 0);
    }

    #[test]
    fn test_update_fields_and_badge() {
        let (mut scene, mut missed) = setup();
        missed.update(&mut scene, &MissedCallInfo::new("Asha", "+91 98450 12345", 3, "14:05"));
        assert_eq!(scene.text(missed.name_label().unwrap()), Some("Asha"));
        assert_eq!(scene.text(missed.number_label().unwrap()), Some("+91 98450 12345"));
        assert_eq!(scene.text(missed.timestamp_label().unwrap()), Some("14:05"));
        assert!(scene.is_visible(missed.badge().unwrap()));
        assert_eq!(scene.text(missed.badge_label().unwrap()), Some("3"));

        missed.update(&mut scene, &MissedCallInfo::new("", "Unknown", 1, ""));
        assert_eq!(scene.text(missed.name_label().unwrap()), Some(UNKNOWN_CALLER));
        assert_eq!(scene.text(missed.number_label().unwrap()), Some(""));
        assert_eq!(scene.text(missed.timestamp_label().unwrap()), Some(""));
        assert!(!scene.is_visible(missed.badge().unwrap()));
    }

    #[test]
    fn test_slide_in_then_out() {
        let (mut scene, mut missed) = setup();
        missed.show(&mut scene);
        scene.tick(SLIDE_IN_MS / 2);
        let halfway = card_y(&scene, &missed);
        assert!(halfway > MISSED_CARD_HIDDEN_Y && halfway < MISSED_CARD_SHOWN_Y);

        scene.tick(SLIDE_IN_MS + 1);
        assert_eq!(card_y(&scene, &missed), MISSED_CARD_SHOWN_Y);

        missed.hide(&mut scene);
        scene.tick(SLIDE_IN_MS + 1 + SLIDE_OUT_MS + 1);
        assert_eq!(card_y(&scene, &missed), MISSED_CARD_HIDDEN_Y);
    }

    #[test]
    fn test_hide_mid_slide_starts_from_current_position() {
        let (mut scene, mut missed) = setup();
        missed.show(&mut scene);
        scene.tick(SLIDE_IN_MS / 2);
        let from = card_y(&scene, &missed);
        missed.hide(&mut scene);
        let animation = scene.animation(missed.card().unwrap()).unwrap();
        assert_eq!(animation.from, from);
        assert_eq!(animation.to, MISSED_CARD_HIDDEN_Y);
        assert_eq!(animation.duration_ms, SLIDE_OUT_MS);
    }

    #[test]
    fn test_show_restarts_from_hidden() {
        let (mut scene, mut missed) = setup();
        missed.show(&mut scene);
        scene.tick(SLIDE_IN_MS + 1);
        missed.show(&mut scene);
        assert_eq!(card_y(&scene, &missed), MISSED_CARD_HIDDEN_Y);
    }

    #[test]
    fn test_tap_anywhere_dismisses() {
        let (mut scene, mut missed) = setup();
        missed.show(&mut scene);
        scene.tick(SLIDE_IN_MS + 1);
        let ok = scene.bounds(missed.ok_button().unwrap()).unwrap();
        assert_eq!(scene.hit_test(ok.center()), Some(UiAction::DismissMissedCall));
        assert_eq!(scene.hit_test(Point::new(5, 310)), Some(UiAction::DismissMissedCall));
    }
}
