//! Incoming-call context.

use embedded_graphics::prelude::{Point, Size};

use super::{Presenter, initial, name_or, prepare_root, set_text, shown_number};
use crate::animations::Animation;
use crate::colors::{BLACK, CYAN, GRAY, GRAY_DARK, WHITE};
use crate::config::{AVATAR_SIZE, DISMISS_BUTTON_SIZE, SCREEN_WIDTH};
use crate::context::Context;
use crate::error::Result;
use crate::events::CallInfo;
use crate::styles::{FontRole, StyleRegistry};
use crate::surface::{Align, ElementId, ElementSpec, PresentationSurface, UiAction};
use crate::{log_debug, log_info};

const HEADER: &str = "Incoming Call";
const UNKNOWN: &str = "Unknown";
const HINT: &str = "Tap to dismiss";

/// Header, avatar, caller name and number, dismiss button.
#[derive(Debug, Default)]
pub struct IncomingCallScreen {
    avatar: Option<ElementId>,
    avatar_initial: Option<ElementId>,
    name: Option<ElementId>,
    number: Option<ElementId>,
    dismiss: Option<ElementId>,
    ringing: bool,
}

impl IncomingCallScreen {
    pub const fn new() -> Self {
        Self {
            avatar: None,
            avatar_initial: None,
            name: None,
            number: None,
            dismiss: None,
            ringing: false,
        }
    }

    /// Show the caller. An empty name shows as "Unknown" and keeps the
    /// previous initial; a withheld number shows blank.
    pub fn update<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        call: &CallInfo,
    ) {
        set_text(surface, self.name, name_or(&call.name, UNKNOWN));
        if !call.name.is_empty() {
            set_text(surface, self.avatar_initial, &initial(&call.name));
        }
        set_text(surface, self.number, shown_number(&call.number));
    }

    /// Pulse the avatar while the phone rings.
    pub fn start_ringing<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
    ) {
        let Some(avatar) = self.avatar else {
            return;
        };
        if surface.animate(avatar, Animation::pulse()).is_ok() {
            self.ringing = true;
            log_debug!("incoming: ringing");
        }
    }

    #[inline]
    pub const fn is_ringing(&self) -> bool { self.ringing }

    #[inline]
    pub const fn name_label(&self) -> Option<ElementId> { self.name }

    #[inline]
    pub const fn number_label(&self) -> Option<ElementId> { self.number }

    #[inline]
    pub const fn avatar(&self) -> Option<ElementId> { self.avatar }

    #[inline]
    pub const fn avatar_initial(&self) -> Option<ElementId> { self.avatar_initial }

    #[inline]
    pub const fn dismiss_button(&self) -> Option<ElementId> { self.dismiss }
}

impl Presenter for IncomingCallScreen {
    const CONTEXT: Context = Context::IncomingCall;

    fn create<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        root: ElementId,
        styles: &mut StyleRegistry,
    ) -> Result<()> {
        prepare_root(surface, root, Self::CONTEXT, styles)?;

        let header = surface.create_element(
            root,
            &ElementSpec::label(Align::TopMid, Point::new(0, 10), FontRole::Medium, WHITE),
        )?;
        surface.set_text(header, HEADER)?;

        let avatar = surface.create_element(
            root,
            &ElementSpec::circle(Align::Center, Point::new(0, -40), AVATAR_SIZE, GRAY_DARK).with_border(CYAN, 3),
        )?;
        let avatar_initial = surface.create_element(
            avatar,
            &ElementSpec::label(Align::Center, Point::zero(), FontRole::Huge, WHITE),
        )?;
        surface.set_text(avatar_initial, "?")?;
        self.avatar = Some(avatar);
        self.avatar_initial = Some(avatar_initial);

        let centered = |y: i32, font: FontRole, color| {
            ElementSpec::label(Align::Center, Point::new(0, y), font, color)
                .with_size(Size::new(SCREEN_WIDTH, font.line_height()))
        };
        let name = surface.create_element(root, &centered(20, FontRole::Large, WHITE))?;
        surface.set_text(name, "Caller")?;
        self.name = Some(name);
        self.number = Some(surface.create_element(root, &centered(50, FontRole::Normal, GRAY))?);

        let hint = surface.create_element(
            root,
            &ElementSpec::label(Align::BottomMid, Point::new(0, -90), FontRole::Normal, GRAY),
        )?;
        surface.set_text(hint, HINT)?;

        let dismiss = surface.create_element(
            root,
            &ElementSpec::button(Align::BottomMid, Point::new(0, -30), DISMISS_BUTTON_SIZE, CYAN).with_radius(25),
        )?;
        surface.set_action(dismiss, UiAction::DismissIncomingCall)?;
        let caption = surface.create_element(
            dismiss,
            &ElementSpec::label(Align::Center, Point::zero(), FontRole::Medium, BLACK),
        )?;
        surface.set_text(caption, "Dismiss")?;
        self.dismiss = Some(dismiss);

        log_info!("incoming: created");
        Ok(())
    }

    fn show<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
    ) {
        self.start_ringing(surface);
    }

    fn hide<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
    ) {
        self.stop_animations(surface);
    }

    fn stop_animations<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
    ) {
        if let Some(avatar) = self.avatar {
            surface.stop_animations(avatar).ok();
        }
        self.ringing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    fn setup() -> (Scene, IncomingCallScreen) {
        let mut scene = Scene::new();
        let root = scene.create_root(BLACK).unwrap();
        let mut incoming = IncomingCallScreen::new();
        incoming.create(&mut scene, root, &mut StyleRegistry::default()).unwrap();
        scene.load_root(root).unwrap();
        (scene, incoming)
    }

    #[test]
    fn test_update_shows_caller() {
        let (mut scene, mut incoming) = setup();
        incoming.update(&mut scene, &CallInfo::new("asha", "+91 98450 12345"));
        assert_eq!(scene.text(incoming.name_label().unwrap()), Some("asha"));
        assert_eq!(scene.text(incoming.avatar_initial().unwrap()), Some("A"));
        assert_eq!(scene.text(incoming.number_label().unwrap()), Some("+91 98450 12345"));
    }

    #[test]
    fn test_update_unknown_caller() {
        let (mut scene, mut incoming) = setup();
        incoming.update(&mut scene, &CallInfo::new("", "Unknown"));
        assert_eq!(scene.text(incoming.name_label().unwrap()), Some(UNKNOWN));
        assert_eq!(scene.text(incoming.avatar_initial().unwrap()), Some("?"));
        assert_eq!(scene.text(incoming.number_label().unwrap()), Some(""));
    }

    #[test]
    fn test_dismiss_button_reports_action() {
        let (scene, incoming) = setup();
        let button = scene.bounds(incoming.dismiss_button().unwrap()).unwrap();
        assert_eq!(scene.hit_test(button.center()), Some(UiAction::DismissIncomingCall));
        // The avatar is not tappable
        let avatar = scene.bounds(incoming.avatar().unwrap()).unwrap();
        assert_eq!(scene.hit_test(avatar.center()), None);
    }

    #[test]
    fn test_ringing_start_and_stop() {
        let (mut scene, mut incoming) = setup();
        incoming.start_ringing(&mut scene);
        assert!(incoming.is_ringing());
        assert!(scene.animation(incoming.avatar().unwrap()).is_some());
        incoming.stop_animations(&mut scene);
        assert!(!incoming.is_ringing());
        assert!(scene.animation(incoming.avatar().unwrap()).is_none());
    }
}
