//! Outgoing-call context.
//!
//! While connecting a spinner runs and the status reads "Calling"; once
//! the call connects the spinner is hidden and the `MM:SS` duration shows.

use core::fmt::Write;

use embedded_graphics::prelude::{Point, Size};
use heapless::String;

use super::{Presenter, initial, name_or, prepare_root, set_text, set_visible};
use crate::animations::Animation;
use crate::colors::{CYAN, GRAY, GRAY_DARK, RED, WHITE};
use crate::config::{AVATAR_SIZE, HANGUP_BUTTON_SIZE, SCREEN_WIDTH};
use crate::context::Context;
use crate::error::Result;
use crate::events::CallInfo;
use crate::styles::{FontRole, StyleRegistry};
use crate::surface::{Align, ElementId, ElementSpec, PresentationSurface, UiAction};
use crate::log_info;

const UNKNOWN: &str = "Unknown";
const CALLING: &str = "Calling";
const CONNECTED: &str = "Connected";

const SPINNER_DIAMETER: u32 = 100;

/// Format elapsed seconds as `MM:SS`. Minutes keep counting past 99.
pub fn format_duration(seconds: u32) -> String<16> {
    let mut out = String::new();
    // Fits: u32::MAX / 60 has 8 digits
    let _ = write!(out, "{:02}:{:02}", seconds / 60, seconds % 60);
    out
}

/// Avatar, name, status, spinner, duration and hang-up button.
#[derive(Debug, Default)]
pub struct OutgoingCallScreen {
    avatar: Option<ElementId>,
    avatar_initial: Option<ElementId>,
    name: Option<ElementId>,
    status: Option<ElementId>,
    spinner: Option<ElementId>,
    duration: Option<ElementId>,
    hangup: Option<ElementId>,
    connecting: bool,
}

impl OutgoingCallScreen {
    pub const fn new() -> Self {
        Self {
            avatar: None,
            avatar_initial: None,
            name: None,
            status: None,
            spinner: None,
            duration: None,
            hangup: None,
            connecting: true,
        }
    }

    /// Show who is being called.
    pub fn update<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        call: &CallInfo,
    ) {
        set_text(surface, self.name, name_or(&call.name, UNKNOWN));
        if !call.name.is_empty() {
            set_text(surface, self.avatar_initial, &initial(&call.name));
        }
    }

    /// `true`: "Calling" with the spinner; `false`: "Connected" with the
    /// duration.
    pub fn set_connecting<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        connecting: bool,
    ) {
        self.connecting = connecting;
        let Some(status) = self.status else {
            return;
        };
        if surface.set_text(status, if connecting { CALLING } else { CONNECTED }).is_err() {
            return;
        }
        set_visible(surface, self.spinner, connecting);
        set_visible(surface, self.duration, !connecting);
    }

    /// Update the elapsed time. Stays hidden until connected.
    pub fn update_duration<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        seconds: u32,
    ) {
        set_text(surface, self.duration, &format_duration(seconds));
    }

    #[inline]
    pub const fn is_connecting(&self) -> bool { self.connecting }

    #[inline]
    pub const fn avatar(&self) -> Option<ElementId> { self.avatar }

    #[inline]
    pub const fn name_label(&self) -> Option<ElementId> { self.name }

    #[inline]
    pub const fn status_label(&self) -> Option<ElementId> { self.status }

    #[inline]
    pub const fn duration_label(&self) -> Option<ElementId> { self.duration }

    #[inline]
    pub const fn spinner(&self) -> Option<ElementId> { self.spinner }

    #[inline]
    pub const fn hangup_button(&self) -> Option<ElementId> { self.hangup }
}

impl Presenter for OutgoingCallScreen {
    const CONTEXT: Context = Context::OutgoingCall;

    fn create<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        root: ElementId,
        styles: &mut StyleRegistry,
    ) -> Result<()> {
        prepare_root(surface, root, Self::CONTEXT, styles)?;

        let avatar = surface.create_element(
            root,
            &ElementSpec::circle(Align::TopMid, Point::new(0, 50), AVATAR_SIZE, GRAY_DARK).with_border(CYAN, 2),
        )?;
        let avatar_initial = surface.create_element(
            avatar,
            &ElementSpec::label(Align::Center, Point::zero(), FontRole::Huge, WHITE),
        )?;
        surface.set_text(avatar_initial, "?")?;
        self.avatar = Some(avatar);
        self.avatar_initial = Some(avatar_initial);

        // Behind the name and status so those stay readable
        let spinner = surface.create_element(
            root,
            &ElementSpec::spinner(Align::Center, Point::new(0, -10), SPINNER_DIAMETER, CYAN),
        )?;
        surface.animate(spinner, Animation::spinner())?;
        self.spinner = Some(spinner);

        let centered = |y: i32, font: FontRole, color| {
            ElementSpec::label(Align::Center, Point::new(0, y), font, color)
                .with_size(Size::new(SCREEN_WIDTH, font.line_height()))
        };
        let name = surface.create_element(root, &centered(20, FontRole::Large, WHITE))?;
        surface.set_text(name, "Calling...")?;
        self.name = Some(name);

        let status = surface.create_element(root, &centered(50, FontRole::Medium, CYAN))?;
        surface.set_text(status, CALLING)?;
        self.status = Some(status);

        self.duration = Some(surface.create_element(
            root,
            &ElementSpec::label(Align::TopRight, Point::new(-10, 10), FontRole::Normal, GRAY).hidden(),
        )?);

        let hangup = surface.create_element(
            root,
            &ElementSpec::button(Align::BottomMid, Point::new(0, -30), HANGUP_BUTTON_SIZE, RED)
                .with_radius(HANGUP_BUTTON_SIZE.width / 2),
        )?;
        surface.set_action(hangup, UiAction::HangUp)?;
        let icon = surface.create_element(
            hangup,
            &ElementSpec::label(Align::Center, Point::zero(), FontRole::Huge, WHITE),
        )?;
        surface.set_text(icon, "X")?;
        self.hangup = Some(hangup);

        self.connecting = true;
        log_info!("outgoing: created");
        Ok(())
    }
}
