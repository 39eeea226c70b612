//! Welcome context: branding plus the BLE connection status.

use embedded_graphics::prelude::{Point, Size};

use super::{Presenter, prepare_root, set_text, set_visible};
use crate::animations::Animation;
use crate::colors::{CYAN, GRAY, GREEN, WHITE};
use crate::config::SCREEN_WIDTH;
use crate::context::Context;
use crate::error::Result;
use crate::styles::{FontRole, StyleRegistry};
use crate::surface::{Align, ElementId, ElementSpec, PresentationSurface};
use crate::log_info;

const TITLE: &str = "YatraMate";
const SUBTITLE: &str = "by tnvsai";
const CONNECTING: &str = "Connecting...";
const CONNECTED: &str = "Connected";

const SPINNER_DIAMETER: u32 = 60;

/// Title, subtitle, spinner and status line.
#[derive(Debug, Default)]
pub struct WelcomeScreen {
    spinner: Option<ElementId>,
    status: Option<ElementId>,
    connected: bool,
}

impl WelcomeScreen {
    pub const fn new() -> Self {
        Self {
            spinner: None,
            status: None,
            connected: false,
        }
    }

    /// Switch the status between "Connecting..." (spinner shown) and
    /// "Connected" (spinner hidden).
    pub fn update_ble_status<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        connected: bool,
    ) {
        self.connected = connected;
        let (text, color) = if connected { (CONNECTED, GREEN) } else { (CONNECTING, CYAN) };
        set_text(surface, self.status, text);
        if let Some(status) = self.status {
            surface.set_color(status, color).ok();
        }
        set_visible(surface, self.spinner, !connected);
    }

    #[inline]
    pub const fn connected(&self) -> bool { self.connected }

    #[inline]
    pub const fn status_label(&self) -> Option<ElementId> { self.status }

    #[inline]
    pub const fn spinner(&self) -> Option<ElementId> { self.spinner }
}

impl Presenter for WelcomeScreen {
    const CONTEXT: Context = Context::Welcome;

    fn create<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        root: ElementId,
        styles: &mut StyleRegistry,
    ) -> Result<()> {
        prepare_root(surface, root, Self::CONTEXT, styles)?;

        let banner = |y: i32, font: FontRole, color| {
            ElementSpec::label(Align::TopMid, Point::new(0, y), font, color)
                .with_size(Size::new(SCREEN_WIDTH, font.line_height()))
        };

        let title = surface.create_element(root, &banner(44, FontRole::Huge, WHITE))?;
        surface.set_text(title, TITLE)?;

        let subtitle = surface.create_element(root, &banner(78, FontRole::Medium, GRAY))?;
        surface.set_text(subtitle, SUBTITLE)?;

        let spinner = surface.create_element(
            root,
            &ElementSpec::spinner(Align::Center, Point::new(0, 20), SPINNER_DIAMETER, CYAN),
        )?;
        surface.animate(spinner, Animation::spinner())?;
        self.spinner = Some(spinner);

        let status = surface.create_element(
            root,
            &ElementSpec::label(Align::BottomMid, Point::new(0, -50), FontRole::Medium, CYAN),
        )?;
        surface.set_text(status, CONNECTING)?;
        self.status = Some(status);

        log_info!("welcome: created");
        Ok(())
    }
}
