//! Idle context: connected, waiting for a route.
//!
//! A status bar across the top, a hint below it and two small indicator
//! dots that are created on first use.

use embedded_graphics::prelude::{Point, Size};

use super::{Presenter, prepare_root, set_text};
use crate::animations::Animation;
use crate::colors::{GRAY_DARK, GREEN_DARK, GREEN_LIGHT, SKY, WHITE};
use crate::config::SCREEN_WIDTH;
use crate::context::Context;
use crate::error::Result;
use crate::styles::{FontRole, StyleRegistry};
use crate::surface::{Align, ElementId, ElementSpec, PresentationSurface};
use crate::{log_debug, log_info};

const CONNECTED: &str = "Connected";
const NO_NAV_HINT: &str = "Connect to Google\nMaps to start\nnavigation.";

const STATUS_BAR_HEIGHT: u32 = 28;
const HINT_LINES: u32 = 3;
const BLE_DOT_DIAMETER: u32 = 8;
const READY_DOT_DIAMETER: u32 = 14;

/// Status bar, hint and indicators.
#[derive(Debug, Default)]
pub struct IdleScreen {
    root: Option<ElementId>,
    status_bar: Option<ElementId>,
    status: Option<ElementId>,
    hint: Option<ElementId>,
    ble_dot: Option<ElementId>,
    ready_dot: Option<ElementId>,
}

impl IdleScreen {
    pub const fn new() -> Self {
        Self {
            root: None,
            status_bar: None,
            status: None,
            hint: None,
            ble_dot: None,
            ready_dot: None,
        }
    }

    /// Show the connected state. Disconnects are the welcome screen's job,
    /// so `false` changes nothing here.
    pub fn update_ble_status<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        connected: bool,
    ) {
        let Some(root) = self.root else {
            return;
        };
        if !connected {
            return;
        }
        set_text(surface, self.status, CONNECTED);
        if let Some(bar) = self.status_bar {
            surface.set_background(bar, Some(GREEN_DARK)).ok();
        }

        if self.ble_dot.is_none() {
            let spec = ElementSpec::circle(Align::TopRight, Point::new(-10, 10), BLE_DOT_DIAMETER, GREEN_LIGHT);
            self.ble_dot = surface.create_element(root, &spec).ok();
            log_debug!("idle: ble dot created");
        }
        if let Some(dot) = self.ble_dot {
            surface.set_background(dot, Some(GREEN_LIGHT)).ok();
        }
    }

    /// Show or clear the "no navigation" hint.
    pub fn set_no_nav_msg<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        show: bool,
    ) {
        set_text(surface, self.hint, if show { NO_NAV_HINT } else { "" });
        if let Some(hint) = self.hint.filter(|_| show) {
            surface.set_color(hint, SKY).ok();
        }
    }

    /// Pulse the ready dot, creating it first if needed.
    pub fn start_pulse<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
    ) {
        let Some(root) = self.root else {
            return;
        };
        if self.ready_dot.is_none() {
            let spec = ElementSpec::circle(Align::BottomMid, Point::new(0, -14), READY_DOT_DIAMETER, SKY);
            self.ready_dot = surface.create_element(root, &spec).ok();
        }
        let Some(dot) = self.ready_dot.filter(|&dot| surface.is_valid(dot)) else {
            return;
        };
        surface.animate(dot, Animation::pulse()).ok();
    }

    #[inline]
    pub const fn status_label(&self) -> Option<ElementId> { self.status }

    #[inline]
    pub const fn hint_label(&self) -> Option<ElementId> { self.hint }

    #[inline]
    pub const fn ble_dot(&self) -> Option<ElementId> { self.ble_dot }

    #[inline]
    pub const fn ready_dot(&self) -> Option<ElementId> { self.ready_dot }
}

impl Presenter for IdleScreen {
    const CONTEXT: Context = Context::Idle;

    fn create<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        root: ElementId,
        styles: &mut StyleRegistry,
    ) -> Result<()> {
        prepare_root(surface, root, Self::CONTEXT, styles)?;
        self.root = Some(root);

        let bar = surface.create_element(
            root,
            &ElementSpec::panel(Align::TopMid, Point::zero(), Size::new(SCREEN_WIDTH, STATUS_BAR_HEIGHT), GRAY_DARK),
        )?;
        self.status_bar = Some(bar);
        self.status = Some(surface.create_element(
            bar,
            &ElementSpec::label(Align::Center, Point::zero(), FontRole::Medium, WHITE),
        )?);

        // Legacy title and subtitle, always hidden
        let legacy = ElementSpec::label(Align::TopMid, Point::zero(), FontRole::Normal, WHITE).hidden();
        surface.create_element(root, &legacy)?;
        surface.create_element(root, &legacy)?;

        let hint = ElementSpec::label(Align::TopMid, Point::new(0, 44), FontRole::Medium, SKY)
            .with_size(Size::new(SCREEN_WIDTH, FontRole::Medium.line_height() * HINT_LINES));
        self.hint = Some(surface.create_element(root, &hint)?);

        log_info!("idle: created");
        Ok(())
    }

    fn show<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
    ) {
        self.start_pulse(surface);
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
        if let Some(dot) = self.ready_dot {
            surface.stop_animations(dot).ok();
        }
    }
}
