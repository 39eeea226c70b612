//! Event routing for the whole display.
//!
//! [`Ui`] owns the presentation surface, the screen state machine, the
//! style registry, the navigation controller and the five presenters. BLE,
//! navigation and call events arrive as [`Event`] values in order; each one
//! updates the owning presenter and, where it changes what the rider should
//! see, switches context.
//!
//! # Resume Context
//!
//! When a call screen closes the display returns to navigation while a
//! route is active, to idle while connected, otherwise to welcome.
//!
//! # Enter/Leave Hooks
//!
//! | Context      | On enter          | On leave        |
//! |--------------|-------------------|-----------------|
//! | Idle         | ready-dot pulse   | stop pulse      |
//! | IncomingCall | avatar pulse      | stop pulse      |
//! | MissedCall   | card slides in    | -               |

use embedded_graphics::prelude::Point;

use crate::colors::BLACK;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::events::Event;
use crate::navigation::NavigationDisplay;
use crate::screen_state::ScreenStateMachine;
use crate::screens::{
    IdleScreen,
    IncomingCallScreen,
    MissedCallScreen,
    OutgoingCallScreen,
    Presenter,
    WelcomeScreen,
};
use crate::styles::{StyleRegistry, Theme};
use crate::surface::{ElementId, PresentationSurface, UiAction};
use crate::{log_debug, log_info, log_warn};

/// The display core.
pub struct Ui<S: PresentationSurface> {
    surface: S,
    screens: ScreenStateMachine,
    styles: StyleRegistry,
    navigation: NavigationDisplay,
    welcome: WelcomeScreen,
    idle: IdleScreen,
    incoming: IncomingCallScreen,
    outgoing: OutgoingCallScreen,
    missed: MissedCallScreen,
    connected: bool,
    route_active: bool,
}

impl<S: PresentationSurface> Ui<S> {
    /// Wrap a surface. Nothing is built until [`Ui::init`].
    pub fn new(
        surface: S,
        theme: Theme,
    ) -> Self {
        Self {
            surface,
            screens: ScreenStateMachine::new(),
            styles: StyleRegistry::new(theme),
            navigation: NavigationDisplay::new(),
            welcome: WelcomeScreen::new(),
            idle: IdleScreen::new(),
            incoming: IncomingCallScreen::new(),
            outgoing: OutgoingCallScreen::new(),
            missed: MissedCallScreen::new(),
            connected: false,
            route_active: false,
        }
    }

    /// Create every context's root and elements and register the roots.
    ///
    /// Leaves the active context at `None`; request one afterwards.
    pub fn init(&mut self) -> Result<()> {
        for context in Context::DISPLAYABLE {
            let root = self.surface.create_root(BLACK)?;
            self.screens.register(context, root)?;
        }

        let welcome = self.root_of(Context::Welcome)?;
        let idle = self.root_of(Context::Idle)?;
        let navigation = self.root_of(Context::Navigation)?;
        let incoming = self.root_of(Context::IncomingCall)?;
        let outgoing = self.root_of(Context::OutgoingCall)?;
        let missed = self.root_of(Context::MissedCall)?;

        self.welcome.create(&mut self.surface, welcome, &mut self.styles)?;
        self.idle.create(&mut self.surface, idle, &mut self.styles)?;
        self.navigation.create(&mut self.surface, navigation, &mut self.styles)?;
        self.incoming.create(&mut self.surface, incoming, &mut self.styles)?;
        self.outgoing.create(&mut self.surface, outgoing, &mut self.styles)?;
        self.missed.create(&mut self.surface, missed, &mut self.styles)?;

        log_info!("ui: {} contexts ready", Context::DISPLAYABLE.len());
        Ok(())
    }

    fn root_of(
        &self,
        context: Context,
    ) -> Result<ElementId> {
        self.screens.root(context).ok_or(Error::ContextNotCreated(context))
    }

    /// Switch context, running the leave/enter hooks on an actual change.
    pub fn request(
        &mut self,
        context: Context,
    ) -> Result<()> {
        let previous = self.screens.active();
        match context {
            Context::Navigation => self.screens.request_navigation(&mut self.surface)?,
            _ => self.screens.request(&mut self.surface, context)?,
        }
        if previous != context {
            self.leave(previous);
            self.enter(context);
        }
        Ok(())
    }

    /// Switch to a context given by its raw id. Unknown ids leave the
    /// active context unchanged.
    pub fn request_id(
        &mut self,
        raw: u8,
    ) -> Result<()> {
        match Context::try_from(raw) {
            Ok(context) => self.request(context),
            Err(raw) => {
                log_warn!("ui: unknown context {}", raw);
                Err(Error::UnknownContext(raw))
            }
        }
    }

    fn leave(
        &mut self,
        context: Context,
    ) {
        match context {
            Context::Idle => self.idle.hide(&mut self.surface),
            Context::IncomingCall => self.incoming.hide(&mut self.surface),
            _ => {}
        }
    }

    fn enter(
        &mut self,
        context: Context,
    ) {
        match context {
            Context::Idle => self.idle.show(&mut self.surface),
            Context::IncomingCall => self.incoming.show(&mut self.surface),
            Context::MissedCall => self.missed.show(&mut self.surface),
            _ => {}
        }
    }

    /// Where to go once a call screen closes.
    pub const fn resume_context(&self) -> Context {
        if self.route_active {
            Context::Navigation
        } else if self.connected {
            Context::Idle
        } else {
            Context::Welcome
        }
    }

    /// Route one event.
    pub fn handle_event(
        &mut self,
        event: Event,
    ) -> Result<()> {
        match event {
            Event::BleConnection(true) => {
                self.connected = true;
                self.welcome.update_ble_status(&mut self.surface, true);
                self.idle.update_ble_status(&mut self.surface, true);
                self.idle.set_no_nav_msg(&mut self.surface, true);
                if self.screens.active() == Context::Welcome {
                    self.request(Context::Idle)?;
                }
            }
            Event::BleConnection(false) => {
                self.connected = false;
                self.route_active = false;
                self.welcome.update_ble_status(&mut self.surface, false);
                self.request(Context::Welcome)?;
            }
            Event::Navigation(update) => {
                self.navigation.apply(&mut self.surface, &update);
                self.route_active = true;
                if self.screens.active() == Context::Idle {
                    self.request(Context::Navigation)?;
                }
            }
            Event::NavigationEnded => {
                self.navigation.clear(&mut self.surface);
                self.route_active = false;
                if self.screens.active() == Context::Navigation {
                    self.request(self.resume_context())?;
                }
            }
            Event::IncomingCall(call) => {
                self.incoming.update(&mut self.surface, &call);
                self.request(Context::IncomingCall)?;
            }
            Event::OutgoingCall(call) => {
                self.outgoing.update(&mut self.surface, &call);
                self.outgoing.set_connecting(&mut self.surface, true);
                self.request(Context::OutgoingCall)?;
            }
            Event::CallConnected => self.outgoing.set_connecting(&mut self.surface, false),
            Event::CallDuration(seconds) => self.outgoing.update_duration(&mut self.surface, seconds),
            Event::MissedCall(missed) => {
                self.missed.update(&mut self.surface, &missed);
                self.request(Context::MissedCall)?;
            }
            Event::CallEnded | Event::Dismiss => self.close_call_screen()?,
        }
        Ok(())
    }

    fn close_call_screen(&mut self) -> Result<()> {
        let active = self.screens.active();
        if !active.is_call() {
            log_debug!("ui: no call screen to close on {}", active);
            return Ok(());
        }
        if active == Context::MissedCall {
            self.missed.hide(&mut self.surface);
        }
        self.request(self.resume_context())
    }

    /// Dispatch a tap. Returns the action that was triggered, if any.
    pub fn on_touch(
        &mut self,
        point: Point,
    ) -> Result<Option<UiAction>> {
        let Some(action) = self.surface.hit_test(point) else {
            return Ok(None);
        };
        log_info!("ui: touch {:?}", action);
        match action {
            UiAction::DismissIncomingCall | UiAction::HangUp | UiAction::DismissMissedCall => {
                self.close_call_screen()?;
            }
        }
        Ok(Some(action))
    }

    /// Reset to `None` for teardown.
    pub fn cleanup(&mut self) { self.screens.cleanup(); }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub const fn active(&self) -> Context { self.screens.active() }

    #[inline]
    pub const fn is_connected(&self) -> bool { self.connected }

    #[inline]
    pub const fn is_route_active(&self) -> bool { self.route_active }

    #[inline]
    pub const fn surface(&self) -> &S { &self.surface }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S { &mut self.surface }

    #[inline]
    pub const fn screens(&self) -> &ScreenStateMachine { &self.screens }

    #[inline]
    pub const fn navigation(&self) -> &NavigationDisplay { &self.navigation }

    #[inline]
    pub const fn welcome(&self) -> &WelcomeScreen { &self.welcome }

    #[inline]
    pub const fn idle(&self) -> &IdleScreen { &self.idle }

    #[inline]
    pub const fn incoming(&self) -> &IncomingCallScreen { &self.incoming }

    #[inline]
    pub const fn outgoing(&self) -> &OutgoingCallScreen { &self.outgoing }

    #[inline]
    pub const fn missed(&self) -> &MissedCallScreen { &self.missed }
}
