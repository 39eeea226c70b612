//! Screen state machine.
//!
//! Holds the active [`Context`] and the root element of every context, and
//! performs switches on the presentation surface. Exactly one context is
//! active at a time; a rejected request leaves it unchanged.
//!
//! # Switching
//!
//! Every switch is immediate. The surface is pumped once, the target root
//! is loaded as the sole visible root, then the surface is pumped again so
//! the new root is fully laid out before anything else touches it. No
//! transition is ever animated.
//!
//! Navigation has its own entry point, [`ScreenStateMachine::request_navigation`],
//! which first makes sure an opaque backdrop root exists so a lower-level
//! drawing path can paint over it without interference.

use crate::colors::BLACK;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::surface::{ElementId, PresentationSurface};
use crate::{log_info, log_warn};

/// Pumps after loading a root before the switch counts as done.
const PUMPS_AFTER_LOAD: usize = 2;

/// Active context plus the roots it can switch between.
#[derive(Debug, Default)]
pub struct ScreenStateMachine {
    roots: [Option<ElementId>; Context::COUNT],
    active: Context,
}

impl ScreenStateMachine {
    /// Nothing registered, nothing active.
    pub const fn new() -> Self {
        Self {
            roots: [None; Context::COUNT],
            active: Context::None,
        }
    }

    /// Record the root built for `context`.
    pub fn register(
        &mut self,
        context: Context,
        root: ElementId,
    ) -> Result<()> {
        if context == Context::None {
            return Err(Error::UnknownContext(Context::None as u8));
        }
        self.roots[context.index()] = Some(root);
        Ok(())
    }

    /// Root registered for `context`.
    #[inline]
    pub const fn root(
        &self,
        context: Context,
    ) -> Option<ElementId> {
        self.roots[context.index()]
    }

    /// Currently active context.
    #[inline]
    pub const fn active(&self) -> Context { self.active }

    /// Switch to `context`.
    ///
    /// Rejected (logged, active context unchanged) when the context is
    /// `None`, its root was never registered, or the surface reports the
    /// root invalid.
    pub fn request<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        context: Context,
    ) -> Result<()> {
        let root = self.validate(surface, context).inspect_err(|err| {
            log_warn!("screen: {} rejected: {}", context, err);
        })?;

        surface.pump();
        surface.load_root(root).inspect_err(|err| {
            log_warn!("screen: load {} failed: {}", context, err);
        })?;
        for _ in 0..PUMPS_AFTER_LOAD {
            surface.pump();
        }

        let previous = self.active;
        self.active = context;
        log_info!("screen: {} -> {}", previous, context);
        Ok(())
    }

    /// Switch to a context given by its raw id.
    pub fn request_id<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        raw: u8,
    ) -> Result<()> {
        match Context::try_from(raw) {
            Ok(context) => self.request(surface, context),
            Err(raw) => {
                log_warn!("screen: unknown context {}", raw);
                Err(Error::UnknownContext(raw))
            }
        }
    }

    /// Two-phase switch to navigation: ensure an opaque backdrop root, then
    /// activate it.
    pub fn request_navigation<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
    ) -> Result<()> {
        match self.root(Context::Navigation) {
            Some(root) if surface.is_valid(root) => {
                surface.set_background(root, Some(BLACK))?;
            }
            _ => {
                log_warn!("screen: navigation backdrop rebuilt");
                let root = surface.create_root(BLACK)?;
                self.roots[Context::Navigation.index()] = Some(root);
            }
        }
        self.request(surface, Context::Navigation)
    }

    /// Reset to `None` for teardown.
    pub fn cleanup(&mut self) {
        self.active = Context::None;
        log_info!("screen: cleanup");
    }

    fn validate<S: PresentationSurface>(
        &self,
        surface: &S,
        context: Context,
    ) -> Result<ElementId> {
        if context == Context::None {
            return Err(Error::UnknownContext(Context::None as u8));
        }
        let root = self.root(context).ok_or(Error::ContextNotCreated(context))?;
        if !surface.is_valid(root) {
            return Err(Error::ContextInvalidated(context));
        }
        Ok(root)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::GRAY_DARK;
    use crate::scene::Scene;

    fn setup() -> (Scene, ScreenStateMachine) {
        let mut scene = Scene::new();
        let mut screens = ScreenStateMachine::new();
        for context in Context::DISPLAYABLE {
            let root = scene.create_root(BLACK).unwrap();
            screens.register(context, root).unwrap();
        }
        (scene, screens)
    }

    #[test]
    fn test_starts_inactive() {
        let (scene, screens) = setup();
        assert_eq!(screens.active(), Context::None);
        assert_eq!(scene.active_root(), None);
    }

    #[test]
    fn test_request_switches_exactly_one_root() {
        let (mut scene, mut screens) = setup();
        for context in Context::DISPLAYABLE {
            screens.request(&mut scene, context).unwrap();
            assert_eq!(screens.active(), context);
            assert_eq!(scene.active_root(), screens.root(context));
            let displayed = Context::DISPLAYABLE
                .iter()
                .filter(|&&c| screens.root(c).is_some_and(|r| scene.is_displayed(r)))
                .count();
            assert_eq!(displayed, 1);
        }
    }

    #[test]
    fn test_request_pumps_around_load_and_never_animates() {
        let (mut scene, mut screens) = setup();
        let pumps = scene.pump_count();
        screens.request(&mut scene, Context::Idle).unwrap();
        assert_eq!(scene.pump_count(), pumps + 1 + PUMPS_AFTER_LOAD as u32);
        assert_eq!(scene.animations_started(), 0);
    }

    #[test]
    fn test_request_none_is_rejected() {
        let (mut scene, mut screens) = setup();
        screens.request(&mut scene, Context::Welcome).unwrap();
        assert_eq!(screens.request(&mut scene, Context::None), Err(Error::UnknownContext(0)));
        assert_eq!(screens.active(), Context::Welcome);
    }

    #[test]
    fn test_request_out_of_range_id_is_rejected() {
        let (mut scene, mut screens) = setup();
        screens.request(&mut scene, Context::Idle).unwrap();
        let pumps = scene.pump_count();
        assert_eq!(screens.request_id(&mut scene, 42), Err(Error::UnknownContext(42)));
        assert_eq!(screens.active(), Context::Idle);
        assert_eq!(scene.pump_count(), pumps);
        screens.request_id(&mut scene, Context::MissedCall as u8).unwrap();
        assert_eq!(screens.active(), Context::MissedCall);
    }

    #[test]
    fn test_request_unregistered_is_rejected() {
        let mut scene = Scene::new();
        let mut screens = ScreenStateMachine::new();
        assert_eq!(
            screens.request(&mut scene, Context::Idle),
            Err(Error::ContextNotCreated(Context::Idle))
        );
        assert_eq!(screens.active(), Context::None);
    }

    #[test]
    fn test_request_invalidated_is_rejected() {
        let (mut scene, mut screens) = setup();
        screens.request(&mut scene, Context::Welcome).unwrap();
        let idle = screens.root(Context::Idle).unwrap();
        scene.destroy(idle);
        assert_eq!(
            screens.request(&mut scene, Context::Idle),
            Err(Error::ContextInvalidated(Context::Idle))
        );
        assert_eq!(screens.active(), Context::Welcome);
        assert_eq!(scene.active_root(), screens.root(Context::Welcome));
    }

    #[test]
    fn test_register_none_is_rejected() {
        let mut scene = Scene::new();
        let root = scene.create_root(BLACK).unwrap();
        let mut screens = ScreenStateMachine::new();
        assert!(screens.register(Context::None, root).is_err());
    }

    #[test]
    fn test_request_navigation_forces_opaque_backdrop() {
        let (mut scene, mut screens) = setup();
        let root = screens.root(Context::Navigation).unwrap();
        scene.set_background(root, None).unwrap();
        screens.request_navigation(&mut scene).unwrap();
        assert_eq!(screens.active(), Context::Navigation);
        assert_eq!(scene.background(root), Some(BLACK));
        assert_eq!(screens.root(Context::Navigation), Some(root));
    }

    #[test]
    fn test_request_navigation_rebuilds_missing_backdrop() {
        let mut scene = Scene::new();
        let mut screens = ScreenStateMachine::new();
        screens.request_navigation(&mut scene).unwrap();
        let root = screens.root(Context::Navigation).unwrap();
        assert_eq!(scene.active_root(), Some(root));
        assert_eq!(scene.background(root), Some(BLACK));

        // And again once the old one is gone
        scene.destroy(root);
        screens.request_navigation(&mut scene).unwrap();
        assert_ne!(screens.root(Context::Navigation), Some(root));
        assert_eq!(screens.active(), Context::Navigation);
    }

    #[test]
    fn test_cleanup_resets_to_none() {
        let (mut scene, mut screens) = setup();
        screens.request(&mut scene, Context::Idle).unwrap();
        screens.cleanup();
        assert_eq!(screens.active(), Context::None);
        // Roots survive for a later restart
        screens.request(&mut scene, Context::Idle).unwrap();
        assert_eq!(screens.active(), Context::Idle);
    }

    #[test]
    fn test_root_background_untouched_by_plain_request() {
        let (mut scene, mut screens) = setup();
        let idle = screens.root(Context::Idle).unwrap();
        scene.set_background(idle, Some(GRAY_DARK)).unwrap();
        screens.request(&mut scene, Context::Idle).unwrap();
        assert_eq!(scene.background(idle), Some(GRAY_DARK));
    }
}
