//! Visual contexts of the display.
//!
//! Exactly one context is active at a time. Every context except
//! [`Context::None`] owns a full-screen root that is built once at startup.
//!
//! - [`Context::Welcome`]: BLE pairing / connecting
//! - [`Context::Idle`]: connected, no active route
//! - [`Context::Navigation`]: turn-by-turn glyph, distance, maneuver, ETA
//! - [`Context::IncomingCall`], [`Context::OutgoingCall`], [`Context::MissedCall`]: phone

use core::fmt;

/// A mutually-exclusive visual context.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Context {
    /// Nothing activated yet (or torn down).
    #[default]
    None = 0,
    /// Pairing / connecting splash.
    Welcome = 1,
    /// Connected, waiting for a route.
    Idle = 2,
    /// Turn-by-turn guidance.
    Navigation = 3,
    /// Ringing.
    IncomingCall = 4,
    /// Dialing or in call.
    OutgoingCall = 5,
    /// Missed-call notice.
    MissedCall = 6,
}

impl Context {
    /// Number of variants, `None` included.
    pub const COUNT: usize = 7;

    /// Every context that owns a root, in build order.
    pub const DISPLAYABLE: [Self; 6] = [
        Self::Welcome,
        Self::Idle,
        Self::Navigation,
        Self::IncomingCall,
        Self::OutgoingCall,
        Self::MissedCall,
    ];

    /// Dense index for per-context tables.
    #[inline]
    pub const fn index(self) -> usize { self as usize }

    /// Short name for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Welcome => "welcome",
            Self::Idle => "idle",
            Self::Navigation => "navigation",
            Self::IncomingCall => "incoming",
            Self::OutgoingCall => "outgoing",
            Self::MissedCall => "missed",
        }
    }

    /// Whether the context is a phone-call screen.
    #[inline]
    pub const fn is_call(self) -> bool { matches!(self, Self::IncomingCall | Self::OutgoingCall | Self::MissedCall) }
}

impl TryFrom<u8> for Context {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::None),
            1 => Ok(Self::Welcome),
            2 => Ok(Self::Idle),
            3 => Ok(Self::Navigation),
            4 => Ok(Self::IncomingCall),
            5 => Ok(Self::OutgoingCall),
            6 => Ok(Self::MissedCall),
            other => Err(other),
        }
    }
}

impl fmt::Display for Context {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
