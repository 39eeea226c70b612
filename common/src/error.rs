//! Error type for display-core operations.
//!
//! Nothing here is fatal. Callers log the error and carry on with the
//! current context unchanged.

use core::fmt;

use crate::context::Context;
use crate::surface::SurfaceError;

/// Display-core error.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A raw context id outside the known set, or `None`.
    UnknownContext(u8),
    /// The context's root was never built.
    ContextNotCreated(Context),
    /// The context's root no longer passes the surface liveness check.
    ContextInvalidated(Context),
    /// A presenter's `create` was called without a usable root.
    MissingRoot(Context),
    /// The presentation surface rejected an operation.
    Surface(SurfaceError),
}

impl From<SurfaceError> for Error {
    fn from(err: SurfaceError) -> Self { Self::Surface(err) }
}

impl fmt::Display for SurfaceError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::CapacityExceeded => f.write_str("element capacity exceeded"),
            Self::InvalidElement => f.write_str("invalid element"),
            Self::WrongKind => f.write_str("wrong element kind"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::UnknownContext(raw) => write!(f, "unknown context {raw}"),
            Self::ContextNotCreated(ctx) => write!(f, "{ctx} not created"),
            Self::ContextInvalidated(ctx) => write!(f, "{ctx} invalidated"),
            Self::MissingRoot(ctx) => write!(f, "{ctx} has no root"),
            Self::Surface(err) => write!(f, "surface: {err}"),
        }
    }
}

impl core::error::Error for Error {}

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, Error>;
