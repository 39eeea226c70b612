//! Per-context presenters.
//!
//! Each presenter builds the elements of one context under that context's
//! root and then mutates them in place. Updates are null-tolerant: a field
//! whose element is missing or was invalidated is skipped and the rest of
//! the update still applies. The cosmetic hooks (`show`, `hide`,
//! `stop_animations`) only start or stop animations and never gate any
//! state change.
//!
//! Navigation lives in [`crate::navigation`]; it follows the same contract
//! but has enough state of its own to warrant a module.

mod idle;
mod incoming_call;
mod missed_call;
mod outgoing_call;
mod welcome;

use heapless::String;

pub use idle::IdleScreen;
pub use incoming_call::IncomingCallScreen;
pub use missed_call::MissedCallScreen;
pub use outgoing_call::{OutgoingCallScreen, format_duration};
pub use welcome::WelcomeScreen;

use crate::colors::BLACK;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::styles::StyleRegistry;
use crate::surface::{ElementId, PresentationSurface};
use crate::{log_debug, log_error};

/// Builds and owns the elements of one context.
pub trait Presenter {
    /// Context this presenter draws.
    const CONTEXT: Context;

    /// Create the context's elements under `root`.
    fn create<S: PresentationSurface>(
        &mut self,
        surface: &mut S,
        root: ElementId,
        styles: &mut StyleRegistry,
    ) -> Result<()>;

    /// Called after the context became active.
    fn show<S: PresentationSurface>(
        &mut self,
        _surface: &mut S,
    ) {
    }

    /// Called when the context is being left.
    fn hide<S: PresentationSurface>(
        &mut self,
        _surface: &mut S,
    ) {
    }

    /// Stop anything this presenter animates.
    fn stop_animations<S: PresentationSurface>(
        &mut self,
        _surface: &mut S,
    ) {
    }
}

/// Common `create` prologue: check the root, run the one-time style setup
/// and make the background opaque black.
fn prepare_root<S: PresentationSurface>(
    surface: &mut S,
    root: ElementId,
    context: Context,
    styles: &mut StyleRegistry,
) -> Result<()> {
    if !surface.is_valid(root) {
        log_error!("{}: create without root", context);
        return Err(Error::MissingRoot(context));
    }
    if styles.init_once(context) {
        log_debug!("{}: styles ready", context);
    }
    surface.set_background(root, Some(BLACK))?;
    Ok(())
}

/// Set a label's text if the label exists.
fn set_text<S: PresentationSurface>(
    surface: &mut S,
    id: Option<ElementId>,
    text: &str,
) {
    if let Some(id) = id {
        surface.set_text(id, text).ok();
    }
}

/// Show or hide an element if it exists.
fn set_visible<S: PresentationSurface>(
    surface: &mut S,
    id: Option<ElementId>,
    visible: bool,
) {
    if let Some(id) = id {
        surface.set_visible(id, visible).ok();
    }
}

/// `name`, or `fallback` when it is empty.
fn name_or<'a>(
    name: &'a str,
    fallback: &'a str,
) -> &'a str {
    if name.is_empty() { fallback } else { name }
}

/// Phone number to display; the phone reports withheld numbers as
/// `"Unknown"`, which shows as blank.
fn shown_number(number: &str) -> &str {
    if number == "Unknown" { "" } else { number }
}

/// Avatar initial: first character of the name, uppercased when ASCII.
fn initial(name: &str) -> String<4> {
    let mut out = String::new();
    if let Some(c) = name.chars().next() {
        // A char is at most four bytes
        let _ = out.push(c.to_ascii_uppercase());
    }
    out
}
