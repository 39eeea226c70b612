//! Events delivered to the display core.
//!
//! BLE, navigation-data and call-state callbacks are marshaled onto the UI
//! thread as [`Event`] values and fed to [`Ui::handle_event`] in arrival
//! order. Payload strings are fixed-capacity and truncated on a character
//! boundary, so building an event never fails.
//!
//! [`Ui::handle_event`]: crate::ui::Ui::handle_event

use heapless::String;

use crate::config::{INSTRUCTION_MAX_LEN, MAX_TEXT_LEN};
use crate::maneuver::bounded;

/// Capacity of caller names.
pub const NAME_LEN: usize = 32;

/// Capacity of phone numbers.
pub const NUMBER_LEN: usize = 24;

/// Capacity of timestamps (`"14:05"`, `"Yesterday"`).
pub const TIME_LEN: usize = 16;

/// Copy of `s` truncated to the string's capacity.
pub fn text<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    // Cannot overflow: bounded to capacity
    let _ = out.push_str(bounded(s, N));
    out
}

/// One navigation-data packet. Absent fields leave the display unchanged.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NavigationUpdate {
    /// Maneuver instruction token (`"turn_left"`); empty hides the glyph.
    pub instruction: Option<String<INSTRUCTION_MAX_LEN>>,
    /// Distance to the maneuver in meters.
    pub distance_m: Option<i32>,
    /// Human-readable maneuver text.
    pub maneuver: Option<String<MAX_TEXT_LEN>>,
    /// ETA banner text.
    pub eta: Option<String<MAX_TEXT_LEN>>,
}

impl NavigationUpdate {
    /// Update with no fields set.
    pub const fn new() -> Self {
        Self {
            instruction: None,
            distance_m: None,
            maneuver: None,
            eta: None,
        }
    }

    #[must_use]
    pub fn with_instruction(
        mut self,
        instruction: &str,
    ) -> Self {
        self.instruction = Some(text(instruction));
        self
    }

    #[must_use]
    pub const fn with_distance(
        mut self,
        meters: i32,
    ) -> Self {
        self.distance_m = Some(meters);
        self
    }

    #[must_use]
    pub fn with_maneuver(
        mut self,
        maneuver: &str,
    ) -> Self {
        self.maneuver = Some(text(maneuver));
        self
    }

    #[must_use]
    pub fn with_eta(
        mut self,
        eta: &str,
    ) -> Self {
        self.eta = Some(text(eta));
        self
    }
}

/// Caller identity for incoming/outgoing calls.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CallInfo {
    pub name: String<NAME_LEN>,
    pub number: String<NUMBER_LEN>,
}

impl CallInfo {
    pub fn new(
        name: &str,
        number: &str,
    ) -> Self {
        Self {
            name: text(name),
            number: text(number),
        }
    }
}

/// Missed-call notice.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct MissedCallInfo {
    pub name: String<NAME_LEN>,
    pub number: String<NUMBER_LEN>,
    /// Missed calls from this caller; the badge shows only when above one.
    pub count: u16,
    pub timestamp: String<TIME_LEN>,
}

impl MissedCallInfo {
    pub fn new(
        name: &str,
        number: &str,
        count: u16,
        timestamp: &str,
    ) -> Self {
        Self {
            name: text(name),
            number: text(number),
            count,
            timestamp: text(timestamp),
        }
    }
}

/// Input to the display core.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Event {
    /// BLE link up or down.
    BleConnection(bool),
    /// Navigation data; fields are last-write-wins.
    Navigation(NavigationUpdate),
    /// The phone ended the route.
    NavigationEnded,
    /// Phone is ringing.
    IncomingCall(CallInfo),
    /// Call placed from the phone.
    OutgoingCall(CallInfo),
    /// The outgoing call was answered.
    CallConnected,
    /// Elapsed call time in seconds.
    CallDuration(u32),
    /// Call over, either side hung up.
    CallEnded,
    /// A call was missed.
    MissedCall(MissedCallInfo),
    /// User dismissed the current call screen (button or remote).
    Dismiss,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_truncates_on_char_boundary() {
        let s: String<4> = text("abcdef");
        assert_eq!(s.as_str(), "abcd");
        let s: String<4> = text("abcé");
        assert_eq!(s.as_str(), "abc");
    }

    #[test]
    fn test_navigation_update_builder() {
        let update = NavigationUpdate::new().with_instruction("turn_left").with_distance(250);
        assert_eq!(update.instruction.as_deref(), Some("turn_left"));
        assert_eq!(update.distance_m, Some(250));
        assert_eq!(update.maneuver, None);
        assert_eq!(update, NavigationUpdate::default().with_distance(250).with_instruction("turn_left"));
    }
}
