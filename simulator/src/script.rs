//! Scripted demo ride.
//!
//! Stands in for the phone: a timeline of events replayed against the
//! display core, looping once it runs out. Distances count down between
//! maneuvers so the critical alert kicks in on every approach.

use std::time::Duration;

use yatramate_common::{CallInfo, Event, MissedCallInfo, NavigationUpdate};

/// One leg of the route: instruction, text, starting distance.
const LEGS: [(&str, &str, i32); 8] = [
    ("straight", "Continue on NH 48", 2400),
    ("turn_slight_right", "Slight right onto MG Road", 650),
    ("turn_left", "Turn left onto Brigade Rd", 420),
    ("roundabout_right", "At the roundabout, 3rd exit", 300),
    ("keep_left", "Keep left at the fork", 260),
    ("turn_sharp_right", "Sharp right onto Church St", 180),
    ("uturn", "Make a U-turn", 150),
    ("destination", "Arrive at destination", 120),
];

/// Distance covered per tick while riding a leg.
const METERS_PER_TICK: i32 = 40;

/// Time between distance updates.
const TICK: Duration = Duration::from_millis(500);

/// Timeline of events with their offsets from the start of the loop.
pub struct Script {
    events: Vec<(Duration, Event)>,
    next: usize,
    started: Duration,
}

impl Script {
    pub fn demo_ride() -> Self {
        let mut events = Vec::new();
        let mut at = Duration::from_secs(2);
        let mut push = |at: Duration, event: Event| events.push((at, event));

        push(at, Event::BleConnection(true));
        at += Duration::from_secs(3);

        for (leg, (instruction, text, start)) in LEGS.iter().enumerate() {
            let eta = format!("ETA 12:{:02}", 30 + leg * 2);
            push(
                at,
                Event::Navigation(
                    NavigationUpdate::new()
                        .with_instruction(instruction)
                        .with_distance(*start)
                        .with_maneuver(text)
                        .with_eta(&eta),
                ),
            );
            let mut meters = *start;
            while meters > METERS_PER_TICK {
                meters -= METERS_PER_TICK;
                at += TICK;
                push(at, Event::Navigation(NavigationUpdate::new().with_distance(meters)));
            }

            // A call in the middle of the ride
            if leg == 2 {
                at += Duration::from_secs(1);
                push(at, Event::IncomingCall(CallInfo::new("Asha", "+91 98450 12345")));
                at += Duration::from_secs(5);
                push(at, Event::CallEnded);
            }
            if leg == 5 {
                at += Duration::from_secs(1);
                push(at, Event::MissedCall(MissedCallInfo::new("Ravi", "+91 99000 54321", 2, "12:41")));
                at += Duration::from_secs(4);
                push(at, Event::Dismiss);
            }
            at += TICK;
        }

        push(at, Event::NavigationEnded);
        at += Duration::from_secs(2);

        push(at, Event::OutgoingCall(CallInfo::new("Home", "")));
        at += Duration::from_secs(3);
        push(at, Event::CallConnected);
        for second in 1..=5 {
            push(at + Duration::from_secs(second), Event::CallDuration(second as u32));
        }
        at += Duration::from_secs(6);
        push(at, Event::CallEnded);
        at += Duration::from_secs(3);

        push(at, Event::BleConnection(false));

        Self {
            events,
            next: 0,
            started: Duration::ZERO,
        }
    }

    /// Events due at `elapsed` (time since the simulator started). Restarts
    /// the timeline after the last event.
    pub fn due(
        &mut self,
        elapsed: Duration,
    ) -> Vec<Event> {
        let mut due = Vec::new();
        let offset = elapsed.saturating_sub(self.started);
        while let Some((at, event)) = self.events.get(self.next) {
            if *at > offset {
                break;
            }
            due.push(event.clone());
            self.next += 1;
        }
        if self.next == self.events.len() {
            self.next = 0;
            self.started = elapsed + Duration::from_secs(3);
        }
        due
    }
}
