//! YatraMate status display simulator for Windows/Desktop.
//!
//! Runs the display core against an in-memory [`Scene`] and rasterizes it
//! into an embedded-graphics-simulator window. A scripted ride plays by
//! default; the keyboard injects events by hand and mouse clicks act as
//! taps on the touch panel.
//!
//! Keys:
//! - `F1`-`F6`: request a context by raw id
//! - `C`: toggle the BLE connection
//! - `I` / `O` / `M`: incoming, outgoing, missed call
//! - `A`: answer (connect) the outgoing call
//! - `D`: dismiss / end call
//! - `E`: end the route
//! - `P`: pause or resume the script

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod script;
mod timing;

use std::thread;
use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::{Keycode, MouseButton};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use yatramate_common::colors::BLACK;
use yatramate_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use yatramate_common::log_buffer::{LOG_BUFFER, LogEntry, set_clock_ms};
use yatramate_common::render::draw_scene;
use yatramate_common::styles::Theme;
use yatramate_common::{CallInfo, Context, Event, MissedCallInfo, Scene, Ui, log_info};

use crate::script::Script;
use crate::timing::{CALL_TICK, FRAME_TIME};

fn main() {
    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("YatraMate Sim", &output_settings);

    display.clear(BLACK).ok();
    window.update(&display);

    let mut ui = Ui::new(Scene::new(), Theme::DEFAULT);
    if let Err(err) = ui.init() {
        eprintln!("init failed: {err}");
        return;
    }
    ui.request(Context::Welcome).ok();

    let start = Instant::now();
    let mut script = Script::demo_ride();
    let mut scripted = true;
    let mut log_seen = 0u32;

    // Manual call timer
    let mut call_started: Option<Instant> = None;
    let mut last_duration = 0u32;

    loop {
        let frame_start = Instant::now();
        let now_ms = start.elapsed().as_millis() as u32;
        set_clock_ms(now_ms);

        // Handle events
        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::MouseButtonUp {
                    mouse_btn: MouseButton::Left,
                    point,
                } => {
                    ui.on_touch(point).ok();
                }
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    let event = match keycode {
                        Keycode::F1 | Keycode::F2 | Keycode::F3 | Keycode::F4 | Keycode::F5 | Keycode::F6 => {
                            ui.request_id(context_key(keycode)).ok();
                            None
                        }
                        Keycode::C => Some(Event::BleConnection(!ui.is_connected())),
                        Keycode::I => Some(Event::IncomingCall(CallInfo::new("Asha", "+91 98450 12345"))),
                        Keycode::O => {
                            call_started = None;
                            Some(Event::OutgoingCall(CallInfo::new("Home", "")))
                        }
                        Keycode::A => {
                            call_started = Some(Instant::now());
                            last_duration = 0;
                            Some(Event::CallConnected)
                        }
                        Keycode::M => Some(Event::MissedCall(MissedCallInfo::new("Ravi", "Unknown", 3, "Yesterday"))),
                        Keycode::D => {
                            call_started = None;
                            Some(Event::Dismiss)
                        }
                        Keycode::E => Some(Event::NavigationEnded),
                        Keycode::P => {
                            scripted = !scripted;
                            log_info!("sim: script {}", if scripted { "on" } else { "paused" });
                            None
                        }
                        _ => None,
                    };
                    if let Some(event) = event {
                        ui.handle_event(event).ok();
                    }
                }
                _ => {}
            }
        }

        if scripted {
            for event in script.due(start.elapsed()) {
                ui.handle_event(event).ok();
            }
        }

        if let Some(started) = call_started {
            let seconds = (started.elapsed().as_secs_f32() / CALL_TICK.as_secs_f32()) as u32;
            if seconds != last_duration {
                last_duration = seconds;
                ui.handle_event(Event::CallDuration(seconds)).ok();
            }
        }

        ui.surface_mut().tick(now_ms);
        draw_scene(ui.surface(), &mut display);
        window.update(&display);

        log_seen = print_new_logs(log_seen);

        let elapsed = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }
}

/// Raw context id for the function keys.
fn context_key(keycode: Keycode) -> u8 {
    match keycode {
        Keycode::F1 => 1,
        Keycode::F2 => 2,
        Keycode::F3 => 3,
        Keycode::F4 => 4,
        Keycode::F5 => 5,
        Keycode::F6 => 6,
        _ => 0,
    }
}

/// Print log entries pushed since `seen`; returns the new total.
fn print_new_logs(seen: u32) -> u32 {
    let Ok(log) = LOG_BUFFER.try_lock() else {
        return seen;
    };
    let total = log.total_pushed();
    let fresh = total.wrapping_sub(seen) as usize;
    for entry in log.latest(fresh) {
        print_entry(entry);
    }
    total
}

fn print_entry(entry: &LogEntry) {
    println!(
        "[{:>7}.{:03}] {} {}",
        entry.timestamp_ms / 1000,
        entry.timestamp_ms % 1000,
        entry.level.prefix(),
        entry.message
    );
}
