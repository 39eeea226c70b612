//! End-to-end ride: boot, connect, navigate, take a call, get back to the
//! route.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use yatramate_common::colors::{RED, WHITE};
use yatramate_common::geometry::GlyphPart;
use yatramate_common::render::draw_scene;
use yatramate_common::styles::Theme;
use yatramate_common::{
    CallInfo,
    Context,
    Event,
    GlyphCategory,
    NavigationUpdate,
    Orientation,
    Scene,
    Ui,
    UiAction,
};

fn glyph_displayed(ui: &Ui<Scene>) -> bool {
    GlyphPart::ALL
        .iter()
        .filter_map(|&part| ui.navigation().part_element(part))
        .any(|id| ui.surface().is_displayed(id))
}

/// Counts non-black pixels; enough to tell an empty frame from a drawn one.
struct PixelCounter {
    lit: usize,
}

impl OriginDimensions for PixelCounter {
    fn size(&self) -> Size { Size::new(172, 320) }
}

impl DrawTarget for PixelCounter {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.lit += pixels.into_iter().filter(|Pixel(_, c)| *c != Rgb565::BLACK).count();
        Ok(())
    }
}

#[test]
fn test_ride_with_incoming_call() {
    let mut ui = Ui::new(Scene::new(), Theme::DEFAULT);
    ui.init().unwrap();
    assert_eq!(ui.active(), Context::None);

    // Boot
    ui.request(Context::Welcome).unwrap();
    assert_eq!(ui.active(), Context::Welcome);

    // Phone connects
    ui.handle_event(Event::BleConnection(true)).unwrap();
    assert_eq!(ui.active(), Context::Idle);

    // Route starts with a slight right 80 m ahead
    let update = NavigationUpdate::new()
        .with_instruction("turn_slight_right")
        .with_distance(80)
        .with_maneuver("Slight right onto MG Road")
        .with_eta("12:45");
    ui.handle_event(Event::Navigation(update)).unwrap();
    assert_eq!(ui.active(), Context::Navigation);
    let nav = ui.navigation();
    assert_eq!(nav.category(), GlyphCategory::SlightRight);
    assert_eq!(nav.classification().orientation, Orientation::Right);
    assert!(nav.critical_alert());
    assert!(glyph_displayed(&ui));

    let distance = nav.distance_label().unwrap();
    assert_eq!(ui.surface().text(distance), Some("80 m"));
    assert_eq!(ui.surface().color(distance), Some(RED));
    let pulses = ui.surface().animations_started();

    // A second near reading does not restart the pulse
    ui.handle_event(Event::Navigation(NavigationUpdate::new().with_distance(60)))
        .unwrap();
    assert_eq!(ui.surface().text(distance), Some("60 m"));

    // Incoming call covers navigation
    ui.handle_event(Event::IncomingCall(CallInfo::new("Asha", "+91 98450 12345")))
        .unwrap();
    assert_eq!(ui.active(), Context::IncomingCall);
    assert!(!glyph_displayed(&ui));
    assert!(ui.incoming().is_ringing());
    // Ringing is the only new animation
    assert_eq!(ui.surface().animations_started(), pulses + 1);

    // Rider taps Dismiss
    let button = ui.surface().bounds(ui.incoming().dismiss_button().unwrap()).unwrap();
    assert_eq!(ui.on_touch(button.center()).unwrap(), Some(UiAction::DismissIncomingCall));

    // Navigation comes back exactly as it was
    assert_eq!(ui.active(), Context::Navigation);
    let nav = ui.navigation();
    assert_eq!(nav.category(), GlyphCategory::SlightRight);
    assert_eq!(nav.instruction(), "turn_slight_right");
    assert_eq!(nav.distance(), 60);
    assert!(nav.critical_alert());
    assert!(glyph_displayed(&ui));
    assert_eq!(ui.surface().text(nav.maneuver_label().unwrap()), Some("Slight right onto MG Road"));
    assert_eq!(ui.surface().text(nav.eta_label().unwrap()), Some("12:45"));
    assert!(!ui.incoming().is_ringing());

    // Moving away clears the alert
    ui.handle_event(Event::Navigation(NavigationUpdate::new().with_distance(1450)))
        .unwrap();
    let nav = ui.navigation();
    assert!(!nav.critical_alert());
    assert_eq!(ui.surface().text(nav.distance_label().unwrap()), Some("1.5 km"));
    assert_eq!(ui.surface().color(nav.distance_label().unwrap()), Some(WHITE));

    let mut frame = PixelCounter { lit: 0 };
    draw_scene(ui.surface(), &mut frame);
    assert!(frame.lit > 0);
}

#[test]
fn test_route_end_and_disconnect() {
    let mut ui = Ui::new(Scene::new(), Theme::DEFAULT);
    ui.init().unwrap();
    ui.request(Context::Welcome).unwrap();
    ui.handle_event(Event::BleConnection(true)).unwrap();
    ui.handle_event(Event::Navigation(NavigationUpdate::new().with_instruction("destination")))
        .unwrap();
    assert_eq!(ui.navigation().category(), GlyphCategory::Destination);

    ui.handle_event(Event::NavigationEnded).unwrap();
    assert_eq!(ui.active(), Context::Idle);
    assert!(!glyph_displayed(&ui));

    ui.handle_event(Event::BleConnection(false)).unwrap();
    assert_eq!(ui.active(), Context::Welcome);

    // Unknown raw context ids never change the screen
    assert!(ui.request_id(99).is_err());
    assert_eq!(ui.active(), Context::Welcome);
}
