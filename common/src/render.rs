//! Rasterizes the active root of a [`Scene`].
//!
//! Elements are drawn in creation order, so children paint over their
//! parents. Anything not displayed (hidden itself, hidden ancestor, or
//! under an inactive root) is skipped. Opacity animations are emulated by
//! blending toward black, since the panel has no alpha channel.
//!
//! Drawing errors are ignored: a failed primitive leaves stale pixels until
//! the next frame, which is preferable to aborting the frame.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Arc,
    Circle,
    CornerRadii,
    Polyline,
    PrimitiveStyle,
    PrimitiveStyleBuilder,
    Rectangle,
    RoundedRectangle,
};
use embedded_graphics::text::Text;

use crate::animations::{DEFAULT_BACKDROP, blend_opacity};
use crate::colors::GRAY_DARK;
use crate::scene::{Element, Scene};
use crate::styles::{CENTERED, LEFT_ALIGNED};
use crate::surface::{ElementId, ElementKind};

/// Draw everything displayed under the scene's active root.
///
/// Draws nothing when no root is active.
pub fn draw_scene<D>(
    scene: &Scene,
    display: &mut D,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if scene.active_root().is_none() {
        return;
    }

    for (id, element) in scene.iter() {
        if !scene.is_displayed(id) {
            continue;
        }
        let Some(bounds) = scene.bounds(id) else {
            continue;
        };
        draw_element(scene, id, element, bounds, display);
    }
}

fn draw_element<D>(
    scene: &Scene,
    id: ElementId,
    element: &Element,
    bounds: Rectangle,
    display: &mut D,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let opacity = scene.opacity(id);
    let fade = |color: Rgb565| blend_opacity(color, DEFAULT_BACKDROP, opacity);

    match element.kind {
        ElementKind::Root => {
            let fill = element.background.unwrap_or(DEFAULT_BACKDROP);
            bounds.into_styled(PrimitiveStyle::with_fill(fill)).draw(display).ok();
        }
        ElementKind::Panel | ElementKind::Button => {
            let style = box_style(element, fade);
            RoundedRectangle::new(bounds, CornerRadii::new(Size::new_equal(element.radius)))
                .into_styled(style)
                .draw(display)
                .ok();
        }
        ElementKind::Circle => {
            let style = box_style(element, fade);
            Circle::new(bounds.top_left, bounds.size.width.min(bounds.size.height))
                .into_styled(style)
                .draw(display)
                .ok();
        }
        ElementKind::Label => draw_label(element, bounds, fade(element.color), display),
        ElementKind::Line => {
            if element.points.len() < 2 {
                return;
            }
            Polyline::new(&element.points)
                .translate(bounds.top_left)
                .into_styled(PrimitiveStyle::with_stroke(fade(element.color), element.line_width))
                .draw(display)
                .ok();
        }
        ElementKind::Spinner => {
            let diameter = bounds.size.width.min(bounds.size.height);
            Circle::new(bounds.top_left, diameter)
                .into_styled(PrimitiveStyle::with_stroke(GRAY_DARK, element.line_width))
                .draw(display)
                .ok();
            // A quarter arc chasing around the ring
            let start = (scene.angle(id) - 90) as f32;
            Arc::new(bounds.top_left, diameter, start.deg(), 90.0.deg())
                .into_styled(PrimitiveStyle::with_stroke(fade(element.color), element.line_width))
                .draw(display)
                .ok();
        }
    }
}

fn box_style(
    element: &Element,
    fade: impl Fn(Rgb565) -> Rgb565,
) -> PrimitiveStyle<Rgb565> {
    let mut builder = PrimitiveStyleBuilder::new();
    if let Some(fill) = element.background {
        builder = builder.fill_color(fade(fill));
    }
    if let Some((color, width)) = element.border {
        builder = builder.stroke_color(fade(color)).stroke_width(width);
    }
    builder.build()
}

fn draw_label<D>(
    element: &Element,
    bounds: Rectangle,
    color: Rgb565,
    display: &mut D,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if element.text.is_empty() {
        return;
    }
    let style = element.font.style(color);
    if element.size.is_some() {
        Text::with_text_style(&element.text, bounds.center(), style, CENTERED)
            .draw(display)
            .ok();
    } else {
        Text::with_text_style(&element.text, bounds.top_left, style, LEFT_ALIGNED)
            .draw(display)
            .ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
