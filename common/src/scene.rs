//! Fixed-capacity element arena implementing [`PresentationSurface`].
//!
//! A [`Scene`] stores every element of every context in one `heapless`
//! vector; an [`ElementId`] is the element's slot index. Slots are never
//! reused, so an id stays invalid once its element was destroyed.
//!
//! Layout is resolved on demand from the parent chain (see
//! [`Scene::bounds`]). Animations are sampled lazily against the time set
//! by [`Scene::tick`]; finished one-shot animations are folded into the
//! element's resting state on the next tick.
//!
//! The scene is what the simulator renders and what the tests inspect:
//! query helpers such as [`Scene::is_displayed`] and
//! [`Scene::animations_started`] expose the state a human would see.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::{ContainsPoint, Rectangle};
use heapless::{String, Vec};

use crate::animations::{AnimProperty, Animation};
use crate::config::{MAX_ELEMENTS, MAX_LINE_POINTS, MAX_TEXT_LEN, OPA_COVER, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::styles::FontRole;
use crate::surface::{Align, ElementId, ElementKind, ElementSpec, PresentationSurface, SurfaceError, UiAction};

/// Animation running on an element.
#[derive(Clone, Copy, Debug)]
struct Running {
    animation: Animation,
    started_ms: u32,
}

/// One element of the scene.
#[derive(Clone, Debug)]
pub(crate) struct Element {
    pub(crate) kind: ElementKind,
    pub(crate) parent: Option<ElementId>,
    pub(crate) align: Align,
    pub(crate) offset: Point,
    pub(crate) size: Option<Size>,
    pub(crate) color: Rgb565,
    pub(crate) background: Option<Rgb565>,
    pub(crate) border: Option<(Rgb565, u32)>,
    pub(crate) radius: u32,
    pub(crate) line_width: u32,
    pub(crate) font: FontRole,
    pub(crate) visible: bool,
    pub(crate) text: String<MAX_TEXT_LEN>,
    pub(crate) points: Vec<Point, MAX_LINE_POINTS>,
    action: Option<UiAction>,
    running: Option<Running>,
}

impl Element {
    fn from_spec(
        parent: Option<ElementId>,
        spec: &ElementSpec,
    ) -> Self {
        Self {
            kind: spec.kind,
            parent,
            align: spec.align,
            offset: spec.offset,
            size: spec.size,
            color: spec.color,
            background: spec.background,
            border: spec.border,
            radius: spec.radius,
            line_width: spec.line_width,
            font: spec.font,
            visible: spec.visible,
            text: String::new(),
            points: Vec::new(),
            action: None,
            running: None,
        }
    }

    /// Sampled value of `property` if an animation on it is running.
    fn animated(
        &self,
        property: AnimProperty,
        now_ms: u32,
    ) -> Option<i32> {
        self.running
            .filter(|r| r.animation.property == property)
            .map(|r| r.animation.value_at(now_ms.wrapping_sub(r.started_ms)))
    }
}

/// In-memory presentation surface.
pub struct Scene {
    elements: Vec<Option<Element>, MAX_ELEMENTS>,
    active_root: Option<ElementId>,
    now_ms: u32,
    dirty: bool,
    pumps: u32,
    animations_started: u32,
}

impl Scene {
    /// Empty scene at time zero.
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
            active_root: None,
            now_ms: 0,
            dirty: false,
            pumps: 0,
            animations_started: 0,
        }
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Advance the scene clock and settle finished one-shot animations.
    pub fn tick(
        &mut self,
        now_ms: u32,
    ) {
        self.now_ms = now_ms;
        for element in self.elements.iter_mut().flatten() {
            let Some(running) = element.running else {
                continue;
            };
            let elapsed = now_ms.wrapping_sub(running.started_ms);
            if running.animation.is_finished(elapsed) {
                Self::settle(element, running.animation.final_value());
                element.running = None;
            }
            self.dirty = true;
        }
    }

    /// Current scene time.
    #[inline]
    pub const fn now_ms(&self) -> u32 { self.now_ms }

    /// Folds an animated value into the element's resting state.
    fn settle(
        element: &mut Element,
        value: i32,
    ) {
        if let Some(running) = element.running {
            match running.animation.property {
                AnimProperty::OffsetY => element.offset.y = value,
                // Opacity and angle have no resting state of their own
                AnimProperty::Opacity | AnimProperty::Angle => {}
            }
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Destroy an element and everything under it.
    pub fn destroy(
        &mut self,
        id: ElementId,
    ) {
        let start = usize::from(id.0);
        let Some(slot) = self.elements.get_mut(start) else {
            return;
        };
        *slot = None;

        // Children are always created after their parents.
        for index in start + 1..self.elements.len() {
            let orphaned = self.elements[index]
                .as_ref()
                .and_then(|e| e.parent)
                .is_some_and(|p| !self.is_valid(p));
            if orphaned {
                self.elements[index] = None;
            }
        }

        if self.active_root.is_some_and(|root| !self.is_valid(root)) {
            self.active_root = None;
        }
        self.dirty = true;
    }

    fn element(
        &self,
        id: ElementId,
    ) -> Option<&Element> {
        self.elements.get(usize::from(id.0)).and_then(Option::as_ref)
    }

    fn element_mut(
        &mut self,
        id: ElementId,
    ) -> Result<&mut Element, SurfaceError> {
        self.dirty = true;
        self.elements
            .get_mut(usize::from(id.0))
            .and_then(Option::as_mut)
            .ok_or(SurfaceError::InvalidElement)
    }

    fn insert(
        &mut self,
        element: Element,
    ) -> Result<ElementId, SurfaceError> {
        let id = ElementId(self.elements.len() as u16);
        self.elements.push(Some(element)).map_err(|_| SurfaceError::CapacityExceeded)?;
        self.dirty = true;
        Ok(id)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Live elements in creation order (parents before children).
    pub(crate) fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (ElementId(i as u16), e)))
    }

    /// Number of live elements.
    pub fn len(&self) -> usize { self.elements.iter().flatten().count() }

    /// Whether the scene holds no live elements.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Root currently shown.
    #[inline]
    pub const fn active_root(&self) -> Option<ElementId> { self.active_root }

    /// Kind of a live element.
    pub fn kind(
        &self,
        id: ElementId,
    ) -> Option<ElementKind> {
        self.element(id).map(|e| e.kind)
    }

    /// Parent of a live element.
    pub fn parent(
        &self,
        id: ElementId,
    ) -> Option<ElementId> {
        self.element(id).and_then(|e| e.parent)
    }

    /// Live children of `id`, in creation order.
    pub fn children(
        &self,
        id: ElementId,
    ) -> impl Iterator<Item = ElementId> + '_ {
        self.iter().filter(move |(_, e)| e.parent == Some(id)).map(|(child, _)| child)
    }

    /// Text of a label.
    pub fn text(
        &self,
        id: ElementId,
    ) -> Option<&str> {
        self.element(id).map(|e| e.text.as_str())
    }

    /// Text or stroke color.
    pub fn color(
        &self,
        id: ElementId,
    ) -> Option<Rgb565> {
        self.element(id).map(|e| e.color)
    }

    /// Fill color.
    pub fn background(
        &self,
        id: ElementId,
    ) -> Option<Rgb565> {
        self.element(id).and_then(|e| e.background)
    }

    /// Points of a line.
    pub fn points(
        &self,
        id: ElementId,
    ) -> Option<&[Point]> {
        self.element(id).map(|e| e.points.as_slice())
    }

    /// Own visibility flag (ignores ancestors).
    pub fn is_visible(
        &self,
        id: ElementId,
    ) -> bool {
        self.element(id).is_some_and(|e| e.visible)
    }

    /// Whether the element is on screen: itself and every ancestor visible,
    /// under the active root.
    pub fn is_displayed(
        &self,
        id: ElementId,
    ) -> bool {
        let mut current = id;
        loop {
            let Some(element) = self.element(current) else {
                return false;
            };
            if !element.visible {
                return false;
            }
            match element.parent {
                Some(parent) => current = parent,
                None => return self.active_root == Some(current),
            }
        }
    }

    /// Animation currently running on `id`.
    pub fn animation(
        &self,
        id: ElementId,
    ) -> Option<Animation> {
        self.element(id).and_then(|e| e.running).map(|r| r.animation)
    }

    /// Effective opacity (255 unless an opacity animation runs).
    pub fn opacity(
        &self,
        id: ElementId,
    ) -> i32 {
        self.element(id)
            .and_then(|e| e.animated(AnimProperty::Opacity, self.now_ms))
            .unwrap_or(OPA_COVER)
    }

    /// Effective rotation in degrees.
    pub fn angle(
        &self,
        id: ElementId,
    ) -> i32 {
        self.element(id)
            .and_then(|e| e.animated(AnimProperty::Angle, self.now_ms))
            .unwrap_or(0)
    }

    /// Total animations started since creation.
    #[inline]
    pub const fn animations_started(&self) -> u32 { self.animations_started }

    /// Total `pump` calls since creation.
    #[inline]
    pub const fn pump_count(&self) -> u32 { self.pumps }

    /// Whether anything changed since the last pump.
    #[inline]
    pub const fn is_dirty(&self) -> bool { self.dirty }

    /// Size of an element: explicit, from its text for labels, from its
    /// points for lines, the whole panel for roots.
    fn element_size(
        &self,
        element: &Element,
    ) -> Size {
        if let Some(size) = element.size {
            return size;
        }
        match element.kind {
            ElementKind::Root => Size::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            ElementKind::Label => {
                let chars = element.text.chars().count() as u32;
                Size::new(element.font.text_width(chars), element.font.line_height())
            }
            ElementKind::Line => {
                let w = element.points.iter().map(|p| p.x).max().unwrap_or(0).max(0) as u32;
                let h = element.points.iter().map(|p| p.y).max().unwrap_or(0).max(0) as u32;
                Size::new(w + element.line_width, h + element.line_width)
            }
            _ => Size::zero(),
        }
    }

    /// Screen-space box of an element, resolved through its parents.
    pub fn bounds(
        &self,
        id: ElementId,
    ) -> Option<Rectangle> {
        let element = self.element(id)?;
        let size = self.element_size(element);
        let offset = Point::new(
            element.offset.x,
            element.animated(AnimProperty::OffsetY, self.now_ms).unwrap_or(element.offset.y),
        );

        let Some(parent) = element.parent else {
            return Some(Rectangle::new(offset, size));
        };
        let outer = self.bounds(parent)?;
        let (pw, ph) = (outer.size.width as i32, outer.size.height as i32);
        let (w, h) = (size.width as i32, size.height as i32);

        let anchor = match element.align {
            Align::TopLeft => Point::zero(),
            Align::TopMid => Point::new((pw - w) / 2, 0),
            Align::TopRight => Point::new(pw - w, 0),
            Align::Center => Point::new((pw - w) / 2, (ph - h) / 2),
            Align::BottomMid => Point::new((pw - w) / 2, ph - h),
        };
        Some(Rectangle::new(outer.top_left + anchor + offset, size))
    }
}

impl Default for Scene {
    fn default() -> Self { Self::new() }
}

impl PresentationSurface for Scene {
    fn create_root(
        &mut self,
        background: Rgb565,
    ) -> Result<ElementId, SurfaceError> {
        let spec = ElementSpec {
            kind: ElementKind::Root,
            ..ElementSpec::panel(Align::TopLeft, Point::zero(), Size::new(SCREEN_WIDTH, SCREEN_HEIGHT), background)
        };
        self.insert(Element::from_spec(None, &spec))
    }

    fn create_element(
        &mut self,
        parent: ElementId,
        spec: &ElementSpec,
    ) -> Result<ElementId, SurfaceError> {
        if !self.is_valid(parent) {
            return Err(SurfaceError::InvalidElement);
        }
        if spec.kind == ElementKind::Root {
            return Err(SurfaceError::WrongKind);
        }
        self.insert(Element::from_spec(Some(parent), spec))
    }

    fn set_text(
        &mut self,
        id: ElementId,
        text: &str,
    ) -> Result<(), SurfaceError> {
        let element = self.element_mut(id)?;
        if element.kind != ElementKind::Label {
            return Err(SurfaceError::WrongKind);
        }
        element.text.clear();
        for c in text.chars() {
            if element.text.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }

    fn set_visible(
        &mut self,
        id: ElementId,
        visible: bool,
    ) -> Result<(), SurfaceError> {
        self.element_mut(id)?.visible = visible;
        Ok(())
    }

    fn set_color(
        &mut self,
        id: ElementId,
        color: Rgb565,
    ) -> Result<(), SurfaceError> {
        self.element_mut(id)?.color = color;
        Ok(())
    }

    fn set_background(
        &mut self,
        id: ElementId,
        background: Option<Rgb565>,
    ) -> Result<(), SurfaceError> {
        self.element_mut(id)?.background = background;
        Ok(())
    }

    fn set_points(
        &mut self,
        id: ElementId,
        points: &[Point],
    ) -> Result<(), SurfaceError> {
        let element = self.element_mut(id)?;
        if element.kind != ElementKind::Line {
            return Err(SurfaceError::WrongKind);
        }
        element.points.clear();
        let n = points.len().min(MAX_LINE_POINTS);
        element.points.extend_from_slice(&points[..n]).map_err(|_| SurfaceError::CapacityExceeded)?;
        Ok(())
    }

    fn set_offset(
        &mut self,
        id: ElementId,
        offset: Point,
    ) -> Result<(), SurfaceError> {
        self.element_mut(id)?.offset = offset;
        Ok(())
    }

    fn offset(
        &self,
        id: ElementId,
    ) -> Option<Point> {
        let element = self.element(id)?;
        let y = element.animated(AnimProperty::OffsetY, self.now_ms).unwrap_or(element.offset.y);
        Some(Point::new(element.offset.x, y))
    }

    fn set_action(
        &mut self,
        id: ElementId,
        action: UiAction,
    ) -> Result<(), SurfaceError> {
        self.element_mut(id)?.action = Some(action);
        Ok(())
    }

    fn animate(
        &mut self,
        id: ElementId,
        animation: Animation,
    ) -> Result<(), SurfaceError> {
        let now_ms = self.now_ms;
        let element = self.element_mut(id)?;
        element.running = Some(Running {
            animation,
            started_ms: now_ms,
        });
        self.animations_started = self.animations_started.wrapping_add(1);
        Ok(())
    }

    fn stop_animations(
        &mut self,
        id: ElementId,
    ) -> Result<(), SurfaceError> {
        let now_ms = self.now_ms;
        let element = self.element_mut(id)?;
        if let Some(running) = element.running {
            // Freeze where it is now
            let value = running.animation.value_at(now_ms.wrapping_sub(running.started_ms));
            Self::settle(element, value);
            element.running = None;
        }
        Ok(())
    }

    fn is_valid(
        &self,
        id: ElementId,
    ) -> bool {
        self.element(id).is_some()
    }

    fn load_root(
        &mut self,
        root: ElementId,
    ) -> Result<(), SurfaceError> {
        match self.element(root) {
            Some(e) if e.kind == ElementKind::Root => {
                self.active_root = Some(root);
                self.dirty = true;
                Ok(())
            }
            Some(_) => Err(SurfaceError::WrongKind),
            None => Err(SurfaceError::InvalidElement),
        }
    }

    fn pump(&mut self) {
        self.pumps = self.pumps.wrapping_add(1);
        self.dirty = false;
    }

    fn hit_test(
        &self,
        point: Point,
    ) -> Option<UiAction> {
        // Later elements paint over earlier ones
        self.elements
            .iter()
            .enumerate()
            .rev()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (ElementId(i as u16), e)))
            .filter(|(id, e)| e.action.is_some() && self.is_displayed(*id))
            .find(|(id, _)| self.bounds(*id).is_some_and(|b| b.contains(point)))
            .and_then(|(_, e)| e.action)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
