//! The presentation surface the core draws through.
//!
//! The core never touches pixels. Presenters and the navigation controller
//! create persistent elements on a [`PresentationSurface`], mutate their
//! text/color/visibility, start fire-and-forget property animations and ask
//! the surface to load one root as the sole visible root.
//!
//! Every mutating call returns a `Result` so an element that was never
//! created, or that the surface has since invalidated, can be skipped by the
//! caller (`.ok()`) without aborting the rest of an update.
//!
//! [`Scene`](crate::scene::Scene) is the in-tree implementation used by the
//! simulator and the tests.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{Point, Size};

use crate::animations::Animation;
use crate::colors::{BLACK, WHITE};
use crate::styles::FontRole;

/// Handle to an element owned by a presentation surface.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElementId(pub(crate) u16);

impl ElementId {
    /// Raw slot index, for logging.
    #[inline]
    pub const fn index(self) -> u16 { self.0 }
}

/// Errors a surface reports for a single operation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceError {
    /// No room left for another element.
    CapacityExceeded,
    /// The element does not exist or has been destroyed.
    InvalidElement,
    /// The operation does not apply to this kind of element.
    WrongKind,
}

/// Kind of persistent element.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ElementKind {
    /// Full-screen root of one context.
    Root,
    /// Single line of text.
    Label,
    /// Open polyline (glyph parts, flag).
    Line,
    /// Filled circle with optional border (avatars, indicator dots).
    Circle,
    /// Filled rounded rectangle that reports a [`UiAction`] when tapped.
    Button,
    /// Filled rectangle container (cards, bars, badges).
    Panel,
    /// Ring with a rotating arc (loading indicators).
    Spinner,
}

/// Anchor of an element inside its parent's box.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Align {
    /// Offset measured from the parent's top-left corner.
    #[default]
    TopLeft,
    /// Horizontally centered, offset from the top edge.
    TopMid,
    /// Right edge aligned, offset from the top edge.
    TopRight,
    /// Centered on both axes.
    Center,
    /// Horizontally centered, offset from the bottom edge.
    BottomMid,
}

/// Action reported by a tapped element. Dispatched synchronously by
/// [`Ui::on_touch`](crate::ui::Ui::on_touch).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiAction {
    /// Dismiss button on the incoming-call screen.
    DismissIncomingCall,
    /// Hang-up button on the outgoing-call screen.
    HangUp,
    /// OK button or any tap on the missed-call screen.
    DismissMissedCall,
}

/// Creation parameters for an element.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ElementSpec {
    /// What to create.
    pub kind: ElementKind,
    /// Anchor inside the parent.
    pub align: Align,
    /// Offset from the anchor.
    pub offset: Point,
    /// Explicit size; labels without one size to their text.
    pub size: Option<Size>,
    /// Text or stroke color.
    pub color: Rgb565,
    /// Fill color, `None` for transparent.
    pub background: Option<Rgb565>,
    /// Border color and width.
    pub border: Option<(Rgb565, u32)>,
    /// Corner radius for panels and buttons.
    pub radius: u32,
    /// Stroke width for lines and spinners.
    pub line_width: u32,
    /// Font for labels.
    pub font: FontRole,
    /// Whether the element starts visible.
    pub visible: bool,
}

impl ElementSpec {
    const BASE: Self = Self {
        kind: ElementKind::Label,
        align: Align::TopLeft,
        offset: Point::zero(),
        size: None,
        color: WHITE,
        background: None,
        border: None,
        radius: 0,
        line_width: 1,
        font: FontRole::Normal,
        visible: true,
    };

    /// Text label.
    pub const fn label(
        align: Align,
        offset: Point,
        font: FontRole,
        color: Rgb565,
    ) -> Self {
        Self {
            align,
            offset,
            font,
            color,
            ..Self::BASE
        }
    }

    /// Polyline positioned by its top-left corner; points are relative to it.
    pub const fn line(
        offset: Point,
        width: u32,
        color: Rgb565,
    ) -> Self {
        Self {
            kind: ElementKind::Line,
            offset,
            line_width: width,
            color,
            ..Self::BASE
        }
    }

    /// Filled circle of the given diameter.
    pub const fn circle(
        align: Align,
        offset: Point,
        diameter: u32,
        fill: Rgb565,
    ) -> Self {
        Self {
            kind: ElementKind::Circle,
            align,
            offset,
            size: Some(Size::new(diameter, diameter)),
            background: Some(fill),
            ..Self::BASE
        }
    }

    /// Filled container.
    pub const fn panel(
        align: Align,
        offset: Point,
        size: Size,
        fill: Rgb565,
    ) -> Self {
        Self {
            kind: ElementKind::Panel,
            align,
            offset,
            size: Some(size),
            background: Some(fill),
            ..Self::BASE
        }
    }

    /// Tappable button; add a label child for its caption.
    pub const fn button(
        align: Align,
        offset: Point,
        size: Size,
        fill: Rgb565,
    ) -> Self {
        Self {
            kind: ElementKind::Button,
            align,
            offset,
            size: Some(size),
            background: Some(fill),
            color: BLACK,
            ..Self::BASE
        }
    }

    /// Ring spinner of the given diameter.
    pub const fn spinner(
        align: Align,
        offset: Point,
        diameter: u32,
        color: Rgb565,
    ) -> Self {
        Self {
            kind: ElementKind::Spinner,
            align,
            offset,
            size: Some(Size::new(diameter, diameter)),
            color,
            line_width: 6,
            ..Self::BASE
        }
    }

    /// Fixed width/height (labels center their text inside it).
    #[must_use]
    pub const fn with_size(
        mut self,
        size: Size,
    ) -> Self {
        self.size = Some(size);
        self
    }

    /// Border around circles, panels and buttons.
    #[must_use]
    pub const fn with_border(
        mut self,
        color: Rgb565,
        width: u32,
    ) -> Self {
        self.border = Some((color, width));
        self
    }

    /// Rounded corners.
    #[must_use]
    pub const fn with_radius(
        mut self,
        radius: u32,
    ) -> Self {
        self.radius = radius;
        self
    }

    /// Create hidden.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Widget/graphics collaborator the core draws through.
///
/// All calls are synchronous and return immediately. Animations are started
/// and then advanced by the surface's own per-tick update; starting a new
/// one on an element replaces whatever was running there.
pub trait PresentationSurface {
    /// Create a detached full-screen root with an opaque background.
    fn create_root(
        &mut self,
        background: Rgb565,
    ) -> Result<ElementId, SurfaceError>;

    /// Create an element under `parent`.
    fn create_element(
        &mut self,
        parent: ElementId,
        spec: &ElementSpec,
    ) -> Result<ElementId, SurfaceError>;

    /// Replace the text of a label (longer text is truncated by the surface).
    fn set_text(
        &mut self,
        id: ElementId,
        text: &str,
    ) -> Result<(), SurfaceError>;

    /// Show or hide an element (and its children).
    fn set_visible(
        &mut self,
        id: ElementId,
        visible: bool,
    ) -> Result<(), SurfaceError>;

    /// Change the text/stroke color.
    fn set_color(
        &mut self,
        id: ElementId,
        color: Rgb565,
    ) -> Result<(), SurfaceError>;

    /// Change the fill; `None` makes the element transparent.
    fn set_background(
        &mut self,
        id: ElementId,
        background: Option<Rgb565>,
    ) -> Result<(), SurfaceError>;

    /// Replace the points of a line element.
    fn set_points(
        &mut self,
        id: ElementId,
        points: &[Point],
    ) -> Result<(), SurfaceError>;

    /// Move an element relative to its anchor.
    fn set_offset(
        &mut self,
        id: ElementId,
        offset: Point,
    ) -> Result<(), SurfaceError>;

    /// Current offset, including the effect of a running position animation.
    fn offset(
        &self,
        id: ElementId,
    ) -> Option<Point>;

    /// Bind an action reported when the element is tapped.
    fn set_action(
        &mut self,
        id: ElementId,
        action: UiAction,
    ) -> Result<(), SurfaceError>;

    /// Start a property animation, superseding any running one on `id`.
    fn animate(
        &mut self,
        id: ElementId,
        animation: Animation,
    ) -> Result<(), SurfaceError>;

    /// Stop any running animation on `id`, leaving the property at rest.
    fn stop_animations(
        &mut self,
        id: ElementId,
    ) -> Result<(), SurfaceError>;

    /// Liveness check: `false` once an element was destroyed or never existed.
    fn is_valid(
        &self,
        id: ElementId,
    ) -> bool;

    /// Make `root` the sole visible root, immediately.
    fn load_root(
        &mut self,
        root: ElementId,
    ) -> Result<(), SurfaceError>;

    /// Process pending redraw work.
    fn pump(&mut self);

    /// Action bound to the topmost displayed element under `point`.
    fn hit_test(
        &self,
        point: Point,
    ) -> Option<UiAction>;
}
