use crate::foundation::{
    color::Color,
    core::{Interval, Point, Size},
};
use crate::scene::measure::TextStyle;

/// Index of a node inside a [`Scene`](crate::Scene) arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Where a node sits inside its parent.
#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    /// Fixed offset from the parent's origin.
    Fixed(Point),
    /// Follows the midpoint between a curve's endpoints, re-evaluated on every query.
    CurveMidpoint(NodeId),
}

/// Outline of a stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Stroke color.
    pub color: Color,
    /// Line width in pixels.
    pub width: f64,
}

/// How a rectangle derives its bounds.
#[derive(Clone, Debug, PartialEq)]
pub enum RectShape {
    /// Explicit size centered on the node's placement.
    Fixed(Size),
    /// Label size plus padding, centered on the node's placement.
    FitLabel {
        /// Text node whose measured size drives the box.
        label: NodeId,
        /// Added to the label size.
        pad: Size,
    },
    /// Covers a fixed letter span of a code view (the parent).
    Span {
        /// Code view the span indexes into.
        view: NodeId,
        /// Letters covered.
        span: Interval,
    },
    /// Tracks the live selection of a code view (the parent).
    Cursor {
        /// Code view whose selection is followed.
        view: NodeId,
    },
}

/// Rounded rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct RectNode {
    /// Bounds rule.
    pub shape: RectShape,
    /// Fill color, if any.
    pub fill: Option<Color>,
    /// Outline, if any.
    pub stroke: Option<Stroke>,
    /// Corner radius.
    pub radius: f64,
    /// Reveal fraction in `[0, 1]`; trims the outline and fades the fill.
    pub progress: f64,
}

/// Text source for a text node.
#[derive(Clone, Debug, PartialEq)]
pub enum TextContent {
    /// Owned string.
    Literal(String),
    /// Letters `span` of a code view's current buffer.
    Slice {
        /// Code view to read from.
        view: NodeId,
        /// Letters to read.
        span: Interval,
    },
}

/// Single run of text centered on its placement.
#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    /// Text source.
    pub content: TextContent,
    /// Font settings; ignored for [`TextContent::Slice`], which follows the view's font.
    pub style: TextStyle,
    /// Fill color.
    pub fill: Color,
}

/// Code block with a letter selection.
#[derive(Clone, Debug, PartialEq)]
pub struct CodeNode {
    /// Buffer shown.
    pub code: String,
    /// Font settings.
    pub style: TextStyle,
    /// Fill color of the code text.
    pub fill: Color,
    /// Selected letters.
    pub selection: Interval,
}

/// Curve endpoint.
#[derive(Clone, Debug, PartialEq)]
pub enum Endpoint {
    /// Fixed point in the curve's parent space.
    Fixed(Point),
    /// Bottom-center of a node's bounds.
    BottomOf(NodeId),
    /// Top-center of a node's bounds.
    TopOf(NodeId),
}

/// Cubic curve between two live endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveNode {
    /// Start.
    pub p0: Endpoint,
    /// End.
    pub p3: Endpoint,
    /// Line style.
    pub stroke: Stroke,
    /// Drawn fraction in `[0, 1]`.
    pub progress: f64,
    /// Marker color for the four control points; `None` disables markers.
    pub debug: Option<Color>,
}

/// Node payload.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Invisible container.
    Group,
    /// Rounded rectangle.
    Rect(RectNode),
    /// Text run.
    Text(TextNode),
    /// Code block.
    Code(CodeNode),
    /// Cubic curve.
    Curve(CurveNode),
}

/// One scene graph node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Placement inside the parent.
    pub placement: Placement,
    /// Own opacity; multiplied down the tree when rendering.
    pub opacity: f64,
    /// Draw order among siblings (higher draws later).
    pub z_index: i32,
    /// Payload.
    pub kind: NodeKind,
}

impl Node {
    /// Node with `kind`, at the parent origin, fully opaque.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            placement: Placement::Fixed(Point::ORIGIN),
            opacity: 1.0,
            z_index: 0,
            kind,
        }
    }

    /// Empty container.
    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    /// Set a fixed placement.
    pub fn at(mut self, p: impl Into<Point>) -> Self {
        self.placement = Placement::Fixed(p.into());
        self
    }

    /// Set the placement rule.
    pub fn placed(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set the z-index.
    pub fn with_z(mut self, z: i32) -> Self {
        self.z_index = z;
        self
    }

    /// Parent, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
