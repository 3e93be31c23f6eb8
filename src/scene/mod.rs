//! Arena scene graph.
//!
//! Nodes live in a flat arena and are addressed by [`NodeId`]. Derived geometry (text sizes,
//! selection boxes, curve control points, midpoint-tracking labels) is never stored: every query
//! recomputes it from the current node state, so mutating a buffer or a font size is reflected
//! immediately by everything that depends on it.

/// Text metrics.
pub mod measure;
/// Node kinds, placements and endpoints.
pub mod node;

use kurbo::ParamCurveExtrema as _;

use crate::foundation::{
    core::{CubicBez, Interval, Point, Rect, Size},
    error::{LexvisError, LexvisResult},
    math::{bbox_around, bottom_center, interval_bbox, s_curve_controls, top_center},
};

use measure::{FontMeasure, MonospaceMeasure, TextMeasure, TextStyle};
use node::{Endpoint, Node, NodeId, NodeKind, Placement, RectShape, TextContent};

/// Animatable scalar property of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prop {
    /// Node opacity.
    Opacity(NodeId),
    /// Reveal fraction of a rect or curve.
    Progress(NodeId),
    /// Selection start of a code node.
    SelectionStart(NodeId),
    /// Selection end of a code node.
    SelectionEnd(NodeId),
    /// Font size of a code or text node.
    FontSize(NodeId),
    /// Letter spacing of a code or text node.
    LetterSpacing(NodeId),
    /// X of a fixed placement.
    X(NodeId),
    /// Y of a fixed placement.
    Y(NodeId),
}

impl Prop {
    /// Node the property belongs to.
    pub fn node(self) -> NodeId {
        match self {
            Self::Opacity(id)
            | Self::Progress(id)
            | Self::SelectionStart(id)
            | Self::SelectionEnd(id)
            | Self::FontSize(id)
            | Self::LetterSpacing(id)
            | Self::X(id)
            | Self::Y(id) => id,
        }
    }
}

/// Scene graph with an implicit root group.
pub struct Scene {
    slots: Vec<Option<Node>>,
    root: NodeId,
    measure: Box<dyn TextMeasure>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(FontMeasure::system())
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("live_nodes", &self.len())
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Empty scene measuring text with `measure`.
    pub fn new(measure: impl TextMeasure + 'static) -> Self {
        Self {
            slots: vec![Some(Node::group())],
            root: NodeId(0),
            measure: Box::new(measure),
        }
    }

    /// Empty scene with fixed-advance metrics, so layout does not depend on installed fonts.
    pub fn monospace() -> Self {
        Self::new(MonospaceMeasure::default())
    }

    /// Root group; its origin is the canvas center.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// A scene always holds its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// `true` when `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.idx()), Some(Some(_)))
    }

    /// Borrow a live node.
    pub fn node(&self, id: NodeId) -> LexvisResult<&Node> {
        self.slots
            .get(id.idx())
            .and_then(Option::as_ref)
            .ok_or_else(|| LexvisError::animation(format!("node {} does not exist", id.0)))
    }

    /// Mutably borrow a live node.
    pub fn node_mut(&mut self, id: NodeId) -> LexvisResult<&mut Node> {
        self.slots
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .ok_or_else(|| LexvisError::animation(format!("node {} does not exist", id.0)))
    }

    /// Insert `node` as the last child of `parent`.
    pub fn add(&mut self, parent: NodeId, mut node: Node) -> LexvisResult<NodeId> {
        self.node(parent)?;
        let id = NodeId(
            u32::try_from(self.slots.len())
                .map_err(|_| LexvisError::animation("node id overflow"))?,
        );
        node.parent = Some(parent);
        node.children.clear();
        self.slots.push(Some(node));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Unlink `id` from its parent, keeping it (and its subtree) alive.
    pub fn detach(&mut self, id: NodeId) -> LexvisResult<()> {
        if id == self.root {
            return Err(LexvisError::animation("the root node cannot be detached"));
        }
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        self.node_mut(parent)?.children.retain(|c| *c != id);
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    /// Move `id` to the end of `parent`'s children.
    ///
    /// Fails when `parent` lies inside `id`'s own subtree.
    pub fn attach(&mut self, id: NodeId, parent: NodeId) -> LexvisResult<()> {
        self.node(parent)?;
        if self.is_within(parent, id)? {
            return Err(LexvisError::graph(format!(
                "node {} cannot be moved under its own descendant {}",
                id.0, parent.0
            )));
        }
        self.detach(id)?;
        self.node_mut(id)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(id);
        Ok(())
    }

    /// `true` when `id` is `ancestor` or sits somewhere below it.
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> LexvisResult<bool> {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == ancestor {
                return Ok(true);
            }
            cur = self.node(n)?.parent;
        }
        Ok(false)
    }

    /// Detach `id` and free it together with its subtree.
    pub fn remove(&mut self, id: NodeId) -> LexvisResult<()> {
        self.detach(id)?;
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.slots.get_mut(cur.idx()).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    /// Children of `id` in draw order (z-index, then insertion).
    pub fn draw_order(&self, id: NodeId) -> LexvisResult<Vec<NodeId>> {
        let mut children = self.node(id)?.children.clone();
        let mut keyed = Vec::with_capacity(children.len());
        for c in children.drain(..) {
            keyed.push((self.node(c)?.z_index, c));
        }
        keyed.sort_by_key(|(z, _)| *z);
        Ok(keyed.into_iter().map(|(_, c)| c).collect())
    }

    /// Measure `text` with the scene's metrics.
    pub fn measure_text(&self, text: &str, style: &TextStyle) -> Size {
        self.measure.measure(text, style)
    }

    /// Current string of a text node.
    pub fn text(&self, id: NodeId) -> LexvisResult<String> {
        match &self.node(id)?.kind {
            NodeKind::Text(t) => match &t.content {
                TextContent::Literal(s) => Ok(s.clone()),
                TextContent::Slice { view, span } => self.code_slice(*view, *span),
            },
            _ => Err(kind_error(id, "text")),
        }
    }

    /// Font of a text node; slices of a code view always use the view's current font.
    pub fn text_style(&self, id: NodeId) -> LexvisResult<TextStyle> {
        match &self.node(id)?.kind {
            NodeKind::Text(t) => match &t.content {
                TextContent::Literal(_) => Ok(t.style.clone()),
                TextContent::Slice { view, .. } => Ok(self.code(*view)?.style.clone()),
            },
            _ => Err(kind_error(id, "text")),
        }
    }

    /// Letters `span` of a code node's current buffer, clamped to the buffer.
    pub fn code_slice(&self, view: NodeId, span: Interval) -> LexvisResult<String> {
        let code = &self.code(view)?.code;
        let (a, b) = span.letter_range(code.chars().count());
        Ok(code.chars().skip(a).take(b - a).collect())
    }

    /// Size of one letter of a code node, from its first letter and current style.
    pub fn letter_size(&self, view: NodeId) -> LexvisResult<Size> {
        let code = self.code(view)?;
        let first = code
            .code
            .chars()
            .next()
            .filter(|c| *c != '\n')
            .unwrap_or(' ');
        let mut buf = [0u8; 4];
        Ok(self.measure_text(first.encode_utf8(&mut buf), &code.style))
    }

    /// X of letter 0 in the code node's own space.
    pub fn code_left(&self, view: NodeId) -> LexvisResult<f64> {
        let code = self.code(view)?;
        Ok(-self.measure_text(&code.code, &code.style).width / 2.0)
    }

    /// Resolved placement of `id` in its parent's space.
    pub fn position(&self, id: NodeId) -> LexvisResult<Point> {
        let node = self.node(id)?;
        match &node.placement {
            Placement::Fixed(p) => Ok(*p),
            Placement::CurveMidpoint(curve) => {
                let c = self.curve(*curve)?;
                let mid = c.p0.midpoint(c.p3);
                let from = self.frame_origin(self.node(*curve)?.parent)?;
                let to = self.frame_origin(node.parent)?;
                Ok(mid + (from - to))
            }
        }
    }

    /// Bounds of `id` in its parent's space.
    pub fn local_bounds(&self, id: NodeId) -> LexvisResult<Rect> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Group => Ok(Rect::from_origin_size(self.position(id)?, Size::ZERO)),
            NodeKind::Text(_) => Ok(bbox_around(
                self.position(id)?,
                self.measure_text(&self.text(id)?, &self.text_style(id)?),
            )),
            NodeKind::Code(c) => Ok(bbox_around(
                self.position(id)?,
                self.measure_text(&c.code, &c.style),
            )),
            NodeKind::Curve(_) => Ok(self.curve(id)?.bounding_box()),
            NodeKind::Rect(r) => match &r.shape {
                RectShape::Fixed(size) => Ok(bbox_around(self.position(id)?, *size)),
                RectShape::FitLabel { label, pad } => {
                    let s = self.local_bounds(*label)?.size();
                    Ok(bbox_around(
                        self.position(id)?,
                        Size::new(s.width + pad.width, s.height + pad.height),
                    ))
                }
                RectShape::Span { view, span } => Ok(interval_bbox(
                    self.code_left(*view)?,
                    self.letter_size(*view)?,
                    *span,
                )),
                RectShape::Cursor { view } => {
                    let b = interval_bbox(
                        self.code_left(*view)?,
                        self.letter_size(*view)?,
                        self.code(*view)?.selection,
                    );
                    Ok(Rect::new(b.x0 - 5.0, b.y0, b.x1 - 2.0, b.y1))
                }
            },
        }
    }

    /// Bounds of `id` in root space.
    pub fn world_bounds(&self, id: NodeId) -> LexvisResult<Rect> {
        let off = self.frame_origin(self.node(id)?.parent)?.to_vec2();
        Ok(self.local_bounds(id)? + off)
    }

    /// Origin of the coordinate frame `id`'s children are placed in, in root space.
    pub fn world_origin(&self, id: NodeId) -> LexvisResult<Point> {
        let node = self.node(id)?;
        let own = match &node.kind {
            NodeKind::Rect(_) => self.local_bounds(id)?.center(),
            _ => self.position(id)?,
        };
        Ok(self.frame_origin(node.parent)? + own.to_vec2())
    }

    fn frame_origin(&self, parent: Option<NodeId>) -> LexvisResult<Point> {
        match parent {
            None => Ok(Point::ORIGIN),
            Some(p) => self.world_origin(p),
        }
    }

    /// Cubic geometry of a curve node, in its parent's space.
    pub fn curve(&self, id: NodeId) -> LexvisResult<CubicBez> {
        let node = self.node(id)?;
        let NodeKind::Curve(curve) = &node.kind else {
            return Err(kind_error(id, "curve"));
        };
        let frame = self.frame_origin(node.parent)?.to_vec2();
        let resolve = |e: &Endpoint| -> LexvisResult<Point> {
            match e {
                Endpoint::Fixed(p) => Ok(*p),
                Endpoint::BottomOf(n) => Ok(bottom_center(self.world_bounds(*n)?) - frame),
                Endpoint::TopOf(n) => Ok(top_center(self.world_bounds(*n)?) - frame),
            }
        };
        let p0 = resolve(&curve.p0)?;
        let p3 = resolve(&curve.p3)?;
        let (p1, p2) = s_curve_controls(p0, p3);
        Ok(CubicBez::new(p0, p1, p2, p3))
    }

    /// Read an animatable property.
    pub fn get(&self, prop: Prop) -> LexvisResult<f64> {
        let id = prop.node();
        let node = self.node(id)?;
        match (prop, &node.kind) {
            (Prop::Opacity(_), _) => Ok(node.opacity),
            (Prop::Progress(_), NodeKind::Rect(r)) => Ok(r.progress),
            (Prop::Progress(_), NodeKind::Curve(c)) => Ok(c.progress),
            (Prop::SelectionStart(_), NodeKind::Code(c)) => Ok(c.selection.start),
            (Prop::SelectionEnd(_), NodeKind::Code(c)) => Ok(c.selection.end),
            (Prop::FontSize(_), NodeKind::Code(c)) => Ok(c.style.font_size),
            (Prop::FontSize(_), NodeKind::Text(t)) => Ok(t.style.font_size),
            (Prop::LetterSpacing(_), NodeKind::Code(c)) => Ok(c.style.letter_spacing),
            (Prop::LetterSpacing(_), NodeKind::Text(t)) => Ok(t.style.letter_spacing),
            (Prop::X(_), _) => self.fixed_placement(id).map(|p| p.x),
            (Prop::Y(_), _) => self.fixed_placement(id).map(|p| p.y),
            (prop, _) => Err(LexvisError::animation(format!(
                "{prop:?} is not defined for this node kind"
            ))),
        }
    }

    /// Write an animatable property.
    pub fn set(&mut self, prop: Prop, v: f64) -> LexvisResult<()> {
        let node = self.node_mut(prop.node())?;
        match (prop, &mut node.kind) {
            (Prop::Opacity(_), _) => node.opacity = v,
            (Prop::Progress(_), NodeKind::Rect(r)) => r.progress = v,
            (Prop::Progress(_), NodeKind::Curve(c)) => c.progress = v,
            (Prop::SelectionStart(_), NodeKind::Code(c)) => c.selection.start = v,
            (Prop::SelectionEnd(_), NodeKind::Code(c)) => c.selection.end = v,
            (Prop::FontSize(_), NodeKind::Code(c)) => c.style.font_size = v,
            (Prop::FontSize(_), NodeKind::Text(t)) => t.style.font_size = v,
            (Prop::LetterSpacing(_), NodeKind::Code(c)) => c.style.letter_spacing = v,
            (Prop::LetterSpacing(_), NodeKind::Text(t)) => t.style.letter_spacing = v,
            (Prop::X(_) | Prop::Y(_), _) => {
                let Placement::Fixed(p) = &mut node.placement else {
                    return Err(LexvisError::animation(format!(
                        "{prop:?} needs a fixed placement"
                    )));
                };
                if matches!(prop, Prop::X(_)) {
                    p.x = v;
                } else {
                    p.y = v;
                }
            }
            (prop, _) => {
                return Err(LexvisError::animation(format!(
                    "{prop:?} is not defined for this node kind"
                )));
            }
        }
        Ok(())
    }

    fn fixed_placement(&self, id: NodeId) -> LexvisResult<Point> {
        match self.node(id)?.placement {
            Placement::Fixed(p) => Ok(p),
            Placement::CurveMidpoint(_) => Err(LexvisError::animation(format!(
                "node {} does not have a fixed placement",
                id.0
            ))),
        }
    }

    pub(crate) fn code(&self, id: NodeId) -> LexvisResult<&node::CodeNode> {
        match &self.node(id)?.kind {
            NodeKind::Code(c) => Ok(c),
            _ => Err(kind_error(id, "code")),
        }
    }

    pub(crate) fn code_mut(&mut self, id: NodeId) -> LexvisResult<&mut node::CodeNode> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Code(c) => Ok(c),
            _ => Err(kind_error(id, "code")),
        }
    }
}

fn kind_error(id: NodeId, want: &str) -> LexvisError {
    LexvisError::animation(format!("node {} is not a {want} node", id.0))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
