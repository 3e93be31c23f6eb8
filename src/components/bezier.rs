use crate::{
    animation::task::{Tween, tween},
    foundation::{
        color::Color,
        core::{CubicBez, Point, Rect, Size},
        error::{LexvisError, LexvisResult},
        math::bbox_around,
    },
    scene::{
        Prop, Scene,
        node::{CurveNode, Endpoint, Node, NodeId, NodeKind, Stroke},
    },
};

/// Side of the square drawn on each control point in debug mode.
pub const DEBUG_MARKER_SIZE: f64 = 15.0;

/// Line style of a [`Connector`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorStyle {
    /// Stroke color and width.
    pub stroke: Stroke,
    /// Control-point marker color; `None` hides the markers.
    pub debug: Option<Color>,
}

impl ConnectorStyle {
    /// Edges inside a [`TreeGraph`](crate::components::tree_graph::TreeGraph).
    pub const GRAPH: Self = Self {
        stroke: Stroke {
            color: Color::rgb(0x3e, 0x1c, 0x96),
            width: 10.0,
        },
        debug: None,
    };

    /// Standalone joins from a fixed point to a box.
    pub const JOIN: Self = Self {
        stroke: Stroke {
            color: Color::WHITE,
            width: 10.0,
        },
        debug: None,
    };

    /// Same style with red control-point markers.
    pub fn with_debug(self) -> Self {
        Self {
            debug: Some(Color::rgb(0xff, 0, 0)),
            ..self
        }
    }
}

/// S-shaped cubic curve between two live anchors.
///
/// Only the endpoints are stored; the inner control points are derived from them on every
/// query, so a connector follows the boxes it joins as they move or resize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connector {
    id: NodeId,
}

impl Connector {
    /// Add a fully drawn connector from `p0` to `p3` under `parent`.
    pub fn between(
        scene: &mut Scene,
        parent: NodeId,
        p0: Endpoint,
        p3: Endpoint,
        style: ConnectorStyle,
    ) -> LexvisResult<Self> {
        let id = scene.add(
            parent,
            Node::new(NodeKind::Curve(CurveNode {
                p0,
                p3,
                stroke: style.stroke,
                progress: 1.0,
                debug: style.debug,
            })),
        )?;
        Ok(Self { id })
    }

    /// Wrap an existing curve node.
    pub fn from_node(scene: &Scene, id: NodeId) -> LexvisResult<Self> {
        match scene.node(id)?.kind {
            NodeKind::Curve(_) => Ok(Self { id }),
            _ => Err(LexvisError::validation(format!(
                "node {} is not a curve",
                id.0
            ))),
        }
    }

    /// Curve node.
    pub fn id(self) -> NodeId {
        self.id
    }

    /// Current geometry in the parent's space.
    pub fn geometry(self, scene: &Scene) -> LexvisResult<CubicBez> {
        scene.curve(self.id)
    }

    /// Midpoint between the endpoints; edge labels sit here.
    pub fn midpoint(self, scene: &Scene) -> LexvisResult<Point> {
        let c = self.geometry(scene)?;
        Ok(c.p0.midpoint(c.p3))
    }

    /// Drawn fraction.
    pub fn progress(self, scene: &Scene) -> LexvisResult<f64> {
        scene.get(Prop::Progress(self.id))
    }

    /// Set the drawn fraction.
    pub fn set_progress(self, scene: &mut Scene, progress: f64) -> LexvisResult<()> {
        scene.set(Prop::Progress(self.id), progress)
    }

    /// Draw the curve from its current progress to the end.
    pub fn reveal(self, duration: f64) -> Tween {
        tween(Prop::Progress(self.id), 1.0, duration)
    }

    /// Toggle control-point markers.
    pub fn set_debug(self, scene: &mut Scene, debug: Option<Color>) -> LexvisResult<()> {
        match &mut scene.node_mut(self.id)?.kind {
            NodeKind::Curve(c) => {
                c.debug = debug;
                Ok(())
            }
            _ => Err(LexvisError::animation(format!(
                "node {} is not a curve",
                self.id.0
            ))),
        }
    }

    /// Squares drawn over `p0`, `p1`, `p2`, `p3` in debug mode.
    pub fn debug_markers(self, scene: &Scene) -> LexvisResult<[Rect; 4]> {
        let c = self.geometry(scene)?;
        let size = Size::new(DEBUG_MARKER_SIZE, DEBUG_MARKER_SIZE);
        Ok([c.p0, c.p1, c.p2, c.p3].map(|p| bbox_around(p, size)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/components/bezier.rs"]
mod tests;
