use crate::{
    components::bezier::{Connector, ConnectorStyle},
    foundation::{
        color::{CodeColor, Color},
        core::{Point, Size},
        error::{LexvisError, LexvisResult},
    },
    scene::{
        Scene,
        measure::TextStyle,
        node::{
            Endpoint, Node, NodeId, NodeKind, Placement, RectNode, RectShape, Stroke, TextContent,
            TextNode,
        },
    },
};

/// Margin added around the label of a syntax-tree node.
pub const TREE_NODE_PAD: Size = Size::new(50.0, 25.0);
/// Margin added around the label of a token box.
pub const TOKEN_BOX_PAD: Size = Size::new(3.0, 0.0);

const TREE_NODE_FILL: Color = Color::rgb(0xff, 0x86, 0x37);
const OUTLINE: Stroke = Stroke {
    color: Color::rgb(0x4d, 0x4d, 0x4d),
    width: 3.0,
};

/// Rounded box sized from its label.
///
/// The box never drives the label: changing the text resizes the box on the next query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxNode {
    id: NodeId,
    label: NodeId,
}

impl BoxNode {
    /// Orange syntax-tree node with a bold label.
    pub fn tree_node(
        scene: &mut Scene,
        parent: NodeId,
        text: impl Into<String>,
        style: TextStyle,
        at: impl Into<Point>,
    ) -> LexvisResult<Self> {
        Self::build(
            scene,
            parent,
            at.into(),
            TREE_NODE_PAD,
            TREE_NODE_FILL,
            TextNode {
                content: TextContent::Literal(text.into()),
                style,
                fill: Color::WHITE,
            },
            0.0,
        )
    }

    /// Token box colored like a code highlight.
    pub fn token_box(
        scene: &mut Scene,
        parent: NodeId,
        text: impl Into<String>,
        color: CodeColor,
        style: TextStyle,
        at: impl Into<Point>,
    ) -> LexvisResult<Self> {
        Self::build(
            scene,
            parent,
            at.into(),
            TOKEN_BOX_PAD,
            color.background(),
            TextNode {
                content: TextContent::Literal(text.into()),
                style,
                fill: color.text(),
            },
            -4.0,
        )
    }

    fn build(
        scene: &mut Scene,
        parent: NodeId,
        at: Point,
        pad: Size,
        fill: Color,
        label: TextNode,
        label_y: f64,
    ) -> LexvisResult<Self> {
        let id = scene.add(parent, Node::group().at(at))?;
        let label = scene.add(id, Node::new(NodeKind::Text(label)).at((0.0, label_y)))?;
        scene.node_mut(id)?.kind = NodeKind::Rect(RectNode {
            shape: RectShape::FitLabel { label, pad },
            fill: Some(fill),
            stroke: Some(OUTLINE),
            radius: 12.0,
            progress: 1.0,
        });
        Ok(Self { id, label })
    }

    /// Turn an existing rectangle into a box sized from its first text child.
    ///
    /// The rectangle keeps its current center. Used to reuse stamped highlights as graph nodes.
    pub fn adopt(scene: &mut Scene, id: NodeId, pad: Size) -> LexvisResult<Self> {
        let node = scene.node(id)?;
        if !matches!(node.kind, NodeKind::Rect(_)) {
            return Err(LexvisError::validation(format!(
                "node {} is not a rectangle",
                id.0
            )));
        }
        let label = node
            .children()
            .iter()
            .copied()
            .find(|c| matches!(scene.node(*c).map(|n| &n.kind), Ok(NodeKind::Text(_))))
            .ok_or_else(|| {
                LexvisError::validation(format!("node {} has no text child to adopt", id.0))
            })?;

        let center = scene.local_bounds(id)?.center();
        let node = scene.node_mut(id)?;
        node.placement = Placement::Fixed(center);
        if let NodeKind::Rect(r) = &mut node.kind {
            r.shape = RectShape::FitLabel { label, pad };
        }
        Ok(Self { id, label })
    }

    /// Box node.
    pub fn id(self) -> NodeId {
        self.id
    }

    /// Label node.
    pub fn label(self) -> NodeId {
        self.label
    }

    /// Current label text.
    pub fn text(self, scene: &Scene) -> LexvisResult<String> {
        scene.text(self.label)
    }

    /// Replace the label text.
    pub fn set_text(self, scene: &mut Scene, text: impl Into<String>) -> LexvisResult<()> {
        let style = scene.text_style(self.label)?;
        match &mut scene.node_mut(self.label)?.kind {
            NodeKind::Text(t) => {
                t.content = TextContent::Literal(text.into());
                t.style = style;
                Ok(())
            }
            _ => Err(LexvisError::animation(format!(
                "node {} is not a text node",
                self.label.0
            ))),
        }
    }

    /// Recolor the box and its label from the highlight palette.
    pub fn set_color(self, scene: &mut Scene, color: CodeColor) -> LexvisResult<()> {
        if let NodeKind::Rect(r) = &mut scene.node_mut(self.id)?.kind {
            r.fill = Some(color.background());
        }
        if let NodeKind::Text(t) = &mut scene.node_mut(self.label)?.kind {
            t.fill = color.text();
        }
        Ok(())
    }

    /// Current box size.
    pub fn size(self, scene: &Scene) -> LexvisResult<Size> {
        Ok(scene.local_bounds(self.id)?.size())
    }

    /// White connector from `point` (in `parent` space) to the top of this box.
    pub fn join_to_point(
        self,
        scene: &mut Scene,
        parent: NodeId,
        point: impl Into<Point>,
    ) -> LexvisResult<Connector> {
        Connector::between(
            scene,
            parent,
            Endpoint::Fixed(point.into()),
            Endpoint::TopOf(self.id),
            ConnectorStyle::JOIN,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/components/box_node.rs"]
mod tests;
