//! Syntax-tree layout: boxes joined by labelled connectors.
//!
//! Joins are a pure function of the node list and the edge list and are rebuilt in full whenever
//! either changes. Any manual tweak to a previous join (a hidden label, a dimmed connector) is
//! lost on rebuild.

use std::collections::HashSet;

use crate::{
    animation::task::{All, BoxTask, Lazy, Task, all, lazy, sequence, tween},
    components::bezier::{Connector, ConnectorStyle},
    foundation::{
        color::Color,
        core::Point,
        error::{LexvisError, LexvisResult},
    },
    scene::{
        Prop, Scene,
        measure::TextStyle,
        node::{Endpoint, Node, NodeId, NodeKind, Placement, TextContent, TextNode},
    },
};

/// Opacity of elements pushed to the background by a focus operation.
pub const DIM_OPACITY: f64 = 0.25;
/// Pause between the steps of [`TreeGraph::reveal_edge`] unless overridden.
pub const DEFAULT_REVEAL_DELAY: f64 = 0.25;

const LABEL_FILL: Color = Color::rgb(0xff, 0xf6, 0xed);
const LABEL_FONT_SIZE: f64 = 32.0;

/// Text or node shown at the middle of an edge.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeLabel {
    /// No label; an empty group stands in so every join has four parts.
    None,
    /// Bold text created by the graph.
    Text(String),
    /// Caller-owned node, moved to track the edge midpoint.
    Node(NodeId),
}

impl From<&str> for EdgeLabel {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// Edge between two entries of the node list.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    /// Index of the parent node.
    pub from: usize,
    /// Index of the child node.
    pub to: usize,
    /// Label at the edge midpoint.
    pub label: EdgeLabel,
}

impl Edge {
    /// Edge with a text label.
    pub fn new(from: usize, to: usize, label: impl Into<EdgeLabel>) -> Self {
        Self {
            from,
            to,
            label: label.into(),
        }
    }

    /// Edge without a label.
    pub fn bare(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            label: EdgeLabel::None,
        }
    }
}

/// Scene elements realizing one [`Edge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Join {
    /// Source node.
    pub from: NodeId,
    /// Target node.
    pub to: NodeId,
    /// Curve from the bottom of `from` to the top of `to`.
    pub connector: Connector,
    /// Label node.
    pub label: NodeId,
    owns_label: bool,
}

impl Join {
    /// The four parts, in `from`, `to`, connector, label order.
    pub fn components(&self) -> [NodeId; 4] {
        [self.from, self.to, self.connector.id(), self.label]
    }
}

/// Graph of boxes and connectors under a container group.
#[derive(Clone, Debug)]
pub struct TreeGraph {
    id: NodeId,
    nodes: Vec<NodeId>,
    edges: Vec<Edge>,
    joins: Vec<Join>,
}

impl TreeGraph {
    /// Create the graph container at `at` and build its joins.
    ///
    /// The nodes are moved into the container, keeping their local placement.
    pub fn new(
        scene: &mut Scene,
        parent: NodeId,
        at: impl Into<Point>,
        nodes: Vec<NodeId>,
        edges: Vec<Edge>,
    ) -> LexvisResult<Self> {
        validate(scene, parent, &nodes, &edges)?;
        let id = scene.add(parent, Node::group().at(at))?;
        let mut graph = Self {
            id,
            nodes: Vec::new(),
            edges: Vec::new(),
            joins: Vec::new(),
        };
        graph.set_graph(scene, nodes, edges)?;
        Ok(graph)
    }

    /// Container group.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Node list.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Edge list.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Joins; `joins()[i]` realizes `edges()[i]`.
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Replace the node list, keeping the edges.
    pub fn set_nodes(&mut self, scene: &mut Scene, nodes: Vec<NodeId>) -> LexvisResult<()> {
        let edges = self.edges.clone();
        self.set_graph(scene, nodes, edges)
    }

    /// Replace the edge list, keeping the nodes.
    pub fn set_edges(&mut self, scene: &mut Scene, edges: Vec<Edge>) -> LexvisResult<()> {
        let nodes = self.nodes.clone();
        self.set_graph(scene, nodes, edges)
    }

    /// Replace both lists and rebuild every join.
    ///
    /// Nothing is touched when an edge refers to a missing node.
    #[tracing::instrument(skip_all, fields(nodes = nodes.len(), edges = edges.len()))]
    pub fn set_graph(
        &mut self,
        scene: &mut Scene,
        nodes: Vec<NodeId>,
        edges: Vec<Edge>,
    ) -> LexvisResult<()> {
        validate(scene, self.id, &nodes, &edges)?;

        for join in std::mem::take(&mut self.joins) {
            if join.owns_label {
                scene.remove(join.label)?;
            } else if scene.contains(join.label) {
                // Freeze caller labels where they are; their curve is about to go away.
                let at = scene.position(join.label)?;
                scene.node_mut(join.label)?.placement = Placement::Fixed(at);
                scene.detach(join.label)?;
            }
            scene.remove(join.connector.id())?;
        }
        for old in &self.nodes {
            if !nodes.contains(old) && scene.contains(*old) {
                scene.detach(*old)?;
            }
        }
        for node in &nodes {
            scene.attach(*node, self.id)?;
        }

        let mut joins = Vec::with_capacity(edges.len());
        for edge in &edges {
            joins.push(self.build_join(scene, &nodes, edge)?);
        }

        self.nodes = nodes;
        self.edges = edges;
        self.joins = joins;
        tracing::debug!(joins = self.joins.len(), "graph rebuilt");
        Ok(())
    }

    fn build_join(&self, scene: &mut Scene, nodes: &[NodeId], edge: &Edge) -> LexvisResult<Join> {
        let (from, to) = (nodes[edge.from], nodes[edge.to]);
        let connector = Connector::between(
            scene,
            self.id,
            Endpoint::BottomOf(from),
            Endpoint::TopOf(to),
            ConnectorStyle::GRAPH,
        )?;
        let midpoint = Placement::CurveMidpoint(connector.id());

        let (label, owns_label) = match &edge.label {
            EdgeLabel::None => (scene.add(self.id, Node::group().placed(midpoint))?, true),
            EdgeLabel::Text(text) => {
                let text = TextNode {
                    content: TextContent::Literal(text.clone()),
                    style: TextStyle::label(LABEL_FONT_SIZE),
                    fill: LABEL_FILL,
                };
                let id = scene.add(self.id, Node::new(NodeKind::Text(text)).placed(midpoint))?;
                (id, true)
            }
            EdgeLabel::Node(id) => {
                scene.attach(*id, self.id)?;
                scene.node_mut(*id)?.placement = midpoint;
                (*id, false)
            }
        };

        Ok(Join {
            from,
            to,
            connector,
            label,
            owns_label,
        })
    }

    fn join(&self, index: usize) -> LexvisResult<Join> {
        self.joins.get(index).copied().ok_or_else(|| {
            LexvisError::graph(format!(
                "edge index {index} out of range ({} edges)",
                self.joins.len()
            ))
        })
    }

    /// Draw edge `index` and fade in its label, then its target node.
    ///
    /// When the source node is fully transparent at the moment the task starts it is faded in
    /// first. Consecutive steps are separated by `delay`.
    pub fn reveal_edge(&self, index: usize, duration: f64, delay: f64) -> LexvisResult<DeferredTask> {
        let join = self.join(index)?;
        let build: DeferredBuild = Box::new(move |scene: &mut Scene| -> LexvisResult<_> {
            let mut steps: Vec<BoxTask<'static>> = Vec::with_capacity(3);
            if scene.get(Prop::Opacity(join.from))? == 0.0 {
                steps.push(tween(Prop::Opacity(join.from), 1.0, duration).boxed());
            }
            steps.push(
                all(vec![
                    join.connector.reveal(duration).boxed(),
                    tween(Prop::Opacity(join.label), 1.0, duration).boxed(),
                ])
                .boxed(),
            );
            steps.push(tween(Prop::Opacity(join.to), 1.0, duration).boxed());
            tracing::debug!(from = join.from.0, to = join.to.0, "revealing edge");
            Ok(sequence(delay, steps).boxed())
        });
        Ok(lazy(build))
    }

    /// Dim everything except node `index`, which is brought to full opacity.
    pub fn focus_node(&self, index: usize, duration: f64) -> LexvisResult<DeferredTask> {
        let target = *self.nodes.get(index).ok_or_else(|| {
            LexvisError::graph(format!(
                "node index {index} out of range ({} nodes)",
                self.nodes.len()
            ))
        })?;
        let others = dedup(
            self.nodes
                .iter()
                .copied()
                .chain(self.joins.iter().flat_map(|j| j.components())),
            &[target],
        );
        Ok(focus(others, vec![target], duration))
    }

    /// Dim the parts of every other edge; the four parts of edge `index` go to full opacity.
    pub fn focus_edge(&self, index: usize, duration: f64) -> LexvisResult<DeferredTask> {
        let target = self.join(index)?.components();
        let others = dedup(
            self.joins
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .flat_map(|(_, j)| j.components()),
            &target,
        );
        Ok(focus(others, target.to_vec(), duration))
    }

    /// Bring every node and edge part back to full opacity.
    pub fn clear_focus(&self, duration: f64) -> All<'static> {
        let everything = dedup(
            self.nodes
                .iter()
                .copied()
                .chain(self.joins.iter().flat_map(|j| j.components())),
            &[],
        );
        all(everything
            .into_iter()
            .map(|id| tween(Prop::Opacity(id), 1.0, duration).boxed())
            .collect())
    }

    /// Put every join in its unrevealed state: nodes and labels transparent, connectors undrawn.
    pub fn hide_all(&self, scene: &mut Scene) -> LexvisResult<()> {
        for node in &self.nodes {
            scene.set(Prop::Opacity(*node), 0.0)?;
        }
        for join in &self.joins {
            scene.set(Prop::Opacity(join.label), 0.0)?;
            join.connector.set_progress(scene, 0.0)?;
        }
        Ok(())
    }
}

/// Builds a graph animation from the scene state at its first step.
pub type DeferredBuild = Box<dyn FnOnce(&mut Scene) -> LexvisResult<BoxTask<'static>>>;
/// Graph animation whose targets are decided when it starts; see [`TreeGraph::reveal_edge`],
/// [`TreeGraph::focus_node`] and [`TreeGraph::focus_edge`].
pub type DeferredTask = Lazy<'static, DeferredBuild>;

// `container` is where nodes and caller labels end up; it must not sit inside any of them.
fn validate(
    scene: &Scene,
    container: NodeId,
    nodes: &[NodeId],
    edges: &[Edge],
) -> LexvisResult<()> {
    for (i, node) in nodes.iter().enumerate() {
        if !scene.contains(*node) {
            return Err(LexvisError::graph(format!(
                "node {i} refers to a removed scene node"
            )));
        }
        if scene.is_within(container, *node)? {
            return Err(LexvisError::graph(format!(
                "node {i} contains the graph container"
            )));
        }
    }
    for (i, edge) in edges.iter().enumerate() {
        for (end, idx) in [("from", edge.from), ("to", edge.to)] {
            if idx >= nodes.len() {
                return Err(LexvisError::graph(format!(
                    "edge {i}: {end} index {idx} out of range ({} nodes)",
                    nodes.len()
                )));
            }
        }
        if let EdgeLabel::Node(id) = edge.label {
            if !scene.contains(id) {
                return Err(LexvisError::graph(format!(
                    "edge {i}: label refers to a removed scene node"
                )));
            }
            if scene.is_within(container, id)? {
                return Err(LexvisError::graph(format!(
                    "edge {i}: label contains the graph container"
                )));
            }
        }
    }
    Ok(())
}

fn dedup(ids: impl Iterator<Item = NodeId>, exclude: &[NodeId]) -> Vec<NodeId> {
    let mut seen: HashSet<NodeId> = exclude.iter().copied().collect();
    ids.filter(|id| seen.insert(*id)).collect()
}

// Opacities are read when the task starts: hidden parts stay hidden.
fn focus(dim: Vec<NodeId>, raise: Vec<NodeId>, duration: f64) -> DeferredTask {
    let build: DeferredBuild = Box::new(move |scene: &mut Scene| -> LexvisResult<_> {
        let mut tasks: Vec<BoxTask<'static>> = Vec::with_capacity(dim.len() + raise.len());
        for id in dim {
            if scene.get(Prop::Opacity(id))? != 0.0 {
                tasks.push(tween(Prop::Opacity(id), DIM_OPACITY, duration).boxed());
            }
        }
        for id in raise {
            tasks.push(tween(Prop::Opacity(id), 1.0, duration).boxed());
        }
        Ok(all(tasks).boxed())
    });
    lazy(build)
}

#[cfg(test)]
#[path = "../../tests/unit/components/tree_graph.rs"]
mod tests;
