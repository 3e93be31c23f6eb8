//! Built-in storyboards and the drivers that turn them into frames.
//!
//! A storyboard builds its scene, then plays tasks on a [`Timeline`] that reports every frame to
//! a callback. [`render_frame`] and [`render_video`] plug a rasterizer into that callback.

use serde::{Deserialize, Serialize};

use crate::{
    animation::{
        ease::Ease,
        task::{BoxTask, Task, all, run_to_end, sequence, tween},
        timeline::Timeline,
    },
    components::{
        box_node::BoxNode,
        code::CodeView,
        tokenizer::{AnimatedToken, TokenList, TokenOffset, TokenStreamPlayer},
        tree_graph::{DEFAULT_REVEAL_DELAY, Edge, TreeGraph},
    },
    encode::sink::{FrameSink, SinkConfig},
    foundation::{
        color::CodeColor,
        core::{Fps, FrameIndex, Point},
        error::{LexvisError, LexvisResult},
    },
    render::{
        RenderSettings,
        raster::{FrameRGBA, Rasterizer},
        svg::scene_to_svg,
    },
    scene::{Prop, Scene, measure::TextStyle, node::NodeId},
};

/// The example program both storyboards explain, flattened onto one line.
pub const EXAMPLE_CODE: &str = r#"if "Hi": output = True else: output = False"#;

const CODE_FONT_SIZE: f64 = 40.0;
const NODE_FONT_SIZE: f64 = 40.0;
const TOKEN_FONT_SIZE: f64 = 32.0;
const TOKEN_BOX_DROP: f64 = 40.0;

/// Syntax tree of [`EXAMPLE_CODE`].
const PARSER_GRAPH: &str = r#"{
    "nodes": [
        { "label": "Conditional", "x": 0, "y": -270 },
        { "label": "Literal(\"Hi\")", "x": -400, "y": 0 },
        { "label": "VarDecl", "x": 0, "y": 0 },
        { "label": "VarDecl", "x": 400, "y": 0 },
        { "label": "output", "x": -200, "y": 270 },
        { "label": "Literal(True)", "x": 250, "y": 270 }
    ],
    "edges": [
        [0, 1, "test"],
        [0, 2, "body"],
        [0, 3, "otherwise"],
        [2, 4, "var"],
        [2, 5, "expr"]
    ]
}"#;

// Letters of EXAMPLE_CODE each parse-tree edge points at.
const EDGE_SPANS: [(f64, f64); 5] = [
    (3.0, 7.0),
    (9.0, 22.0),
    (23.0, 43.0),
    (9.0, 15.0),
    (18.0, 22.0),
];

/// Token stream of [`EXAMPLE_CODE`], slowing down less and less as it goes.
pub fn example_tokens() -> Vec<AnimatedToken> {
    use CodeColor::*;
    [
        ((0, 2), 1.0, Blue),
        ((1, 4), 0.5, Green),
        ((0, 1), 0.4, White),
        ((1, 6), 0.35, Cyan),
        ((1, 1), 0.3, Green),
        ((1, 4), 0.3, Orange),
        ((1, 4), 0.25, Blue),
        ((0, 1), 0.25, White),
        ((1, 6), 0.25, Cyan),
        ((1, 1), 0.2, Green),
        ((1, 5), 0.2, Orange),
    ]
    .into_iter()
    .map(|((gap, len), d, color)| AnimatedToken(TokenOffset(gap, len), d, color))
    .collect()
}

/// Built-in storyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Demo {
    /// The lexer walks the example code and drops a box under every token.
    Tokens,
    /// The parse tree of the example code is revealed edge by edge.
    Parser,
}

impl Demo {
    /// Every storyboard.
    pub const ALL: [Self; 2] = [Self::Tokens, Self::Parser];

    /// Name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Tokens => "tokens",
            Self::Parser => "parser",
        }
    }
}

impl std::str::FromStr for Demo {
    type Err = LexvisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| LexvisError::validation(format!("unknown demo '{s}'")))
    }
}

/// Play `demo` from the start, calling `on_frame` with every emitted frame.
///
/// Returns the number of frames emitted.
#[tracing::instrument(skip(on_frame), fields(demo = demo.name()))]
pub fn play<F>(demo: Demo, fps: Fps, on_frame: &mut F) -> LexvisResult<u64>
where
    F: FnMut(&Scene, FrameIndex) -> LexvisResult<()>,
{
    let mut scene = Scene::default();
    let mut timeline = Timeline::new(fps);
    match demo {
        Demo::Tokens => tokens_storyboard(&mut scene, &mut timeline, on_frame)?,
        Demo::Parser => parser_storyboard(&mut scene, &mut timeline, on_frame)?,
    }
    tracing::info!(frames = timeline.frame().0, "storyboard finished");
    Ok(timeline.frame().0)
}

/// Rasterize the frame of `demo` showing time `secs`.
///
/// Times past the end show the last frame.
pub fn render_frame(
    demo: Demo,
    settings: &RenderSettings,
    rasterizer: &Rasterizer,
    secs: f64,
) -> LexvisResult<FrameRGBA> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(LexvisError::validation(format!(
            "frame time must be a non-negative number of seconds, got {secs}"
        )));
    }
    let target = (secs * settings.fps.as_f64()).floor() as u64;
    let mut svg = None;
    play(demo, settings.fps, &mut |scene: &Scene, idx: FrameIndex| {
        if idx.0 <= target {
            svg = Some(scene_to_svg(scene, settings.canvas, settings.background)?);
        }
        Ok(())
    })?;
    let svg = svg.ok_or_else(|| LexvisError::render("storyboard emitted no frames"))?;
    rasterizer.rasterize(&svg)
}

/// Render every frame of `demo` into `sink`; returns the frame count.
pub fn render_video(
    demo: Demo,
    settings: &RenderSettings,
    rasterizer: &Rasterizer,
    sink: &mut dyn FrameSink,
) -> LexvisResult<u64> {
    sink.begin(SinkConfig {
        width: settings.canvas.width,
        height: settings.canvas.height,
        fps: settings.fps,
    })?;
    let frames = play(demo, settings.fps, &mut |scene: &Scene, idx: FrameIndex| {
        let frame = rasterizer.render_scene(scene, settings)?;
        sink.push_frame(idx, &frame)
    })?;
    sink.end()?;
    Ok(frames)
}

fn code_style() -> TextStyle {
    TextStyle {
        font_size: CODE_FONT_SIZE,
        ..TextStyle::default()
    }
}

fn hold_for<F>(
    timeline: &mut Timeline,
    scene: &Scene,
    secs: f64,
    on_frame: &mut F,
) -> LexvisResult<()>
where
    F: FnMut(&Scene, FrameIndex) -> LexvisResult<()>,
{
    let frames = timeline.fps().secs_to_frames_ceil(secs);
    timeline.hold(scene, frames, on_frame)
}

fn tokens_storyboard<F>(
    scene: &mut Scene,
    timeline: &mut Timeline,
    on_frame: &mut F,
) -> LexvisResult<()>
where
    F: FnMut(&Scene, FrameIndex) -> LexvisResult<()>,
{
    let root = scene.root();
    let view = CodeView::new(scene, root, EXAMPLE_CODE, code_style(), (0.0, -300.0))?;
    hold_for(timeline, scene, 0.5, on_frame)?;

    let mut player = TokenStreamPlayer::new(view);
    let mut lexing = player.tokenize_animated(example_tokens());
    timeline.play(scene, &mut lexing, on_frame)?;
    let tokens = lexing.into_tokens();

    // One box per token, alternating rows so neighbours do not overlap.
    let code_bottom = scene.world_bounds(view.id())?.y1;
    let mut reveals: Vec<BoxTask<'static>> = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let x = scene.world_bounds(token.container)?.center().x;
        let y = if i % 2 == 0 { -100.0 } else { 0.0 };
        let text = token.content(scene)?;
        // Boxes start a little high and settle into their row as they fade in.
        let node = BoxNode::token_box(
            scene,
            root,
            text,
            token.color,
            TextStyle::label(TOKEN_FONT_SIZE),
            (x, y - TOKEN_BOX_DROP),
        )?;
        scene.set(Prop::Opacity(node.id()), 0.0)?;
        let join = node.join_to_point(scene, root, (x, code_bottom + 10.0))?;
        join.set_progress(scene, 0.0)?;
        let settle = all(vec![
            tween(Prop::Opacity(node.id()), 1.0, 1.0)
                .with_ease(Ease::OutQuad)
                .boxed(),
            tween(Prop::Y(node.id()), y, 1.0)
                .with_ease(Ease::InOutCubic)
                .boxed(),
        ]);
        reveals.push(sequence(0.25, vec![join.reveal(1.0).boxed(), settle.boxed()]).boxed());
    }
    timeline.play(scene, sequence(0.5, reveals), on_frame)?;
    hold_for(timeline, scene, 1.0, on_frame)
}

fn parser_storyboard<F>(
    scene: &mut Scene,
    timeline: &mut Timeline,
    on_frame: &mut F,
) -> LexvisResult<()>
where
    F: FnMut(&Scene, FrameIndex) -> LexvisResult<()>,
{
    let root = scene.root();
    let view = CodeView::new(scene, root, EXAMPLE_CODE, code_style(), (0.0, -420.0))?;
    let graph = GraphDef::from_json(PARSER_GRAPH)?.build(scene, root, (200.0, 100.0))?;
    graph.hide_all(scene)?;
    hold_for(timeline, scene, 0.5, on_frame)?;

    timeline.play(
        scene,
        all(vec![
            graph.focus_node(0, 1.0)?.boxed(),
            view.animate_selection(0.0, 2.0, 1.0).boxed(),
        ]),
        on_frame,
    )?;

    for (i, (start, end)) in EDGE_SPANS.into_iter().enumerate() {
        hold_for(timeline, scene, 0.5, on_frame)?;
        timeline.play(
            scene,
            all(vec![
                graph.reveal_edge(i, 1.0, DEFAULT_REVEAL_DELAY)?.boxed(),
                graph.focus_edge(i, 1.0)?.boxed(),
                view.animate_selection(start, end, 1.0).boxed(),
            ]),
            on_frame,
        )?;
    }

    hold_for(timeline, scene, 0.5, on_frame)?;
    timeline.play(
        scene,
        all(vec![
            graph.clear_focus(1.0).boxed(),
            view.animate_selection(0.0, 0.0, 1.0).boxed(),
        ]),
        on_frame,
    )?;
    hold_for(timeline, scene, 1.0, on_frame)
}

/// One box of a [`GraphDef`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    /// Box label.
    pub label: String,
    /// X relative to the graph origin.
    #[serde(default)]
    pub x: f64,
    /// Y relative to the graph origin.
    #[serde(default)]
    pub y: f64,
}

/// `[from, to]` or `[from, to, label]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeDef {
    /// Edge with a text caption.
    Labeled(usize, usize, String),
    /// Edge without a caption.
    Bare(usize, usize),
}

/// Tree graph written as JSON: `{"nodes": [{"label", "x", "y"}], "edges": [[from, to, label?]]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphDef {
    /// Boxes, addressed by position.
    pub nodes: Vec<NodeDef>,
    /// Connectors between boxes.
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
}

impl GraphDef {
    /// Parse a graph definition.
    pub fn from_json(s: &str) -> LexvisResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| LexvisError::validation(format!("invalid graph definition: {e}")))
    }

    /// Create the boxes and the graph joining them under `parent`.
    ///
    /// Edge indices are checked before anything is added to the scene.
    pub fn build(
        &self,
        scene: &mut Scene,
        parent: NodeId,
        at: impl Into<Point>,
    ) -> LexvisResult<TreeGraph> {
        let edges: Vec<Edge> = self
            .edges
            .iter()
            .map(|e| match e {
                EdgeDef::Labeled(from, to, label) => Edge::new(*from, *to, label.as_str()),
                EdgeDef::Bare(from, to) => Edge::bare(*from, *to),
            })
            .collect();
        for (i, e) in edges.iter().enumerate() {
            if e.from >= self.nodes.len() || e.to >= self.nodes.len() {
                return Err(LexvisError::graph(format!(
                    "edge {i} ({} -> {}) points past the {} defined nodes",
                    e.from,
                    e.to,
                    self.nodes.len()
                )));
            }
        }

        let mut nodes = Vec::with_capacity(self.nodes.len());
        for n in &self.nodes {
            let node = BoxNode::tree_node(
                scene,
                parent,
                n.label.as_str(),
                TextStyle::label(NODE_FONT_SIZE),
                (n.x, n.y),
            )?;
            nodes.push(node.id());
        }
        TreeGraph::new(scene, parent, at, nodes, edges)
    }
}

/// A stamped token as reported by [`stamp_tokens`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TokenReport {
    /// First letter.
    pub start: usize,
    /// One past the last letter.
    pub end: usize,
    /// Highlight color.
    pub color: CodeColor,
    /// Letters under the span.
    pub content: String,
}

/// Play `tokens` over `code` to completion and report what was stamped.
pub fn stamp_tokens(code: &str, tokens: TokenList, fps: Fps) -> LexvisResult<Vec<TokenReport>> {
    let mut scene = Scene::default();
    let root = scene.root();
    let view = CodeView::new(&mut scene, root, code, code_style(), (0.0, 0.0))?;
    let letters = code.chars().count();

    let mut player = TokenStreamPlayer::new(view);
    let mut task = player.play(tokens);
    run_to_end(&mut scene, &mut task, fps.frame_duration_secs())?;

    task.into_tokens()
        .into_iter()
        .map(|t| {
            let (start, end) = t.span.letter_range(letters);
            Ok(TokenReport {
                start,
                end,
                color: t.color,
                content: t.content(&scene)?,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/unit/demo.rs"]
mod tests;
