//! lexvis renders animations that explain how a lexer and a parser see a program.
//!
//! Scenes are built from a few reusable components and animated with resumable tasks:
//!
//! - A [`CodeView`] shows a line of code with a selection cursor and stamps colored highlights
//! - A [`TokenStreamPlayer`] walks a hand-written token list across a code view
//! - A [`TreeGraph`] joins boxes with curved connectors and reveals or focuses them by index
//! - A [`Timeline`] plays tasks at a fixed frame rate; frames go to a PNG or a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Resumable animation tasks and fixed-rate playback.
pub mod animation;
/// Fonts shared by measurement and rasterization.
pub mod assets;
/// Code views, token streams, boxes, connectors and graphs.
pub mod components;
/// Built-in storyboards and frame drivers.
pub mod demo;
/// Encoding sinks.
pub mod encode;
/// Colors, time, geometry helpers and errors.
pub mod foundation;
/// Scene to SVG to pixels.
pub mod render;
/// Arena scene graph.
pub mod scene;

pub use crate::animation::task::{BoxTask, Step, Task, all, lazy, sequence, tween, wait};
pub use crate::animation::timeline::Timeline;
pub use crate::components::bezier::{Connector, ConnectorStyle};
pub use crate::components::box_node::BoxNode;
pub use crate::components::code::{CodeView, Token};
pub use crate::components::tokenizer::{
    AnimatedToken, ImmediateToken, TokenList, TokenOffset, TokenStreamPlayer,
};
pub use crate::components::tree_graph::{Edge, EdgeLabel, TreeGraph};
pub use crate::demo::Demo;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::foundation::color::{CodeColor, Color};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Interval, Point};
pub use crate::foundation::error::{LexvisError, LexvisResult};
pub use crate::render::RenderSettings;
pub use crate::render::raster::{FrameRGBA, Rasterizer, save_png};
pub use crate::scene::node::NodeId;
pub use crate::scene::{Prop, Scene};
