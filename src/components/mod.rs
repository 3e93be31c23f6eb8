//! Reusable visual building blocks: code views, token streams, boxes and connector graphs.

/// S-shaped connectors between two points or nodes.
pub mod bezier;
/// Rounded boxes sized around a text label.
pub mod box_node;
/// Code buffer with an animated selection cursor and highlight stamps.
pub mod code;
/// Token lists and the player that walks them across a code view.
pub mod tokenizer;
/// Nodes joined by labeled connectors, with reveal and focus animations.
pub mod tree_graph;
