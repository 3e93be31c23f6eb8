//! Shared primitives: colors, time, geometry helpers and the error type.

/// Straight RGBA colors and the token palette.
pub mod color;
/// Frame indices, frame rates, canvases and letter intervals.
pub mod core;
/// Error taxonomy.
pub mod error;
/// Bounding-box and curve helpers.
pub mod math;
