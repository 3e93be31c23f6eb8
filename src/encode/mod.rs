//! Encoding sinks.
//!
//! Sinks consume rendered frames in timeline order; the demo driver pushes one frame per
//! [`Timeline`](crate::animation::timeline::Timeline) tick.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
