//! Frame rendering.
//!
//! A scene is first serialized to an SVG document ([`svg`]) and then rasterized with
//! `usvg`/`resvg` ([`raster`]). Geometry is resolved at serialization time, so the renderer never
//! sees reactive placements or live endpoints.

/// SVG to RGBA8 rasterization and PNG output.
pub mod raster;
/// Scene to SVG serialization.
pub mod svg;

use crate::foundation::{
    color::Color,
    core::{Canvas, Fps},
};

/// Output settings shared by single-frame and video rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    /// Output size in pixels; the scene origin maps to its center.
    pub canvas: Canvas,
    /// Playback rate.
    pub fps: Fps,
    /// Opaque background color.
    pub background: Color,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 1920,
                height: 1080,
            },
            fps: Fps { num: 30, den: 1 },
            background: Color::rgb(0x2e, 0x2e, 0x2e),
        }
    }
}
