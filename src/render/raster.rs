use std::path::Path;

use anyhow::Context as _;

use crate::{
    assets::fonts,
    foundation::error::{LexvisError, LexvisResult},
    render::{RenderSettings, svg::scene_to_svg},
    scene::Scene,
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames produced by [`Rasterizer`] are **premultiplied alpha**; the `premultiplied` flag keeps
/// this explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

/// SVG rasterizer holding a font database loaded once from the system.
pub struct Rasterizer {
    options: usvg::Options<'static>,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rasterizer")
            .field("font_faces", &self.options.fontdb.len())
            .finish()
    }
}

impl Rasterizer {
    /// Rasterizer with system fonts.
    ///
    /// Shares the database [`FontMeasure`](crate::scene::measure::FontMeasure) measures with,
    /// and falls back to any installed face so text is never dropped.
    pub fn new() -> Self {
        Self {
            options: usvg::Options {
                fontdb: fonts::system_fontdb(),
                font_resolver: fonts::svg_font_resolver(),
                ..Default::default()
            },
        }
    }

    /// Render an SVG document at its intrinsic size.
    pub fn rasterize(&self, svg: &str) -> LexvisResult<FrameRGBA> {
        let tree = usvg::Tree::from_str(svg, &self.options)
            .map_err(|e| LexvisError::render(format!("failed to parse frame svg: {e}")))?;

        let size = tree.size().to_int_size();
        let (width, height) = (size.width(), size.height());
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| LexvisError::render("failed to allocate frame pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.take(),
            premultiplied: true,
        })
    }

    /// Serialize and rasterize the current state of `scene`.
    #[tracing::instrument(skip_all)]
    pub fn render_scene(&self, scene: &Scene, settings: &RenderSettings) -> LexvisResult<FrameRGBA> {
        let svg = scene_to_svg(scene, settings.canvas, settings.background)?;
        self.rasterize(&svg)
    }
}

/// Write `frame` as a PNG, creating parent directories as needed.
pub fn save_png(frame: &FrameRGBA, path: &Path) -> LexvisResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
