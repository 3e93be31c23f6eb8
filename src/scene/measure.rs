use std::{borrow::Cow, cell::RefCell, collections::HashMap, sync::Arc};

use usvg::fontdb::{Database, ID};

use crate::{assets::fonts, foundation::core::Size};

/// Font settings shared by text and code nodes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f64,
    /// Extra advance added after every letter, in pixels.
    pub letter_spacing: f64,
    /// CSS-style family name, passed through to the renderer.
    pub font_family: String,
    /// Bold weight.
    pub bold: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 48.0,
            letter_spacing: 0.0,
            font_family: "monospace".to_owned(),
            bold: false,
        }
    }
}

impl TextStyle {
    /// Label style used for graph nodes and edge captions.
    pub fn label(font_size: f64) -> Self {
        Self {
            font_size,
            letter_spacing: 0.0,
            font_family: "Inter".to_owned(),
            bold: true,
        }
    }
}

/// Text measurement capability supplied by the host.
pub trait TextMeasure {
    /// Size of the laid-out `text` (may contain `\n`).
    fn measure(&self, text: &str, style: &TextStyle) -> Size;
}

/// Fixed-advance metrics: every letter is `advance_em` wide, every line `line_height_em` tall.
///
/// Independent of the installed fonts, which keeps layout tests exact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasure {
    /// Glyph advance as a fraction of the font size.
    pub advance_em: f64,
    /// Line height as a fraction of the font size.
    pub line_height_em: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            advance_em: 0.6,
            line_height_em: 1.25,
        }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, style: &TextStyle) -> Size {
        let advance = self.advance_em * style.font_size + style.letter_spacing;
        let mut lines = 0usize;
        let mut widest = 0usize;
        for line in text.split('\n') {
            lines += 1;
            widest = widest.max(line.chars().count());
        }
        Size::new(
            (widest as f64) * advance,
            (lines as f64) * self.line_height_em * style.font_size,
        )
    }
}

/// Metrics from shaping the text with `parley`, using the face the rasterizer draws with.
///
/// Faces are copied out of the font database into parley's collection the first time they are
/// needed. Falls back to [`MonospaceMeasure`] when the database has no faces at all.
pub struct FontMeasure {
    fontdb: Arc<Database>,
    engine: RefCell<LayoutEngine>,
    fallback: MonospaceMeasure,
}

struct LayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    // fontdb face -> family name registered with parley
    registered: HashMap<ID, String>,
}

impl Default for FontMeasure {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for FontMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMeasure")
            .field("font_faces", &self.fontdb.len())
            .finish_non_exhaustive()
    }
}

impl FontMeasure {
    /// Measure with the system fonts.
    pub fn system() -> Self {
        Self::new(fonts::system_fontdb())
    }

    /// Measure with the faces of `fontdb`.
    pub fn new(fontdb: Arc<Database>) -> Self {
        Self {
            fontdb,
            engine: RefCell::new(LayoutEngine {
                font_ctx: parley::FontContext::default(),
                layout_ctx: parley::LayoutContext::new(),
                registered: HashMap::new(),
            }),
            fallback: MonospaceMeasure::default(),
        }
    }

    fn layout_size(&self, text: &str, style: &TextStyle) -> Option<Size> {
        let face = fonts::face_for_style(&self.fontdb, style)?;
        let mut engine = self.engine.borrow_mut();
        let LayoutEngine {
            font_ctx,
            layout_ctx,
            registered,
        } = &mut *engine;

        let family = match registered.get(&face) {
            Some(name) => name.clone(),
            None => {
                let name = self
                    .fontdb
                    .face(face)?
                    .families
                    .first()
                    .map(|(name, _)| name.clone())?;
                let bytes = self.fontdb.with_face_data(face, |data, _| data.to_vec())?;
                font_ctx
                    .collection
                    .register_fonts(parley::fontique::Blob::from(bytes), None);
                tracing::trace!(family = %name, "registered face for measurement");
                registered.insert(face, name.clone());
                name
            }
        };

        let weight = if style.bold {
            parley::style::FontWeight::BOLD
        } else {
            parley::style::FontWeight::NORMAL
        };
        let mut builder = layout_ctx.ranged_builder(font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(
            style.font_size as f32,
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(weight));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            style.letter_spacing as f32,
        ));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Some(Size::new(
            f64::from(layout.width()),
            f64::from(layout.height()),
        ))
    }
}

impl TextMeasure for FontMeasure {
    fn measure(&self, text: &str, style: &TextStyle) -> Size {
        self.layout_size(text, style)
            .unwrap_or_else(|| self.fallback.measure(text, style))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/measure.rs"]
mod tests;
