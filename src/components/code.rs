use crate::{
    animation::task::{All, Step, Task, Tween, all, tween},
    foundation::{
        color::{CodeColor, Color},
        core::{Interval, Point, Rect, Size},
        error::LexvisResult,
        math::interval_bbox,
    },
    scene::{
        Prop, Scene,
        measure::TextStyle,
        node::{CodeNode, Node, NodeId, NodeKind, RectNode, RectShape, Stroke, TextContent, TextNode},
    },
};

const HIGHLIGHT_STROKE: Color = Color::rgb(0x4d, 0x4d, 0x4d);
const CORNER_RADIUS: f64 = 12.0;

/// Highlight stamped over a span of a [`CodeView`].
///
/// The container belongs to the view; dropping a `Token` leaves the highlight on screen. Use
/// [`Scene::remove`] on [`Token::container`] to discard it.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// Letters covered, as they were selected at stamp time.
    pub span: Interval,
    /// Palette entry the highlight was filled with.
    pub color: CodeColor,
    /// Highlight rectangle (its text is the only child).
    pub container: NodeId,
    view: NodeId,
}

impl Token {
    /// Letters of the view's *current* buffer under [`Token::span`].
    ///
    /// Re-read on every call: replacing the buffer changes what a token reports, and spans that
    /// fall outside the new buffer clamp to a shorter or empty string.
    pub fn content(&self, scene: &Scene) -> LexvisResult<String> {
        scene.code_slice(self.view, self.span)
    }

    /// Code view the token was stamped on.
    pub fn view(&self) -> NodeId {
        self.view
    }
}

/// Selection snapshot with its geometry in view space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionBBox {
    /// Selected letters.
    pub span: Interval,
    /// Box covering them.
    pub rect: Rect,
}

/// Code block with a box selection, a cursor overlay and highlight stamping.
///
/// This is a handle; all state lives in the [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeView {
    id: NodeId,
    cursor: NodeId,
}

impl CodeView {
    /// Add a code block under `parent`, centered at `at`, with an empty selection at letter 0.
    pub fn new(
        scene: &mut Scene,
        parent: NodeId,
        code: impl Into<String>,
        style: TextStyle,
        at: impl Into<Point>,
    ) -> LexvisResult<Self> {
        let id = scene.add(
            parent,
            Node::new(NodeKind::Code(CodeNode {
                code: code.into(),
                style,
                fill: Color::WHITE,
                selection: Interval::default(),
            }))
            .at(at),
        )?;
        let cursor = scene.add(
            id,
            Node::new(NodeKind::Rect(RectNode {
                shape: RectShape::Cursor { view: id },
                fill: None,
                stroke: Some(Stroke {
                    color: Color::WHITE,
                    width: 3.0,
                }),
                radius: CORNER_RADIUS,
                progress: 1.0,
            }))
            .with_z(1),
        )?;
        Ok(Self { id, cursor })
    }

    /// Code node.
    pub fn id(self) -> NodeId {
        self.id
    }

    /// Cursor overlay rectangle.
    pub fn cursor(self) -> NodeId {
        self.cursor
    }

    /// Current buffer.
    pub fn code(self, scene: &Scene) -> LexvisResult<String> {
        Ok(scene.code(self.id)?.code.clone())
    }

    /// Replace the buffer. Existing tokens keep their spans and re-slice the new text.
    pub fn set_code(self, scene: &mut Scene, code: impl Into<String>) -> LexvisResult<()> {
        scene.code_mut(self.id)?.code = code.into();
        Ok(())
    }

    /// Change the font size.
    pub fn set_font_size(self, scene: &mut Scene, size: f64) -> LexvisResult<()> {
        scene.set(Prop::FontSize(self.id), size)
    }

    /// Change the letter spacing.
    pub fn set_letter_spacing(self, scene: &mut Scene, spacing: f64) -> LexvisResult<()> {
        scene.set(Prop::LetterSpacing(self.id), spacing)
    }

    /// Current selection.
    pub fn selection(self, scene: &Scene) -> LexvisResult<Interval> {
        Ok(scene.code(self.id)?.selection)
    }

    /// Jump the selection to `[start, end)`.
    pub fn set_selection(self, scene: &mut Scene, start: f64, end: f64) -> LexvisResult<()> {
        scene.code_mut(self.id)?.selection = Interval::new(start, end);
        Ok(())
    }

    /// Slide both selection bounds linearly to `[start, end)` over `duration`.
    pub fn animate_selection(self, start: f64, end: f64, duration: f64) -> All<'static> {
        all(vec![
            tween(Prop::SelectionStart(self.id), start, duration).boxed(),
            tween(Prop::SelectionEnd(self.id), end, duration).boxed(),
        ])
    }

    /// Size of one letter under the current buffer and font.
    pub fn letter_size(self, scene: &Scene) -> LexvisResult<Size> {
        scene.letter_size(self.id)
    }

    /// X of letter 0 in view space.
    pub fn local_left(self, scene: &Scene) -> LexvisResult<f64> {
        scene.code_left(self.id)
    }

    /// Box covering `interval` in view space.
    pub fn bbox_for(self, scene: &Scene, interval: Interval) -> LexvisResult<Rect> {
        Ok(interval_bbox(
            self.local_left(scene)?,
            self.letter_size(scene)?,
            interval,
        ))
    }

    /// The current selection and the box covering it.
    pub fn selection_bbox(self, scene: &Scene) -> LexvisResult<SelectionBBox> {
        let span = self.selection(scene)?;
        Ok(SelectionBBox {
            span,
            rect: self.bbox_for(scene, span)?,
        })
    }

    /// Stamp a fully revealed highlight over the current selection.
    pub fn stamp_highlight(self, scene: &mut Scene, color: CodeColor) -> LexvisResult<Token> {
        self.stamp(scene, color, 1.0)
    }

    /// Stamp a highlight over the selection current when the task starts and reveal it over
    /// `duration`. The token becomes available once the reveal is complete.
    pub fn stamp_highlight_animated(self, color: CodeColor, duration: f64) -> StampTask {
        StampTask {
            view: self,
            color,
            duration,
            running: None,
            done: false,
        }
    }

    fn stamp(self, scene: &mut Scene, color: CodeColor, progress: f64) -> LexvisResult<Token> {
        let span = self.selection(scene)?;
        let container = scene.add(
            self.id,
            Node::new(NodeKind::Rect(RectNode {
                shape: RectShape::Span {
                    view: self.id,
                    span,
                },
                fill: Some(color.background()),
                stroke: Some(Stroke {
                    color: HIGHLIGHT_STROKE,
                    width: 3.0,
                }),
                radius: CORNER_RADIUS,
                progress,
            })),
        )?;
        let style = scene.code(self.id)?.style.clone();
        scene.add(
            container,
            Node::new(NodeKind::Text(TextNode {
                content: TextContent::Slice {
                    view: self.id,
                    span,
                },
                style,
                fill: color.text(),
            }))
            .at((0.0, -4.0)),
        )?;
        tracing::debug!(start = span.start, end = span.end, ?color, "highlight stamped");

        Ok(Token {
            span,
            color,
            container,
            view: self.id,
        })
    }
}

/// Animated highlight stamp; see [`CodeView::stamp_highlight_animated`].
pub struct StampTask {
    view: CodeView,
    color: CodeColor,
    duration: f64,
    running: Option<(Token, Tween)>,
    done: bool,
}

impl StampTask {
    /// The stamped token, once the reveal has finished.
    pub fn token(&self) -> Option<&Token> {
        if !self.done {
            return None;
        }
        self.running.as_ref().map(|(t, _)| t)
    }

    /// Take the stamped token, once the reveal has finished.
    pub fn into_token(self) -> Option<Token> {
        if !self.done {
            return None;
        }
        self.running.map(|(t, _)| t)
    }
}

impl Task for StampTask {
    fn advance(&mut self, scene: &mut Scene, dt: f64) -> LexvisResult<Step> {
        if self.done {
            return Ok(Step::Done { leftover: dt });
        }
        if self.running.is_none() {
            let token = self.view.stamp(scene, self.color, 0.0)?;
            let reveal = tween(Prop::Progress(token.container), 1.0, self.duration);
            self.running = Some((token, reveal));
        }
        let Some((_, reveal)) = &mut self.running else {
            return Ok(Step::Done { leftover: dt });
        };
        let step = reveal.advance(scene, dt)?;
        self.done = step.is_done();
        Ok(step)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/components/code.rs"]
mod tests;
