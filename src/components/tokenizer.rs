//! Drives a [`CodeView`] selection through a hand-authored token stream.
//!
//! Highlighting runs one token behind the cursor: the color of token *i* is stamped over the
//! interval selected for token *i* while the selection is already moving on to token *i + 1*.
//! After the last token the final color is stamped and the selection collapses to a
//! zero-length interval at the cursor.

use std::collections::VecDeque;

use serde::Deserialize;

use crate::{
    animation::task::{BoxTask, Step, Task, all, sequence, tween},
    components::code::{CodeView, StampTask, Token},
    foundation::{
        color::CodeColor,
        error::{LexvisError, LexvisResult},
    },
    scene::{Prop, Scene},
};

/// `(gap, length)`: letters skipped after the previous token, then letters selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenOffset(pub usize, pub usize);

impl TokenOffset {
    /// Letters skipped after the previous token.
    pub fn gap(self) -> f64 {
        self.0 as f64
    }

    /// Letters selected.
    pub fn length(self) -> f64 {
        self.1 as f64
    }
}

/// Token applied without animation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ImmediateToken(pub TokenOffset, pub CodeColor);

/// Token applied over `duration` seconds.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct AnimatedToken(pub TokenOffset, pub f64, pub CodeColor);

/// One JSON entry of either arity.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(untagged)]
pub enum TokenTuple {
    /// `[[gap, len], duration, color]`
    Animated(AnimatedToken),
    /// `[[gap, len], color]`
    Immediate(ImmediateToken),
}

/// Token stream as written in JSON: every entry is `[[gap, len], color]` or
/// `[[gap, len], duration, color]`, never a mix of both.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "Vec<TokenTuple>")]
pub enum TokenList {
    /// Two-element entries.
    Immediate(Vec<ImmediateToken>),
    /// Three-element entries.
    Animated(Vec<AnimatedToken>),
}

impl TryFrom<Vec<TokenTuple>> for TokenList {
    type Error = LexvisError;

    fn try_from(tuples: Vec<TokenTuple>) -> LexvisResult<Self> {
        match tuples.first() {
            None | Some(TokenTuple::Immediate(_)) => tuples
                .into_iter()
                .enumerate()
                .map(|(i, t)| match t {
                    TokenTuple::Immediate(t) => Ok(t),
                    TokenTuple::Animated(_) => Err(mixed_arity(i)),
                })
                .collect::<LexvisResult<_>>()
                .map(Self::Immediate),
            Some(TokenTuple::Animated(_)) => tuples
                .into_iter()
                .enumerate()
                .map(|(i, t)| match t {
                    TokenTuple::Animated(t) => Ok(t),
                    TokenTuple::Immediate(_) => Err(mixed_arity(i)),
                })
                .collect::<LexvisResult<_>>()
                .map(Self::Animated),
        }
    }
}

fn mixed_arity(index: usize) -> LexvisError {
    LexvisError::validation(format!(
        "token {index} has a different arity than the first token"
    ))
}

impl TokenList {
    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Immediate(v) => v.len(),
            Self::Animated(v) => v.len(),
        }
    }

    /// `true` when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Animated form; immediate entries get a zero duration.
    pub fn into_animated(self) -> Vec<AnimatedToken> {
        match self {
            Self::Animated(v) => v,
            Self::Immediate(v) => v
                .into_iter()
                .map(|ImmediateToken(off, color)| AnimatedToken(off, 0.0, color))
                .collect(),
        }
    }
}

/// Cursor over a [`CodeView`]'s buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TokenStreamPlayer {
    view: CodeView,
    last_token: f64,
}

impl TokenStreamPlayer {
    /// Player positioned at letter 0.
    pub fn new(view: CodeView) -> Self {
        Self {
            view,
            last_token: 0.0,
        }
    }

    /// View being driven.
    pub fn view(&self) -> CodeView {
        self.view
    }

    /// End of the most recent token.
    pub fn last_token(&self) -> f64 {
        self.last_token
    }

    /// Move the cursor back to `pos` without touching the selection.
    pub fn reset(&mut self, pos: f64) {
        self.last_token = pos;
    }

    fn step_cursor(&mut self, gap: f64, len: f64) -> (f64, f64) {
        let start = self.last_token + gap;
        self.last_token = start + len;
        (start, self.last_token)
    }

    /// Select `[last + gap, last + gap + len)` at once.
    pub fn advance(&mut self, scene: &mut Scene, gap: f64, len: f64) -> LexvisResult<()> {
        let (start, end) = self.step_cursor(gap, len);
        self.view.set_selection(scene, start, end)
    }

    /// Animate the selection to the next token.
    ///
    /// The cursor moves immediately; only the selection is animated. With `normalize` the
    /// selection first collapses onto the new start and then grows to the new end, each phase
    /// taking half of `duration`. Without it both bounds slide together.
    pub fn advance_animated(
        &mut self,
        duration: f64,
        gap: f64,
        len: f64,
        normalize: bool,
    ) -> BoxTask<'static> {
        let (start, end) = self.step_cursor(gap, len);
        let id = self.view.id();
        if normalize {
            let half = duration / 2.0;
            sequence(
                0.0,
                vec![
                    all(vec![
                        tween(Prop::SelectionStart(id), start, half).boxed(),
                        tween(Prop::SelectionEnd(id), start, half).boxed(),
                    ])
                    .boxed(),
                    tween(Prop::SelectionEnd(id), end, half).boxed(),
                ],
            )
            .boxed()
        } else {
            self.view.animate_selection(start, end, duration).boxed()
        }
    }

    /// Apply `tokens` instantly and return one stamped [`Token`] per entry.
    #[tracing::instrument(skip_all, fields(tokens = tokens.len()))]
    pub fn tokenize(
        &mut self,
        scene: &mut Scene,
        tokens: &[ImmediateToken],
    ) -> LexvisResult<Vec<Token>> {
        let mut prev: Option<CodeColor> = None;
        let mut out = Vec::with_capacity(tokens.len());

        for ImmediateToken(offset, color) in tokens {
            if let Some(prev) = prev {
                out.push(self.view.stamp_highlight(scene, prev)?);
            }
            self.advance(scene, offset.gap(), offset.length())?;
            prev = Some(*color);
        }
        if let Some(prev) = prev {
            out.push(self.view.stamp_highlight(scene, prev)?);
            self.advance(scene, 0.0, 0.0)?;
        }
        Ok(out)
    }

    /// Animated [`TokenStreamPlayer::tokenize`].
    ///
    /// Each entry reveals the previous entry's highlight over half its duration while the
    /// selection advances over the full duration. Stamped tokens are collected on the task.
    pub fn tokenize_animated(&mut self, tokens: Vec<AnimatedToken>) -> TokenizeTask<'_> {
        TokenizeTask {
            player: self,
            pending: tokens.into(),
            prev: None,
            stage: None,
            tokens: Vec::new(),
            finished: false,
        }
    }

    /// Play a parsed [`TokenList`]; immediate lists complete on the first step.
    pub fn play(&mut self, tokens: TokenList) -> TokenizeTask<'_> {
        self.tokenize_animated(tokens.into_animated())
    }
}

struct Stage {
    stamp: Option<StampTask>,
    advance: BoxTask<'static>,
    advanced: bool,
}

impl Stage {
    // Stamp first: it must capture the selection before the advance moves it.
    fn advance(&mut self, scene: &mut Scene, dt: f64) -> LexvisResult<(Step, Option<Token>)> {
        let mut leftover: Option<f64> = None;
        let mut note = |step: Step| {
            if let Step::Done { leftover: l } = step {
                leftover = Some(leftover.map_or(l, |cur: f64| cur.min(l)));
            }
        };

        let mut token = None;
        if let Some(stamp) = &mut self.stamp {
            let step = stamp.advance(scene, dt)?;
            if step.is_done() {
                token = self.stamp.take().and_then(StampTask::into_token);
            }
            note(step);
        }
        if !self.advanced {
            let step = self.advance.advance(scene, dt)?;
            self.advanced = step.is_done();
            note(step);
        }

        let step = if self.stamp.is_none() && self.advanced {
            Step::Done {
                leftover: leftover.unwrap_or(dt),
            }
        } else {
            Step::Running
        };
        Ok((step, token))
    }
}

/// Task returned by [`TokenStreamPlayer::tokenize_animated`].
pub struct TokenizeTask<'p> {
    player: &'p mut TokenStreamPlayer,
    pending: VecDeque<AnimatedToken>,
    prev: Option<(CodeColor, f64)>,
    stage: Option<Stage>,
    tokens: Vec<Token>,
    finished: bool,
}

impl TokenizeTask<'_> {
    /// Tokens whose reveal has completed so far.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Take the completed tokens.
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    fn next_stage(&mut self) -> Option<Stage> {
        let view = self.player.view;
        match self.pending.pop_front() {
            Some(AnimatedToken(offset, duration, color)) => {
                let stamp = self
                    .prev
                    .map(|(c, _)| view.stamp_highlight_animated(c, duration / 2.0));
                let advance =
                    self.player
                        .advance_animated(duration, offset.gap(), offset.length(), true);
                self.prev = Some((color, duration));
                Some(Stage {
                    stamp,
                    advance,
                    advanced: false,
                })
            }
            None => {
                let (color, duration) = self.prev.take()?;
                Some(Stage {
                    stamp: Some(view.stamp_highlight_animated(color, duration / 2.0)),
                    advance: self.player.advance_animated(duration, 0.0, 0.0, true),
                    advanced: false,
                })
            }
        }
    }
}

impl Task for TokenizeTask<'_> {
    fn advance(&mut self, scene: &mut Scene, dt: f64) -> LexvisResult<Step> {
        if self.finished {
            return Ok(Step::Done { leftover: dt });
        }

        let mut budget = dt;
        loop {
            if self.stage.is_none() {
                self.stage = self.next_stage();
            }
            let Some(stage) = &mut self.stage else {
                self.finished = true;
                tracing::debug!(tokens = self.tokens.len(), "token stream finished");
                return Ok(Step::Done { leftover: budget });
            };
            let (step, token) = stage.advance(scene, budget)?;
            self.tokens.extend(token);
            match step {
                Step::Running => return Ok(Step::Running),
                Step::Done { leftover } => {
                    budget = leftover;
                    self.stage = None;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/components/tokenizer.rs"]
mod tests;
