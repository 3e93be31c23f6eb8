use std::collections::VecDeque;

use crate::{
    animation::ease::Ease,
    foundation::error::LexvisResult,
    scene::{Prop, Scene},
};

/// Outcome of advancing a task.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// More time is needed.
    Running,
    /// Finished; `leftover` is the part of the last `dt` the task did not use.
    Done {
        /// Unused seconds from the last advance.
        leftover: f64,
    },
}

impl Step {
    /// `true` for [`Step::Done`].
    pub fn is_done(self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

/// Resumable unit of animation.
///
/// A task is advanced by an external clock in arbitrary slices of time. It mutates the scene
/// while running and reports how much of the final slice it did not consume, which lets
/// sequences hand the remainder to the next task without drifting.
pub trait Task {
    /// Consume up to `dt` seconds.
    fn advance(&mut self, scene: &mut Scene, dt: f64) -> LexvisResult<Step>;

    /// Erase the concrete type.
    fn boxed<'a>(self) -> BoxTask<'a>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

/// Type-erased task.
pub type BoxTask<'a> = Box<dyn Task + 'a>;

impl<T: Task + ?Sized> Task for &mut T {
    fn advance(&mut self, scene: &mut Scene, dt: f64) -> LexvisResult<Step> {
        (**self).advance(scene, dt)
    }
}

impl<T: Task + ?Sized> Task for Box<T> {
    fn advance(&mut self, scene: &mut Scene, dt: f64) -> LexvisResult<Step> {
        (**self).advance(scene, dt)
    }
}

/// Interpolates one property from its value at the first advance to `to`.
#[derive(Clone, Debug)]
pub struct Tween {
    prop: Prop,
    to: f64,
    duration: f64,
    ease: Ease,
    from: Option<f64>,
    elapsed: f64,
}

impl Tween {
    /// Override the easing curve (linear by default).
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }
}

impl Task for Tween {
    fn advance(&mut self, scene: &mut Scene, dt: f64) -> LexvisResult<Step> {
        let from = match self.from {
            Some(v) => v,
            None => {
                let v = scene.get(self.prop)?;
                self.from = Some(v);
                v
            }
        };

        self.elapsed += dt;
        if self.elapsed >= self.duration {
            scene.set(self.prop, self.to)?;
            return Ok(Step::Done {
                leftover: self.elapsed - self.duration.max(0.0),
            });
        }

        let t = self.ease.apply(self.elapsed / self.duration);
        scene.set(self.prop, from + (self.to - from) * t)?;
        Ok(Step::Running)
    }
}

/// Does nothing for a fixed time.
#[derive(Clone, Debug)]
pub struct Wait {
    duration: f64,
    elapsed: f64,
}

impl Task for Wait {
    fn advance(&mut self, _scene: &mut Scene, dt: f64) -> LexvisResult<Step> {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            Ok(Step::Done {
                leftover: self.elapsed - self.duration.max(0.0),
            })
        } else {
            Ok(Step::Running)
        }
    }
}

/// Runs every branch concurrently; finishes with the slowest one.
pub struct All<'a> {
    branches: Vec<(BoxTask<'a>, bool)>,
    finished: bool,
}

impl Task for All<'_> {
    fn advance(&mut self, scene: &mut Scene, dt: f64) -> LexvisResult<Step> {
        if self.finished {
            return Ok(Step::Done { leftover: dt });
        }

        let mut leftover: Option<f64> = None;
        for (task, done) in &mut self.branches {
            if *done {
                continue;
            }
            if let Step::Done { leftover: l } = task.advance(scene, dt)? {
                *done = true;
                leftover = Some(leftover.map_or(l, |cur| cur.min(l)));
            }
        }

        if self.branches.iter().all(|(_, done)| *done) {
            self.finished = true;
            return Ok(Step::Done {
                leftover: leftover.unwrap_or(dt),
            });
        }
        Ok(Step::Running)
    }
}

/// Runs tasks one after another, waiting `delay` between consecutive tasks.
pub struct Sequence<'a> {
    delay: f64,
    queue: VecDeque<BoxTask<'a>>,
    gap: Option<Wait>,
}

impl Task for Sequence<'_> {
    fn advance(&mut self, scene: &mut Scene, dt: f64) -> LexvisResult<Step> {
        let mut budget = dt;
        loop {
            if let Some(gap) = &mut self.gap {
                match gap.advance(scene, budget)? {
                    Step::Running => return Ok(Step::Running),
                    Step::Done { leftover } => {
                        budget = leftover;
                        self.gap = None;
                    }
                }
            }

            let Some(front) = self.queue.front_mut() else {
                return Ok(Step::Done { leftover: budget });
            };
            match front.advance(scene, budget)? {
                Step::Running => return Ok(Step::Running),
                Step::Done { leftover } => {
                    budget = leftover;
                    self.queue.pop_front();
                    if !self.queue.is_empty() && self.delay > 0.0 {
                        self.gap = Some(wait(self.delay));
                    }
                }
            }
        }
    }
}

/// Builds its inner task at the first advance, against the scene state of that moment.
pub struct Lazy<'a, F> {
    build: Option<F>,
    inner: Option<BoxTask<'a>>,
}

impl<'a, F> Task for Lazy<'a, F>
where
    F: FnOnce(&mut Scene) -> LexvisResult<BoxTask<'a>>,
{
    fn advance(&mut self, scene: &mut Scene, dt: f64) -> LexvisResult<Step> {
        if let Some(build) = self.build.take() {
            self.inner = Some(build(scene)?);
        }
        match &mut self.inner {
            Some(inner) => inner.advance(scene, dt),
            None => Ok(Step::Done { leftover: dt }),
        }
    }
}

/// Finishes immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct Noop;

impl Task for Noop {
    fn advance(&mut self, _scene: &mut Scene, dt: f64) -> LexvisResult<Step> {
        Ok(Step::Done { leftover: dt })
    }
}

/// Tween `prop` to `to` over `duration` seconds.
pub fn tween(prop: Prop, to: f64, duration: f64) -> Tween {
    Tween {
        prop,
        to,
        duration,
        ease: Ease::Linear,
        from: None,
        elapsed: 0.0,
    }
}

/// Idle for `duration` seconds.
pub fn wait(duration: f64) -> Wait {
    Wait {
        duration,
        elapsed: 0.0,
    }
}

/// Fan out over `branches` and join.
pub fn all<'a>(branches: Vec<BoxTask<'a>>) -> All<'a> {
    All {
        branches: branches.into_iter().map(|t| (t, false)).collect(),
        finished: false,
    }
}

/// Run `tasks` strictly in order, each after the first preceded by `delay` seconds.
pub fn sequence<'a>(delay: f64, tasks: Vec<BoxTask<'a>>) -> Sequence<'a> {
    Sequence {
        delay,
        queue: tasks.into(),
        gap: None,
    }
}

/// Wait `delay` seconds, then run `task`.
pub fn delayed<'a>(delay: f64, task: impl Task + 'a) -> Sequence<'a> {
    sequence(0.0, vec![wait(delay).boxed(), task.boxed()])
}

/// Defer building a task until it first runs.
pub fn lazy<'a, F>(build: F) -> Lazy<'a, F>
where
    F: FnOnce(&mut Scene) -> LexvisResult<BoxTask<'a>>,
{
    Lazy {
        build: Some(build),
        inner: None,
    }
}

/// Drive `task` to completion in `dt` slices, returning the seconds it consumed.
pub fn run_to_end(scene: &mut Scene, mut task: impl Task, dt: f64) -> LexvisResult<f64> {
    let mut consumed = 0.0;
    loop {
        match task.advance(scene, dt)? {
            Step::Running => consumed += dt,
            Step::Done { leftover } => return Ok(consumed + dt - leftover),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/task.rs"]
mod tests;
