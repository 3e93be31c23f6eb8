use crate::{
    animation::task::{Step, Task},
    foundation::{
        core::{Fps, FrameIndex},
        error::LexvisResult,
    },
    scene::Scene,
};

/// Fixed-rate clock that plays tasks one after another and reports every frame.
///
/// Time a task leaves unused in its final frame is carried into the next `play`, so chaining
/// many short tasks does not accumulate rounding drift.
#[derive(Clone, Debug)]
pub struct Timeline {
    fps: Fps,
    frame: FrameIndex,
    carry: f64,
}

impl Timeline {
    /// Timeline positioned at frame 0.
    pub fn new(fps: Fps) -> Self {
        Self {
            fps,
            frame: FrameIndex(0),
            carry: 0.0,
        }
    }

    /// Playback rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Next frame to be emitted.
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    /// Seconds elapsed on the clock.
    pub fn time(&self) -> f64 {
        self.fps.frame_to_secs(self.frame) - self.carry
    }

    /// Emit the current scene state as a frame without advancing any task.
    pub fn hold<F>(&mut self, scene: &Scene, frames: u64, on_frame: &mut F) -> LexvisResult<()>
    where
        F: FnMut(&Scene, FrameIndex) -> LexvisResult<()>,
    {
        for _ in 0..frames {
            on_frame(scene, self.frame)?;
            self.frame = FrameIndex(self.frame.0 + 1);
        }
        Ok(())
    }

    /// Advance `task` to completion, calling `on_frame` after every whole frame.
    #[tracing::instrument(skip_all, fields(start_frame = self.frame.0))]
    pub fn play<T, F>(&mut self, scene: &mut Scene, mut task: T, on_frame: &mut F) -> LexvisResult<()>
    where
        T: Task,
        F: FnMut(&Scene, FrameIndex) -> LexvisResult<()>,
    {
        let dt = self.fps.frame_duration_secs();

        if self.carry > 0.0 {
            let carry = std::mem::take(&mut self.carry);
            if let Step::Done { leftover } = task.advance(scene, carry)? {
                self.carry = leftover;
                return Ok(());
            }
        }

        loop {
            let step = task.advance(scene, dt)?;
            on_frame(scene, self.frame)?;
            tracing::trace!(frame = self.frame.0, "frame emitted");
            self.frame = FrameIndex(self.frame.0 + 1);
            if let Step::Done { leftover } = step {
                self.carry = leftover;
                tracing::debug!(end_frame = self.frame.0, "task finished");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
