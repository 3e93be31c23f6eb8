use crate::foundation::error::{LexvisError, LexvisResult};

pub use kurbo::{CubicBez, Point, Rect, Size, Vec2};

/// Absolute 0-based frame index on a playback timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> LexvisResult<Self> {
        if den == 0 {
            return Err(LexvisError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(LexvisError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Timestamp of the start of `frame`.
    pub fn frame_to_secs(self, frame: FrameIndex) -> f64 {
        (frame.0 as f64) * self.frame_duration_secs()
    }

    /// Frames needed to cover `secs`, rounding up.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        // Tolerate float noise so 1.0s at 30fps is 30 frames, not 31.
        (secs * self.as_f64() - 1e-9).ceil().max(0.0) as u64
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Half-open letter range `[start, end)` into a code buffer.
///
/// Bounds are fractional because selections are interpolated while animating. Letter indices
/// are recovered with [`Interval::letter_range`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    /// Inclusive start letter.
    pub start: f64,
    /// Exclusive end letter.
    pub end: f64,
}

impl Interval {
    /// Build an interval from two bounds.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Zero-length interval sitting at `pos`.
    pub fn at(pos: f64) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Signed length (`end - start`).
    pub fn len(self) -> f64 {
        self.end - self.start
    }

    /// `true` when the interval covers no letters.
    pub fn is_empty(self) -> bool {
        self.len() <= 0.0
    }

    /// Integer letter bounds clamped into `[0, letters]`.
    ///
    /// Mirrors classic substring semantics: fractional bounds truncate, out-of-range bounds clamp
    /// and reversed bounds are swapped.
    pub fn letter_range(self, letters: usize) -> (usize, usize) {
        fn clamp(v: f64, letters: usize) -> usize {
            if v.is_nan() || v <= 0.0 {
                return 0;
            }
            let v = v.trunc();
            if v >= letters as f64 {
                letters
            } else {
                v as usize
            }
        }

        let a = clamp(self.start, letters);
        let b = clamp(self.end, letters);
        (a.min(b), a.max(b))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
