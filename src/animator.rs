//! Per-record progress toward the current formation.

use crate::easing::cubic_in_out;

/// Progress of one record (or one group of records) between chaos (0) and
/// formed (1).
///
/// The value only ever moves toward the target it is given, by at most
/// `delta / duration * speed_factor` per tick, and never past it. Once it
/// equals the target, further ticks leave it untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    value: f32,
    speed_factor: f32,
}

impl Progress {
    /// Start at `value` (clamped to `[0, 1]`) with the given speed multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `speed_factor` is not a positive finite number.
    pub fn new(value: f32, speed_factor: f32) -> Self {
        assert!(
            speed_factor.is_finite() && speed_factor > 0.0,
            "speed factor must be positive, got {}",
            speed_factor
        );
        Self {
            value: value.clamp(0.0, 1.0),
            speed_factor,
        }
    }

    /// Raw, un-eased progress.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn speed_factor(&self) -> f32 {
        self.speed_factor
    }

    /// Cubic-eased progress, used for interpolation.
    #[inline]
    pub fn eased(&self) -> f32 {
        cubic_in_out(self.value)
    }

    /// Whether the value sits exactly on `target`.
    #[inline]
    pub fn is_at(&self, target: f32) -> bool {
        self.value == target
    }

    /// Step toward `target` for a frame of `delta` seconds.
    ///
    /// Negative and NaN deltas are treated as zero. Returns the new raw value.
    pub fn advance(&mut self, target: f32, delta: f32, duration: f32) -> f32 {
        if self.value == target {
            return self.value;
        }

        // f32::max drops NaN
        let step = (delta / duration * self.speed_factor).max(0.0);
        self.value = if self.value < target {
            (self.value + step).min(target)
        } else {
            (self.value - step).max(target)
        };
        self.value
    }
}
