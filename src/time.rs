//! Frame clock.
//!
//! ```ignore
//! let mut time = Time::new();
//!
//! // Once per frame:
//! let (elapsed, delta) = time.update();
//! scene.tick(state, delta, elapsed);
//! ```

use std::time::{Duration, Instant};

/// How often the fps readout is recomputed.
const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Drives the scene: seconds since start, seconds since last frame, and a
/// smoothed fps for the title bar.
///
/// With a fixed step, every frame advances by exactly that many seconds
/// regardless of wall-clock time, so a run replays identically.
#[derive(Debug)]
pub struct Time {
    last_frame: Instant,
    elapsed: f32,
    delta: f32,
    frames: u64,
    fps: f32,
    fps_frames: u64,
    fps_since: Instant,
    paused: bool,
    fixed_step: Option<f32>,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            elapsed: 0.0,
            delta: 0.0,
            frames: 0,
            fps: 0.0,
            fps_frames: 0,
            fps_since: now,
            paused: false,
            fixed_step: None,
        }
    }

    /// Advance every frame by `step` seconds instead of by wall-clock time.
    pub fn with_fixed_step(mut self, step: f32) -> Self {
        self.fixed_step = Some(step);
        self
    }

    /// Advance the clock by one frame. Returns `(elapsed, delta)`.
    ///
    /// While paused the delta is 0 and elapsed time stands still.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();
        if self.paused {
            self.delta = 0.0;
            return (self.elapsed, self.delta);
        }

        let wall = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.delta = self.fixed_step.unwrap_or(wall);
        self.elapsed += self.delta;
        self.frames += 1;

        let window = now.duration_since(self.fps_since);
        if window >= FPS_WINDOW {
            self.fps = (self.frames - self.fps_frames) as f32 / window.as_secs_f32();
            self.fps_frames = self.frames;
            self.fps_since = now;
        }

        (self.elapsed, self.delta)
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Frames advanced so far, not counting paused ones.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop the clock, e.g. while the window is hidden.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Restart after [`pause`](Self::pause). The hidden span is skipped.
    pub fn resume(&mut self) {
        if self.paused {
            self.last_frame = Instant::now();
            self.fps_since = self.last_frame;
            self.fps_frames = self.frames;
            self.paused = false;
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_starts_at_zero() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.elapsed(), 0.0);
        assert!(!time.is_paused());
    }

    #[test]
    fn test_update_accumulates() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.update();

        assert!(delta > 0.0);
        assert_eq!(elapsed, delta);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_paused_clock_stands_still() {
        let mut time = Time::new();
        time.update();
        time.pause();
        assert!(time.is_paused());

        let before = time.elapsed();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.update();

        assert_eq!(elapsed, before);
        assert_eq!(delta, 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_resume_skips_hidden_span() {
        let mut time = Time::new();
        time.update();
        time.pause();
        thread::sleep(Duration::from_millis(50));
        time.resume();
        assert!(!time.is_paused());
        time.update();

        assert!(time.delta() < 0.04);
        assert!(time.elapsed() < 0.04);
    }

    #[test]
    fn test_fixed_step_ignores_wall_clock() {
        let mut time = Time::new().with_fixed_step(1.0 / 60.0);
        thread::sleep(Duration::from_millis(30));
        for _ in 0..90 {
            time.update();
        }

        assert_eq!(time.delta(), 1.0 / 60.0);
        assert!((time.elapsed() - 1.5).abs() < 1e-4);
    }
}
