//! Frame timing shared by every effect host.
//!
//! Hosts (the browser's `requestAnimationFrame`, the winit preview loop, tests)
//! hand each frame callback a [`FrameTime`]. Effects turn those timestamps into
//! elapsed/delta pairs with [`FrameClock`], and the engine reports whether the
//! host should schedule another frame through [`FrameDecision`].

use std::time::Instant;

/// Timestamp handed to a frame callback, in milliseconds since the host's
/// time origin.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FrameTime {
    millis: f64,
}

impl FrameTime {
    pub fn from_millis(millis: f64) -> Self {
        Self { millis }
    }

    pub fn from_secs(seconds: f64) -> Self {
        Self {
            millis: seconds * 1000.0,
        }
    }

    pub fn millis(&self) -> f64 {
        self.millis
    }

    pub fn seconds(&self) -> f64 {
        self.millis * 0.001
    }
}

/// Whether the host should request another frame after the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    Continue,
    Stop,
}

impl FrameDecision {
    pub fn should_continue(self) -> bool {
        matches!(self, FrameDecision::Continue)
    }
}

/// Elapsed and delta seconds produced by one [`FrameClock::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockSample {
    pub elapsed: f32,
    pub delta: f32,
}

/// Auto-starting clock: the first tick starts it, so the first frame sees
/// zero elapsed time and zero delta.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    start: Option<f64>,
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, now: FrameTime) -> ClockSample {
        let now = now.millis();
        let start = *self.start.get_or_insert(now);
        let last = self.last.replace(now).unwrap_or(now);
        // Hosts may deliver a timestamp older than the previous one after a
        // tab is restored; never hand out negative time.
        let delta = ((now - last) * 0.001).max(0.0);
        let elapsed = ((now - start) * 0.001).max(0.0);
        ClockSample {
            elapsed: elapsed as f32,
            delta: delta as f32,
        }
    }
}

/// Rolling frames-per-second counter, reporting at most once per second.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    window_start: Option<f64>,
    frames: u32,
    total_frames: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Records a frame and returns the measured rate whenever a full second
    /// has passed since the last report.
    pub fn record(&mut self, now: FrameTime) -> Option<f32> {
        self.total_frames = self.total_frames.saturating_add(1);
        let start = *self.window_start.get_or_insert(now.millis());
        self.frames += 1;
        let elapsed_ms = now.millis() - start;
        if elapsed_ms >= 1000.0 {
            let fps = self.frames as f64 / (elapsed_ms * 0.001);
            self.frames = 0;
            self.window_start = Some(now.millis());
            Some(fps as f32)
        } else {
            None
        }
    }
}

/// Abstraction over where frame timestamps originate from.
pub trait TimeSource: Send {
    /// Resets the source to its initial state.
    fn reset(&mut self);
    /// Produces the timestamp for the next frame.
    fn sample(&mut self) -> FrameTime;
}

/// Time source backed by the system monotonic clock.
///
/// Not usable on `wasm32-unknown-unknown`, where the browser supplies frame
/// timestamps directly.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn reset(&mut self) {
        self.origin = Instant::now();
    }

    fn sample(&mut self) -> FrameTime {
        FrameTime::from_secs(self.origin.elapsed().as_secs_f64())
    }
}

/// Time source for offline rendering: every sample is one frame later than
/// the previous one, starting at zero.
#[derive(Debug, Clone, Copy)]
pub struct SteppedTimeSource {
    step: f64,
    frames: u64,
}

impl SteppedTimeSource {
    /// Falls back to 60 frames per second for non-positive rates.
    pub fn new(fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        Self {
            step: 1.0 / fps,
            frames: 0,
        }
    }
}

impl TimeSource for SteppedTimeSource {
    fn reset(&mut self) {
        self.frames = 0;
    }

    fn sample(&mut self) -> FrameTime {
        let time = FrameTime::from_secs(self.frames as f64 * self.step);
        self.frames += 1;
        time
    }
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource + Send>;
