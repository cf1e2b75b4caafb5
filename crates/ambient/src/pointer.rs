//! Pointer smoothing.
//!
//! Listeners write the raw target; the frame step advances the smoothed
//! value. The two effects smooth differently: RayField moves a fixed fraction
//! per frame (frame-rate dependent), WarpField scales the step by frame delta.

use glam::Vec2;

/// Fraction of the remaining distance RayField covers each frame.
pub const RAYFIELD_POINTER_FRACTION: f32 = 0.1;

/// WarpField smoothing rate; the per-frame step is `min(1, delta * rate)`.
pub const WARPFIELD_POINTER_RATE: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFractionSmoother {
    target: Vec2,
    current: Vec2,
    fraction: f32,
}

impl FixedFractionSmoother {
    pub fn new(start: Vec2, fraction: f32) -> Self {
        Self {
            target: start,
            current: start,
            fraction: fraction.clamp(0.0, 1.0),
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }

    pub fn step(&mut self) -> Vec2 {
        self.current = self.current.lerp(self.target, self.fraction);
        self.current
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaSmoother {
    target: Vec2,
    current: Vec2,
    rate: f32,
}

impl DeltaSmoother {
    pub fn new(start: Vec2, rate: f32) -> Self {
        Self {
            target: start,
            current: start,
            rate: rate.max(0.0),
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }

    pub fn step(&mut self, delta_seconds: f32) -> Vec2 {
        let amount = (delta_seconds.max(0.0) * self.rate).min(1.0);
        self.current = self.current.lerp(self.target, amount);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: Vec2, b: Vec2) -> f32 {
        (a - b).length()
    }

    #[test]
    fn fixed_fraction_converges_without_overshoot() {
        let target = Vec2::new(0.9, 0.1);
        let mut smoother = FixedFractionSmoother::new(Vec2::new(0.5, 0.5), RAYFIELD_POINTER_FRACTION);
        smoother.set_target(target);

        let first = smoother.step();
        assert!((first.x - 0.54).abs() < 1e-6);
        assert!((first.y - 0.46).abs() < 1e-6);

        let mut previous = distance(first, target);
        for _ in 0..200 {
            let current = smoother.step();
            let remaining = distance(current, target);
            assert!(remaining <= previous);
            assert!(current.x <= target.x && current.y >= target.y);
            previous = remaining;
        }
        assert!(previous < 1e-3);
    }

    #[test]
    fn delta_smoother_scales_with_frame_time() {
        let mut fast = DeltaSmoother::new(Vec2::ZERO, WARPFIELD_POINTER_RATE);
        fast.set_target(Vec2::new(1.0, -1.0));
        let step = fast.step(1.0 / 60.0);
        assert!((step.x - 8.0 / 60.0).abs() < 1e-6);

        let mut stalled = DeltaSmoother::new(Vec2::ZERO, WARPFIELD_POINTER_RATE);
        stalled.set_target(Vec2::new(1.0, -1.0));
        assert_eq!(stalled.step(0.0), Vec2::ZERO);
        // A long frame saturates at the target instead of overshooting.
        assert_eq!(stalled.step(0.5), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn delta_smoother_converges_monotonically() {
        let target = Vec2::new(-0.4, 0.7);
        let mut smoother = DeltaSmoother::new(Vec2::ZERO, WARPFIELD_POINTER_RATE);
        smoother.set_target(target);
        let mut previous = distance(smoother.current(), target);
        for frame in 0..240 {
            let delta = if frame % 3 == 0 { 1.0 / 30.0 } else { 1.0 / 144.0 };
            let remaining = distance(smoother.step(delta), target);
            assert!(remaining <= previous + 1e-7);
            previous = remaining;
        }
        assert!(previous < 1e-4);
    }
}
