//! Tweens driven by the frame delta.

use std::f32::consts::TAU;

use instant::Duration;

/// `power1.out`: fast start, gentle stop.
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// One full turn around the y axis, starting at `start` radians.
#[derive(Clone, Debug, PartialEq)]
pub struct Spin {
    start: f32,
    duration: Duration,
    elapsed: Duration,
}

impl Spin {
    pub const DEFAULT_DURATION: Duration = Duration::from_secs(1);

    pub fn new(start: f32, duration: Duration) -> Self {
        Self {
            start,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Current angle. Exactly `start + 2π` once finished.
    pub fn angle(&self) -> f32 {
        if self.is_finished() {
            self.start + TAU
        } else {
            self.start + TAU * ease_out_quad(self.progress())
        }
    }

    pub fn advance(&mut self, dt: Duration) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.angle()
    }
}
