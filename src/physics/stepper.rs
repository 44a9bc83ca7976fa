use bevy::log::debug;

/// Converts variable frame time into a whole number of fixed steps.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedStepper {
    dt: f32,
    max_steps_per_frame: u32,
    accumulator: f32,
    dropped_steps: u64,
}

impl FixedStepper {
    pub fn new(dt: f32, max_steps_per_frame: u32) -> Self {
        Self {
            dt: if dt.is_finite() && dt > 0.0 { dt } else { 1.0 / 60.0 },
            max_steps_per_frame: max_steps_per_frame.max(1),
            accumulator: 0.0,
            dropped_steps: 0,
        }
    }

    /// Adds `frame_dt` seconds and returns how many fixed steps to run now.
    /// Backlog past `max_steps_per_frame` is discarded.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }
        // Small tolerance so 1/60 + 1/60 + 1/60 yields 3 steps despite rounding.
        let eps = self.dt * 1e-4;
        let mut steps = 0u32;
        while self.accumulator + eps >= self.dt && steps < self.max_steps_per_frame {
            self.accumulator -= self.dt;
            steps += 1;
        }
        if self.accumulator + eps >= self.dt {
            let dropped = ((self.accumulator + eps) / self.dt).floor();
            self.accumulator -= dropped * self.dt;
            self.dropped_steps += dropped as u64;
            debug!(
                target: "session",
                "stepper dropped {} steps (frame_dt={:.3})", dropped, frame_dt
            );
        }
        self.accumulator = self.accumulator.max(0.0);
        steps
    }

    /// Leftover fraction of a step in `[0, 1)`.
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.dt).clamp(0.0, 1.0)
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn dropped_steps(&self) -> u64 {
        self.dropped_steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
