//! Fixed-timestep scheduler.
//!
//! Wall-clock time is fed into an accumulator once per outer loop iteration;
//! the loop then calls [`TimeState::should_step`] until it returns false, each
//! `true` consuming exactly one tick. A stalled process therefore runs several
//! ticks back-to-back before the next render (catch-up, never frame-skip).
//! There is no interpolation between ticks.

use std::time::Instant;

pub const TICK_HZ: f64 = 60.0;

/// Frames longer than this are logged; they are still caught up in full
/// unless `max_backlog` is set.
const LONG_FRAME_SECS: f64 = 0.25;

pub struct TimeState {
    pub fixed_dt: f64,
    /// Optional ceiling on the accumulated backlog in seconds. `None` means
    /// every owed tick is simulated.
    pub max_backlog: Option<f64>,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            fixed_dt: 1.0 / TICK_HZ,
            max_backlog: None,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(real_dt);
    }

    /// Feed `real_dt` seconds of elapsed time and start a new outer iteration.
    pub fn advance(&mut self, real_dt: f64) {
        self.real_dt = real_dt.max(0.0);

        if self.real_dt > LONG_FRAME_SECS {
            log::warn!(
                "Frame took {:.1}ms; catching up {} ticks",
                self.real_dt * 1000.0,
                ((self.accumulator + self.real_dt) / self.fixed_dt).floor()
            );
        }

        self.accumulator += self.real_dt;
        if let Some(cap) = self.max_backlog {
            self.accumulator = self.accumulator.min(cap);
        }
        self.steps_this_frame = 0;
        self.frame_count += 1;
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Seconds of simulation time owed but not yet stepped.
    pub fn backlog(&self) -> f64 {
        self.accumulator
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
