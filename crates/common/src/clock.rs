//! Fixed-step clock utilities.
//!
//! Tosoku treats 144 Hz as the reference rate for everything that must
//! feel identical regardless of the host frame rate: the smoothing window
//! is expressed in reference ticks, and the speed graph is sampled at the
//! reference cadence. Real frames arrive at whatever rate the host manages,
//! so this module converts variable `dt` values into whole reference steps.

/// The reference simulation rate in Hz.
pub const REFERENCE_HZ: f64 = 144.0;

/// Default cap on how many steps a single `advance` may emit.
pub const DEFAULT_MAX_STEPS_PER_ADVANCE: u32 = 20;

/// Converts variable frame times into a fixed number of reference steps.
///
/// Accumulated time is simulation time, never wall-clock time, so the
/// output only depends on the sequence of `dt` values fed in.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step_secs: f64,
    accumulated_secs: f64,
    max_steps_per_advance: u32,
}

impl FixedStepClock {
    /// Create a clock stepping at `rate_hz`, emitting at most
    /// `max_steps_per_advance` steps per call.
    pub fn new(rate_hz: f64, max_steps_per_advance: u32) -> Self {
        debug_assert!(rate_hz > 0.0, "step rate must be positive");
        Self {
            step_secs: 1.0 / rate_hz,
            accumulated_secs: 0.0,
            max_steps_per_advance,
        }
    }

    /// Clock at the 144 Hz reference rate with the default step cap.
    pub fn reference() -> Self {
        Self::new(REFERENCE_HZ, DEFAULT_MAX_STEPS_PER_ADVANCE)
    }

    /// Feed `dt` seconds and return how many whole steps elapsed.
    ///
    /// After a stall (minimized window, debugger) the accumulator could hold
    /// seconds of backlog. Hitting the step cap drops whatever is left
    /// instead of emitting it over the following frames.
    pub fn advance(&mut self, dt: f64) -> u32 {
        self.accumulated_secs += dt;

        let mut steps = 0;
        while self.accumulated_secs >= self.step_secs && steps < self.max_steps_per_advance {
            self.accumulated_secs -= self.step_secs;
            steps += 1;
        }

        if steps >= self.max_steps_per_advance {
            self.accumulated_secs = 0.0;
        }

        steps
    }

    /// Drop any residual time.
    pub fn reset(&mut self) {
        self.accumulated_secs = 0.0;
    }

    /// Length of one step in seconds.
    pub fn step_secs(&self) -> f64 {
        self.step_secs
    }

    /// Residual time not yet emitted as a step.
    pub fn accumulated_secs(&self) -> f64 {
        self.accumulated_secs
    }

    pub fn max_steps_per_advance(&self) -> u32 {
        self.max_steps_per_advance
    }
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::reference()
    }
}

/// Convert a count of reference ticks to seconds.
pub fn reference_ticks_to_secs(ticks: f64, reference_hz: f64) -> f64 {
    if reference_hz <= 0.0 {
        return 0.0;
    }
    ticks / reference_hz
}

/// Clamp a frame delta into a sane range before it reaches the physics.
pub fn clamp_frame_dt(dt: f64, min_secs: f64, max_secs: f64) -> f64 {
    if dt.is_nan() {
        return min_secs;
    }
    dt.clamp(min_secs, max_secs)
}
