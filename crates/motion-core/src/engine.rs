//! The motion sample engine.
//!
//! Each frame the engine receives a raw pointer delta, drops the parts
//! that move in disallowed directions, stores the remaining distance with
//! the frame's `dt`, and recomputes a time-based average speed over the
//! configured smoothing span.
//!
//! The smoothing span is given in reference ticks (`smoothing_window /
//! reference_hz` seconds). Walking back over stored samples until that much
//! *simulated time* is covered means a 60 Hz and a 240 Hz host average over
//! the same span and converge on the same speed.

use std::collections::VecDeque;

use tosoku_common::clock::{reference_ticks_to_secs, FixedStepClock, REFERENCE_HZ};
use tosoku_common::config::PhysicsDefaults;
use tosoku_scenario_model::Directions;

use crate::graph::{GraphPoint, GraphRecorder};
use crate::zone::{StatusColor, ZoneStatus};

/// Below this much accumulated history the measured speed is reported as 0.
const MIN_SMOOTHING_SECS: f64 = 1e-4;

/// Engine parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Rate that `smoothing_window` ticks and graph cadence refer to.
    pub reference_hz: f64,
    pub history_capacity: usize,
    pub graph_capacity: usize,
    pub max_graph_steps_per_call: u32,
    /// Smoothing span in reference ticks.
    pub smoothing_window: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&PhysicsDefaults::default())
    }
}

impl From<&PhysicsDefaults> for EngineConfig {
    fn from(physics: &PhysicsDefaults) -> Self {
        Self {
            reference_hz: if physics.reference_hz > 0.0 {
                physics.reference_hz
            } else {
                REFERENCE_HZ
            },
            history_capacity: physics.sample_history_capacity,
            graph_capacity: physics.graph_capacity,
            max_graph_steps_per_call: physics.max_graph_steps_per_tick,
            smoothing_window: physics.smoothing_window as f64,
        }
    }
}

/// One stored frame: its length and the filtered distance travelled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub dt: f64,
    pub distance: f64,
}

/// Result of processing one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReading {
    pub speed: f64,
    pub status: ZoneStatus,
}

impl FrameReading {
    /// Signed distance from the target band, `0.0` when perfect.
    pub fn diff(&self) -> f64 {
        self.status.diff()
    }
}

/// Keep only the components of `(dx, dy)` that move in an allowed direction.
///
/// Negative `dx` is left, positive is right; negative `dy` is up, positive
/// is down. Zero components stay zero.
pub fn filter_axes(dx: f64, dy: f64, directions: Directions) -> (f64, f64) {
    let fx = if (dx < 0.0 && directions.left) || (dx > 0.0 && directions.right) {
        dx
    } else {
        0.0
    };
    let fy = if (dy < 0.0 && directions.up) || (dy > 0.0 && directions.down) {
        dy
    } else {
        0.0
    };
    (fx, fy)
}

/// Raw sample history, smoothing, and the speed graph.
#[derive(Debug, Clone)]
pub struct MotionEngine {
    config: EngineConfig,
    samples: VecDeque<RawSample>,
    graph: GraphRecorder,
}

impl MotionEngine {
    pub fn new(config: EngineConfig) -> Self {
        let history_capacity = config.history_capacity.max(1);
        let graph = GraphRecorder::new(
            config.graph_capacity,
            FixedStepClock::new(config.reference_hz, config.max_graph_steps_per_call),
        );
        Self {
            samples: VecDeque::with_capacity(history_capacity),
            config: EngineConfig {
                history_capacity,
                ..config
            },
            graph,
        }
    }

    /// Feed one frame and classify the resulting smoothed speed.
    pub fn process_frame(
        &mut self,
        dx: f64,
        dy: f64,
        dt: f64,
        target_speed: f64,
        tolerance: f64,
        directions: Directions,
    ) -> FrameReading {
        let (fx, fy) = filter_axes(dx, dy, directions);
        self.push_sample(RawSample {
            dt,
            distance: fx.hypot(fy),
        });

        let speed = self.smoothed_speed();
        FrameReading {
            speed,
            status: ZoneStatus::classify(speed, target_speed, tolerance),
        }
    }

    /// Advance the graph clock by `dt`, recording `speed` once per elapsed
    /// reference step. Returns the number of points recorded.
    pub fn record_graph_point(
        &mut self,
        dt: f64,
        speed: f64,
        color: StatusColor,
        target_speed: f64,
        tolerance: f64,
    ) -> u32 {
        self.graph.record(
            dt,
            GraphPoint {
                speed,
                color,
                target_speed,
                tolerance,
            },
        )
    }

    /// Current time-averaged speed over the smoothing span.
    pub fn smoothed_speed(&self) -> f64 {
        let span = self.smoothing_secs();

        let mut total_time = 0.0;
        let mut total_distance = 0.0;
        for sample in self.samples.iter().rev() {
            total_time += sample.dt;
            total_distance += sample.distance;
            if total_time >= span {
                break;
            }
        }

        if total_time > MIN_SMOOTHING_SECS {
            total_distance / total_time
        } else {
            0.0
        }
    }

    /// Smoothing span in seconds.
    pub fn smoothing_secs(&self) -> f64 {
        reference_ticks_to_secs(self.config.smoothing_window, self.config.reference_hz)
    }

    pub fn smoothing_window(&self) -> f64 {
        self.config.smoothing_window
    }

    /// Set the smoothing span in reference ticks. Negative values clamp to 0.
    pub fn set_smoothing_window(&mut self, ticks: f64) {
        self.config.smoothing_window = ticks.max(0.0);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn samples(&self) -> &VecDeque<RawSample> {
        &self.samples
    }

    pub fn graph(&self) -> &GraphRecorder {
        &self.graph
    }

    pub fn graph_points(&self) -> &VecDeque<GraphPoint> {
        self.graph.points()
    }

    /// Clear sample history, graph, and graph clock.
    pub fn reset(&mut self) {
        self.reset_history();
        self.reset_graph();
    }

    pub fn reset_graph(&mut self) {
        self.graph.clear();
    }

    pub fn reset_history(&mut self) {
        self.samples.clear();
    }

    fn push_sample(&mut self, sample: RawSample) {
        if self.samples.len() == self.config.history_capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }
}

impl Default for MotionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
