//! Fixed-cadence speed graph.
//!
//! Points are emitted on the reference clock rather than once per frame,
//! so a 60 Hz and a 240 Hz host draw the same number of points per second.

use std::collections::VecDeque;

use serde::Serialize;
use tosoku_common::clock::FixedStepClock;

use crate::zone::StatusColor;

/// One sample of the speed graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphPoint {
    pub speed: f64,
    pub color: StatusColor,
    pub target_speed: f64,
    pub tolerance: f64,
}

/// Bounded history of graph points fed by a [`FixedStepClock`].
#[derive(Debug, Clone)]
pub struct GraphRecorder {
    points: VecDeque<GraphPoint>,
    capacity: usize,
    clock: FixedStepClock,
}

impl GraphRecorder {
    pub fn new(capacity: usize, clock: FixedStepClock) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
            clock,
        }
    }

    /// Advance the clock by `dt` and push one copy of `point` per elapsed
    /// reference step. Returns how many points were pushed.
    pub fn record(&mut self, dt: f64, point: GraphPoint) -> u32 {
        let steps = self.clock.advance(dt);
        for _ in 0..steps {
            if self.points.len() == self.capacity {
                self.points.pop_front();
            }
            self.points.push_back(point);
        }
        steps
    }

    /// Oldest to newest.
    pub fn points(&self) -> &VecDeque<GraphPoint> {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Residual time not yet turned into a point.
    pub fn pending_secs(&self) -> f64 {
        self.clock.accumulated_secs()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.clock.reset();
    }
}
