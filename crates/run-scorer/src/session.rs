//! One playable run: scenario, motion engine, and scorer wired together.
//!
//! Per frame, in order:
//! 1. clamp `dt`;
//! 2. advance the run timer;
//! 3. query the scenario at `max(0, timer)`;
//! 4. feed the delta to the motion engine;
//! 5. score the frame (and finish the run if the timer ran out);
//! 6. record a graph point.

use tracing::{debug, info};

use tosoku_common::clock::clamp_frame_dt;
use tosoku_common::config::PhysicsDefaults;
use tosoku_motion_core::{EngineConfig, FrameReading, GraphPoint, MotionEngine};
use tosoku_scenario_model::{
    BestScoreLookup, Scenario, ScenarioIdentity, ScenarioRecord, TargetState,
};

use crate::scorer::{RunMode, RunOutcome, RunScorer, RunState};

/// Engine parameters plus the frame-delta clamp.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub engine: EngineConfig,
    pub min_frame_dt: f64,
    pub max_frame_dt: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&PhysicsDefaults::default())
    }
}

impl From<&PhysicsDefaults> for SessionConfig {
    fn from(physics: &PhysicsDefaults) -> Self {
        Self {
            engine: EngineConfig::from(physics),
            min_frame_dt: physics.min_frame_dt,
            max_frame_dt: physics.max_frame_dt,
        }
    }
}

/// What happened during one frame.
#[derive(Debug, Clone)]
pub struct TickReport {
    /// The frame delta after clamping.
    pub dt: f64,
    /// Run timer after this frame; negative during the countdown.
    pub timer: f64,
    pub target: TargetState,
    pub reading: FrameReading,
    /// Whether in-zone audio/visual feedback should play for this frame.
    pub feedback_active: bool,
    pub state: RunState,
    /// Set only on the frame that finishes a challenge.
    pub outcome: Option<RunOutcome>,
}

/// A scenario being played.
#[derive(Debug, Clone)]
pub struct RunSession {
    record: ScenarioRecord,
    scenario: Scenario,
    identity: ScenarioIdentity,
    label: String,
    mode: RunMode,
    config: SessionConfig,
    engine: MotionEngine,
    scorer: RunScorer,
    outcome: Option<RunOutcome>,
}

impl RunSession {
    /// Resolve `record` and start a run immediately.
    ///
    /// `label` is the display name stored with the result.
    pub fn new(
        record: ScenarioRecord,
        label: impl Into<String>,
        mode: RunMode,
        config: SessionConfig,
    ) -> Self {
        let scenario = Scenario::from_record(&record);
        let identity = ScenarioIdentity::of(&record);
        let engine = MotionEngine::new(config.engine.clone());

        let mut session = Self {
            record,
            scenario,
            identity,
            label: label.into(),
            mode,
            config,
            engine,
            scorer: RunScorer::new(),
            outcome: None,
        };
        session.restart();
        session
    }

    /// Start over: clear the engine, reapply the scenario's smoothing, and
    /// restart the timer and countdown.
    pub fn restart(&mut self) {
        self.engine.reset();
        self.engine.set_smoothing_window(self.record.smoothing());
        self.scorer.start(
            self.mode,
            self.scenario.duration(),
            self.record.warmup_time(),
        );
        self.outcome = None;

        info!(
            scenario = %self.label,
            mode = ?self.mode,
            duration = self.scenario.duration(),
            warmup = self.record.warmup_time(),
            identity = %self.identity.short(12),
            "Run started"
        );
    }

    /// Process one frame of pointer motion.
    ///
    /// `history` supplies the previous best when the frame finishes the run.
    pub fn tick<H>(&mut self, dx: f64, dy: f64, dt: f64, history: &H) -> TickReport
    where
        H: BestScoreLookup + ?Sized,
    {
        let dt = clamp_frame_dt(dt, self.config.min_frame_dt, self.config.max_frame_dt);

        let scenario_time = self.scorer.advance(dt);
        let target = self.scenario.state_at(scenario_time);
        let reading = self.engine.process_frame(
            dx,
            dy,
            dt,
            target.speed,
            target.tolerance,
            target.directions,
        );

        let feedback_active = self.scorer.is_scoring();
        let finished = self.scorer.record_frame(dt, reading.status.is_perfect());

        let outcome = if finished {
            let outcome = self.scorer.conclude(
                self.identity.clone(),
                &self.label,
                &self.scenario.target_label(),
                history,
            );
            self.outcome = Some(outcome.clone());
            Some(outcome)
        } else {
            None
        };

        let points = self.engine.record_graph_point(
            dt,
            reading.speed,
            reading.status.color(),
            target.speed,
            target.tolerance,
        );
        if points > 1 {
            debug!(points, dt, "Graph caught up after a long frame");
        }

        TickReport {
            dt,
            timer: self.scorer.timer(),
            target,
            reading,
            feedback_active,
            state: self.scorer.state(),
            outcome,
        }
    }

    pub fn record(&self) -> &ScenarioRecord {
        &self.record
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn identity(&self) -> &ScenarioIdentity {
        &self.identity
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn engine(&self) -> &MotionEngine {
        &self.engine
    }

    pub fn scorer(&self) -> &RunScorer {
        &self.scorer
    }

    pub fn graph_points(&self) -> impl Iterator<Item = &GraphPoint> {
        self.engine.graph_points().iter()
    }

    /// The finished run's outcome, once there is one.
    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.scorer.state() == RunState::Finished
    }
}
