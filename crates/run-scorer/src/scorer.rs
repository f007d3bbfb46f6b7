//! Run state machine and scoring.
//!
//! A challenge run counts up from `-warmup` seconds. Time before zero is a
//! countdown: the player can move but nothing is scored. Once the timer
//! reaches the scenario duration the run finishes, the timer is pinned to
//! the duration, and the score is the share of the duration spent in the
//! zone. Warmup runs never finish.

use serde::Serialize;
use tracing::info;

use tosoku_scenario_model::{round_score, BestScoreLookup, RunResult, ScenarioIdentity};

use crate::warmup::WarmupStreak;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Timed, scored, recorded to history.
    Challenge,
    /// Untimed practice.
    Warmup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Finished,
}

/// Final result of a challenge run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Percentage in `[0, 100]`, rounded to two decimals.
    pub score: f64,
    pub is_personal_best: bool,
    /// Best score on record before this run, `0.0` if none.
    pub previous_best: f64,
    /// Best score to show after this run.
    pub best_score: f64,
    /// Record to append to the run history.
    pub result: RunResult,
}

/// Timer, time-in-zone accumulator, and lifecycle for one run.
#[derive(Debug, Clone)]
pub struct RunScorer {
    mode: RunMode,
    state: RunState,
    timer: f64,
    duration: f64,
    time_in_zone: f64,
    streak: WarmupStreak,
}

impl RunScorer {
    pub fn new() -> Self {
        Self {
            mode: RunMode::Challenge,
            state: RunState::Idle,
            timer: 0.0,
            duration: 0.0,
            time_in_zone: 0.0,
            streak: WarmupStreak::default(),
        }
    }

    /// Begin a run. In challenge mode the timer starts at `-warmup_secs`.
    pub fn start(&mut self, mode: RunMode, duration: f64, warmup_secs: f64) {
        self.mode = mode;
        self.state = RunState::Running;
        self.duration = duration;
        self.time_in_zone = 0.0;
        self.streak.reset();
        self.timer = match mode {
            RunMode::Challenge => -warmup_secs.max(0.0),
            RunMode::Warmup => 0.0,
        };
    }

    /// Advance the run timer and return the scenario time to query,
    /// `max(0, timer)`. Outside a running run the timer is left alone.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if self.state == RunState::Running {
            self.timer += dt;
        }
        self.scenario_time()
    }

    /// Account for one processed frame. Returns `true` on the frame that
    /// finishes the run.
    pub fn record_frame(&mut self, dt: f64, perfect: bool) -> bool {
        if !self.is_scoring() {
            return false;
        }

        if perfect {
            self.time_in_zone += dt;
        }
        self.streak.update(dt, perfect);

        if self.mode == RunMode::Challenge && self.timer >= self.duration {
            self.state = RunState::Finished;
            self.timer = self.duration;
            return true;
        }
        false
    }

    /// Whether the current frame counts: always in warmup, and in a running
    /// challenge once the countdown is over.
    pub fn is_scoring(&self) -> bool {
        self.state == RunState::Running && (self.mode == RunMode::Warmup || self.timer >= 0.0)
    }

    /// Percentage of the duration spent in the zone, clamped to `[0, 100]`.
    pub fn score(&self) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.time_in_zone / self.duration * 100.0).clamp(0.0, 100.0)
    }

    /// Resolve the finished run against previous bests.
    ///
    /// A run is a personal best only if it beats the previous best and is
    /// above zero. Both sides of the comparison are two-decimal scores.
    pub fn conclude<H>(
        &self,
        identity: ScenarioIdentity,
        scenario_label: &str,
        target_label: &str,
        history: &H,
    ) -> RunOutcome
    where
        H: BestScoreLookup + ?Sized,
    {
        let score = round_score(self.score());
        let previous_best = history.best_score(&identity);
        let is_personal_best = score > previous_best && score > 0.0;
        let best_score = if is_personal_best {
            score
        } else {
            previous_best
        };

        info!(
            scenario = scenario_label,
            score,
            previous_best,
            is_personal_best,
            "Run finished"
        );

        RunOutcome {
            score,
            is_personal_best,
            previous_best,
            best_score,
            result: RunResult::new(scenario_label, target_label, score, identity),
        }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Seconds since scoring began; negative during the countdown.
    pub fn timer(&self) -> f64 {
        self.timer
    }

    pub fn scenario_time(&self) -> f64 {
        self.timer.max(0.0)
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn time_in_zone(&self) -> f64 {
        self.time_in_zone
    }

    pub fn streak(&self) -> &WarmupStreak {
        &self.streak
    }
}

impl Default for RunScorer {
    fn default() -> Self {
        Self::new()
    }
}
