//! Finished run records and the personal-best lookup seam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::ScenarioIdentity;

/// The outcome of one finished challenge run. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Wall-clock time the run finished.
    pub timestamp: DateTime<Utc>,

    /// Display name of the scenario at the time of the run.
    pub scenario_label: String,

    /// `"<first speed>-><last speed>"`.
    pub target_label: String,

    /// Percent of the scored duration spent in the zone, two decimals.
    pub score: f64,

    pub identity: ScenarioIdentity,
}

impl RunResult {
    /// Create a result stamped with the current time.
    pub fn new(
        scenario_label: impl Into<String>,
        target_label: impl Into<String>,
        score: f64,
        identity: ScenarioIdentity,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            scenario_label: scenario_label.into(),
            target_label: target_label.into(),
            score: round_score(score),
            identity,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Round a percentage to two decimals.
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Source of previous best scores, keyed by scenario identity.
///
/// Implementations return `0.0` when no run for the identity exists.
pub trait BestScoreLookup {
    fn best_score(&self, identity: &ScenarioIdentity) -> f64;
}

impl BestScoreLookup for [RunResult] {
    fn best_score(&self, identity: &ScenarioIdentity) -> f64 {
        self.iter()
            .filter(|run| &run.identity == identity)
            .map(|run| run.score)
            .fold(0.0, f64::max)
    }
}

impl BestScoreLookup for Vec<RunResult> {
    fn best_score(&self, identity: &ScenarioIdentity) -> f64 {
        self.as_slice().best_score(identity)
    }
}

/// Lookup that never has a previous best.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl BestScoreLookup for NoHistory {
    fn best_score(&self, _identity: &ScenarioIdentity) -> f64 {
        0.0
    }
}
