//! Tosoku Run Scorer
//!
//! Owns the lifecycle of a run and turns per-frame zone status into a score:
//! - **Scorer:** `Idle -> Running -> Finished` with a warmup countdown,
//!   time-in-zone accounting, and personal-best resolution
//! - **Warmup streaks:** current and best runs of continuous in-zone time
//! - **Sessions:** the full per-frame chain of timeline, motion engine,
//!   scorer, and speed graph
//!
//! Nothing in here touches the filesystem; previous bests come in through
//! [`BestScoreLookup`](tosoku_scenario_model::BestScoreLookup).

pub mod scorer;
pub mod session;
pub mod warmup;

pub use scorer::{RunMode, RunOutcome, RunScorer, RunState};
pub use session::{RunSession, SessionConfig, TickReport};
pub use warmup::WarmupStreak;
