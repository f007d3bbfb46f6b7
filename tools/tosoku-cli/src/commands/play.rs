//! Replay a recorded trace through a scenario.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use tosoku_common::config::AppConfig;
use tosoku_run_scorer::{RunMode, RunOutcome, RunSession, SessionConfig};
use tosoku_scenario_model::{RunHistory, ScenarioLibrary};

use super::{load_playable_scenario, load_trace};

/// Machine-readable summary printed with `--json`.
#[derive(Debug, Serialize)]
struct PlaySummary {
    scenario: String,
    target: String,
    identity: String,
    mode: RunMode,
    finished: bool,
    score: f64,
    time_in_zone: f64,
    is_personal_best: bool,
    best_score: f64,
    best_streak: f64,
    frames: usize,
}

pub fn run(
    config: &AppConfig,
    scenario: &str,
    trace_path: PathBuf,
    mode: RunMode,
    history_path: Option<PathBuf>,
    save: bool,
    json: bool,
) -> anyhow::Result<()> {
    let record = load_playable_scenario(scenario)?;
    let trace = load_trace(&trace_path)?;

    let mut library = ScenarioLibrary::load(
        config.library_path(),
        config.storage.max_recent_scenarios,
    )
    .map_err(|e| anyhow::anyhow!("Failed to load scenario library: {e}"))?;
    let label = library.display_name(&record);

    let history_path = history_path.unwrap_or_else(|| config.history_path());
    let mut history = RunHistory::load(&history_path, config.storage.max_history_runs)
        .map_err(|e| anyhow::anyhow!("Failed to load run history: {e}"))?;

    let sensitivity = trace.header.sensitivity;
    info!(
        trace = %trace_path.display(),
        samples = trace.samples.len(),
        sensitivity,
        "Replaying trace"
    );

    let mut session = RunSession::new(
        record.clone(),
        label.clone(),
        mode,
        SessionConfig::from(&config.physics),
    );

    let mut outcome: Option<RunOutcome> = None;
    let mut frames = 0;
    for sample in &trace.samples {
        let report = session.tick(
            sample.dx * sensitivity,
            sample.dy * sensitivity,
            sample.dt,
            &history,
        );
        frames += 1;
        if report.outcome.is_some() {
            outcome = report.outcome;
            break;
        }
    }

    if save {
        if let Err(e) = library.add_recent(&record) {
            warn!("Failed to update recent scenarios: {e}");
        }
        if let Some(ref outcome) = outcome {
            history
                .record(outcome.result.clone())
                .map_err(|e| anyhow::anyhow!("Failed to save run: {e}"))?;
        }
    }

    let scorer = session.scorer();
    let target = session.scenario().target_label();

    if json {
        let summary = PlaySummary {
            scenario: label,
            target,
            identity: session.identity().to_string(),
            mode,
            finished: outcome.is_some(),
            score: outcome
                .as_ref()
                .map_or_else(|| scorer.score(), |o| o.score),
            time_in_zone: scorer.time_in_zone(),
            is_personal_best: outcome.as_ref().is_some_and(|o| o.is_personal_best),
            best_score: outcome.as_ref().map_or(0.0, |o| o.best_score),
            best_streak: scorer.streak().best(),
            frames,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Scenario: {label} ({target})");
    println!("  Identity: {}", session.identity().short(12));
    println!("  Mode: {mode:?}");
    println!(
        "  Trace: {} frames, {:.2}s @ {} Hz",
        trace.samples.len(),
        trace.duration_secs(),
        trace.header.sample_rate_hz
    );
    println!();

    match (&outcome, mode) {
        (Some(outcome), _) => {
            println!("Score: {:.2}%", outcome.score);
            if outcome.is_personal_best {
                if outcome.previous_best > 0.0 {
                    println!("  New personal best! (previous {:.2}%)", outcome.previous_best);
                } else {
                    println!("  New personal best!");
                }
            } else {
                println!("  Personal best: {:.2}%", outcome.best_score);
            }
            println!("  Time in zone: {:.2}s", scorer.time_in_zone());
            println!("  Longest streak: {:.2}s", scorer.streak().best());
            if save {
                println!("  Saved to {}", history.path().display());
            }
        }
        (None, RunMode::Warmup) => {
            println!("Warmup: {:.2}s in zone", scorer.time_in_zone());
            println!("  Longest streak: {:.2}s", scorer.streak().best());
            println!("  Current streak: {:.2}s", scorer.streak().current());
        }
        (None, RunMode::Challenge) => {
            println!(
                "Trace ended before the run finished ({:.2}s of {:.2}s).",
                scorer.timer().max(0.0),
                scorer.duration()
            );
            println!("  Partial score: {:.2}%", scorer.score());
        }
    }

    Ok(())
}
