//! List recent runs.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Local;
use tosoku_common::config::AppConfig;
use tosoku_scenario_model::{RunHistory, ScenarioIdentity};

pub fn run(config: &AppConfig, history_path: Option<PathBuf>, limit: usize) -> anyhow::Result<()> {
    let path = history_path.unwrap_or_else(|| config.history_path());
    let history = RunHistory::load(&path, config.storage.max_history_runs)
        .map_err(|e| anyhow::anyhow!("Failed to load run history: {e}"))?;

    if history.is_empty() {
        println!("No runs recorded in {}", path.display());
        return Ok(());
    }

    let mut bests: HashMap<&ScenarioIdentity, f64> = HashMap::new();
    for run in history.runs() {
        let best = bests.entry(&run.identity).or_insert(0.0);
        *best = best.max(run.score);
    }

    let shown = history.recent(limit);
    println!("Recent runs ({} of {}):", shown.len(), history.len());
    for run in shown {
        let is_best = bests.get(&run.identity).is_some_and(|b| *b == run.score && run.score > 0.0);
        println!(
            "  {}  {:>6.2}%{} {} ({})",
            run.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            run.score,
            if is_best { "*" } else { " " },
            run.scenario_label,
            run.target_label
        );
    }
    println!();
    println!("* best score for that scenario");

    Ok(())
}
