pub mod history;
pub mod identity;
pub mod info;
pub mod library;
pub mod play;
pub mod share;
pub mod synth;

use std::path::Path;

use tosoku_common::error::{TosokuError, TosokuResult};
use tosoku_scenario_model::{load_scenario_file, share_code, Scenario, ScenarioRecord, Trace};

/// Resolve a `<SCENARIO>` argument: a `TSK1:` share code or a JSON file.
pub fn load_scenario(input: &str) -> TosokuResult<ScenarioRecord> {
    if share_code::looks_like_share_code(input) {
        return share_code::decode(input).map_err(|e| TosokuError::share_code(e.to_string()));
    }

    let path = Path::new(input);
    if !path.exists() {
        return Err(TosokuError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    load_scenario_file(path).map_err(|e| TosokuError::storage(e.to_string()))
}

/// Resolve a `<SCENARIO>` argument and reject ranges a run cannot use.
pub fn load_playable_scenario(input: &str) -> TosokuResult<ScenarioRecord> {
    let record = load_scenario(input)?;
    Scenario::from_record(&record)
        .validate()
        .map_err(|e| TosokuError::scenario(e.to_string()))?;
    Ok(record)
}

/// Write a scenario record as pretty JSON, creating parent directories.
pub fn write_scenario(path: &Path, record: &ScenarioRecord) -> TosokuResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(record)?)?;
    Ok(())
}

pub fn load_trace(path: &Path) -> TosokuResult<Trace> {
    if !path.exists() {
        return Err(TosokuError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Trace::load(path).map_err(|e| TosokuError::trace(e.to_string()))
}
