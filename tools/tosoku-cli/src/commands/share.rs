//! Share code export and import.

use std::path::PathBuf;

use tosoku_common::config::AppConfig;
use tosoku_common::error::TosokuError;
use tosoku_scenario_model::{share_code, ScenarioLibrary};

use super::{load_scenario, write_scenario};

pub fn encode(scenario: &str) -> anyhow::Result<()> {
    let record = load_scenario(scenario)?;
    let code = share_code::encode(&record).map_err(|e| TosokuError::share_code(e.to_string()))?;
    println!("{code}");
    Ok(())
}

pub fn decode(
    config: &AppConfig,
    code: &str,
    output: Option<PathBuf>,
    import: bool,
) -> anyhow::Result<()> {
    let record = share_code::decode(code).map_err(|e| TosokuError::share_code(e.to_string()))?;
    match output {
        Some(path) => {
            write_scenario(&path, &record)?;
            println!("Scenario written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&record)?),
    }

    if import {
        let mut library =
            ScenarioLibrary::load(config.library_path(), config.storage.max_recent_scenarios)
                .map_err(|e| anyhow::anyhow!("Failed to load scenario library: {e}"))?;
        library
            .add_imported(&record)
            .map_err(|e| anyhow::anyhow!("Failed to import scenario: {e}"))?;
        eprintln!("Imported \"{}\"", library.display_name(&record));
    }

    Ok(())
}
