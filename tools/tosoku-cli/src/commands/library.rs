//! List the scenario library.

use std::path::PathBuf;

use tosoku_common::config::AppConfig;
use tosoku_scenario_model::{load_scenario_dir, ScenarioIdentity, ScenarioLibrary, ScenarioRecord};

pub fn run(config: &AppConfig, library_path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = library_path.unwrap_or_else(|| config.library_path());
    let library = ScenarioLibrary::load(&path, config.storage.max_recent_scenarios)
        .map_err(|e| anyhow::anyhow!("Failed to load scenario library: {e}"))?;

    println!("Library: {}", library.path().display());
    println!();

    println!("Local ({}):", library.local_scenarios().len());
    for entry in library.local_scenarios() {
        println!("  {}  {}", entry.identity.short(12), entry.name);
    }

    print_list(&library, "Recent", library.recents());
    print_list(&library, "Imported", library.imported());

    let dir = config.scenarios_dir();
    if dir.is_dir() {
        let files = load_scenario_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", dir.display()))?;
        print_list(&library, "Scenario files", &files);
    }

    Ok(())
}

fn print_list(library: &ScenarioLibrary, title: &str, records: &[ScenarioRecord]) {
    println!();
    println!("{title} ({}):", records.len());
    for record in records {
        println!(
            "  {}  {}",
            ScenarioIdentity::of(record).short(12),
            library.display_name(record)
        );
    }
}
