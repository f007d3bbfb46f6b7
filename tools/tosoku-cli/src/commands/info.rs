//! Show scenario details.

use tosoku_common::config::AppConfig;
use tosoku_scenario_model::{auto_name, Scenario, ScenarioIdentity, ScenarioLibrary};

use super::load_scenario;

pub fn run(config: &AppConfig, scenario: &str, samples: usize) -> anyhow::Result<()> {
    let record = load_scenario(scenario)?;
    let resolved = Scenario::from_record(&record);

    // A missing or unreadable library only costs us the local name.
    let name = match ScenarioLibrary::load(config.library_path(), config.storage.max_recent_scenarios) {
        Ok(library) => library.display_name(&record),
        Err(e) => {
            tracing::debug!("Library unavailable: {e}");
            auto_name(&record)
        }
    };

    println!("Scenario: {name}");
    println!("  Generated name: {}", auto_name(&record));
    if let Some(ref author) = record.author {
        println!("  Author: {author}");
    }
    if let Some(ref description) = record.description {
        println!("  Description: {description}");
    }
    println!("  Identity: {}", ScenarioIdentity::of(&record));
    println!();

    println!("Physics:");
    println!("  Duration: {}s", resolved.duration());
    println!("  Countdown: {}s", record.warmup_time());
    println!("  Smoothing: {} ticks", record.smoothing());
    println!("  Zoom: {}", record.zoom_scale());
    println!("  Target: {}", resolved.target_label());
    match resolved.validate() {
        Ok(()) => println!("  Ranges: ok"),
        Err(e) => println!("  Ranges: {e}"),
    }
    println!();

    let keyframes = resolved.keyframes();
    println!("Keyframes ({}):", keyframes.len());
    for keyframe in keyframes.iter() {
        println!(
            "  {:>6.2}s  {:>7.1} ±{:<6.1} {}",
            keyframe.time,
            keyframe.speed,
            keyframe.tolerance,
            keyframe.directions.glyph()
        );
    }

    if samples > 0 {
        println!();
        println!("Target curve:");
        let steps = samples.max(2) - 1;
        for i in 0..=steps {
            let t = resolved.duration() * i as f64 / steps as f64;
            let state = resolved.state_at(t);
            println!(
                "  {:>6.2}s  {:>7.1} [{:.1}, {:.1}] {}",
                t,
                state.speed,
                state.min_zone(),
                state.max_zone(),
                state.directions.glyph()
            );
        }
    }

    Ok(())
}
