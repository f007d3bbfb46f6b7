//! Print the identity of a scenario.

use tosoku_scenario_model::{PhysicsFields, ScenarioIdentity};

use super::load_scenario;

pub fn run(scenario: &str) -> anyhow::Result<()> {
    let record = load_scenario(scenario)?;
    let fields = PhysicsFields::from_record(&record);

    println!("{}", ScenarioIdentity::from_fields(&fields));
    tracing::debug!(canonical = %fields.canonical_string(), "Identity input");
    Ok(())
}
