//! Write a synthetic constant-speed trace.

use std::path::PathBuf;

use tosoku_scenario_model::{checked_frame_count, Trace, TraceAxis, MAX_SYNTH_FRAMES};

pub fn run(output: PathBuf, speed: f64, seconds: f64, hz: u32, axis: TraceAxis) -> anyhow::Result<()> {
    check_args(speed, seconds, hz)?;

    let trace = Trace::constant_speed(speed, seconds, hz, axis);
    trace
        .save(&output)
        .map_err(|e| anyhow::anyhow!("Failed to write trace: {e}"))?;

    println!(
        "Wrote {} frames ({:.2}s @ {} Hz, {} counts/s) to {}",
        trace.samples.len(),
        trace.duration_secs(),
        hz,
        speed,
        output.display()
    );
    Ok(())
}

fn check_args(speed: f64, seconds: f64, hz: u32) -> anyhow::Result<()> {
    if hz == 0 {
        anyhow::bail!("Sample rate must be at least 1 Hz");
    }
    if !speed.is_finite() {
        anyhow::bail!("Speed must be a finite number, got {speed}");
    }
    if !(seconds > 0.0) || !seconds.is_finite() {
        anyhow::bail!("Trace length must be a positive number of seconds, got {seconds}");
    }
    if checked_frame_count(seconds, hz).is_none() {
        anyhow::bail!("{seconds}s at {hz} Hz exceeds the {MAX_SYNTH_FRAMES} frame limit");
    }
    Ok(())
}
