//! Generated display names for unnamed scenarios.

use crate::record::ScenarioRecord;

/// Build the auto name for a record.
///
/// Format: `[DIR] [SPEED] ±[TOL] (sm[S] z[Z] b[B] [D]s)`, for example
/// `↔ 500→1000 ±50 (sm15 z3 b0 15s)`. The speed part collapses to a single
/// value when start and end match.
pub fn auto_name(record: &ScenarioRecord) -> String {
    let start = record.start_speed();
    let end = record.end_speed();

    let speed = if start == end {
        format_speed(start)
    } else {
        format!("{}→{}", format_speed(start), format_speed(end))
    };

    format!(
        "{} {} ±{} (sm{} z{} b{} {}s)",
        record.directions().glyph(),
        speed,
        record.tolerance().trunc() as i64,
        record.smoothing().trunc() as i64,
        record.zoom_scale().trunc() as i64,
        record.warmup_time().trunc() as i64,
        record.duration().trunc() as i64,
    )
}

fn format_speed(speed: f64) -> String {
    if speed.fract() == 0.0 {
        format!("{}", speed as i64)
    } else {
        format!("{speed}")
    }
}
