//! Full runs driven by synthetic input.

use std::path::PathBuf;

use tosoku_run_scorer::{RunMode, RunOutcome, RunSession, SessionConfig};
use tosoku_scenario_model::{
    load_scenario_file, MotionSample, NoHistory, RunHistory, Scenario, ScenarioRecord, Trace,
    TraceAxis, DEFAULT_MAX_RUNS,
};

const HZ: f64 = 144.0;
const DT: f64 = 1.0 / HZ;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("scenarios")
        .join(name)
}

fn tracking_500() -> ScenarioRecord {
    load_scenario_file(&fixture("tracking_500.json")).unwrap()
}

/// Play `samples` until the run finishes; panics if it never does.
fn play(session: &mut RunSession, samples: &[MotionSample]) -> RunOutcome {
    for sample in samples {
        let report = session.tick(sample.dx, sample.dy, sample.dt, &NoHistory);
        if let Some(outcome) = report.outcome {
            return outcome;
        }
    }
    panic!("run did not finish after {} samples", samples.len());
}

fn constant(speed: f64, seconds: f64) -> Vec<MotionSample> {
    Trace::constant_speed(speed, seconds, HZ as u32, TraceAxis::X).samples
}

#[test]
fn holding_target_speed_scores_100() {
    let mut session = RunSession::new(tracking_500(), "Tracking", RunMode::Challenge, SessionConfig::default());
    let outcome = play(&mut session, &constant(500.0, 11.0));

    assert_eq!(outcome.score, 100.0);
    assert_eq!(outcome.result.score, 100.0);
    assert!(outcome.is_personal_best);
    assert_eq!(outcome.result.target_label, "500->500");
}

#[test]
fn holding_too_fast_scores_0() {
    let mut session = RunSession::new(tracking_500(), "Tracking", RunMode::Challenge, SessionConfig::default());
    let outcome = play(&mut session, &constant(600.0, 11.0));

    assert_eq!(outcome.score, 0.0);
    assert!(!outcome.is_personal_best);
}

#[test]
fn half_in_zone_scores_about_50() {
    let mut samples = constant(500.0, 5.0);
    samples.extend(constant(600.0, 6.0));

    // One-tick smoothing tracks the input exactly.
    let sharp = tracking_500().with_smoothing(1.0);
    let mut session = RunSession::new(sharp, "Tracking", RunMode::Challenge, SessionConfig::default());
    let outcome = play(&mut session, &samples);
    assert!((outcome.score - 50.0).abs() < 0.5, "score {}", outcome.score);

    // Default smoothing lags the step by a fraction of its span.
    let mut session = RunSession::new(tracking_500(), "Tracking", RunMode::Challenge, SessionConfig::default());
    let outcome = play(&mut session, &samples);
    assert!((outcome.score - 50.0).abs() < 5.0, "score {}", outcome.score);
}

#[test]
fn replaying_a_trace_is_deterministic() {
    // Wobbling input so the score is neither 0 nor 100.
    let samples: Vec<MotionSample> = (0..(11 * 144))
        .map(|i| {
            let speed = 500.0 + 120.0 * (i as f64 * 0.05).sin();
            MotionSample::new(DT, speed * DT, 0.0)
        })
        .collect();

    let run = || {
        let mut session = RunSession::new(tracking_500(), "Tracking", RunMode::Challenge, SessionConfig::default());
        let outcome = play(&mut session, &samples);
        (session.scorer().time_in_zone(), outcome.score)
    };

    let (first_zone, first_score) = run();
    let (second_zone, second_score) = run();
    assert_eq!(first_zone, second_zone);
    assert_eq!(first_score, second_score);
    assert!(first_score > 0.0 && first_score < 100.0);
}

#[test]
fn countdown_does_not_count_toward_score() {
    let record = tracking_500().with_warmup(2.0);
    let mut session = RunSession::new(record, "Tracking", RunMode::Challenge, SessionConfig::default());

    // In zone only during the countdown, then too fast for the whole run.
    let mut samples = constant(500.0, 2.0);
    samples.extend(constant(600.0, 11.0));
    let outcome = play(&mut session, &samples);

    assert!(outcome.score < 5.0, "score {}", outcome.score);
}

#[test]
fn disabled_direction_reads_as_stationary() {
    let record = tracking_500().with_directions(tosoku_scenario_model::Directions::VERTICAL);
    let mut session = RunSession::new(record, "Vertical", RunMode::Challenge, SessionConfig::default());
    let outcome = play(&mut session, &constant(500.0, 11.0));
    assert_eq!(outcome.score, 0.0);
}

#[test]
fn personal_best_uses_run_history() {
    let dir = std::env::temp_dir().join("tosoku-test-e2e-history");
    let _ = std::fs::remove_dir_all(&dir);
    let mut history = RunHistory::load(dir.join("tosoku_stats.json"), DEFAULT_MAX_RUNS).unwrap();

    let mut samples = constant(500.0, 5.0);
    samples.extend(constant(600.0, 6.0));
    let sharp = tracking_500().with_smoothing(1.0);

    let mut outcomes = Vec::new();
    for _ in 0..2 {
        let mut session = RunSession::new(sharp.clone(), "Tracking", RunMode::Challenge, SessionConfig::default());
        let outcome = samples
            .iter()
            .find_map(|s| session.tick(s.dx, s.dy, s.dt, &history).outcome)
            .unwrap();
        history.record(outcome.result.clone()).unwrap();
        outcomes.push(outcome);
    }

    assert!(outcomes[0].is_personal_best);
    assert!(!outcomes[1].is_personal_best);
    assert_eq!(outcomes[1].previous_best, outcomes[0].result.score);
    assert_eq!(history.len(), 2);

    // A perfect run beats both.
    let mut session = RunSession::new(sharp, "Tracking", RunMode::Challenge, SessionConfig::default());
    let outcome = constant(500.0, 11.0)
        .iter()
        .find_map(|s| session.tick(s.dx, s.dy, s.dt, &history).outcome)
        .unwrap();
    assert!(outcome.is_personal_best);
    assert_eq!(outcome.best_score, 100.0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn remix_fixture_matches_builtin_example() {
    let record = load_scenario_file(&fixture("remix.json")).unwrap();
    let scenario = Scenario::from_record(&record);

    assert_eq!(scenario, Scenario::remix_example());
    assert!(scenario.validate().is_ok());
    assert_eq!(scenario.target_label(), "300->1000");

    let mut session = RunSession::new(record, "Remix", RunMode::Challenge, SessionConfig::default());
    let outcome = play(&mut session, &constant(400.0, 25.0));
    assert!(outcome.score > 0.0 && outcome.score < 100.0);
}

#[test]
fn warmup_tracks_streaks_and_never_finishes() {
    let mut session = RunSession::new(tracking_500(), "Tracking", RunMode::Warmup, SessionConfig::default());

    let mut samples = constant(500.0, 3.0);
    samples.extend(constant(800.0, 1.0));
    samples.extend(constant(500.0, 1.0));
    samples.extend(constant(500.0, 10.0));

    for sample in &samples {
        let report = session.tick(sample.dx, sample.dy, sample.dt, &NoHistory);
        assert!(report.outcome.is_none());
    }

    let streak = session.scorer().streak();
    assert!(streak.best() > 10.0);
    assert!(streak.current() > 10.0);
    assert!(!session.is_finished());
}
