//! Scenario timelines and target-state interpolation.
//!
//! A scenario is a piecewise-linear schedule of keyframes. Speed and
//! tolerance are interpolated between keyframes; direction constraints are
//! discrete gameplay rules and snap to the previous keyframe until the next
//! one is reached.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::directions::Directions;
use crate::record::ScenarioRecord;

/// A single point on the scenario timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Seconds from the start of the scored run.
    pub time: f64,
    /// Target speed at this point.
    pub speed: f64,
    /// Half-width of the accepted band around `speed`.
    pub tolerance: f64,
    /// Directions that count toward measured speed from this point on.
    pub directions: Directions,
}

impl Keyframe {
    pub fn new(time: f64, speed: f64, tolerance: f64, directions: Directions) -> Self {
        Self {
            time,
            speed,
            tolerance,
            directions,
        }
    }

    fn target(&self) -> TargetState {
        TargetState {
            speed: self.speed,
            tolerance: self.tolerance,
            directions: self.directions,
        }
    }
}

/// The instantaneous target at a given time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetState {
    pub speed: f64,
    pub tolerance: f64,
    pub directions: Directions,
}

impl TargetState {
    /// Lower edge of the accepted band.
    pub fn min_zone(&self) -> f64 {
        self.speed - self.tolerance
    }

    /// Upper edge of the accepted band.
    pub fn max_zone(&self) -> f64 {
        self.speed + self.tolerance
    }
}

/// Legacy two-point scenario: one ramp from `start_speed` to `end_speed`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatScenario {
    pub duration: f64,
    pub start_speed: f64,
    pub end_speed: f64,
    pub tolerance: f64,
    pub directions: Directions,
}

impl FlatScenario {
    /// The two keyframes this scenario stands for.
    pub fn keyframes(&self) -> [Keyframe; 2] {
        [
            Keyframe::new(0.0, self.start_speed, self.tolerance, self.directions),
            Keyframe::new(
                self.duration,
                self.end_speed,
                self.tolerance,
                self.directions,
            ),
        ]
    }

    pub fn state_at(&self, t: f64) -> TargetState {
        interpolate(&self.keyframes(), self.duration, t)
    }
}

/// Multi-segment scenario with an explicit keyframe list.
///
/// Keyframes are kept sorted ascending by time and there is always at
/// least one.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineScenario {
    duration: f64,
    keyframes: Vec<Keyframe>,
}

impl TimelineScenario {
    /// Create a timeline holding a single keyframe.
    pub fn new(duration: f64, first: Keyframe) -> Self {
        Self {
            duration,
            keyframes: vec![first],
        }
    }

    /// Build a timeline from any keyframe sequence. Returns `None` when empty.
    pub fn from_keyframes(
        duration: f64,
        keyframes: impl IntoIterator<Item = Keyframe>,
    ) -> Option<Self> {
        let mut iter = keyframes.into_iter();
        let mut timeline = Self::new(duration, iter.next()?);
        for keyframe in iter {
            timeline.add_keyframe(keyframe);
        }
        Some(timeline)
    }

    /// Insert a keyframe, keeping the list sorted by time.
    ///
    /// A keyframe with the same time as existing ones lands after them.
    pub fn add_keyframe(&mut self, keyframe: Keyframe) {
        let idx = self
            .keyframes
            .partition_point(|existing| existing.time <= keyframe.time);
        self.keyframes.insert(idx, keyframe);
    }

    /// Remove the keyframe at `index`. The last remaining keyframe cannot
    /// be removed.
    pub fn remove_keyframe(&mut self, index: usize) -> Option<Keyframe> {
        if self.keyframes.len() <= 1 || index >= self.keyframes.len() {
            return None;
        }
        Some(self.keyframes.remove(index))
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn state_at(&self, t: f64) -> TargetState {
        interpolate(&self.keyframes, self.duration, t)
    }
}

/// A scenario resolved from a record, ready to be queried every tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Scenario {
    Flat(FlatScenario),
    Timeline(TimelineScenario),
}

impl Scenario {
    /// Resolve a record into a scenario.
    ///
    /// An explicit non-empty timeline is used verbatim (sorted on insert);
    /// otherwise the flat start/end fields become two keyframes at `t=0`
    /// and `t=duration`.
    pub fn from_record(record: &ScenarioRecord) -> Self {
        let duration = record.duration();

        if let Some(entries) = record.explicit_timeline() {
            let keyframes = entries.iter().map(|entry| {
                Keyframe::new(
                    entry.time(),
                    entry.speed(),
                    entry.tolerance(),
                    entry.directions(),
                )
            });
            if let Some(timeline) = TimelineScenario::from_keyframes(duration, keyframes) {
                return Self::Timeline(timeline);
            }
        }

        Self::Flat(FlatScenario {
            duration,
            start_speed: record.start_speed(),
            end_speed: record.end_speed(),
            tolerance: record.tolerance(),
            directions: record.directions(),
        })
    }

    /// Target speed, tolerance and directions at time `t` (seconds).
    pub fn state_at(&self, t: f64) -> TargetState {
        match self {
            Self::Flat(flat) => flat.state_at(t),
            Self::Timeline(timeline) => timeline.state_at(t),
        }
    }

    pub fn duration(&self) -> f64 {
        match self {
            Self::Flat(flat) => flat.duration,
            Self::Timeline(timeline) => timeline.duration,
        }
    }

    pub fn keyframes(&self) -> Cow<'_, [Keyframe]> {
        match self {
            Self::Flat(flat) => Cow::Owned(flat.keyframes().to_vec()),
            Self::Timeline(timeline) => Cow::Borrowed(timeline.keyframes()),
        }
    }

    pub fn first_keyframe(&self) -> Keyframe {
        match self {
            Self::Flat(flat) => flat.keyframes()[0],
            Self::Timeline(timeline) => timeline.keyframes[0],
        }
    }

    pub fn last_keyframe(&self) -> Keyframe {
        match self {
            Self::Flat(flat) => flat.keyframes()[1],
            Self::Timeline(timeline) => timeline.keyframes[timeline.keyframes.len() - 1],
        }
    }

    /// `"<start>-><end>"` in whole speed units, as shown in run history.
    pub fn target_label(&self) -> String {
        format!(
            "{}->{}",
            self.first_keyframe().speed as i64,
            self.last_keyframe().speed as i64
        )
    }

    /// Check the numeric ranges the interpolator assumes.
    ///
    /// The interpolator itself never fails; this is for callers that want
    /// to reject bad input before a run starts.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let duration = self.duration();
        if !(duration > 0.0) {
            return Err(ScenarioError::NonPositiveDuration { duration });
        }

        for keyframe in self.keyframes().iter() {
            if keyframe.time < 0.0 {
                return Err(ScenarioError::NegativeKeyframeTime {
                    time: keyframe.time,
                });
            }
            if keyframe.speed < 0.0 {
                return Err(ScenarioError::NegativeSpeed {
                    time: keyframe.time,
                    speed: keyframe.speed,
                });
            }
            if !(keyframe.tolerance > 0.0) {
                return Err(ScenarioError::NonPositiveTolerance {
                    time: keyframe.time,
                    tolerance: keyframe.tolerance,
                });
            }
        }

        Ok(())
    }

    /// A 20 second demonstration timeline exercising ramps, a sudden stop
    /// and direction switches.
    pub fn remix_example() -> Self {
        let keyframes = [
            Keyframe::new(0.0, 300.0, 50.0, Directions::ALL),
            Keyframe::new(5.0, 800.0, 50.0, Directions::ALL),
            Keyframe::new(10.0, 200.0, 30.0, Directions::HORIZONTAL),
            Keyframe::new(15.0, 1000.0, 100.0, Directions::VERTICAL),
            Keyframe::new(20.0, 1000.0, 100.0, Directions::VERTICAL),
        ];
        let mut timeline = TimelineScenario::new(20.0, keyframes[0]);
        for keyframe in &keyframes[1..] {
            timeline.add_keyframe(*keyframe);
        }
        Self::Timeline(timeline)
    }
}

/// Numeric range problems found by [`Scenario::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScenarioError {
    #[error("duration must be positive, got {duration}")]
    NonPositiveDuration { duration: f64 },

    #[error("keyframe time must not be negative, got {time}")]
    NegativeKeyframeTime { time: f64 },

    #[error("keyframe at {time}s has negative speed {speed}")]
    NegativeSpeed { time: f64, speed: f64 },

    #[error("keyframe at {time}s has non-positive tolerance {tolerance}")]
    NonPositiveTolerance { time: f64, tolerance: f64 },
}

/// Piecewise-linear lookup over keyframes sorted by time.
fn interpolate(keyframes: &[Keyframe], duration: f64, t: f64) -> TargetState {
    if keyframes.is_empty() {
        return TargetState {
            speed: 0.0,
            tolerance: 0.0,
            directions: Directions::ALL,
        };
    }

    let t = t.min(duration).max(0.0);

    let mut prev = 0;
    let mut next = keyframes.len() - 1;
    for (idx, keyframe) in keyframes.iter().enumerate() {
        if keyframe.time > t {
            next = idx;
            break;
        }
        prev = idx;
    }

    if prev == next {
        return keyframes[prev].target();
    }

    let (a, b) = (&keyframes[prev], &keyframes[next]);
    let segment = b.time - a.time;
    if segment <= 0.0 {
        return a.target();
    }

    let progress = (t - a.time) / segment;

    TargetState {
        speed: a.speed + (b.speed - a.speed) * progress,
        tolerance: a.tolerance + (b.tolerance - a.tolerance) * progress,
        directions: a.directions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TimelineEntry;
    use proptest::prelude::*;

    fn ramp() -> Scenario {
        let record = ScenarioRecord::default().with_timeline(vec![
            TimelineEntry::new(0.0, 100.0, 20.0, Directions::ALL),
            TimelineEntry::new(10.0, 500.0, 20.0, Directions::ALL),
        ]);
        Scenario::from_record(&ScenarioRecord {
            duration: Some(10.0),
            ..record
        })
    }

    #[test]
    fn test_midpoint_interpolation() {
        let state = ramp().state_at(5.0);
        assert!((state.speed - 300.0).abs() < 1e-9);
        assert!((state.tolerance - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_is_clamped_to_duration() {
        let scenario = ramp();
        assert_eq!(scenario.state_at(-5.0).speed, 100.0);
        assert_eq!(scenario.state_at(15.0).speed, 500.0);
    }

    #[test]
    fn test_directions_snap_to_previous_keyframe() {
        let record = ScenarioRecord {
            duration: Some(10.0),
            ..ScenarioRecord::default().with_timeline(vec![
                TimelineEntry::new(0.0, 100.0, 20.0, Directions::HORIZONTAL),
                TimelineEntry::new(10.0, 500.0, 40.0, Directions::VERTICAL),
            ])
        };
        let scenario = Scenario::from_record(&record);

        let mid = scenario.state_at(5.0);
        assert_eq!(mid.directions, Directions::HORIZONTAL);
        assert!((mid.tolerance - 30.0).abs() < 1e-9);

        let almost = scenario.state_at(9.999);
        assert_eq!(almost.directions, Directions::HORIZONTAL);

        assert_eq!(scenario.state_at(10.0).directions, Directions::VERTICAL);
    }

    #[test]
    fn test_flat_record_synthesizes_two_keyframes() {
        let record = ScenarioRecord::flat(100.0, 1000.0, 100.0, 10.0);
        let scenario = Scenario::from_record(&record);

        assert!(matches!(scenario, Scenario::Flat(_)));
        let keyframes = scenario.keyframes();
        assert_eq!(keyframes.len(), 2);
        assert_eq!(keyframes[0].time, 0.0);
        assert_eq!(keyframes[0].speed, 100.0);
        assert_eq!(keyframes[1].time, 10.0);
        assert_eq!(keyframes[1].speed, 1000.0);
        assert!((scenario.state_at(2.5).speed - 325.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_timeline_falls_back_to_flat_fields() {
        let record = ScenarioRecord::flat(200.0, 200.0, 30.0, 5.0).with_timeline(vec![]);
        let scenario = Scenario::from_record(&record);
        assert!(matches!(scenario, Scenario::Flat(_)));
        assert_eq!(scenario.state_at(1.0).speed, 200.0);
    }

    #[test]
    fn test_unsorted_timeline_entries_are_sorted_on_insert() {
        let record = ScenarioRecord {
            duration: Some(20.0),
            ..ScenarioRecord::default().with_timeline(vec![
                TimelineEntry::new(10.0, 800.0, 50.0, Directions::ALL),
                TimelineEntry::new(0.0, 300.0, 50.0, Directions::ALL),
                TimelineEntry::new(20.0, 100.0, 50.0, Directions::ALL),
            ])
        };
        let scenario = Scenario::from_record(&record);
        let times: Vec<f64> = scenario.keyframes().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 10.0, 20.0]);
        assert!((scenario.state_at(5.0).speed - 550.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_times_keep_insertion_order() {
        let mut timeline =
            TimelineScenario::new(10.0, Keyframe::new(0.0, 100.0, 10.0, Directions::ALL));
        timeline.add_keyframe(Keyframe::new(5.0, 200.0, 10.0, Directions::ALL));
        timeline.add_keyframe(Keyframe::new(5.0, 900.0, 10.0, Directions::ALL));

        let speeds: Vec<f64> = timeline.keyframes().iter().map(|k| k.speed).collect();
        assert_eq!(speeds, vec![100.0, 200.0, 900.0]);

        // At exactly t=5 the last keyframe at that time is `prev` and there
        // is no later keyframe, so its value is held.
        assert_eq!(timeline.state_at(5.0).speed, 900.0);
    }

    #[test]
    fn test_zero_length_segment_returns_boundary() {
        let timeline = TimelineScenario::from_keyframes(
            10.0,
            [
                Keyframe::new(0.0, 100.0, 10.0, Directions::ALL),
                Keyframe::new(4.0, 300.0, 10.0, Directions::ALL),
                Keyframe::new(4.0, 700.0, 10.0, Directions::ALL),
                Keyframe::new(8.0, 700.0, 10.0, Directions::ALL),
            ],
        )
        .unwrap();
        assert!((timeline.state_at(2.0).speed - 200.0).abs() < 1e-9);
        assert_eq!(timeline.state_at(4.0).speed, 700.0);
        assert_eq!(timeline.state_at(9.0).speed, 700.0);
    }

    #[test]
    fn test_single_keyframe_holds_value() {
        let timeline =
            TimelineScenario::new(10.0, Keyframe::new(0.0, 420.0, 25.0, Directions::VERTICAL));
        for t in [0.0, 3.3, 10.0, 50.0] {
            let state = timeline.state_at(t);
            assert_eq!(state.speed, 420.0);
            assert_eq!(state.tolerance, 25.0);
            assert_eq!(state.directions, Directions::VERTICAL);
        }
    }

    #[test]
    fn test_time_before_first_keyframe_uses_first() {
        let timeline = TimelineScenario::from_keyframes(
            10.0,
            [
                Keyframe::new(2.0, 100.0, 10.0, Directions::ALL),
                Keyframe::new(6.0, 500.0, 10.0, Directions::ALL),
            ],
        )
        .unwrap();
        assert_eq!(timeline.state_at(1.0).speed, 100.0);
        assert!((timeline.state_at(4.0).speed - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_remove_keyframe_keeps_one() {
        let mut timeline =
            TimelineScenario::new(10.0, Keyframe::new(0.0, 100.0, 10.0, Directions::ALL));
        assert!(timeline.remove_keyframe(0).is_none());
        timeline.add_keyframe(Keyframe::new(5.0, 200.0, 10.0, Directions::ALL));
        assert_eq!(timeline.remove_keyframe(1).map(|k| k.speed), Some(200.0));
        assert_eq!(timeline.keyframes().len(), 1);
    }

    #[test]
    fn test_target_label() {
        let scenario = Scenario::from_record(&ScenarioRecord::flat(100.5, 1000.0, 50.0, 10.0));
        assert_eq!(scenario.target_label(), "100->1000");
        assert_eq!(Scenario::remix_example().target_label(), "300->1000");
    }

    #[test]
    fn test_remix_example_shape() {
        let scenario = Scenario::remix_example();
        assert_eq!(scenario.duration(), 20.0);
        assert_eq!(scenario.keyframes().len(), 5);
        assert!((scenario.state_at(2.5).speed - 550.0).abs() < 1e-9);
        assert_eq!(scenario.state_at(12.0).directions, Directions::HORIZONTAL);
        assert_eq!(scenario.state_at(16.0).directions, Directions::VERTICAL);
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_bad_ranges() {
        let zero = Scenario::from_record(&ScenarioRecord::flat(500.0, 500.0, 50.0, 0.0));
        assert_eq!(
            zero.validate(),
            Err(ScenarioError::NonPositiveDuration { duration: 0.0 })
        );

        let negative_tol = Scenario::from_record(&ScenarioRecord::flat(500.0, 500.0, -5.0, 10.0));
        assert!(matches!(
            negative_tol.validate(),
            Err(ScenarioError::NonPositiveTolerance { .. })
        ));

        let negative_speed = Scenario::from_record(&ScenarioRecord::flat(-1.0, 500.0, 5.0, 10.0));
        assert!(matches!(
            negative_speed.validate(),
            Err(ScenarioError::NegativeSpeed { .. })
        ));
    }

    #[test]
    fn test_negative_duration_does_not_panic() {
        let scenario = Scenario::from_record(&ScenarioRecord::flat(100.0, 200.0, 10.0, -3.0));
        let state = scenario.state_at(1.0);
        assert!(state.speed.is_finite());
    }

    proptest! {
        #[test]
        fn prop_speed_stays_between_neighbouring_keyframes(
            start in 0.0f64..2000.0,
            end in 0.0f64..2000.0,
            duration in 0.5f64..120.0,
            t in -10.0f64..200.0,
        ) {
            let scenario = Scenario::from_record(&ScenarioRecord::flat(start, end, 50.0, duration));
            let speed = scenario.state_at(t).speed;
            let lo = start.min(end) - 1e-9;
            let hi = start.max(end) + 1e-9;
            prop_assert!(speed >= lo && speed <= hi);
        }

        #[test]
        fn prop_keyframes_stay_sorted(times in proptest::collection::vec(0.0f64..100.0, 1..20)) {
            let keyframes = times
                .iter()
                .map(|t| Keyframe::new(*t, 100.0, 10.0, Directions::ALL));
            let timeline = TimelineScenario::from_keyframes(100.0, keyframes).unwrap();
            prop_assert!(timeline
                .keyframes()
                .windows(2)
                .all(|pair| pair[0].time <= pair[1].time));
        }
    }
}
