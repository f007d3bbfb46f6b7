//! Flat scenario records as produced by the editor, scenario files, and
//! share codes.
//!
//! Every field is optional on the wire. Missing values resolve to the
//! defaults below; the accessors on [`ScenarioRecord`] always return the
//! resolved value.

use serde::{Deserialize, Serialize};

use crate::directions::Directions;

/// Target speed used when a record omits one.
pub const DEFAULT_SPEED: f64 = 500.0;

/// Tolerance used when a record or timeline entry omits one.
pub const DEFAULT_TOLERANCE: f64 = 75.0;

/// Run length in seconds used when a record omits one.
pub const DEFAULT_DURATION_SECS: f64 = 10.0;

/// Smoothing window in reference ticks.
pub const DEFAULT_SMOOTHING: f64 = 75.0;

/// Graph zoom used by the presentation layer.
pub const DEFAULT_ZOOM_SCALE: f64 = 3.0;

/// Countdown before scoring starts, in seconds.
pub const DEFAULT_WARMUP_SECS: f64 = 0.0;

/// A scenario as stored on disk or exchanged through share codes.
///
/// `name`, `author` and `description` are metadata; everything else is
/// physics and participates in the scenario identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_speed: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_speed: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,

    /// Run length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Smoothing window in 144 Hz reference ticks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_scale: Option<f64>,

    /// Countdown before scoring starts, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmup_time: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub directions: Option<Directions>,

    /// Explicit keyframe list. Takes precedence over the flat speed fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Vec<TimelineEntry>>,
}

/// One keyframe as written in a scenario record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub directions: Option<Directions>,
}

impl ScenarioRecord {
    /// A flat constant-or-ramp scenario with every physics field set.
    pub fn flat(start_speed: f64, end_speed: f64, tolerance: f64, duration: f64) -> Self {
        Self {
            start_speed: Some(start_speed),
            end_speed: Some(end_speed),
            tolerance: Some(tolerance),
            duration: Some(duration),
            smoothing: Some(DEFAULT_SMOOTHING),
            zoom_scale: Some(DEFAULT_ZOOM_SCALE),
            warmup_time: Some(DEFAULT_WARMUP_SECS),
            directions: Some(Directions::ALL),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_directions(mut self, directions: Directions) -> Self {
        self.directions = Some(directions);
        self
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = Some(smoothing);
        self
    }

    pub fn with_warmup(mut self, warmup_secs: f64) -> Self {
        self.warmup_time = Some(warmup_secs);
        self
    }

    pub fn with_timeline(mut self, timeline: Vec<TimelineEntry>) -> Self {
        self.timeline = Some(timeline);
        self
    }

    pub fn start_speed(&self) -> f64 {
        self.start_speed.unwrap_or(DEFAULT_SPEED)
    }

    pub fn end_speed(&self) -> f64 {
        self.end_speed.unwrap_or(DEFAULT_SPEED)
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance.unwrap_or(DEFAULT_TOLERANCE)
    }

    pub fn duration(&self) -> f64 {
        self.duration.unwrap_or(DEFAULT_DURATION_SECS)
    }

    pub fn smoothing(&self) -> f64 {
        self.smoothing.unwrap_or(DEFAULT_SMOOTHING)
    }

    pub fn zoom_scale(&self) -> f64 {
        self.zoom_scale.unwrap_or(DEFAULT_ZOOM_SCALE)
    }

    pub fn warmup_time(&self) -> f64 {
        self.warmup_time.unwrap_or(DEFAULT_WARMUP_SECS)
    }

    pub fn directions(&self) -> Directions {
        self.directions.unwrap_or_default()
    }

    /// The explicit timeline, if present and non-empty.
    pub fn explicit_timeline(&self) -> Option<&[TimelineEntry]> {
        self.timeline.as_deref().filter(|entries| !entries.is_empty())
    }

    /// Copy of this record with metadata stripped.
    pub fn physics_only(&self) -> Self {
        Self {
            name: None,
            author: None,
            description: None,
            ..self.clone()
        }
    }
}

impl TimelineEntry {
    pub fn new(time: f64, speed: f64, tolerance: f64, directions: Directions) -> Self {
        Self {
            time: Some(time),
            speed: Some(speed),
            tolerance: Some(tolerance),
            directions: Some(directions),
        }
    }

    pub fn time(&self) -> f64 {
        self.time.unwrap_or(0.0)
    }

    pub fn speed(&self) -> f64 {
        self.speed.unwrap_or(DEFAULT_SPEED)
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance.unwrap_or(DEFAULT_TOLERANCE)
    }

    pub fn directions(&self) -> Directions {
        self.directions.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_resolves_defaults() {
        let record: ScenarioRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.start_speed(), 500.0);
        assert_eq!(record.end_speed(), 500.0);
        assert_eq!(record.tolerance(), 75.0);
        assert_eq!(record.duration(), 10.0);
        assert_eq!(record.smoothing(), 75.0);
        assert_eq!(record.zoom_scale(), 3.0);
        assert_eq!(record.warmup_time(), 0.0);
        assert_eq!(record.directions(), Directions::ALL);
        assert!(record.explicit_timeline().is_none());
    }

    #[test]
    fn test_parses_editor_record_with_integers() {
        let raw = r#"{
            "name": "Standard Horizontal",
            "start_speed": 500, "end_speed": 500, "tolerance": 75,
            "duration": 10, "smoothing": 75, "zoom_scale": 2, "warmup_time": 1,
            "directions": [false, false, true, true]
        }"#;
        let record: ScenarioRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.name.as_deref(), Some("Standard Horizontal"));
        assert_eq!(record.zoom_scale(), 2.0);
        assert_eq!(record.warmup_time(), 1.0);
        assert_eq!(record.directions(), Directions::HORIZONTAL);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let raw = r#"{"start_speed": 300, "hash": "abc", "is_pb": true}"#;
        let record: ScenarioRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.start_speed(), 300.0);
    }

    #[test]
    fn test_timeline_entry_defaults() {
        let entry: TimelineEntry = serde_json::from_str(r#"{"time": 4}"#).unwrap();
        assert_eq!(entry.time(), 4.0);
        assert_eq!(entry.speed(), 500.0);
        assert_eq!(entry.tolerance(), 75.0);
        assert_eq!(entry.directions(), Directions::ALL);
    }

    #[test]
    fn test_empty_timeline_is_not_explicit() {
        let record = ScenarioRecord::default().with_timeline(vec![]);
        assert!(record.explicit_timeline().is_none());
    }

    #[test]
    fn test_serialization_skips_missing_fields() {
        let record = ScenarioRecord {
            start_speed: Some(250.0),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"start_speed":250.0}"#);
    }

    #[test]
    fn test_physics_only_strips_metadata() {
        let mut record = ScenarioRecord::flat(500.0, 500.0, 50.0, 10.0).with_name("Mine");
        record.author = Some("someone".to_string());
        let physics = record.physics_only();
        assert!(physics.name.is_none());
        assert!(physics.author.is_none());
        assert_eq!(physics.tolerance, Some(50.0));
    }
}
