//! Scenario identity: a content hash over physics fields only.
//!
//! Two scenarios that play identically must share an identity even if
//! their names, authors or descriptions differ, because the identity is
//! the join key for personal-best lookups and library deduplication.
//!
//! The hash input is a fixed struct written in canonical field order.
//! Top-level numbers are truncated to integers so `15.0` and `15` match.
//! Timeline values are kept at millisecond / milli-unit resolution so
//! fractional keyframe times still distinguish timelines.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::directions::Directions;
use crate::record::ScenarioRecord;

/// Version tag mixed into every hash. Bump when the canonical form changes.
const CANONICAL_VERSION: &str = "tosoku-physics-v1";

/// Stable hex identity of a scenario's physics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioIdentity(String);

impl ScenarioIdentity {
    /// Identity of a scenario record.
    pub fn of(record: &ScenarioRecord) -> Self {
        Self::from_fields(&PhysicsFields::from_record(record))
    }

    /// Identity of an already-normalized field set.
    pub fn from_fields(fields: &PhysicsFields) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(fields.canonical_string().as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `len` hex characters, for compact display.
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl fmt::Display for ScenarioIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ScenarioIdentity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The physics-relevant subset of a scenario, normalized to integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicsFields {
    pub smoothing: i64,
    pub zoom_scale: i64,
    pub start_speed: i64,
    pub end_speed: i64,
    pub tolerance: i64,
    pub duration: i64,
    pub warmup_time: i64,
    pub directions: Directions,
    pub timeline: Option<Vec<KeyframeFields>>,
}

/// A normalized timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyframeFields {
    pub time_ms: i64,
    pub speed_milli: i64,
    pub tolerance_milli: i64,
    pub directions: Directions,
}

impl PhysicsFields {
    /// Extract and normalize the physics fields of a record.
    ///
    /// Missing fields resolve to their defaults first, so a record that
    /// omits `smoothing` hashes the same as one that spells out the default.
    pub fn from_record(record: &ScenarioRecord) -> Self {
        let timeline = record.explicit_timeline().map(|entries| {
            let mut keyframes: Vec<KeyframeFields> = entries
                .iter()
                .map(|entry| KeyframeFields {
                    time_ms: to_milli(entry.time()),
                    speed_milli: to_milli(entry.speed()),
                    tolerance_milli: to_milli(entry.tolerance()),
                    directions: entry.directions(),
                })
                .collect();
            keyframes.sort_by_key(|k| k.time_ms);
            keyframes
        });

        Self {
            smoothing: truncate(record.smoothing()),
            zoom_scale: truncate(record.zoom_scale()),
            start_speed: truncate(record.start_speed()),
            end_speed: truncate(record.end_speed()),
            tolerance: truncate(record.tolerance()),
            duration: truncate(record.duration()),
            warmup_time: truncate(record.warmup_time()),
            directions: record.directions(),
            timeline,
        }
    }

    /// Canonical text form fed to the hasher.
    pub fn canonical_string(&self) -> String {
        let mut out = format!(
            "{CANONICAL_VERSION}|smoothing={}|zoom_scale={}|start_speed={}|end_speed={}\
             |tolerance={}|duration={}|warmup_time={}|directions={}",
            self.smoothing,
            self.zoom_scale,
            self.start_speed,
            self.end_speed,
            self.tolerance,
            self.duration,
            self.warmup_time,
            flag_bits(&self.directions),
        );

        if let Some(timeline) = &self.timeline {
            out.push_str("|timeline=");
            let entries: Vec<String> = timeline
                .iter()
                .map(|k| {
                    format!(
                        "{}:{}:{}:{}",
                        k.time_ms,
                        k.speed_milli,
                        k.tolerance_milli,
                        flag_bits(&k.directions)
                    )
                })
                .collect();
            out.push_str(&entries.join(","));
        }

        out
    }
}

fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

fn to_milli(value: f64) -> i64 {
    (value * 1000.0).round() as i64
}

fn flag_bits(directions: &Directions) -> String {
    directions
        .as_array()
        .iter()
        .map(|enabled| if *enabled { '1' } else { '0' })
        .collect()
}
