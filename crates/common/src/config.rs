//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::clock::{DEFAULT_MAX_STEPS_PER_ADVANCE, REFERENCE_HZ};
use crate::error::{TosokuError, TosokuResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory where run history and the scenario library are stored.
    pub data_dir: PathBuf,

    /// Physics defaults handed to the motion engine.
    pub physics: PhysicsDefaults,

    /// Size limits for persisted lists.
    pub storage: StorageLimits,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default physics parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsDefaults {
    /// Reference simulation rate (Hz) that smoothing and graph cadence
    /// are calibrated against.
    pub reference_hz: f64,

    /// Smoothing window in reference ticks when a scenario omits it.
    pub smoothing_window: u32,

    /// Raw sample history capacity.
    pub sample_history_capacity: usize,

    /// Graph point history capacity.
    pub graph_capacity: usize,

    /// Per-frame cap on emitted graph points.
    pub max_graph_steps_per_tick: u32,

    /// Frame deltas are clamped to `[min_frame_dt, max_frame_dt]` seconds.
    pub min_frame_dt: f64,
    pub max_frame_dt: f64,
}

/// Limits on persisted lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageLimits {
    /// Maximum number of runs kept in the history file.
    pub max_history_runs: usize,

    /// Maximum entries in the recent/imported scenario lists.
    pub max_recent_scenarios: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "tosoku=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs_default_data(),
            physics: PhysicsDefaults::default(),
            storage: StorageLimits::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PhysicsDefaults {
    fn default() -> Self {
        Self {
            reference_hz: REFERENCE_HZ,
            smoothing_window: 75,
            sample_history_capacity: 1200,
            graph_capacity: 1200,
            max_graph_steps_per_tick: DEFAULT_MAX_STEPS_PER_ADVANCE,
            min_frame_dt: 0.001,
            max_frame_dt: 0.1,
        }
    }
}

impl Default for StorageLimits {
    fn default() -> Self {
        Self {
            max_history_runs: 100,
            max_recent_scenarios: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> TosokuResult<()> {
        let physics = &self.physics;
        if !(physics.reference_hz > 0.0) {
            return Err(TosokuError::config(format!(
                "physics.reference_hz must be positive, got {}",
                physics.reference_hz
            )));
        }
        if !(physics.min_frame_dt > 0.0) || physics.min_frame_dt > physics.max_frame_dt {
            return Err(TosokuError::config(format!(
                "physics frame clamp [{}, {}] is empty or non-positive",
                physics.min_frame_dt, physics.max_frame_dt
            )));
        }
        if physics.sample_history_capacity == 0 || physics.graph_capacity == 0 {
            return Err(TosokuError::config("physics buffer capacities must be non-zero"));
        }
        if self.storage.max_history_runs == 0 {
            return Err(TosokuError::config("storage.max_history_runs must be non-zero"));
        }
        Ok(())
    }

    /// Run history file (`tosoku_stats.json`).
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("tosoku_stats.json")
    }

    /// Scenario library file (`tosoku_data.json`).
    pub fn library_path(&self) -> PathBuf {
        self.data_dir.join("tosoku_data.json")
    }

    /// Directory scanned for hand-written scenario files.
    pub fn scenarios_dir(&self) -> PathBuf {
        self.data_dir.join("scenarios")
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("tosoku").join("config.json")
}

/// Default data directory.
fn dirs_default_data() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("tosoku")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_defaults_match_reference() {
        let physics = PhysicsDefaults::default();
        assert_eq!(physics.reference_hz, 144.0);
        assert_eq!(physics.smoothing_window, 75);
        assert_eq!(physics.sample_history_capacity, 1200);
        assert_eq!(physics.max_graph_steps_per_tick, 20);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"data_dir":"/srv/tosoku","logging":{"level":"debug"}}"#)
                .unwrap();
        assert_eq!(parsed.data_dir, PathBuf::from("/srv/tosoku"));
        assert_eq!(parsed.logging.level, "debug");
        assert!(!parsed.logging.json);
        assert_eq!(parsed.storage.max_history_runs, 100);
        assert_eq!(parsed.physics.max_frame_dt, 0.1);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_physics() {
        let mut config = AppConfig::default();
        config.physics.min_frame_dt = 0.5;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, TosokuError::Config { .. }));
        assert!(err.to_string().contains("frame clamp"));

        let mut config = AppConfig::default();
        config.physics.reference_hz = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.storage.max_history_runs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_data_file_paths() {
        let config = AppConfig {
            data_dir: PathBuf::from("/data"),
            ..Default::default()
        };
        assert_eq!(config.history_path(), PathBuf::from("/data/tosoku_stats.json"));
        assert_eq!(config.library_path(), PathBuf::from("/data/tosoku_data.json"));
        assert_eq!(config.scenarios_dir(), PathBuf::from("/data/scenarios"));
    }
}
