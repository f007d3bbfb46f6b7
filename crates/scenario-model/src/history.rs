//! Persistent run history.
//!
//! Stored as a pretty-printed JSON array, newest run first. The file is
//! written by one process at a time; there is no locking.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::identity::ScenarioIdentity;
use crate::result::{BestScoreLookup, RunResult};

/// Runs kept on disk before the oldest are dropped.
pub const DEFAULT_MAX_RUNS: usize = 100;

/// Errors from the JSON file stores (history and library).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// The run history file plus its in-memory contents.
#[derive(Debug, Clone)]
pub struct RunHistory {
    path: PathBuf,
    runs: Vec<RunResult>,
    max_runs: usize,
}

impl RunHistory {
    /// Load the history at `path`.
    ///
    /// A missing file is an empty history. A file that is not a JSON array
    /// is logged and treated as empty; individual entries that do not parse
    /// are skipped.
    pub fn load(path: impl AsRef<Path>, max_runs: usize) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let runs = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| StoreError::IoError {
                path: path.clone(),
                source: e,
            })?;
            parse_runs(&path, &content)
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            runs,
            max_runs: max_runs.max(1),
        })
    }

    /// Prepend a finished run, cap the list, and write it to disk.
    pub fn record(&mut self, run: RunResult) -> Result<(), StoreError> {
        self.runs.insert(0, run);
        self.runs.truncate(self.max_runs);
        self.save()
    }

    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(&self.runs).map_err(|e| StoreError::ParseError {
            path: self.path.clone(),
            source: e,
        })?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::IoError {
            path: self.path.clone(),
            source: e,
        })
    }

    /// All runs, newest first.
    pub fn runs(&self) -> &[RunResult] {
        &self.runs
    }

    /// Up to `limit` newest runs.
    pub fn recent(&self, limit: usize) -> &[RunResult] {
        &self.runs[..limit.min(self.runs.len())]
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl BestScoreLookup for RunHistory {
    fn best_score(&self, identity: &ScenarioIdentity) -> f64 {
        self.runs.best_score(identity)
    }
}

fn parse_runs(path: &Path, content: &str) -> Vec<RunResult> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(content) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Run history unreadable, starting empty");
            return Vec::new();
        }
    };

    let total = entries.len();
    let runs: Vec<RunResult> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();

    if runs.len() < total {
        warn!(
            path = %path.display(),
            skipped = total - runs.len(),
            "Skipped malformed run history entries"
        );
    }

    runs
}
