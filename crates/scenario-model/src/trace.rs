//! Recorded pointer traces for headless replay.
//!
//! A trace is a JSONL file. The first line is a `#`-prefixed header;
//! every following line is one frame of pointer motion:
//!
//! ```text
//! # {"schema_version":"1.0","sample_rate_hz":144,"sensitivity":1.0}
//! {"dt":0.006944,"dx":3.47,"dy":0.0}
//! ```
//!
//! `dx`/`dy` are raw pointer deltas for the frame, `dt` its length in
//! seconds. Replaying the same trace always produces the same run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current trace schema version.
pub const TRACE_SCHEMA_VERSION: &str = "1.0";

/// Upper bound on synthesized trace length: one hour at 1000 Hz.
pub const MAX_SYNTH_FRAMES: usize = 3_600_000;

/// Errors produced while reading or writing traces.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("failed to access trace {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("trace line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },

    #[error("trace has no header line")]
    MissingHeader,

    #[error("failed to serialize trace: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Metadata line at the top of a trace file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceHeader {
    pub schema_version: String,

    /// Nominal frame rate the trace was captured at (Hz).
    pub sample_rate_hz: u32,

    /// Pointer sensitivity multiplier in effect during capture.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,

    /// Free-form description of where the trace came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

fn default_sensitivity() -> f64 {
    1.0
}

impl TraceHeader {
    pub fn new(sample_rate_hz: u32) -> Self {
        Self {
            schema_version: TRACE_SCHEMA_VERSION.to_string(),
            sample_rate_hz,
            sensitivity: default_sensitivity(),
            source: None,
        }
    }
}

/// One frame of pointer motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub dt: f64,
    pub dx: f64,
    pub dy: f64,
}

impl MotionSample {
    pub fn new(dt: f64, dx: f64, dy: f64) -> Self {
        Self { dt, dx, dy }
    }

    /// Unfiltered instantaneous speed of this frame.
    pub fn speed(&self) -> f64 {
        if self.dt <= 0.0 {
            return 0.0;
        }
        self.dx.hypot(self.dy) / self.dt
    }
}

/// A header plus its frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub header: TraceHeader,
    pub samples: Vec<MotionSample>,
}

/// Axis a synthesized trace moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceAxis {
    /// Rightward.
    X,
    /// Downward.
    Y,
    /// Down-right at 45 degrees.
    Diagonal,
}

impl Trace {
    /// Read a trace from disk.
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let content = std::fs::read_to_string(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_trace(&content)
    }

    /// Write a trace to disk, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), TraceError> {
        let content = serialize_trace(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| TraceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Total simulated time covered by the trace.
    pub fn duration_secs(&self) -> f64 {
        self.samples.iter().map(|s| s.dt).sum()
    }

    /// A trace moving at a constant `speed` (counts/sec) for `seconds`.
    ///
    /// Non-finite or non-positive lengths give an empty trace. The frame
    /// count is capped at [`MAX_SYNTH_FRAMES`].
    pub fn constant_speed(speed: f64, seconds: f64, sample_rate_hz: u32, axis: TraceAxis) -> Self {
        let rate = sample_rate_hz.max(1);
        let dt = 1.0 / rate as f64;
        let frames = synth_frame_count(seconds, rate);
        let step = speed * dt;

        let (dx, dy) = match axis {
            TraceAxis::X => (step, 0.0),
            TraceAxis::Y => (0.0, step),
            TraceAxis::Diagonal => {
                let component = step / std::f64::consts::SQRT_2;
                (component, component)
            }
        };

        let mut header = TraceHeader::new(rate);
        header.source = Some(format!("synthetic constant {speed} counts/s"));

        Self {
            header,
            samples: vec![MotionSample::new(dt, dx, dy); frames],
        }
    }
}

/// Frames needed for `seconds` at `rate` Hz, or `None` when the length is
/// not a positive finite number or exceeds [`MAX_SYNTH_FRAMES`].
pub fn checked_frame_count(seconds: f64, rate: u32) -> Option<usize> {
    let frames = (seconds * rate.max(1) as f64).round();
    if !frames.is_finite() || frames < 0.0 || frames > MAX_SYNTH_FRAMES as f64 {
        return None;
    }
    Some(frames as usize)
}

fn synth_frame_count(seconds: f64, rate: u32) -> usize {
    match checked_frame_count(seconds, rate) {
        Some(frames) => frames,
        None if seconds.is_finite() && seconds > 0.0 => MAX_SYNTH_FRAMES,
        None => 0,
    }
}

/// Parse motion samples from JSONL content, skipping blank and `#` lines.
pub fn parse_samples(jsonl: &str) -> Result<Vec<MotionSample>, TraceError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            serde_json::from_str(line).map_err(|source| TraceError::Parse {
                line: line_no,
                source,
            })
        })
        .collect()
}

/// Parse a full trace, header included.
pub fn parse_trace(jsonl: &str) -> Result<Trace, TraceError> {
    let (line_no, header_line) = jsonl
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .find(|(_, line)| !line.is_empty())
        .ok_or(TraceError::MissingHeader)?;

    let header_json = header_line
        .strip_prefix('#')
        .ok_or(TraceError::MissingHeader)?;
    let header = serde_json::from_str(header_json.trim()).map_err(|source| TraceError::Parse {
        line: line_no,
        source,
    })?;

    Ok(Trace {
        header,
        samples: parse_samples(jsonl)?,
    })
}

/// Serialize a trace to JSONL, header first.
pub fn serialize_trace(trace: &Trace) -> Result<String, TraceError> {
    let mut output = format!("# {}\n", serde_json::to_string(&trace.header)?);
    for sample in &trace.samples {
        output.push_str(&serde_json::to_string(sample)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trace_reads_header_and_samples() {
        let jsonl = "# {\"schema_version\":\"1.0\",\"sample_rate_hz\":60}\n\
                     {\"dt\":0.016,\"dx\":8.0,\"dy\":0.0}\n\
                     \n\
                     {\"dt\":0.016,\"dx\":-8.0,\"dy\":2.0}\n";
        let trace = parse_trace(jsonl).unwrap();
        assert_eq!(trace.header.sample_rate_hz, 60);
        assert_eq!(trace.header.sensitivity, 1.0);
        assert_eq!(trace.samples.len(), 2);
        assert_eq!(trace.samples[1], MotionSample::new(0.016, -8.0, 2.0));
    }

    #[test]
    fn test_parse_trace_requires_header() {
        let jsonl = "{\"dt\":0.016,\"dx\":8.0,\"dy\":0.0}\n";
        assert!(matches!(parse_trace(jsonl), Err(TraceError::MissingHeader)));
        assert!(matches!(parse_trace(""), Err(TraceError::MissingHeader)));
    }

    #[test]
    fn test_parse_error_reports_line_number() {
        let jsonl = "# {\"schema_version\":\"1.0\",\"sample_rate_hz\":60}\n\
                     {\"dt\":0.016,\"dx\":8.0,\"dy\":0.0}\n\
                     {\"dt\":\"oops\"}\n";
        match parse_trace(jsonl) {
            Err(TraceError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_constant_speed_length_is_bounded() {
        assert!(Trace::constant_speed(500.0, f64::NAN, 144, TraceAxis::X).samples.is_empty());
        assert!(Trace::constant_speed(500.0, -1.0, 144, TraceAxis::X).samples.is_empty());
        assert!(Trace::constant_speed(500.0, f64::INFINITY, 144, TraceAxis::X).samples.is_empty());
        assert_eq!(
            Trace::constant_speed(500.0, 1e9, 1000, TraceAxis::X).samples.len(),
            MAX_SYNTH_FRAMES
        );

        assert_eq!(checked_frame_count(2.0, 144), Some(288));
        assert_eq!(checked_frame_count(f64::INFINITY, 144), None);
        assert_eq!(checked_frame_count(1e12, 144), None);
        assert_eq!(checked_frame_count(f64::NAN, 144), None);
    }

    #[test]
    fn test_constant_speed_trace_moves_at_requested_speed() {
        let trace = Trace::constant_speed(500.0, 2.0, 144, TraceAxis::Diagonal);
        assert_eq!(trace.samples.len(), 288);
        assert!((trace.duration_secs() - 2.0).abs() < 1e-9);
        for sample in &trace.samples {
            assert!((sample.speed() - 500.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_dt_sample_has_zero_speed() {
        assert_eq!(MotionSample::new(0.0, 5.0, 5.0).speed(), 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join("tosoku-test-trace-io");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("run.jsonl");

        let trace = Trace::constant_speed(300.0, 0.5, 60, TraceAxis::Y);
        trace.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# "));

        let loaded = Trace::load(&path).unwrap();
        assert_eq!(loaded.header, trace.header);
        assert_eq!(loaded.samples.len(), trace.samples.len());
        assert!((loaded.duration_secs() - trace.duration_secs()).abs() < 1e-9);
        assert_eq!(loaded.samples[0].dy, 5.0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let path = std::env::temp_dir().join("tosoku-test-trace-missing.jsonl");
        let _ = std::fs::remove_file(&path);
        match Trace::load(&path) {
            Err(TraceError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
