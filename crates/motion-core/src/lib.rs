//! Tosoku Motion Core
//!
//! Turns raw per-frame pointer deltas into a measured speed:
//! - **Axis filtering:** drop movement along disabled directions
//! - **Time-based smoothing:** average over a fixed span of simulated time,
//!   so the result does not depend on the host frame rate
//! - **Zone classification:** compare the smoothed speed with the target band
//! - **Speed graph:** record history points at the fixed reference cadence
//!
//! This crate is pure computation: no I/O, no clocks, no platform code.

pub mod engine;
pub mod graph;
pub mod zone;

pub use engine::{filter_axes, EngineConfig, FrameReading, MotionEngine, RawSample};
pub use graph::{GraphPoint, GraphRecorder};
pub use zone::{StatusColor, ZoneStatus};
