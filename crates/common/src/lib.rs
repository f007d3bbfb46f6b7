//! Tosoku Common Utilities
//!
//! Shared infrastructure for all Tosoku crates:
//! - Error types and result aliases
//! - Fixed-step clock for reference-rate decoupling
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
