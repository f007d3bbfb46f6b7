//! Tosoku Scenario Model
//!
//! Defines the data contracts shared by the Tosoku crates:
//! - **Scenarios:** flat records, keyframe timelines, and target-state interpolation
//! - **Identity:** physics-only content hashes used as personal-best keys
//! - **Share codes:** the `TSK1:` import/export format
//! - **Traces:** recorded pointer deltas for headless replay
//! - **Results:** run records, the run history store, and the scenario library
//!
//! Speeds are in pointer counts per second, times in seconds.

pub mod directions;
pub mod history;
pub mod identity;
pub mod library;
pub mod naming;
pub mod record;
pub mod result;
pub mod scenario;
pub mod share_code;
pub mod trace;

pub use directions::*;
pub use history::*;
pub use identity::*;
pub use library::*;
pub use naming::*;
pub use record::*;
pub use result::*;
pub use scenario::*;
pub use share_code::{ShareCodeError, SHARE_CODE_PREFIX};
pub use trace::*;
