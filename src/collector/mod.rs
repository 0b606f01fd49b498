//! Sample sources for the Gesture Sensor Agent.
//!
//! Device I/O lives outside this crate. Samples arrive either from a
//! recorded trace (replayed on a background thread) or from a synthetic
//! motion script.

pub mod replay;
pub mod synthetic;
pub mod trace;
pub mod types;

// Re-export commonly used types
pub use replay::{CollectorConfig, CollectorError, ReplayCollector};
pub use synthetic::{SyntheticScript, GRAVITY};
pub use trace::{load_trace, parse_trace, write_trace};
pub use types::{SensorKind, SensorSample};
