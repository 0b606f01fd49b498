//! Core gesture recognition.
//!
//! This module contains:
//! - Orientation estimation from accelerometer + magnetometer pairs
//! - The shake and face-down state machines
//! - The sink interface and the engine that wires everything together
//!
//! # Timestamps
//!
//! Every call takes the sample timestamp explicitly; nothing here reads a
//! clock. Timestamps are expected to be monotonic. If a caller's clock steps
//! backwards, elapsed times are clamped to zero, which can never satisfy a
//! duration, cooldown or dwell threshold, so a clock glitch delays a gesture
//! rather than firing a spurious one.

pub mod engine;
pub mod orientation;
pub mod shake;
pub mod sink;
pub mod tilt;

// Re-export commonly used types
pub use engine::{Dispatch, GestureEngine};
pub use orientation::{EstimatorUpdate, OrientationEstimate, OrientationEstimator};
pub use shake::{ShakeDetector, ShakeState};
pub use sink::{EventLog, FnSink, GestureKind, GestureSink};
pub use tilt::{TiltDetector, TiltState};

/// Milliseconds from `earlier` to `now`, clamped at zero.
pub(crate) fn elapsed_ms(now: u64, earlier: u64) -> u64 {
    if now < earlier {
        tracing::warn!(
            now_ms = now,
            earlier_ms = earlier,
            "Non-monotonic timestamp; clamping elapsed time to zero"
        );
    }
    now.saturating_sub(earlier)
}
