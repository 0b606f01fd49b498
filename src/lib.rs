//! Gesture Sensor Agent - debounced motion gestures from sensor streams.
//!
//! This library turns a stream of accelerometer and magnetometer samples
//! into two discrete gestures: a **shake**, and the device being held
//! **face-down**. Both detectors are single-pass, constant-memory state
//! machines driven by the timestamps on the samples they receive.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       Gesture Sensor Agent                       │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌──────────────────────────┐   ┌───────────┐  │
//! │  │  Collector  │──▶│      GestureEngine       │──▶│  Gesture  │  │
//! │  │ (trace/syn) │   │ shake │ orientation+tilt │   │   Sink    │  │
//! │  └─────────────┘   └──────────────────────────┘   └───────────┘  │
//! │                                 │                      │         │
//! │                                 ▼                      ▼         │
//! │                          ┌─────────────┐        ┌────────────┐   │
//! │                          │    Stats    │        │ Recording  │   │
//! │                          │  (atomics)  │        │  Session   │   │
//! │                          └─────────────┘        └────────────┘   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use gesture_sensor_agent::{Config, EventLog, GestureEngine, GestureKind, SyntheticScript};
//!
//! let mut engine = GestureEngine::new(&Config::default(), EventLog::new());
//!
//! let samples = SyntheticScript::new(0, 50)
//!     .rest_face_up(1000)
//!     .rest_face_down(3000)
//!     .build();
//! for sample in &samples {
//!     engine.process(sample);
//! }
//!
//! assert_eq!(engine.sink().events(), &[GestureKind::FaceDown]);
//! ```

pub mod collector;
pub mod config;
pub mod core;
pub mod session;
pub mod stats;

// Re-export key types at crate root for convenience
pub use collector::{
    CollectorConfig, CollectorError, ReplayCollector, SensorKind, SensorSample, SyntheticScript,
};
pub use config::{Config, ConfigError, ShakeConfig, SourceConfig, TiltConfig};
pub use crate::core::{
    Dispatch, EventLog, FnSink, GestureEngine, GestureKind, GestureSink, OrientationEstimate,
    OrientationEstimator, ShakeDetector, TiltDetector,
};
pub use session::{RecordingController, RecordingSession, RecordingSummary, Trigger};
pub use stats::{create_shared_stats, GestureStats, GestureStatsSnapshot, SharedGestureStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
