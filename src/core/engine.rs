//! Routes samples to the detectors and fired gestures to the sink.
//!
//! ```text
//!  accelerometer ──┬──────────────────────────▶ ShakeDetector ──┐
//!                  │                                            ├──▶ GestureSink
//!                  └──▶ OrientationEstimator ──▶ TiltDetector ──┘
//!  magnetometer  ──────▶┘
//! ```
//!
//! `process` does no allocation, locking or I/O. The engine is not `Sync`
//! by intent: keep it on the thread that delivers samples, or wrap it in the
//! caller's own lock.

use crate::collector::types::{SensorKind, SensorSample};
use crate::config::Config;
use crate::core::orientation::{EstimatorUpdate, OrientationEstimate, OrientationEstimator};
use crate::core::shake::ShakeDetector;
use crate::core::sink::{GestureKind, GestureSink};
use crate::core::tilt::TiltDetector;
use crate::stats::{create_shared_stats, SharedGestureStats};
use serde::Serialize;

/// What happened while processing one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Dispatch {
    /// Timestamp of the processed sample
    pub timestamp_ms: u64,
    /// A shake fired on this sample
    pub shake: bool,
    /// Face-down fired on this sample
    pub face_down: bool,
    /// Orientation computed on this sample, if the pair completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<OrientationEstimate>,
}

impl Dispatch {
    /// True if any gesture fired.
    pub fn fired(&self) -> bool {
        self.shake || self.face_down
    }

    /// Fired gestures in delivery order.
    pub fn gestures(&self) -> impl Iterator<Item = GestureKind> {
        let shake = self.shake.then_some(GestureKind::Shake);
        let face_down = self.face_down.then_some(GestureKind::FaceDown);
        shake.into_iter().chain(face_down)
    }
}

/// Both gesture detectors wired to one sink.
pub struct GestureEngine<S> {
    estimator: OrientationEstimator,
    shake: ShakeDetector,
    tilt: TiltDetector,
    sink: S,
    stats: SharedGestureStats,
}

impl<S: GestureSink> GestureEngine<S> {
    /// Create an engine with fresh detector state.
    pub fn new(config: &Config, sink: S) -> Self {
        Self::with_stats(config, sink, create_shared_stats())
    }

    /// Create an engine recording into existing statistics.
    pub fn with_stats(config: &Config, sink: S, stats: SharedGestureStats) -> Self {
        Self {
            estimator: OrientationEstimator::new(),
            shake: ShakeDetector::new(config.shake.clone()),
            tilt: TiltDetector::new(config.tilt.clone()),
            sink,
            stats,
        }
    }

    /// Process one sample, delivering any fired gestures to the sink.
    pub fn process(&mut self, sample: &SensorSample) -> Dispatch {
        let [x, y, z] = sample.values;
        let timestamp_ms = sample.timestamp_ms;
        let mut dispatch = Dispatch {
            timestamp_ms,
            ..Dispatch::default()
        };

        self.stats.record_sample(sample.kind);

        if sample.kind == SensorKind::Accelerometer && self.shake.on_sample(x, y, z, timestamp_ms)
        {
            dispatch.shake = true;
            self.stats.record_gesture(GestureKind::Shake);
            self.sink.on_shake();
        }

        let update = self
            .estimator
            .update_detailed(sample.kind, sample.values, timestamp_ms);
        if let EstimatorUpdate::Degenerate(_) = update {
            self.stats.record_degenerate_estimate();
        }

        if let Some(estimate) = update.estimate() {
            self.stats.record_estimate();
            dispatch.estimate = Some(estimate);

            if self.tilt.on_orientation(estimate.roll, timestamp_ms) {
                dispatch.face_down = true;
                self.stats.record_gesture(GestureKind::FaceDown);
                self.sink.on_face_down();
            }
        }

        dispatch
    }

    /// Clear the face-down latch so the next dwell can fire again.
    pub fn notify_face_up(&mut self) {
        self.stats.record_face_up();
        self.tilt.notify_face_up();
    }

    /// Drop all detector state, keeping the sink and statistics.
    pub fn reset(&mut self) {
        self.estimator.reset();
        self.shake.reset();
        self.tilt.reset();
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn stats(&self) -> &SharedGestureStats {
        &self.stats
    }

    pub fn shake_detector(&self) -> &ShakeDetector {
        &self.shake
    }

    pub fn tilt_detector(&self) -> &TiltDetector {
        &self.tilt
    }
}
