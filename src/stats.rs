//! Session counters for the gesture engine.
//!
//! Counters are atomics so the engine thread can record while another
//! thread (the CLI, a status reporter) reads a snapshot.

use crate::collector::types::SensorKind;
use crate::core::sink::GestureKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Gesture engine statistics for the current session.
#[derive(Debug)]
pub struct GestureStats {
    /// Accelerometer samples processed
    accelerometer_samples: AtomicU64,
    /// Magnetometer samples processed
    magnetometer_samples: AtomicU64,
    /// Orientation estimates produced
    estimates: AtomicU64,
    /// Estimates built from a degenerate pair
    degenerate_estimates: AtomicU64,
    /// Shake gestures fired
    shakes: AtomicU64,
    /// Face-down gestures fired
    face_downs: AtomicU64,
    /// Face-up acknowledgements received
    face_up_acks: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
}

impl GestureStats {
    pub fn new() -> Self {
        Self {
            accelerometer_samples: AtomicU64::new(0),
            magnetometer_samples: AtomicU64::new(0),
            estimates: AtomicU64::new(0),
            degenerate_estimates: AtomicU64::new(0),
            shakes: AtomicU64::new(0),
            face_downs: AtomicU64::new(0),
            face_up_acks: AtomicU64::new(0),
            session_start: Utc::now(),
        }
    }

    /// Record a processed sample.
    pub fn record_sample(&self, kind: SensorKind) {
        match kind {
            SensorKind::Accelerometer => self.accelerometer_samples.fetch_add(1, Ordering::Relaxed),
            SensorKind::Magnetometer => self.magnetometer_samples.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Record an orientation estimate.
    pub fn record_estimate(&self) {
        self.estimates.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an estimate built from a degenerate pair.
    pub fn record_degenerate_estimate(&self) {
        self.degenerate_estimates.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fired gesture.
    pub fn record_gesture(&self, kind: GestureKind) {
        match kind {
            GestureKind::Shake => self.shakes.fetch_add(1, Ordering::Relaxed),
            GestureKind::FaceDown => self.face_downs.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Record a face-up acknowledgement.
    pub fn record_face_up(&self) {
        self.face_up_acks.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn snapshot(&self) -> GestureStatsSnapshot {
        GestureStatsSnapshot {
            accelerometer_samples: self.accelerometer_samples.load(Ordering::Relaxed),
            magnetometer_samples: self.magnetometer_samples.load(Ordering::Relaxed),
            estimates: self.estimates.load(Ordering::Relaxed),
            degenerate_estimates: self.degenerate_estimates.load(Ordering::Relaxed),
            shakes: self.shakes.load(Ordering::Relaxed),
            face_downs: self.face_downs.load(Ordering::Relaxed),
            face_up_acks: self.face_up_acks.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.snapshot();
        format!(
            "Session Statistics:\n\
             - Accelerometer samples: {}\n\
             - Magnetometer samples: {}\n\
             - Orientation estimates: {} ({} degenerate)\n\
             - Shakes detected: {}\n\
             - Face-down detected: {}\n\
             - Face-up acknowledgements: {}\n\
             - Session duration: {} seconds",
            stats.accelerometer_samples,
            stats.magnetometer_samples,
            stats.estimates,
            stats.degenerate_estimates,
            stats.shakes,
            stats.face_downs,
            stats.face_up_acks,
            stats.session_duration_secs
        )
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.accelerometer_samples.store(0, Ordering::Relaxed);
        self.magnetometer_samples.store(0, Ordering::Relaxed);
        self.estimates.store(0, Ordering::Relaxed);
        self.degenerate_estimates.store(0, Ordering::Relaxed);
        self.shakes.store(0, Ordering::Relaxed);
        self.face_downs.store(0, Ordering::Relaxed);
        self.face_up_acks.store(0, Ordering::Relaxed);
    }
}

impl Default for GestureStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureStatsSnapshot {
    pub accelerometer_samples: u64,
    pub magnetometer_samples: u64,
    pub estimates: u64,
    pub degenerate_estimates: u64,
    pub shakes: u64,
    pub face_downs: u64,
    pub face_up_acks: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Thread-safe shared statistics.
pub type SharedGestureStats = Arc<GestureStats>;

/// Create a new shared statistics handle.
pub fn create_shared_stats() -> SharedGestureStats {
    Arc::new(GestureStats::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting() {
        let stats = GestureStats::new();

        stats.record_sample(SensorKind::Accelerometer);
        stats.record_sample(SensorKind::Accelerometer);
        stats.record_sample(SensorKind::Magnetometer);
        stats.record_gesture(GestureKind::Shake);
        stats.record_estimate();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.accelerometer_samples, 2);
        assert_eq!(snapshot.magnetometer_samples, 1);
        assert_eq!(snapshot.shakes, 1);
        assert_eq!(snapshot.face_downs, 0);
        assert_eq!(snapshot.estimates, 1);
    }

    #[test]
    fn test_reset() {
        let stats = GestureStats::new();
        stats.record_gesture(GestureKind::FaceDown);
        stats.record_face_up();
        stats.reset();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.face_downs, 0);
        assert_eq!(snapshot.face_up_acks, 0);
    }

    #[test]
    fn test_shared_across_threads() {
        let stats = create_shared_stats();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = stats.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        stats.record_sample(SensorKind::Accelerometer);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.snapshot().accelerometer_samples, 400);
    }

    #[test]
    fn test_summary_format() {
        let stats = GestureStats::new();
        let summary = stats.summary();

        assert!(summary.contains("Shakes detected: 0"));
        assert!(summary.contains("Face-down detected: 0"));
        assert!(summary.contains("Accelerometer samples"));
    }
}
