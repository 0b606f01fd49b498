//! Orientation from paired accelerometer and magnetometer readings.
//!
//! The accelerometer vector gives the gravity direction, the magnetometer
//! vector resolves heading. Cross products of the two build an
//! east/north/up rotation matrix from which azimuth, pitch and roll follow.
//!
//! # Degenerate inputs
//!
//! When the two vectors are close to collinear (near the magnetic poles, or
//! during free fall when gravity reads close to zero) `|E x A|` collapses and
//! the reconstruction becomes numerically unstable. Nothing here tries to
//! correct for that. A pair whose cross-product norm falls below
//! [`MIN_CROSS_NORM`] still yields an estimate, built from the zero matrix,
//! so azimuth, pitch and roll all read 0. Downstream this looks like a
//! face-up reading and interrupts any face-down dwell. Just above the bound
//! the angles are noisy but the sign and rough magnitude of roll near +/-180
//! degrees remain usable.

use crate::collector::types::SensorKind;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Smallest `|E x A|` accepted when building the rotation matrix.
pub const MIN_CROSS_NORM: f32 = 0.1;

/// Device orientation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationEstimate {
    /// Rotation about the up axis, 0 = magnetic north, (-180, 180]
    pub azimuth: f32,
    /// Rotation about the device x axis, [-90, 90]
    pub pitch: f32,
    /// Rotation about the device y axis, (-180, 180]; +/-180 is face-down
    pub roll: f32,
    /// Timestamp of the sample that completed the pair
    pub timestamp_ms: u64,
}

/// Outcome of feeding one reading to the estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EstimatorUpdate {
    /// Only one kind is held so far
    Pending,
    /// Both kinds were held and produced an estimate
    Estimate(OrientationEstimate),
    /// Both kinds were held but the pair was degenerate; all angles are 0
    Degenerate(OrientationEstimate),
}

impl EstimatorUpdate {
    pub fn estimate(self) -> Option<OrientationEstimate> {
        match self {
            EstimatorUpdate::Estimate(estimate) | EstimatorUpdate::Degenerate(estimate) => {
                Some(estimate)
            }
            EstimatorUpdate::Pending => None,
        }
    }
}

/// Holds the latest reading of each kind until a pair is complete.
///
/// Not synchronized: callers delivering accelerometer and magnetometer
/// samples from different threads must serialize access.
#[derive(Debug, Clone, Default)]
pub struct OrientationEstimator {
    accelerometer: Option<[f32; 3]>,
    magnetometer: Option<[f32; 3]>,
}

impl OrientationEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a reading and, if both kinds are now held, compute an estimate.
    ///
    /// Both stored readings are cleared whenever a pair is consumed, so the
    /// next estimate waits for a fresh reading of each kind.
    pub fn update(
        &mut self,
        kind: SensorKind,
        values: [f32; 3],
        timestamp_ms: u64,
    ) -> Option<OrientationEstimate> {
        self.update_detailed(kind, values, timestamp_ms).estimate()
    }

    /// Like [`update`](Self::update) but tells a degenerate pair apart from
    /// a well-conditioned one.
    pub fn update_detailed(
        &mut self,
        kind: SensorKind,
        values: [f32; 3],
        timestamp_ms: u64,
    ) -> EstimatorUpdate {
        match kind {
            SensorKind::Accelerometer => self.accelerometer = Some(values),
            SensorKind::Magnetometer => self.magnetometer = Some(values),
        }

        let (Some(gravity), Some(field)) = (self.accelerometer, self.magnetometer) else {
            return EstimatorUpdate::Pending;
        };

        self.accelerometer = None;
        self.magnetometer = None;

        match rotation_matrix(gravity, field) {
            Some(matrix) => {
                let [azimuth, pitch, roll] = orientation_angles(&matrix);
                EstimatorUpdate::Estimate(OrientationEstimate {
                    azimuth: azimuth.to_degrees(),
                    pitch: pitch.to_degrees(),
                    roll: roll.to_degrees(),
                    timestamp_ms,
                })
            }
            None => {
                trace!(timestamp_ms, "Degenerate accelerometer/magnetometer pair");
                let [azimuth, pitch, roll] = orientation_angles(&[0.0; 9]);
                EstimatorUpdate::Degenerate(OrientationEstimate {
                    azimuth: azimuth.to_degrees(),
                    pitch: pitch.to_degrees(),
                    roll: roll.to_degrees(),
                    timestamp_ms,
                })
            }
        }
    }

    /// True if a reading of the given kind is waiting for its partner.
    pub fn holds(&self, kind: SensorKind) -> bool {
        match kind {
            SensorKind::Accelerometer => self.accelerometer.is_some(),
            SensorKind::Magnetometer => self.magnetometer.is_some(),
        }
    }

    /// Drop any held readings.
    pub fn reset(&mut self) {
        self.accelerometer = None;
        self.magnetometer = None;
    }
}

/// Build the row-major rotation matrix from device to world (east, north, up).
///
/// Returns `None` when `|E x A| < MIN_CROSS_NORM`.
pub fn rotation_matrix(gravity: [f32; 3], field: [f32; 3]) -> Option<[f32; 9]> {
    let [ax, ay, az] = gravity;
    let [ex, ey, ez] = field;

    // East = E x A
    let mut hx = ey * az - ez * ay;
    let mut hy = ez * ax - ex * az;
    let mut hz = ex * ay - ey * ax;
    let norm_h = (hx * hx + hy * hy + hz * hz).sqrt();
    if norm_h.is_nan() || norm_h < MIN_CROSS_NORM {
        return None;
    }
    let inv_h = 1.0 / norm_h;
    hx *= inv_h;
    hy *= inv_h;
    hz *= inv_h;

    let inv_a = 1.0 / (ax * ax + ay * ay + az * az).sqrt();
    let ax = ax * inv_a;
    let ay = ay * inv_a;
    let az = az * inv_a;

    // North = A x East
    let mx = ay * hz - az * hy;
    let my = az * hx - ax * hz;
    let mz = ax * hy - ay * hx;

    Some([hx, hy, hz, mx, my, mz, ax, ay, az])
}

/// Azimuth, pitch, roll in radians from a rotation matrix.
pub fn orientation_angles(r: &[f32; 9]) -> [f32; 3] {
    let azimuth = r[1].atan2(r[4]);
    let pitch = (-r[7]).clamp(-1.0, 1.0).asin();
    let roll = (-r[6]).atan2(r[8]);
    [azimuth, pitch, roll]
}
