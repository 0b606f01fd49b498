//! Deterministic synthetic motion scripts.
//!
//! Used by the `simulate` command, the demo and the tests to produce traces
//! with known gesture content without a device.

use crate::collector::types::SensorSample;

/// Standard gravity in m/s^2.
pub const GRAVITY: f32 = 9.81;

/// Horizontal field pointing roughly north with a downward dip, in uT.
const FIELD_FACE_UP: [f32; 3] = [0.0, 22.0, -40.0];
const FIELD_FACE_DOWN: [f32; 3] = [0.0, 22.0, 40.0];

/// Builds a sample sequence step by step.
///
/// Each segment appends samples at `accel_interval_ms` spacing and advances
/// the script clock. A magnetometer sample is interleaved after every
/// `mag_every` accelerometer samples.
#[derive(Debug, Clone)]
pub struct SyntheticScript {
    now_ms: u64,
    accel_interval_ms: u64,
    mag_every: u32,
    accel_count: u32,
    samples: Vec<SensorSample>,
}

impl SyntheticScript {
    /// Create a script starting at `start_ms`.
    pub fn new(start_ms: u64, accel_interval_ms: u64) -> Self {
        Self {
            now_ms: start_ms,
            accel_interval_ms: accel_interval_ms.max(1),
            mag_every: 1,
            accel_count: 0,
            samples: Vec::new(),
        }
    }

    /// Interleave a magnetometer reading after every `n` accelerometer samples.
    pub fn mag_every(&mut self, n: u32) -> &mut Self {
        self.mag_every = n.max(1);
        self
    }

    /// Current script time.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Device lying still, screen up.
    pub fn rest_face_up(&mut self, duration_ms: u64) -> &mut Self {
        self.hold([0.0, 0.0, GRAVITY], FIELD_FACE_UP, duration_ms)
    }

    /// Device lying still, screen down.
    pub fn rest_face_down(&mut self, duration_ms: u64) -> &mut Self {
        self.hold([0.0, 0.0, -GRAVITY], FIELD_FACE_DOWN, duration_ms)
    }

    /// Vigorous shaking along the x axis.
    ///
    /// Alternates the x reading between `+amplitude` and `-amplitude` so the
    /// combined-axis delta between consecutive samples is `2 * amplitude`.
    pub fn shake(&mut self, duration_ms: u64, amplitude: f32) -> &mut Self {
        let steps = duration_ms / self.accel_interval_ms;
        for i in 0..steps {
            let x = if i % 2 == 0 { amplitude } else { -amplitude };
            self.push_accel([x, 0.0, GRAVITY], FIELD_FACE_UP);
        }
        self
    }

    /// Advance the clock without producing samples.
    pub fn pause(&mut self, duration_ms: u64) -> &mut Self {
        self.now_ms += duration_ms;
        self
    }

    /// Take the generated samples.
    pub fn build(&mut self) -> Vec<SensorSample> {
        std::mem::take(&mut self.samples)
    }

    fn hold(&mut self, accel: [f32; 3], field: [f32; 3], duration_ms: u64) -> &mut Self {
        let steps = duration_ms / self.accel_interval_ms;
        for _ in 0..steps {
            self.push_accel(accel, field);
        }
        self
    }

    fn push_accel(&mut self, accel: [f32; 3], field: [f32; 3]) {
        self.samples
            .push(SensorSample::accelerometer(accel[0], accel[1], accel[2], self.now_ms));
        self.accel_count += 1;

        if self.accel_count % self.mag_every == 0 {
            self.samples
                .push(SensorSample::magnetometer(field[0], field[1], field[2], self.now_ms));
        }

        self.now_ms += self.accel_interval_ms;
    }
}
