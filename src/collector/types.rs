//! Motion sample types for the Gesture Sensor Agent.
//!
//! Samples carry the raw three-axis reading and a monotonic millisecond
//! timestamp supplied by whatever delivers them. Nothing here reads a clock.

use serde::{Deserialize, Serialize};

/// Which sensor produced a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Linear acceleration including gravity (m/s^2)
    Accelerometer,
    /// Ambient geomagnetic field (uT)
    Magnetometer,
}

impl SensorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "accelerometer",
            SensorKind::Magnetometer => "magnetometer",
        }
    }
}

/// A single three-axis reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Sensor that produced the reading
    pub kind: SensorKind,
    /// X, Y, Z axis values in device coordinates
    pub values: [f32; 3],
    /// Arrival time in monotonic milliseconds
    pub timestamp_ms: u64,
}

impl SensorSample {
    /// Create an accelerometer sample.
    pub fn accelerometer(x: f32, y: f32, z: f32, timestamp_ms: u64) -> Self {
        Self {
            kind: SensorKind::Accelerometer,
            values: [x, y, z],
            timestamp_ms,
        }
    }

    /// Create a magnetometer sample.
    pub fn magnetometer(x: f32, y: f32, z: f32, timestamp_ms: u64) -> Self {
        Self {
            kind: SensorKind::Magnetometer,
            values: [x, y, z],
            timestamp_ms,
        }
    }

    pub fn x(&self) -> f32 {
        self.values[0]
    }

    pub fn y(&self) -> f32 {
        self.values[1]
    }

    pub fn z(&self) -> f32 {
        self.values[2]
    }
}
