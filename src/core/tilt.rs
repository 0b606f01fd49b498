//! Face-down gesture recognition over the roll angle.
//!
//! The device counts as face-down while `|roll|` exceeds `min_roll_degrees`.
//! The condition must hold on every estimate for longer than
//! `min_face_down_ms`; any estimate below the threshold restarts the dwell
//! timer. After firing, the detector stays latched until the consumer calls
//! [`TiltDetector::notify_face_up`]. Orientation alone never clears the latch.

use crate::config::TiltConfig;
use crate::core::elapsed_ms;
use tracing::debug;

/// Mutable state of a tilt detector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TiltState {
    /// Time the current dwell started
    pub first_pass_ms: Option<u64>,
    /// Latched after firing until acknowledged
    pub face_down: bool,
}

/// Debounced face-down recognizer.
#[derive(Debug, Clone)]
pub struct TiltDetector {
    config: TiltConfig,
    state: TiltState,
}

impl TiltDetector {
    pub fn new(config: TiltConfig) -> Self {
        Self {
            config,
            state: TiltState::default(),
        }
    }

    pub fn config(&self) -> &TiltConfig {
        &self.config
    }

    pub fn state(&self) -> &TiltState {
        &self.state
    }

    pub fn is_face_down(&self) -> bool {
        self.state.face_down
    }

    /// Feed one roll estimate. Returns true if face-down fired.
    pub fn on_orientation(&mut self, roll_degrees: f32, timestamp_ms: u64) -> bool {
        if roll_degrees.abs() > self.config.min_roll_degrees && !self.state.face_down {
            let first = *self.state.first_pass_ms.get_or_insert(timestamp_ms);
            let dwell = elapsed_ms(timestamp_ms, first);

            if dwell > self.config.min_face_down_ms {
                debug!(timestamp_ms, dwell_ms = dwell, roll_degrees, "Face-down detected");
                self.state.face_down = true;
                self.state.first_pass_ms = None;
                return true;
            }
        } else {
            self.state.first_pass_ms = None;
        }

        false
    }

    /// Acknowledge that the device is no longer face-down, re-arming the
    /// detector.
    pub fn notify_face_up(&mut self) {
        if self.state.face_down {
            debug!("Face-down latch cleared");
        }
        self.state.face_down = false;
    }

    pub fn reset(&mut self) {
        self.state = TiltState::default();
    }
}

impl Default for TiltDetector {
    fn default() -> Self {
        Self::new(TiltConfig::default())
    }
}
