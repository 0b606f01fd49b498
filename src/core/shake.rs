//! Shake gesture recognition over accelerometer samples.
//!
//! A shake is a burst of large combined-axis deltas ("direction changes"):
//! at least `min_direction_changes` of them, each within `max_pause_ms` of
//! the previous one, spanning at least `min_duration_ms`, and no sooner than
//! `min_time_between_shakes_ms` after the previous shake.
//!
//! Samples whose delta is at or below `min_movement` are ignored entirely.
//! They neither count nor refresh the pause timer, so a pending window only
//! goes stale when the next *strong* sample arrives too late.

use crate::config::ShakeConfig;
use crate::core::elapsed_ms;
use tracing::{debug, trace};

/// Mutable state of a shake detector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShakeState {
    /// Time of the first direction change in the pending window
    pub first_change_ms: Option<u64>,
    /// Time of the most recent direction change in the pending window
    pub last_change_ms: Option<u64>,
    /// Direction changes counted in the pending window
    pub direction_changes: u32,
    /// Time the last shake fired
    pub last_shake_ms: Option<u64>,
    /// Axis values of the last counted sample
    pub last_values: [f32; 3],
}

impl ShakeState {
    /// True while a window is collecting direction changes.
    pub fn window_open(&self) -> bool {
        self.first_change_ms.is_some()
    }

    fn reset_window(&mut self) {
        self.first_change_ms = None;
        self.last_change_ms = None;
        self.direction_changes = 0;
        self.last_values = [0.0; 3];
    }
}

/// Debounced shake recognizer.
///
/// Single-threaded: confine to the thread delivering accelerometer samples.
#[derive(Debug, Clone)]
pub struct ShakeDetector {
    config: ShakeConfig,
    state: ShakeState,
}

impl ShakeDetector {
    pub fn new(config: ShakeConfig) -> Self {
        Self {
            config,
            state: ShakeState::default(),
        }
    }

    pub fn config(&self) -> &ShakeConfig {
        &self.config
    }

    pub fn state(&self) -> &ShakeState {
        &self.state
    }

    /// Feed one accelerometer sample. Returns true if a shake fired.
    pub fn on_sample(&mut self, x: f32, y: f32, z: f32, timestamp_ms: u64) -> bool {
        let [last_x, last_y, last_z] = self.state.last_values;
        let movement = (x + y + z - last_x - last_y - last_z).abs();

        // NaN compares false against the threshold; treat it as no movement
        if movement.is_nan() || movement <= self.config.min_movement {
            return false;
        }

        let first = *self.state.first_change_ms.get_or_insert(timestamp_ms);
        let last = *self.state.last_change_ms.get_or_insert(timestamp_ms);

        if elapsed_ms(timestamp_ms, last) >= self.config.max_pause_ms {
            trace!(
                timestamp_ms,
                changes = self.state.direction_changes,
                "Shake window went stale"
            );
            self.state.reset_window();
            return false;
        }

        self.state.last_change_ms = Some(timestamp_ms);
        self.state.direction_changes += 1;
        self.state.last_values = [x, y, z];

        if self.state.direction_changes < self.config.min_direction_changes {
            return false;
        }

        let duration = elapsed_ms(timestamp_ms, first);
        let cooled_down = match self.state.last_shake_ms {
            Some(previous) => {
                elapsed_ms(timestamp_ms, previous) >= self.config.min_time_between_shakes_ms
            }
            None => true,
        };

        if duration >= self.config.min_duration_ms && cooled_down {
            debug!(
                timestamp_ms,
                duration_ms = duration,
                changes = self.state.direction_changes,
                "Shake detected"
            );
            self.state.last_shake_ms = Some(timestamp_ms);
            self.state.reset_window();
            return true;
        }

        false
    }

    /// Return to the freshly constructed state, forgetting the cooldown too.
    pub fn reset(&mut self) {
        self.state = ShakeState::default();
    }
}

impl Default for ShakeDetector {
    fn default() -> Self {
        Self::new(ShakeConfig::default())
    }
}
