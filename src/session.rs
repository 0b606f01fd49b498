//! Gesture-driven recording toggle.
//!
//! The consumer side of the engine: a shake toggles recording, holding the
//! device face-down starts it. Stopping a recording, by shake or by hand,
//! means the face-down condition has been dealt with, so the controller
//! acknowledges face-up and the tilt detector re-arms.
//!
//! Audio capture itself is out of scope; a recording here is only the
//! bookkeeping a capture service would hang off.

use crate::collector::types::SensorSample;
use crate::config::Config;
use crate::core::engine::{Dispatch, GestureEngine};
use crate::core::sink::GestureSink;
use crate::stats::SharedGestureStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// What caused a recording transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Shake,
    FaceDown,
    Manual,
}

/// A recording in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveRecording {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub started_by: Trigger,
}

/// A finished recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingSummary {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
    pub started_by: Trigger,
    pub stopped_by: Trigger,
}

/// Recording toggle driven by gestures.
#[derive(Debug, Default)]
pub struct RecordingSession {
    active: Option<ActiveRecording>,
    completed: Vec<RecordingSummary>,
    face_up_pending: bool,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveRecording> {
        self.active.as_ref()
    }

    pub fn completed(&self) -> &[RecordingSummary] {
        &self.completed
    }

    /// Start recording. Returns false if already recording.
    pub fn start(&mut self, trigger: Trigger) -> bool {
        if self.active.is_some() {
            return false;
        }

        let recording = ActiveRecording {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            started_by: trigger,
        };
        info!(id = %recording.id, ?trigger, "Recording started");
        self.active = Some(recording);
        true
    }

    /// Stop recording. Returns the finished recording, if one was active.
    pub fn stop(&mut self, trigger: Trigger) -> Option<RecordingSummary> {
        let recording = self.active.take()?;
        let summary = RecordingSummary {
            id: recording.id,
            started_at: recording.started_at,
            stopped_at: Utc::now(),
            started_by: recording.started_by,
            stopped_by: trigger,
        };
        info!(id = %summary.id, ?trigger, "Recording stopped");

        self.face_up_pending = true;
        self.completed.push(summary.clone());
        Some(summary)
    }

    /// Flip between recording and idle.
    pub fn toggle(&mut self, trigger: Trigger) {
        if self.is_recording() {
            self.stop(trigger);
        } else {
            self.start(trigger);
        }
    }

    /// Take the pending face-up acknowledgement raised by a stop.
    pub fn take_face_up(&mut self) -> bool {
        std::mem::take(&mut self.face_up_pending)
    }
}

impl GestureSink for RecordingSession {
    fn on_shake(&mut self) {
        self.toggle(Trigger::Shake);
    }

    fn on_face_down(&mut self) {
        self.start(Trigger::FaceDown);
    }
}

/// Owns the engine and forwards face-up acknowledgements back into it.
pub struct RecordingController {
    engine: GestureEngine<RecordingSession>,
}

impl RecordingController {
    pub fn new(config: &Config) -> Self {
        Self {
            engine: GestureEngine::new(config, RecordingSession::new()),
        }
    }

    pub fn with_stats(config: &Config, stats: SharedGestureStats) -> Self {
        Self {
            engine: GestureEngine::with_stats(config, RecordingSession::new(), stats),
        }
    }

    /// Process one sample and re-arm face-down detection if a recording
    /// stopped.
    pub fn handle(&mut self, sample: &SensorSample) -> Dispatch {
        let dispatch = self.engine.process(sample);
        self.acknowledge_face_up();
        dispatch
    }

    /// Stop recording from outside the gesture path (a button, a timeout).
    pub fn stop_recording(&mut self) -> Option<RecordingSummary> {
        let summary = self.engine.sink_mut().stop(Trigger::Manual);
        self.acknowledge_face_up();
        summary
    }

    pub fn session(&self) -> &RecordingSession {
        self.engine.sink()
    }

    pub fn engine(&self) -> &GestureEngine<RecordingSession> {
        &self.engine
    }

    pub fn stats(&self) -> &SharedGestureStats {
        self.engine.stats()
    }

    fn acknowledge_face_up(&mut self) {
        if self.engine.sink_mut().take_face_up() {
            self.engine.notify_face_up();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::synthetic::SyntheticScript;

    #[test]
    fn test_shake_toggles() {
        let mut session = RecordingSession::new();
        session.on_shake();
        assert!(session.is_recording());
        assert!(!session.take_face_up());

        session.on_shake();
        assert!(!session.is_recording());
        assert!(session.take_face_up());
        assert!(!session.take_face_up());

        assert_eq!(session.completed().len(), 1);
        assert_eq!(session.completed()[0].started_by, Trigger::Shake);
        assert_eq!(session.completed()[0].stopped_by, Trigger::Shake);
    }

    #[test]
    fn test_face_down_only_starts() {
        let mut session = RecordingSession::new();
        session.on_face_down();
        assert!(session.is_recording());
        let id = session.active().unwrap().id;

        session.on_face_down();
        assert!(session.is_recording());
        assert_eq!(session.active().unwrap().id, id);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut session = RecordingSession::new();
        assert!(session.stop(Trigger::Manual).is_none());
        assert!(!session.take_face_up());
    }

    #[test]
    fn test_controller_rearms_after_shake_stop() {
        let mut controller = RecordingController::new(&Config::default());
        let mut script = SyntheticScript::new(0, 50);

        // Face-down starts recording
        for sample in script.rest_face_down(2000).build() {
            controller.handle(&sample);
        }
        assert!(controller.session().is_recording());
        assert_eq!(
            controller.session().active().unwrap().started_by,
            Trigger::FaceDown
        );

        // Pick up and shake: recording stops and the latch clears
        script.rest_face_up(500);
        for sample in script.shake(1000, 12.0).build() {
            controller.handle(&sample);
        }
        assert!(!controller.session().is_recording());
        assert!(!controller.engine().tilt_detector().is_face_down());

        // Face-down again starts a second recording
        for sample in script.rest_face_up(2000).rest_face_down(2000).build() {
            controller.handle(&sample);
        }
        assert!(controller.session().is_recording());
        assert_eq!(controller.session().completed().len(), 1);
        assert_eq!(controller.stats().snapshot().face_downs, 2);
    }

    #[test]
    fn test_manual_stop_rearms() {
        let mut controller = RecordingController::new(&Config::default());
        let mut script = SyntheticScript::new(0, 100);
        for sample in script.rest_face_down(2000).build() {
            controller.handle(&sample);
        }
        assert!(controller.engine().tilt_detector().is_face_down());

        let summary = controller.stop_recording().unwrap();
        assert_eq!(summary.stopped_by, Trigger::Manual);
        assert!(!controller.engine().tilt_detector().is_face_down());
        assert_eq!(controller.stats().snapshot().face_up_acks, 1);
    }
}
