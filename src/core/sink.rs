//! Gesture event delivery.
//!
//! The engine calls into a [`GestureSink`] synchronously, on the thread that
//! delivered the sample, as soon as a detector fires. Sinks should return
//! quickly; anything slow belongs on the consumer's own thread.

use serde::{Deserialize, Serialize};

/// The gestures the engine recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Shake,
    FaceDown,
}

impl GestureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureKind::Shake => "shake",
            GestureKind::FaceDown => "face_down",
        }
    }
}

impl std::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consumer of fired gestures.
pub trait GestureSink {
    /// A shake gesture was recognized.
    fn on_shake(&mut self);

    /// The device has been held face-down for the dwell time.
    fn on_face_down(&mut self);
}

impl<T: GestureSink + ?Sized> GestureSink for &mut T {
    fn on_shake(&mut self) {
        (**self).on_shake();
    }

    fn on_face_down(&mut self) {
        (**self).on_face_down();
    }
}

impl<T: GestureSink + ?Sized> GestureSink for Box<T> {
    fn on_shake(&mut self) {
        (**self).on_shake();
    }

    fn on_face_down(&mut self) {
        (**self).on_face_down();
    }
}

/// A sink built from two closures.
pub struct FnSink<S, F> {
    on_shake: S,
    on_face_down: F,
}

impl<S, F> FnSink<S, F>
where
    S: FnMut(),
    F: FnMut(),
{
    pub fn new(on_shake: S, on_face_down: F) -> Self {
        Self {
            on_shake,
            on_face_down,
        }
    }
}

impl<S, F> GestureSink for FnSink<S, F>
where
    S: FnMut(),
    F: FnMut(),
{
    fn on_shake(&mut self) {
        (self.on_shake)();
    }

    fn on_face_down(&mut self) {
        (self.on_face_down)();
    }
}

/// Records fired gestures in order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GestureKind>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GestureKind] {
        &self.events
    }

    pub fn count(&self, kind: GestureKind) -> usize {
        self.events.iter().filter(|&&e| e == kind).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl GestureSink for EventLog {
    fn on_shake(&mut self) {
        self.events.push(GestureKind::Shake);
    }

    fn on_face_down(&mut self) {
        self.events.push(GestureKind::FaceDown);
    }
}
