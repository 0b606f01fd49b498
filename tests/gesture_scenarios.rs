//! End-to-end gesture scenarios through the public API

use gesture_sensor_agent::collector::{load_trace, write_trace};
use gesture_sensor_agent::{
    CollectorConfig, Config, EventLog, FnSink, GestureEngine, GestureKind, OrientationEstimator,
    RecordingController, ReplayCollector, SensorKind, SensorSample, ShakeDetector,
    SyntheticScript, TiltDetector, Trigger,
};
use std::cell::Cell;

/// Alternate the axis sum between 20 and 0 so every sample moves by 20.
fn alternating(t: u64) -> (f32, f32, f32) {
    if (t / 100) % 2 == 0 {
        (20.0, 0.0, 0.0)
    } else {
        (0.0, 0.0, 0.0)
    }
}

#[test]
fn shake_fires_at_500_then_waits_out_cooldown() {
    let mut detector = ShakeDetector::default();
    let mut fired = Vec::new();

    for t in (0..=2000).step_by(100) {
        let (x, y, z) = alternating(t);
        if detector.on_sample(x, y, z, t) {
            fired.push(t);
        }
    }

    assert_eq!(fired, vec![500, 2000]);
}

#[test]
fn shake_never_fires_below_threshold() {
    let mut detector = ShakeDetector::default();
    for i in 0..1000u64 {
        let x = if i % 2 == 0 { 15.0 } else { 0.0 };
        assert!(!detector.on_sample(x, 0.0, 0.0, i * 10));
    }
}

#[test]
fn shake_count_restarts_after_stale_gap() {
    let mut detector = ShakeDetector::default();

    // Three changes, a 600 ms gap, then more: the late sample restarts the
    // window instead of counting, so six are never seen together
    for (x, t) in [(20.0, 0), (0.0, 100), (20.0, 200)] {
        assert!(!detector.on_sample(x, 0.0, 0.0, t));
    }
    assert_eq!(detector.state().direction_changes, 3);

    for (x, t) in [(0.0, 800), (20.0, 900), (0.0, 1000), (20.0, 1100)] {
        assert!(!detector.on_sample(x, 0.0, 0.0, t));
    }
    assert_eq!(detector.state().direction_changes, 3);
}

#[test]
fn tilt_concrete_sequence() {
    let mut detector = TiltDetector::default();

    assert!(!detector.on_orientation(170.0, 0));
    assert!(!detector.on_orientation(170.0, 500));
    assert!(!detector.on_orientation(170.0, 1000));
    assert!(detector.on_orientation(170.0, 1600));
    assert!(!detector.on_orientation(170.0, 1700));

    detector.notify_face_up();
    let mut fired = Vec::new();
    for t in (1800..=3400).step_by(100) {
        if detector.on_orientation(170.0, t) {
            fired.push(t);
        }
    }
    assert_eq!(fired, vec![3400]);
}

#[test]
fn tilt_1499_ms_dwell_does_not_fire() {
    let mut detector = TiltDetector::default();
    assert!(!detector.on_orientation(-170.0, 0));
    assert!(!detector.on_orientation(-170.0, 1499));
    assert!(!detector.on_orientation(0.0, 1600));
    assert!(!detector.on_orientation(-170.0, 1700));
    assert!(!detector.is_face_down());
}

#[test]
fn accelerometer_alone_never_estimates() {
    let mut estimator = OrientationEstimator::new();
    for i in 0..500 {
        let estimate = estimator.update(SensorKind::Accelerometer, [0.0, 0.0, 9.81], i);
        assert!(estimate.is_none());
    }
}

#[test]
fn closures_receive_gestures() {
    let shakes = Cell::new(0);
    let face_downs = Cell::new(0);
    let sink = FnSink::new(
        || shakes.set(shakes.get() + 1),
        || face_downs.set(face_downs.get() + 1),
    );
    let mut engine = GestureEngine::new(&Config::default(), sink);

    let samples = SyntheticScript::new(0, 20)
        .rest_face_up(500)
        .shake(1000, 12.0)
        .rest_face_up(1000)
        .rest_face_down(2000)
        .build();
    for sample in &samples {
        engine.process(sample);
    }
    drop(engine);

    assert_eq!(shakes.get(), 1);
    assert_eq!(face_downs.get(), 1);
}

#[test]
fn custom_thresholds_apply() {
    let mut config = Config::default();
    config.tilt.min_face_down_ms = 300;
    config.shake.min_direction_changes = 100;

    let mut engine = GestureEngine::new(&config, EventLog::new());
    let samples = SyntheticScript::new(0, 50)
        .shake(1000, 12.0)
        .rest_face_down(500)
        .build();
    for sample in &samples {
        engine.process(sample);
    }

    assert_eq!(engine.sink().events(), &[GestureKind::FaceDown]);
}

#[test]
fn replayed_trace_drives_recording() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");

    let samples = SyntheticScript::new(0, 20)
        .rest_face_up(1000)
        .shake(1000, 12.0)
        .rest_face_up(2000)
        .shake(1000, 12.0)
        .rest_face_up(2000)
        .rest_face_down(2500)
        .build();
    let file = std::fs::File::create(&path).unwrap();
    write_trace(std::io::BufWriter::new(file), &samples).unwrap();

    let mut collector = ReplayCollector::new(CollectorConfig::new(&path));
    collector.start().unwrap();

    let mut controller = RecordingController::new(&Config::default());
    let mut gestures = Vec::new();
    for sample in collector.receiver().clone().iter() {
        gestures.extend(controller.handle(&sample).gestures());
    }
    collector.stop();

    assert_eq!(
        gestures,
        vec![GestureKind::Shake, GestureKind::Shake, GestureKind::FaceDown]
    );

    let session = controller.session();
    assert_eq!(session.completed().len(), 1);
    assert_eq!(session.completed()[0].started_by, Trigger::Shake);
    assert_eq!(session.completed()[0].stopped_by, Trigger::Shake);
    assert_eq!(session.active().map(|a| a.started_by), Some(Trigger::FaceDown));

    let stats = controller.stats().snapshot();
    assert_eq!(stats.shakes, 2);
    assert_eq!(stats.face_downs, 1);
    assert_eq!(stats.accelerometer_samples as usize, samples.len() / 2);
}

#[test]
fn trace_with_garbage_lines_still_replays() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");

    let good = SensorSample::accelerometer(0.0, 0.0, 9.81, 10);
    let mut contents = String::from("{not json}\n\n");
    contents.push_str(&serde_json::to_string(&good).unwrap());
    contents.push('\n');
    std::fs::write(&path, contents).unwrap();

    let mut collector = ReplayCollector::new(CollectorConfig::new(&path));
    collector.start().unwrap();
    let received: Vec<SensorSample> = collector.receiver().clone().iter().collect();

    assert_eq!(received, vec![good]);
}

#[test]
fn loaded_trace_matches_live_engine_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");

    let samples = SyntheticScript::new(0, 50)
        .rest_face_up(500)
        .rest_face_down(2000)
        .build();
    let file = std::fs::File::create(&path).unwrap();
    write_trace(std::io::BufWriter::new(file), &samples).unwrap();

    let loaded = load_trace(&path).unwrap();
    assert_eq!(loaded, samples);

    let mut engine = GestureEngine::new(&Config::default(), EventLog::new());
    for sample in &loaded {
        engine.process(sample);
    }
    assert_eq!(engine.sink().events(), &[GestureKind::FaceDown]);
}

