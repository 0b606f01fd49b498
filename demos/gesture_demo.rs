//! Demonstration of gesture-driven recording.
//!
//! This example shows how to:
//! 1. Script a motion trace with known gestures
//! 2. Feed it through a recording controller
//! 3. React to shake and face-down gestures
//! 4. Read the gesture statistics
//!
//! Run with: cargo run --example gesture_demo

use gesture_sensor_agent::{
    create_shared_stats, Config, RecordingController, SyntheticScript, VERSION,
};

fn main() {
    println!("Gesture Sensor Agent - Recording Demo v{VERSION}");
    println!("===============================================");
    println!();

    let config = Config::default();
    let stats = create_shared_stats();
    let mut controller = RecordingController::with_stats(&config, stats.clone());

    // Pick up, shake to start, shake to stop, then put the phone face-down
    let samples = SyntheticScript::new(0, 20)
        .rest_face_up(1000)
        .shake(1000, 12.0)
        .rest_face_up(2000)
        .shake(1000, 12.0)
        .rest_face_up(2000)
        .rest_face_down(3000)
        .rest_face_up(1000)
        .build();

    println!("Replaying {} scripted samples...", samples.len());
    println!();

    for sample in &samples {
        let was_recording = controller.session().is_recording();
        let dispatch = controller.handle(sample);

        for gesture in dispatch.gestures() {
            println!("  [{:>6}ms] {gesture} detected", dispatch.timestamp_ms);
        }

        if was_recording != controller.session().is_recording() {
            match controller.session().active() {
                Some(active) => println!(
                    "  [{:>6}ms] Recording {} started ({:?})",
                    dispatch.timestamp_ms, active.id, active.started_by
                ),
                None => println!("  [{:>6}ms] Recording stopped", dispatch.timestamp_ms),
            }
        }
    }

    // Stop whatever the face-down gesture started
    if let Some(summary) = controller.stop_recording() {
        println!();
        println!(
            "Stopped recording {} by hand (started by {:?})",
            summary.id, summary.started_by
        );
    }

    println!();
    println!("=== Recordings ===");
    for (i, recording) in controller.session().completed().iter().enumerate() {
        println!(
            "  #{}: {:?} -> {:?}",
            i + 1,
            recording.started_by,
            recording.stopped_by
        );
    }

    println!();
    println!("{}", stats.summary());
}
