//! Gesture Sensor Agent CLI
//!
//! Replays motion traces through the gesture engine and drives the
//! recording toggle from the detected gestures.

use anyhow::Context;
use clap::{Parser, Subcommand};
use gesture_sensor_agent::{
    collector::{write_trace, CollectorConfig, ReplayCollector, SyntheticScript},
    config::Config,
    session::RecordingController,
    stats::create_shared_stats,
    VERSION,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gesture-sensor")]
#[command(version = VERSION)]
#[command(about = "Shake and face-down gesture detection over motion sensor traces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON Lines motion trace through the gesture engine
    Replay {
        /// Trace file, one sample per line
        trace: PathBuf,

        /// Configuration file (defaults to the user config location)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pace samples by their recorded timestamps
        #[arg(long)]
        realtime: bool,

        /// Print events as JSON lines instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write a synthetic motion trace containing known gestures
    Simulate {
        /// Output file (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Number of shake gestures to include
        #[arg(long, default_value = "2")]
        shakes: u32,

        /// How long the device lies face-down at the end
        #[arg(long, default_value = "3000")]
        face_down_ms: u64,

        /// Accelerometer sample interval
        #[arg(long, default_value = "20")]
        interval_ms: u64,
    },

    /// Show configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,

        /// Configuration file (defaults to the user config location)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay {
            trace,
            config,
            realtime,
            json,
        } => cmd_replay(&trace, config.as_deref(), realtime, json),
        Commands::Simulate {
            output,
            shakes,
            face_down_ms,
            interval_ms,
        } => cmd_simulate(output.as_deref(), shakes, face_down_ms, interval_ms),
        Commands::Config { init, path } => cmd_config(init, path.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading configuration from {path:?}")),
        None => Config::load().with_context(|| {
            format!("loading configuration from {:?}", Config::config_path())
        }),
    }
}

fn cmd_replay(trace: &Path, config: Option<&Path>, realtime: bool, json: bool) -> anyhow::Result<()> {
    let config = load_config(config)?;

    if !json {
        println!("Gesture Sensor Agent v{VERSION}");
        println!();
        println!("Replaying {trace:?}");
        println!(
            "  Shake: {} changes > {} within {}ms gaps, >= {}ms, cooldown {}ms",
            config.shake.min_direction_changes,
            config.shake.min_movement,
            config.shake.max_pause_ms,
            config.shake.min_duration_ms,
            config.shake.min_time_between_shakes_ms
        );
        println!(
            "  Face-down: |roll| > {} for > {}ms",
            config.tilt.min_roll_degrees, config.tilt.min_face_down_ms
        );
        println!();
    }

    let stats = create_shared_stats();
    let mut controller = RecordingController::with_stats(&config, stats.clone());

    let mut collector = ReplayCollector::new(CollectorConfig {
        trace_path: trace.to_path_buf(),
        realtime: realtime || config.source.realtime,
        channel_capacity: config.source.channel_capacity,
    });
    collector
        .start()
        .with_context(|| format!("starting replay of {trace:?}"))?;

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    ctrlc_handler(running.clone())?;

    let receiver = collector.receiver().clone();

    while running.load(Ordering::SeqCst) {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(sample) => {
                let was_recording = controller.session().is_recording();
                let dispatch = controller.handle(&sample);
                let is_recording = controller.session().is_recording();

                for gesture in dispatch.gestures() {
                    if json {
                        let line = serde_json::json!({
                            "timestamp_ms": dispatch.timestamp_ms,
                            "gesture": gesture,
                            "recording": is_recording,
                        });
                        println!("{line}");
                    } else {
                        println!("[{:>8}ms] {} detected", dispatch.timestamp_ms, gesture);
                    }
                }

                if !json && was_recording != is_recording {
                    println!(
                        "[{:>8}ms] Recording {}",
                        dispatch.timestamp_ms,
                        if is_recording { "started" } else { "stopped" }
                    );
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        }
    }

    collector.stop();

    if json {
        println!("{}", serde_json::to_string(&stats.snapshot())?);
    } else {
        println!();
        println!("Recordings completed: {}", controller.session().completed().len());
        if let Some(active) = controller.session().active() {
            println!("Recording still active: {}", active.id);
        }
        println!();
        println!("{}", stats.summary());
    }

    Ok(())
}

fn cmd_simulate(
    output: Option<&Path>,
    shakes: u32,
    face_down_ms: u64,
    interval_ms: u64,
) -> anyhow::Result<()> {
    let mut script = SyntheticScript::new(0, interval_ms);
    script.rest_face_up(1000);
    for _ in 0..shakes {
        script.shake(1000, 12.0).rest_face_up(2000);
    }
    script.rest_face_down(face_down_ms).rest_face_up(1000);
    let samples = script.build();

    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating trace file {path:?}"))?;
            write_trace(std::io::BufWriter::new(file), &samples)?;
            eprintln!("Wrote {} samples to {path:?}", samples.len());
        }
        None => write_trace(std::io::stdout().lock(), &samples)?,
    }

    Ok(())
}

fn cmd_config(init: bool, path: Option<&Path>) -> anyhow::Result<()> {
    let shown = path.map(Path::to_path_buf).unwrap_or_else(Config::config_path);

    if init {
        if shown.exists() {
            anyhow::bail!("configuration file already exists at {shown:?}");
        }
        let config = Config::default();
        match path {
            Some(path) => config.save_to(path),
            None => config.save(),
        }
        .with_context(|| format!("writing configuration to {shown:?}"))?;
        println!("Wrote default configuration to {shown:?}");
        return Ok(());
    }

    let config = load_config(path)?;

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {shown:?}");
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) -> anyhow::Result<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .context("setting Ctrl+C handler")
}
