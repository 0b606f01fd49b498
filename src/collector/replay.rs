//! Trace replay collector.
//!
//! Reads a recorded JSON Lines trace on a background thread and delivers the
//! samples over a bounded channel, optionally paced by the recorded
//! timestamps. This stands in for the platform sensor service: the consumer
//! loop looks the same whether samples come from a device or a file.

use crate::collector::trace::parse_line;
use crate::collector::types::SensorSample;
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How long the reader blocks on a full channel before re-checking `running`.
const SEND_POLL: Duration = Duration::from_millis(100);

/// Configuration for a replay collector.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Trace file to replay
    pub trace_path: PathBuf,
    /// Sleep between samples according to their timestamps
    pub realtime: bool,
    /// Capacity of the sample channel
    pub channel_capacity: usize,
}

impl CollectorConfig {
    pub fn new(trace_path: impl Into<PathBuf>) -> Self {
        Self {
            trace_path: trace_path.into(),
            realtime: false,
            channel_capacity: 1024,
        }
    }
}

/// Errors that can occur during sample collection.
#[derive(Debug)]
pub enum CollectorError {
    AlreadyRunning,
    Io(String),
}

impl std::fmt::Display for CollectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectorError::AlreadyRunning => write!(f, "Collector is already running"),
            CollectorError::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CollectorError {}

/// Replays a trace file into a channel.
pub struct ReplayCollector {
    config: CollectorConfig,
    sender: Option<Sender<SensorSample>>,
    receiver: Receiver<SensorSample>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ReplayCollector {
    /// Create a new collector. Nothing is read until `start`.
    pub fn new(config: CollectorConfig) -> Self {
        let (sender, receiver) = bounded(config.channel_capacity.max(1));
        Self {
            config,
            sender: Some(sender),
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Open the trace and start the reader thread.
    ///
    /// A collector replays its trace once. When the reader reaches the end
    /// of the file the channel disconnects.
    pub fn start(&mut self) -> Result<(), CollectorError> {
        if self.sender.is_none() {
            return Err(CollectorError::AlreadyRunning);
        }

        let file = std::fs::File::open(&self.config.trace_path)
            .map_err(|e| CollectorError::Io(format!("{}: {e}", self.config.trace_path.display())))?;
        let sender = self.sender.take().ok_or(CollectorError::AlreadyRunning)?;

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();
        let realtime = self.config.realtime;

        let handle = thread::Builder::new()
            .name("trace-replay".to_string())
            .spawn(move || {
                replay_lines(BufReader::new(file), &sender, &running, realtime);
                running.store(false, Ordering::SeqCst);
            })
            .map_err(|e| CollectorError::Io(e.to_string()))?;

        self.handle = Some(handle);
        Ok(())
    }

    /// Stop replaying and wait for the reader thread.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Trace reader thread panicked");
            }
        }
    }

    /// Check if the reader thread is still delivering samples.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for samples.
    pub fn receiver(&self) -> &Receiver<SensorSample> {
        &self.receiver
    }

    /// Try to receive a sample without blocking.
    pub fn try_recv(&self) -> Option<SensorSample> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for ReplayCollector {
    fn drop(&mut self) {
        self.stop();
    }
}

fn replay_lines<R: BufRead>(
    reader: R,
    sender: &Sender<SensorSample>,
    running: &AtomicBool,
    realtime: bool,
) {
    let mut previous_ts: Option<u64> = None;
    let mut delivered = 0u64;

    for (index, line) in reader.lines().enumerate() {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Trace read failed: {}", e);
                break;
            }
        };

        let sample = match parse_line(&line) {
            Some(Ok(sample)) => sample,
            Some(Err(e)) => {
                warn!(line = index + 1, "Skipping malformed trace line: {}", e);
                continue;
            }
            None => continue,
        };

        if realtime {
            if let Some(prev) = previous_ts {
                let delay = sample.timestamp_ms.saturating_sub(prev);
                if !sleep_while_running(Duration::from_millis(delay), running) {
                    break;
                }
            }
            previous_ts = Some(sample.timestamp_ms);
        }

        if !send_while_running(sender, sample, running) {
            break;
        }
        delivered += 1;
    }

    debug!("Trace replay finished after {} samples", delivered);
}

/// Sleep for `delay` in `SEND_POLL` slices. Returns false if stopped first.
fn sleep_while_running(delay: Duration, running: &AtomicBool) -> bool {
    let deadline = Instant::now() + delay;
    loop {
        if !running.load(Ordering::SeqCst) {
            return false;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return true;
        }
        thread::sleep(remaining.min(SEND_POLL));
    }
}

/// Send, retrying on a full channel until stopped. Returns false when the
/// sample could not be delivered.
fn send_while_running(
    sender: &Sender<SensorSample>,
    mut sample: SensorSample,
    running: &AtomicBool,
) -> bool {
    loop {
        match sender.send_timeout(sample, SEND_POLL) {
            Ok(()) => return true,
            Err(SendTimeoutError::Timeout(returned)) => {
                if !running.load(Ordering::SeqCst) {
                    return false;
                }
                sample = returned;
            }
            Err(SendTimeoutError::Disconnected(_)) => return false,
        }
    }
}
