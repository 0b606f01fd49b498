//! JSON Lines motion traces.
//!
//! One `SensorSample` per line. Blank lines are ignored and malformed lines
//! are skipped with a warning so a partially corrupted capture still replays.

use crate::collector::types::SensorSample;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::warn;

/// Parse a single trace line. Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<Result<SensorSample, serde_json::Error>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(serde_json::from_str(trimmed))
}

/// Read every valid sample from a reader.
pub fn parse_trace<R: BufRead>(reader: R) -> std::io::Result<Vec<SensorSample>> {
    let mut samples = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Some(Ok(sample)) => samples.push(sample),
            Some(Err(e)) => warn!(line = index + 1, "Skipping malformed trace line: {}", e),
            None => {}
        }
    }

    Ok(samples)
}

/// Load a trace file from disk.
pub fn load_trace(path: &Path) -> std::io::Result<Vec<SensorSample>> {
    let file = std::fs::File::open(path)?;
    parse_trace(BufReader::new(file))
}

/// Write samples as JSON Lines.
pub fn write_trace<W: Write>(mut writer: W, samples: &[SensorSample]) -> std::io::Result<()> {
    for sample in samples {
        let line = serde_json::to_string(sample).map_err(std::io::Error::other)?;
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}
