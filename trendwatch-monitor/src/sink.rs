//! Trend sinks — JSONL append-only persistence for decided cycles.
//!
//! Each record is one JSON object per line, making the format resilient to
//! partial writes and easy to stream into downstream tooling. A sink failure
//! never stops the monitor loop; the session logs it and keeps polling.

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::record::TrendRecord;

/// Errors from a trend sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write record: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Receives one record per decided cycle.
pub trait TrendSink: Send {
    /// Identifies the sink in logs.
    fn name(&self) -> &str;

    /// Persist a single record. An error marks this record as lost; the
    /// session keeps running.
    fn record(&mut self, record: &TrendRecord) -> Result<(), SinkError>;
}

/// Appends records to a JSONL file, creating parent directories on first
/// write. The file is opened per append so long-running sessions survive
/// log rotation out from under them.
pub struct JsonlSink {
    path: PathBuf,
    name: String,
}

impl JsonlSink {
    pub fn new(path: PathBuf) -> Self {
        let name = format!("jsonl:{}", path.display());
        Self { path, name }
    }

    /// Read all records back from the file.
    ///
    /// Skips malformed lines (a torn write costs one record, not the file).
    pub fn read_all(&self) -> io::Result<Vec<TrendRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path)?;
        let reader = io::BufReader::new(file);
        let mut records = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<TrendRecord>(&line) {
                Ok(record) => records.push(record),
                Err(_) => continue, // skip malformed lines
            }
        }

        Ok(records)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TrendSink for JsonlSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn record(&mut self, record: &TrendRecord) -> Result<(), SinkError> {
        let json = serde_json::to_string(record)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        writeln!(file, "{json}")?;
        file.flush()?;

        Ok(())
    }
}

/// Writes each record as one JSON line to stdout, for piping into jq or a
/// collector.
#[derive(Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl TrendSink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    fn record(&mut self, record: &TrendRecord) -> Result<(), SinkError> {
        let json = serde_json::to_string(record)?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{json}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;
    use trendwatch_core::Action;

    fn make_record(seq: u64) -> TrendRecord {
        TrendRecord {
            session: "deadbeef".into(),
            seq,
            timestamp: Utc::now(),
            symbol: "BTC/USDT".into(),
            price: 101.25,
            rsi: Some(28.5),
            macd_line: None,
            macd_signal: None,
            macd_histogram: None,
            bollinger_upper: None,
            bollinger_middle: None,
            bollinger_lower: None,
            stoch_k: None,
            stoch_d: None,
            sma: None,
            action: Action::Buy,
        }
    }

    #[test]
    fn append_and_read_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let mut sink = JsonlSink::new(tmp.path().join("trend.jsonl"));

        sink.record(&make_record(1)).unwrap();

        let records = sink.read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].seq, 1);
        assert_eq!(records[0].action, Action::Buy);
    }

    #[test]
    fn multiple_appends_preserve_order() {
        let tmp = TempDir::new().unwrap();
        let mut sink = JsonlSink::new(tmp.path().join("trend.jsonl"));

        for seq in 1..=5 {
            sink.record(&make_record(seq)).unwrap();
        }

        let records = sink.read_all().unwrap();
        assert_eq!(records.len(), 5);
        let seqs: Vec<u64> = records.iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn read_nonexistent_file_returns_empty() {
        let tmp = TempDir::new().unwrap();
        let sink = JsonlSink::new(tmp.path().join("does_not_exist.jsonl"));
        assert!(sink.read_all().unwrap().is_empty());
    }

    #[test]
    fn creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("deeper").join("trend.jsonl");
        let mut sink = JsonlSink::new(path.clone());

        sink.record(&make_record(1)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("trend.jsonl");
        let mut sink = JsonlSink::new(path.clone());

        sink.record(&make_record(1)).unwrap();
        fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .and_then(|mut f| writeln!(f, "{{not json"))
            .unwrap();
        sink.record(&make_record(2)).unwrap();

        let records = sink.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].seq, 2);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("trend.jsonl");
        let mut sink = JsonlSink::new(path.clone());

        sink.record(&make_record(1)).unwrap();
        fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .and_then(|mut f| writeln!(f, "\n\n"))
            .unwrap();

        assert_eq!(sink.read_all().unwrap().len(), 1);
    }

    #[test]
    fn sink_names_identify_the_target() {
        let sink = JsonlSink::new(PathBuf::from("/tmp/x.jsonl"));
        assert!(sink.name().starts_with("jsonl:"));
        assert_eq!(StdoutSink::new().name(), "stdout");
    }
}
