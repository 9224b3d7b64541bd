//! Browsing history
//!
//! History is an append-only log: one JSON object per line, each line
//! written and flushed as its own append. Nothing ever rewrites the file,
//! so concurrent tabs cannot clobber each other's entries.

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub url: String,
    /// Seconds since the Unix epoch
    pub timestamp: f64,
}

impl HistoryRecord {
    pub fn new(url: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            timestamp: at.timestamp_micros() as f64 / 1_000_000.0,
        }
    }

    pub fn visited_at(&self) -> Option<DateTime<Utc>> {
        let micros = (self.timestamp * 1_000_000.0).round() as i64;
        Utc.timestamp_micros(micros).single()
    }
}

/// Destination for visit records
pub trait HistorySink: Send + Sync {
    /// Stamp and persist a visit, returning the stored record
    fn record_visit(&self, url: &str) -> Result<HistoryRecord>;
}

pub struct HistoryLog {
    path: PathBuf,
    /// Serializes appends and holds the last written timestamp, seeded
    /// from the file on the first append
    last_timestamp: Mutex<Option<f64>>,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_timestamp: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in write order. A missing file is an empty history.
    pub fn records(&self) -> Result<Vec<HistoryRecord>> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = index + 1,
                        error = %e,
                        "Skipping malformed history line"
                    );
                }
            }
        }

        Ok(records)
    }

    /// Most recent visits first
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>> {
        let mut records = self.records()?;
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }

    /// Case-insensitive substring match on the URL, most recent first
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<HistoryRecord>> {
        let needle = query.to_lowercase();
        Ok(self
            .records()?
            .into_iter()
            .rev()
            .filter(|record| record.url.to_lowercase().contains(&needle))
            .take(limit)
            .collect())
    }

    /// Timestamp of the newest record already on disk
    fn stored_floor(&self) -> f64 {
        match self.records() {
            Ok(records) => records.last().map_or(0.0, |record| record.timestamp),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read history");
                0.0
            }
        }
    }

    fn append_line(&self, record: &HistoryRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        Ok(())
    }
}

impl HistorySink for HistoryLog {
    fn record_visit(&self, url: &str) -> Result<HistoryRecord> {
        let mut last = self.last_timestamp.lock();
        let floor = match *last {
            Some(timestamp) => timestamp,
            None => self.stored_floor(),
        };

        let mut record = HistoryRecord::new(url, Utc::now());
        // Wall clock may step backwards; the log never does
        if record.timestamp < floor {
            record.timestamp = floor;
        }

        self.append_line(&record)?;
        *last = Some(record.timestamp);

        tracing::debug!(url = %record.url, timestamp = record.timestamp, "Recorded visit");

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("history.jsonl"));

        assert!(log.records().unwrap().is_empty());

        log.record_visit("https://example.com").unwrap();
        log.record_visit("https://rust-lang.org").unwrap();
        log.record_visit("https://example.com/docs").unwrap();

        let records = log.records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].url, "https://example.com");
        assert_eq!(records[2].url, "https://example.com/docs");
        assert!(records
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp));

        let recent = log.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].url, "https://example.com/docs");

        let found = log.search("EXAMPLE", 10).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].url, "https://example.com/docs");
    }

    #[test]
    fn test_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("profile").join("history.jsonl");
        let log = HistoryLog::new(&path);

        log.record_visit("about:blank").unwrap();

        assert!(path.exists());
        assert_eq!(log.records().unwrap().len(), 1);
    }

    #[test]
    fn test_one_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("history.jsonl"));

        let record = log.record_visit("https://example.com").unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(value["timestamp"].as_f64().unwrap(), record.timestamp);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        fs::write(
            &path,
            "{\"url\":\"https://a.example\",\"timestamp\":1.5}\nnot json\n\n",
        )
        .unwrap();

        let log = HistoryLog::new(&path);
        log.record_visit("https://b.example").unwrap();

        let records = log.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, 1.5);
        assert_eq!(records[1].url, "https://b.example");
    }

    #[test]
    fn test_timestamps_continue_from_existing_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        fs::write(
            &path,
            "{\"url\":\"https://future.example\",\"timestamp\":99999999999.0}\n",
        )
        .unwrap();

        let log = HistoryLog::new(&path);
        log.record_visit("https://now.example").unwrap();
        log.record_visit("https://later.example").unwrap();

        let timestamps: Vec<f64> = log.records().unwrap().iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![99999999999.0; 3]);
    }

    #[test]
    fn test_unwritable_location_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let log = HistoryLog::new(blocker.join("history.jsonl"));
        assert!(log.record_visit("https://example.com").is_err());
    }

    #[test]
    fn test_visited_at() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = HistoryRecord::new("https://example.com", at);
        assert_eq!(record.timestamp, at.timestamp() as f64);
        assert_eq!(record.visited_at(), Some(at));
    }
}
