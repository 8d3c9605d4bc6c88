//! JSON-lines session log.
//!
//! Each completed work segment is appended as one JSON object per line.
//! The log doubles as the data source for the `history` command.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::session::{PersistenceGateway, RecordError, WorkSegmentRecord};

// ============================================================================
// SessionLog
// ============================================================================

/// Append-only log of work segment records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record, creating the log and its directory on demand.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written.
    pub fn append(&self, record: &WorkSegmentRecord) -> Result<(), RecordError> {
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

        debug!(path = %self.path.display(), day_id = %record.day_id, "record appended");
        Ok(())
    }

    /// Reads every record in the log.
    ///
    /// A missing log reads as empty. Lines that fail to parse (e.g. a torn
    /// final write) are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the log exists but cannot be read.
    pub fn read_records(&self) -> Result<Vec<WorkSegmentRecord>, RecordError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (number, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<WorkSegmentRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(line = number + 1, error = %e, "skipping unreadable log line"),
            }
        }
        Ok(records)
    }

    /// Summarizes the log per training day, in order of first appearance.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read.
    pub fn daily_history(&self) -> Result<Vec<DayHistory>, RecordError> {
        Ok(summarize(&self.read_records()?))
    }
}

impl PersistenceGateway for SessionLog {
    fn record_completed_work_segment(
        &self,
        record: &WorkSegmentRecord,
    ) -> Result<(), RecordError> {
        self.append(record)
    }
}

// ============================================================================
// DayHistory
// ============================================================================

/// Work logged for one training day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHistory {
    pub day_id: String,
    pub work_segments: usize,
    pub planned_minutes: u32,
    pub actual_seconds: u64,
    pub first_started_at: DateTime<Utc>,
    pub last_ended_at: DateTime<Utc>,
}

impl DayHistory {
    /// Actual focus time rounded down to whole minutes.
    pub fn actual_minutes(&self) -> u64 {
        self.actual_seconds / 60
    }
}

/// Groups records by `day_id`.
pub fn summarize(records: &[WorkSegmentRecord]) -> Vec<DayHistory> {
    let mut days: Vec<DayHistory> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match positions.get(record.day_id.as_str()) {
            Some(&i) => {
                let day = &mut days[i];
                day.work_segments += 1;
                day.planned_minutes += record.planned_minutes;
                day.actual_seconds += record.actual_seconds;
                day.first_started_at = day.first_started_at.min(record.started_at);
                day.last_ended_at = day.last_ended_at.max(record.ended_at);
            }
            None => {
                positions.insert(record.day_id.as_str(), days.len());
                days.push(DayHistory {
                    day_id: record.day_id.clone(),
                    work_segments: 1,
                    planned_minutes: record.planned_minutes,
                    actual_seconds: record.actual_seconds,
                    first_started_at: record.started_at,
                    last_ended_at: record.ended_at,
                });
            }
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;
    use crate::types::SegmentKind;

    fn record(day_id: &str, index: usize, actual_seconds: u64) -> WorkSegmentRecord {
        let started_at = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap()
            + chrono::Duration::minutes(30 * index as i64);
        WorkSegmentRecord {
            user_id: "local".to_string(),
            plan_id: "plan".to_string(),
            day_id: day_id.to_string(),
            segment_index: index,
            segment_type: SegmentKind::Work,
            planned_minutes: 25,
            actual_seconds,
            started_at,
            ended_at: started_at + chrono::Duration::seconds(actual_seconds as i64),
        }
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let dir = TempDir::new().unwrap();
        let log = SessionLog::new(dir.path().join("sessions.jsonl"));

        assert!(log.read_records().unwrap().is_empty());
        assert!(log.daily_history().unwrap().is_empty());
    }

    #[test]
    fn test_append_creates_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("sessions.jsonl");
        let log = SessionLog::new(&path);

        log.append(&record("day-1-2025-01-06", 0, 1500)).unwrap();
        log.append(&record("day-1-2025-01-06", 2, 1510)).unwrap();

        assert!(path.exists());
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);

        let records = log.read_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].segment_index, 2);
    }

    #[test]
    fn test_gateway_appends() {
        let dir = TempDir::new().unwrap();
        let log = SessionLog::new(dir.path().join("sessions.jsonl"));
        let gateway: &dyn PersistenceGateway = &log;

        gateway
            .record_completed_work_segment(&record("day-1-2025-01-06", 0, 1500))
            .unwrap();

        assert_eq!(log.read_records().unwrap().len(), 1);
    }

    #[test]
    fn test_unreadable_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions.jsonl");
        let log = SessionLog::new(&path);
        log.append(&record("day-1-2025-01-06", 0, 1500)).unwrap();
        fs::write(
            &path,
            format!("{}\n{{\"truncated\n\n", fs::read_to_string(&path).unwrap().trim()),
        )
        .unwrap();

        assert_eq!(log.read_records().unwrap().len(), 1);
    }

    #[test]
    fn test_append_to_directory_fails() {
        let dir = TempDir::new().unwrap();
        let log = SessionLog::new(dir.path());

        let err = log.append(&record("day-1-2025-01-06", 0, 1500)).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_summarize_groups_by_day() {
        let records = vec![
            record("day-1-2025-01-06", 0, 1500),
            record("day-2-2025-01-07", 0, 1200),
            record("day-1-2025-01-06", 2, 1560),
        ];

        let days = summarize(&records);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day_id, "day-1-2025-01-06");
        assert_eq!(days[0].work_segments, 2);
        assert_eq!(days[0].planned_minutes, 50);
        assert_eq!(days[0].actual_seconds, 3060);
        assert_eq!(days[0].actual_minutes(), 51);
        assert_eq!(days[0].first_started_at, records[0].started_at);
        assert_eq!(days[0].last_ended_at, records[2].ended_at);
        assert_eq!(days[1].work_segments, 1);
    }
}
