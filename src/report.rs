//! Call report log
//!
//! One CSV row per completed call. The file is created with a header row on
//! first use and only ever appended to afterwards.

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Local-time format of the `call_time` column
pub const CALL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Report encoding error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Report writer task failed: {0}")]
    Join(String),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// A completed call, flattened. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallReportRecord {
    pub call_time: String,
    pub user_phone: String,
    pub emergency_type: String,
    pub description: String,
    pub location: String,
    pub ambulance_type: String,
    pub ambulance_car_number: String,
    pub driver_name: String,
    pub driver_number: String,
}

/// Append-only CSV report file, safe to share between calls
#[derive(Clone)]
pub struct CsvReportLog {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvReportLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Append one record, writing the header first if the file is new
    pub fn append(&self, record: &CallReportRecord) -> ReportResult<()> {
        let _guard = self.write_lock.lock().unwrap();

        let has_rows = std::fs::metadata(&self.path)
            .map(|meta| meta.len() > 0)
            .unwrap_or(false);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(!has_rows)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        tracing::info!(path = %self.path.display(), "Call report written");
        Ok(())
    }

    /// Read every record back (header row skipped)
    #[cfg(test)]
    pub fn read_all(&self) -> ReportResult<Vec<CallReportRecord>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        reader
            .deserialize::<CallReportRecord>()
            .map(|row| row.map_err(ReportError::from))
            .collect()
    }
}
