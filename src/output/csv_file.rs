use std::path::{Path, PathBuf};

use super::{OutputError, OutputRow, RecordSink, NO_RECORDS_MESSAGE};
use crate::models::PublicationRecord;

/// Sink that writes records to a CSV file with a header row
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_directory(&self) -> Result<(), OutputError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => {
                Err(OutputError::MissingDirectory(dir.to_path_buf()))
            }
            _ => Ok(()),
        }
    }
}

impl RecordSink for CsvSink {
    fn write(&mut self, records: &[PublicationRecord]) -> Result<(), OutputError> {
        if records.is_empty() {
            tracing::info!("{}", NO_RECORDS_MESSAGE);
            return Ok(());
        }

        self.check_directory()?;

        if self.path.exists() {
            tracing::warn!("File {} exists and will be overwritten.", self.path.display());
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        for record in records {
            writer.serialize(OutputRow::from(record))?;
        }
        writer.flush()?;

        tracing::info!("Results saved to {}", self.path.display());
        Ok(())
    }
}
