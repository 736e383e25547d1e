//! Output sinks for filtered records.
//!
//! The pipeline hands its final records to a [`RecordSink`]. Every sink works
//! on the same six-column projection, [`OutputRow`].

mod console;
mod csv_file;

pub use console::{ConsoleSink, OutputFormat};
pub use csv_file::CsvSink;

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{PublicationRecord, NOT_AVAILABLE};

/// Column headers, in output order
pub const COLUMNS: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Message printed when there is nothing to output
pub const NO_RECORDS_MESSAGE: &str = "No papers to save or display.";

/// Errors raised while writing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Destination for the filtered records of a pipeline run
pub trait RecordSink {
    fn write(&mut self, records: &[PublicationRecord]) -> Result<(), OutputError>;
}

/// One output row: the six user-facing fields of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    #[serde(rename = "PubmedID")]
    pub pubmed_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Publication Date")]
    pub publication_date: String,
    #[serde(rename = "Non-academic Author(s)")]
    pub non_academic_authors: String,
    #[serde(rename = "Company Affiliation(s)")]
    pub company_affiliations: String,
    #[serde(rename = "Corresponding Author Email")]
    pub corresponding_email: String,
}

impl OutputRow {
    /// Field values in [`COLUMNS`] order
    pub fn fields(&self) -> [&str; 6] {
        [
            &self.pubmed_id,
            &self.title,
            &self.publication_date,
            &self.non_academic_authors,
            &self.company_affiliations,
            &self.corresponding_email,
        ]
    }
}

fn join_or_na<'a>(values: impl Iterator<Item = &'a String>) -> String {
    let joined = values.map(String::as_str).collect::<Vec<_>>().join("; ");
    if joined.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        joined
    }
}

impl From<&PublicationRecord> for OutputRow {
    fn from(record: &PublicationRecord) -> Self {
        Self {
            pubmed_id: record.id().to_string(),
            title: record.title().to_string(),
            publication_date: record.publication_date().to_string(),
            non_academic_authors: join_or_na(record.non_academic_authors().iter()),
            company_affiliations: join_or_na(record.company_affiliations().iter()),
            corresponding_email: record
                .corresponding_email()
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
        }
    }
}

/// Sink that keeps rows in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub rows: Vec<OutputRow>,
    pub writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for MemorySink {
    fn write(&mut self, records: &[PublicationRecord]) -> Result<(), OutputError> {
        self.writes += 1;
        self.rows.extend(records.iter().map(OutputRow::from));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthorRecord;
    use std::collections::BTreeSet;

    fn industry_author(name: &str, company: &str) -> AuthorRecord {
        AuthorRecord::new(
            name,
            vec![company.to_string()],
            true,
            BTreeSet::from([company.to_string()]),
        )
    }

    #[test]
    fn test_row_projection() {
        let record = PublicationRecord::new(
            "42",
            "A title",
            "2020-05-01",
            vec![
                industry_author("Ann Lee", "Pfizer Inc."),
                industry_author("Bo Chen", "Amgen Inc."),
            ],
            Some("ann@pfizer.com".to_string()),
        );

        let row = OutputRow::from(&record);
        assert_eq!(
            row.fields(),
            [
                "42",
                "A title",
                "2020-05-01",
                "Ann Lee; Bo Chen",
                "Amgen Inc.; Pfizer Inc.",
                "ann@pfizer.com",
            ]
        );
    }

    #[test]
    fn test_row_sentinels() {
        let record = PublicationRecord::new("7", "T", "N/A", vec![], None);
        let row = OutputRow::from(&record);

        assert_eq!(row.non_academic_authors, NOT_AVAILABLE);
        assert_eq!(row.company_affiliations, NOT_AVAILABLE);
        assert_eq!(row.corresponding_email, NOT_AVAILABLE);
    }

    #[test]
    fn test_row_serializes_with_column_names() {
        let record = PublicationRecord::new("7", "T", "N/A", vec![], None);
        let value = serde_json::to_value(OutputRow::from(&record)).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        for column in COLUMNS {
            assert!(keys.iter().any(|k| k == column), "missing {column}");
        }
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.write(&[PublicationRecord::new("1", "T", "N/A", vec![], None)])
            .unwrap();
        assert_eq!(sink.writes, 1);
        assert_eq!(sink.rows[0].pubmed_id, "1");
    }
}
