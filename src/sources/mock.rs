//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::{AuthorRecord, Pmid, PublicationRecord, SearchQuery};
use crate::sources::{RecordSource, SourceError};

/// A mock source that returns predefined identifiers and records.
#[derive(Debug, Default)]
pub struct MockSource {
    ids: Mutex<Vec<Pmid>>,
    records: Mutex<Vec<PublicationRecord>>,
    search_failure: Mutex<Option<String>>,
    search_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifiers returned by `search`.
    pub fn set_ids(&self, ids: Vec<Pmid>) {
        let mut guard = self.ids.lock().unwrap();
        *guard = ids;
    }

    /// Set the records returned by `fetch_details`.
    pub fn set_records(&self, records: Vec<PublicationRecord>) {
        let mut guard = self.records.lock().unwrap();
        *guard = records;
    }

    /// Make `search` fail as if retries were exhausted.
    pub fn fail_search(&self, detail: impl Into<String>) {
        let mut guard = self.search_failure.lock().unwrap();
        *guard = Some(detail.into());
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for MockSource {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Pmid>, SourceError> {
        query.validate()?;
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(detail) = self.search_failure.lock().unwrap().clone() {
            return Err(SourceError::Api {
                attempts: 3,
                status: Some(500),
                detail,
            });
        }

        let guard = self.ids.lock().unwrap();
        Ok(guard.iter().take(query.max_results).cloned().collect())
    }

    async fn fetch_details(&self, ids: &[Pmid]) -> Vec<PublicationRecord> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let guard = self.records.lock().unwrap();
        guard
            .iter()
            .filter(|record| ids.iter().any(|id| id == record.id()))
            .cloned()
            .collect()
    }
}

/// Helper function to create a record with one author per `(name, company)` pair.
///
/// A `Some` company marks that author as non-academic with that company name.
pub fn make_record(id: &str, title: &str, authors: &[(&str, Option<&str>)]) -> PublicationRecord {
    let authors = authors
        .iter()
        .map(|(name, company)| {
            AuthorRecord::new(
                *name,
                company.map(|c| vec![c.to_string()]).unwrap_or_default(),
                company.is_some(),
                company.map(str::to_string).into_iter().collect::<BTreeSet<_>>(),
            )
        })
        .collect();

    PublicationRecord::new(id, title, "2024-01-01", authors, None)
}
