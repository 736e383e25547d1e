//! Search-then-fetch pipeline.
//!
//! [`PaperFinder`] drives one run: validate the query, search for
//! identifiers, fetch full records, keep the industry-affiliated ones and
//! hand them to a [`RecordSink`].

use thiserror::Error;

use crate::models::{PublicationRecord, SearchQuery};
use crate::output::{OutputError, RecordSink};
use crate::sources::{RecordSource, SourceError};
use crate::utils::ValidationError;

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum FinderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Search failed: {0}")]
    Source(#[from] SourceError),

    #[error("Output failed: {0}")]
    Sink(#[from] OutputError),
}

/// Pipeline orchestrator over a [`RecordSource`]
#[derive(Debug)]
pub struct PaperFinder<S> {
    source: S,
}

impl<S: RecordSource> PaperFinder<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run the pipeline and return the records that were written to `sink`.
    ///
    /// A search with no hits returns an empty list without fetching or
    /// writing anything.
    pub async fn run(
        &self,
        query: &str,
        max_results: usize,
        sink: &mut dyn RecordSink,
    ) -> Result<Vec<PublicationRecord>, FinderError> {
        let query = SearchQuery::new(query).max_results(max_results);
        query.validate()?;

        let ids = self.source.search(&query).await?;
        if ids.is_empty() {
            tracing::info!("No papers found matching the query.");
            return Ok(Vec::new());
        }

        let records = self.source.fetch_details(&ids).await;
        let filtered = filter_industry_affiliated(records);

        tracing::info!(
            "Found {} papers with pharmaceutical/biotech affiliations.",
            filtered.len()
        );

        sink.write(&filtered)?;
        Ok(filtered)
    }
}

/// Keep records with at least one company affiliation, preserving order
pub fn filter_industry_affiliated(records: Vec<PublicationRecord>) -> Vec<PublicationRecord> {
    records
        .into_iter()
        .filter(PublicationRecord::is_industry_affiliated)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemorySink;
    use crate::sources::mock::{make_record, MockSource};

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_run_filters_and_writes() {
        let source = MockSource::new();
        source.set_ids(ids(&["1", "2", "3"]));
        source.set_records(vec![
            make_record("1", "Industry", &[("Ann Lee", Some("Genentech"))]),
            make_record("2", "Academic", &[("Bo Chen", None)]),
            make_record(
                "3",
                "Mixed",
                &[("Cy Diaz", None), ("Di Evans", Some("Moderna Therapeutics"))],
            ),
        ]);

        let finder = PaperFinder::new(source);
        let mut sink = MemorySink::new();
        let records = finder.run("cancer", 10, &mut sink).await.unwrap();

        let kept: Vec<_> = records.iter().map(|r| r.id()).collect();
        assert_eq!(kept, vec!["1", "3"]);
        assert_eq!(sink.writes, 1);
        assert_eq!(sink.rows.len(), 2);
        assert_eq!(sink.rows[1].non_academic_authors, "Di Evans");
    }

    #[tokio::test]
    async fn test_run_no_ids_skips_fetch_and_sink() {
        let finder = PaperFinder::new(MockSource::new());
        let mut sink = MemorySink::new();

        let records = finder.run("nothing", 10, &mut sink).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(finder.source().search_calls(), 1);
        assert_eq!(finder.source().fetch_calls(), 0);
        assert_eq!(sink.writes, 0);
    }

    #[tokio::test]
    async fn test_run_all_academic_writes_empty() {
        let source = MockSource::new();
        source.set_ids(ids(&["1"]));
        source.set_records(vec![make_record("1", "Academic", &[("Bo Chen", None)])]);

        let finder = PaperFinder::new(source);
        let mut sink = MemorySink::new();
        let records = finder.run("q", 5, &mut sink).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(sink.writes, 1);
        assert!(sink.rows.is_empty());
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_input() {
        let finder = PaperFinder::new(MockSource::new());
        let mut sink = MemorySink::new();

        let empty = finder.run("  ", 10, &mut sink).await;
        assert!(matches!(
            empty,
            Err(FinderError::Validation(ValidationError::EmptyQuery))
        ));

        let zero = finder.run("cancer", 0, &mut sink).await;
        assert!(matches!(zero, Err(FinderError::Validation(_))));

        assert_eq!(finder.source().search_calls(), 0);
    }

    #[tokio::test]
    async fn test_run_search_failure_is_fatal() {
        let source = MockSource::new();
        source.fail_search("HTTP status 500: unavailable");

        let finder = PaperFinder::new(source);
        let mut sink = MemorySink::new();
        let result = finder.run("cancer", 10, &mut sink).await;

        assert!(matches!(
            result,
            Err(FinderError::Source(SourceError::Api { attempts: 3, .. }))
        ));
        assert_eq!(sink.writes, 0);
    }

    #[tokio::test]
    async fn test_max_results_limits_ids() {
        let source = MockSource::new();
        source.set_ids(ids(&["1", "2", "3"]));
        source.set_records(vec![
            make_record("1", "A", &[("Ann Lee", Some("Pfizer Inc."))]),
            make_record("2", "B", &[("Bo Chen", Some("Pfizer Inc."))]),
            make_record("3", "C", &[("Cy Diaz", Some("Pfizer Inc."))]),
        ]);

        let finder = PaperFinder::new(source);
        let mut sink = MemorySink::new();
        let records = finder.run("q", 2, &mut sink).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_filter_preserves_order() {
        let records = vec![
            make_record("b", "B", &[("Ann Lee", Some("Amgen Inc."))]),
            make_record("x", "X", &[]),
            make_record("a", "A", &[("Bo Chen", Some("Bayer AG"))]),
        ];
        let kept: Vec<_> = filter_industry_affiliated(records)
            .into_iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(kept, vec!["b", "a"]);
    }
}
