//! Record sources.
//!
//! A [`RecordSource`] performs the two remote stages of the pipeline: an
//! identifier search and a batched detail fetch. [`PubMedClient`] talks to
//! NCBI E-utilities; [`MockSource`] serves canned data for tests.

mod pubmed;

pub mod mock;

pub use mock::MockSource;
pub use pubmed::{PubMedClient, API_RATE_LIMIT_DELAY, DEFAULT_EUTILS_BASE, MAX_BATCH_SIZE};

use async_trait::async_trait;

use crate::models::{Pmid, PublicationRecord, SearchQuery};
use crate::utils::ValidationError;

/// Two-stage search-then-fetch interface used by the pipeline.
#[async_trait]
pub trait RecordSource: Send + Sync + std::fmt::Debug {
    /// Search for record identifiers, most relevant first.
    ///
    /// The query is validated before any request; an empty result is not an error.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Pmid>, SourceError>;

    /// Fetch and parse full records for the given identifiers.
    ///
    /// Failed batches and unparseable records are logged and left out rather
    /// than failing the whole fetch.
    async fn fetch_details(&self, ids: &[Pmid]) -> Vec<PublicationRecord>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Connection, timeout, or body read failure
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// A remote call failed on every attempt
    #[error("API request failed after {attempts} attempts: {detail}")]
    Api {
        attempts: u32,
        status: Option<u16>,
        detail: String,
    },

    /// Parsing error (XML or JSON)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return SourceError::Network(format!("request timed out: {}", err));
        }
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

impl From<crate::parser::XmlError> for SourceError {
    fn from(err: crate::parser::XmlError) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SourceError::Api {
            attempts: 3,
            status: Some(500),
            detail: "HTTP status 500: boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed after 3 attempts: HTTP status 500: boom"
        );

        let err: SourceError = ValidationError::EmptyQuery.into();
        assert_eq!(err.to_string(), "Invalid request: Search query cannot be empty");
    }
}
