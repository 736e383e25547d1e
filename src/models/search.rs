//! Search request model.

use serde::{Deserialize, Serialize};

use crate::utils::{validate_max_results, validate_query, ValidationError};

/// Default number of identifiers requested from the search endpoint
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Search query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query (PubMed query syntax is passed through untouched)
    pub query: String,

    /// Maximum number of identifiers to request
    pub max_results: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Check the query text and result count before any request is made
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_query(&self.query)?;
        validate_max_results(self.max_results)
    }
}
