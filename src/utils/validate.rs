//! Input validation for search queries and request parameters.
//!
//! Everything here runs before any network call is made.

use thiserror::Error;

/// Maximum accepted query length, in characters.
pub const MAX_QUERY_LENGTH: usize = 1000;

/// Validation error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Search query cannot be empty")]
    EmptyQuery,

    #[error("Search query is too long ({0} characters, max 1000)")]
    QueryTooLong(usize),

    #[error("max_results must be greater than 0")]
    InvalidMaxResults,
}

/// Validate a free-text search query.
///
/// The query must contain something other than whitespace and must not exceed
/// [`MAX_QUERY_LENGTH`] characters (counted on the untrimmed input).
pub fn validate_query(query: &str) -> Result<(), ValidationError> {
    if query.trim().is_empty() {
        return Err(ValidationError::EmptyQuery);
    }

    let length = query.chars().count();
    if length > MAX_QUERY_LENGTH {
        return Err(ValidationError::QueryTooLong(length));
    }

    Ok(())
}

/// Validate the requested result count.
pub fn validate_max_results(max_results: usize) -> Result<(), ValidationError> {
    if max_results < 1 {
        return Err(ValidationError::InvalidMaxResults);
    }
    Ok(())
}
