//! Core data models for search requests and parsed records.

mod record;
mod search;

pub use record::{AuthorRecord, Pmid, PublicationRecord, NOT_AVAILABLE};
pub use search::{SearchQuery, DEFAULT_MAX_RESULTS};
