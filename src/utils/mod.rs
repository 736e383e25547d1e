//! Utility modules supporting retrieval.
//!
//! - [`HttpClient`]: shared reqwest client with timeouts
//! - [`RetryConfig`] / [`with_retry`]: exponential backoff for transport failures
//! - [`validate_query`] / [`validate_max_results`]: pre-flight input checks
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use research_paper_finder::sources::SourceError;
//! use research_paper_finder::utils::{with_retry, RetryConfig};
//!
//! # async fn fetch_data() -> Result<String, SourceError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), SourceError> {
//! let config = RetryConfig::default().max_attempts(3);
//! let body = with_retry(config, || fetch_data()).await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod retry;
mod validate;

pub use http::{HttpClient, DEFAULT_TIMEOUT};
pub use retry::{with_retry, RetryConfig, TransientError};
pub use validate::{validate_max_results, validate_query, ValidationError, MAX_QUERY_LENGTH};
