//! # Research Paper Finder
//!
//! Searches PubMed for a query, fetches the matching records and keeps the
//! papers with at least one author affiliated with a pharmaceutical or
//! biotech company.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`classifier`]: Keyword/pattern affiliation classifier
//! - [`parser`]: PubMed XML record parser
//! - [`sources`]: Search-then-fetch clients (PubMed E-utilities, mock)
//! - [`finder`]: Pipeline orchestrator
//! - [`output`]: Console and CSV sinks
//! - [`models`]: Core data structures (PublicationRecord, SearchQuery, etc.)
//! - [`utils`]: HTTP client, retry and input validation
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```no_run
//! use research_paper_finder::{MemorySink, PaperFinder, PubMedClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let finder = PaperFinder::new(PubMedClient::new(None)?);
//! let mut sink = MemorySink::new();
//! let records = finder.run("cancer immunotherapy", 50, &mut sink).await?;
//! println!("{} industry-affiliated papers", records.len());
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod finder;
pub mod models;
pub mod output;
pub mod parser;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use classifier::{AffiliationClassifier, KeywordClassifier};
pub use finder::{FinderError, PaperFinder};
pub use models::{AuthorRecord, PublicationRecord, SearchQuery};
pub use output::{ConsoleSink, CsvSink, MemorySink, OutputFormat, RecordSink};
pub use parser::RecordParser;
pub use sources::{PubMedClient, RecordSource, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
