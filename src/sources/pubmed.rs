//! PubMed record source using the NCBI E-utilities API.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::Config;
use crate::models::{Pmid, PublicationRecord, SearchQuery};
use crate::parser::RecordParser;
use crate::sources::{RecordSource, SourceError};
use crate::utils::{with_retry, HttpClient, RetryConfig};

/// E-utilities base URL; `esearch.fcgi` and `efetch.fcgi` live under it
pub const DEFAULT_EUTILS_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Maximum identifiers per efetch call
pub const MAX_BATCH_SIZE: usize = 100;

/// Fixed pause between consecutive efetch batches
pub const API_RATE_LIMIT_DELAY: Duration = Duration::from_millis(500);

/// Error bodies are cut to this many characters before being attached to errors
const MAX_ERROR_BODY_CHARS: usize = 500;

type QueryParams = Vec<(&'static str, String)>;

/// PubMed client
///
/// Searches with `esearch` (JSON) and fetches full records with `efetch`
/// (XML) in batches of up to [`MAX_BATCH_SIZE`]. Every remote call is retried
/// on transport failures according to its [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct PubMedClient {
    client: Arc<HttpClient>,
    base_url: String,
    api_key: Option<String>,
    retry: RetryConfig,
    batch_size: usize,
    batch_delay: Duration,
    parser: RecordParser,
}

impl PubMedClient {
    /// Create a new PubMed client with default settings
    pub fn new(api_key: Option<String>) -> Result<Self, SourceError> {
        Ok(Self::with_client(Arc::new(HttpClient::new()?)).api_key(api_key))
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let client = HttpClient::with_timeout(config.eutils.timeout())?;

        Ok(Self::with_client(Arc::new(client))
            .base_url(&config.eutils.base_url)
            .api_key(config.api_key.clone())
            .retry_config(config.retry.to_retry_config())
            .batch_size(config.eutils.batch_size)
            .batch_delay(config.eutils.batch_delay()))
    }

    /// Create with a custom HTTP client (for testing)
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            base_url: DEFAULT_EUTILS_BASE.to_string(),
            api_key: None,
            retry: RetryConfig::default(),
            batch_size: MAX_BATCH_SIZE,
            batch_delay: API_RATE_LIMIT_DELAY,
            parser: RecordParser::new(),
        }
    }

    /// Point the client at another E-utilities compatible endpoint
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Attach an NCBI API key to every request
    pub fn api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        if self.api_key.is_none() {
            tracing::debug!("No API key provided. Requests will be rate-limited.");
        }
        self
    }

    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Identifiers per efetch call, clamped to `1..=MAX_BATCH_SIZE`
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    pub fn batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    fn with_api_key(&self, mut params: QueryParams) -> QueryParams {
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    /// Build esearch query parameters
    fn search_params(&self, query: &SearchQuery) -> QueryParams {
        self.with_api_key(vec![
            ("db", "pubmed".to_string()),
            ("term", query.query.clone()),
            ("retmax", query.max_results.to_string()),
            ("retmode", "json".to_string()),
            ("sort", "relevance".to_string()),
        ])
    }

    /// Build efetch query parameters for one batch of PubMed IDs
    fn fetch_params(&self, ids: &[Pmid]) -> QueryParams {
        self.with_api_key(vec![
            ("db", "pubmed".to_string()),
            ("id", ids.join(",")),
            ("retmode", "xml".to_string()),
        ])
    }

    /// GET a URL and return the body, retrying transport failures
    async fn get_text(&self, url: String, params: QueryParams) -> Result<String, SourceError> {
        let client = Arc::clone(&self.client);

        with_retry(self.retry, || {
            let client = Arc::clone(&client);
            let url = url.clone();
            let params = params.clone();
            async move {
                let response = client.client().get(&url).query(&params).send().await?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(SourceError::Status {
                        status: status.as_u16(),
                        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                    });
                }

                response
                    .text()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))
            }
        })
        .await
    }

    /// Parse an esearch JSON response into PubMed IDs
    fn parse_search_response(json: &str) -> Result<Vec<Pmid>, SourceError> {
        #[derive(Debug, Deserialize)]
        struct ESearchResponse {
            #[serde(default)]
            esearchresult: ESearchResult,
        }

        #[derive(Debug, Default, Deserialize)]
        struct ESearchResult {
            #[serde(default)]
            idlist: Vec<String>,
            #[serde(rename = "ERROR")]
            error: Option<String>,
        }

        let response: ESearchResponse = serde_json::from_str(json)?;

        if let Some(error) = response.esearchresult.error {
            tracing::warn!("PubMed search reported an error: {}", error);
        }

        Ok(response.esearchresult.idlist)
    }

    /// Fetch and parse one batch; a decode failure fails the batch
    async fn fetch_batch(&self, ids: &[Pmid]) -> Result<Vec<PublicationRecord>, SourceError> {
        let xml = self
            .get_text(self.endpoint("efetch.fcgi"), self.fetch_params(ids))
            .await?;

        let mut records = Vec::with_capacity(ids.len());
        for result in self.parser.parse_article_set(&xml)? {
            match result {
                Ok(record) => records.push(record),
                Err(failure) => tracing::warn!("Skipping record: {}", failure),
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl RecordSource for PubMedClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Pmid>, SourceError> {
        query.validate()?;

        tracing::info!("Searching for papers with query: '{}'", query.query);
        tracing::debug!(
            "Search parameters: retmax={}, api_key={}",
            query.max_results,
            self.has_api_key()
        );

        let body = self
            .get_text(self.endpoint("esearch.fcgi"), self.search_params(query))
            .await?;
        let ids = Self::parse_search_response(&body)?;

        if ids.is_empty() {
            tracing::info!("No results found for the query.");
        } else {
            tracing::info!("Found {} papers matching the query.", ids.len());
            tracing::debug!("First few PMIDs: {:?}", &ids[..ids.len().min(5)]);
        }

        Ok(ids)
    }

    async fn fetch_details(&self, ids: &[Pmid]) -> Vec<PublicationRecord> {
        if ids.is_empty() {
            return Vec::new();
        }

        tracing::info!("Fetching details for {} papers...", ids.len());

        let batch_count = ids.len().div_ceil(self.batch_size);
        let mut records = Vec::with_capacity(ids.len());

        for (index, batch) in ids.chunks(self.batch_size).enumerate() {
            tracing::debug!(
                "Processing batch {}/{} with {} PMIDs",
                index + 1,
                batch_count,
                batch.len()
            );

            match self.fetch_batch(batch).await {
                Ok(mut batch_records) => records.append(&mut batch_records),
                Err(e) => tracing::warn!("Error fetching batch {}: {}", index + 1, e),
            }

            if index + 1 < batch_count {
                sleep(self.batch_delay).await;
            }
        }

        tracing::info!("Successfully fetched details for {} papers.", records.len());
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PubMedClient {
        PubMedClient::new(None).unwrap()
    }

    fn param<'a>(params: &'a QueryParams, key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_search_params() {
        let query = SearchQuery::new("machine learning").max_results(10);
        let params = client().search_params(&query);

        assert_eq!(param(&params, "db"), Some("pubmed"));
        assert_eq!(param(&params, "term"), Some("machine learning"));
        assert_eq!(param(&params, "retmax"), Some("10"));
        assert_eq!(param(&params, "retmode"), Some("json"));
        assert_eq!(param(&params, "sort"), Some("relevance"));
        assert_eq!(param(&params, "api_key"), None);
    }

    #[test]
    fn test_fetch_params_with_api_key() {
        let client = client().api_key(Some("secret".to_string()));
        let ids = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        let params = client.fetch_params(&ids);

        assert_eq!(param(&params, "id"), Some("1,2,3"));
        assert_eq!(param(&params, "retmode"), Some("xml"));
        assert_eq!(param(&params, "api_key"), Some("secret"));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let client = client().api_key(Some("  ".to_string()));
        assert!(!client.has_api_key());
    }

    #[test]
    fn test_batch_size_is_clamped() {
        assert_eq!(client().batch_size(0).batch_size, 1);
        assert_eq!(client().batch_size(500).batch_size, MAX_BATCH_SIZE);
        assert_eq!(client().batch_size(20).batch_size, 20);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = client().base_url("http://localhost:1234/");
        assert_eq!(
            client.endpoint("esearch.fcgi"),
            "http://localhost:1234/esearch.fcgi"
        );
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{"header":{"type":"esearch"},"esearchresult":{"count":"2","idlist":["38012345","37999999"]}}"#;
        let ids = PubMedClient::parse_search_response(json).unwrap();
        assert_eq!(ids, vec!["38012345", "37999999"]);
    }

    #[test]
    fn test_parse_search_response_missing_keys() {
        assert!(PubMedClient::parse_search_response("{}")
            .unwrap()
            .is_empty());
        assert!(PubMedClient::parse_search_response(
            r#"{"esearchresult":{"ERROR":"Invalid query"}}"#
        )
        .unwrap()
        .is_empty());
    }

    #[test]
    fn test_parse_search_response_invalid_json() {
        assert!(matches!(
            PubMedClient::parse_search_response("<html>"),
            Err(SourceError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_search_validates_before_request() {
        // The base URL is unroutable; validation must fail first
        let client = client().base_url("http://127.0.0.1:9");
        let result = client.search(&SearchQuery::new("   ")).await;
        assert!(matches!(result, Err(SourceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_fetch_details_empty_input() {
        assert!(client().fetch_details(&[]).await.is_empty());
    }
}
