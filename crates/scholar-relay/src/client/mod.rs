//! Semantic Scholar API client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Process-wide 1 req/s admission through [`RateLimitMiddleware`]
//! - Optional `x-api-key` authentication
//! - Classification of every outcome into [`ClientError`] kinds
//!
//! There is no retry and no cache: each call is exactly one upstream request.

mod middleware;
pub mod normalize;
pub mod request;

pub use middleware::RateLimitMiddleware;
pub use request::{Operation, UpstreamRequest};

use std::sync::Arc;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde_json::Value;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::limiter::RateLimiter;
use crate::models::{EdgeDirection, EdgePage, PaperPage, PaperRecord};

/// Semantic Scholar API client.
#[derive(Clone)]
pub struct SemanticScholarClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Limiter shared by every clone of this client.
    limiter: Arc<RateLimiter>,

    /// Graph API base URL.
    base_url: String,

    has_api_key: bool,
}

impl SemanticScholarClient {
    /// Create a new client with its own rate limiter.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let limiter = Arc::new(RateLimiter::new(config.min_interval));
        Self::with_rate_limiter(config, limiter)
    }

    /// Create a client that shares an existing rate limiter.
    ///
    /// `config.min_interval` is ignored in favour of the limiter's own spacing.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or HTTP client initialization fails.
    pub fn with_rate_limiter(config: Config, limiter: Arc<RateLimiter>) -> anyhow::Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        if let Some(ref key) = config.api_key {
            let mut value = HeaderValue::from_str(key)?;
            value.set_sensitive(true);
            headers.insert(api::API_KEY_HEADER, value);
        }

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let client = ClientBuilder::new(client)
            .with(RateLimitMiddleware::new(Arc::clone(&limiter)))
            .build();

        Ok(Self {
            client,
            limiter,
            base_url: config.base_url,
            has_api_key: config.api_key.is_some(),
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.has_api_key
    }

    /// The limiter gating this client's requests.
    #[must_use]
    pub const fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Search for papers by keyword.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for a blank query (no request is sent); otherwise the
    /// classified upstream failure.
    pub async fn search_papers(
        &self,
        query: &str,
        limit: Option<u32>,
        fields: Option<&str>,
    ) -> ClientResult<PaperPage> {
        let request = UpstreamRequest::search_papers(query, limit, fields)?;
        let body = self.get(&request).await?;
        normalize::paper_page(body, request.fields())
    }

    /// Get a single paper by ID.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for a blank ID (no request is sent); otherwise the
    /// classified upstream failure.
    pub async fn get_paper_details(
        &self,
        paper_id: &str,
        fields: Option<&str>,
    ) -> ClientResult<PaperRecord> {
        let request = UpstreamRequest::paper_details(paper_id, fields)?;
        let body = self.get(&request).await?;
        normalize::paper_record(body, request.fields())
    }

    /// Get papers that cite a paper.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for a blank ID (no request is sent); otherwise the
    /// classified upstream failure.
    pub async fn get_paper_citations(
        &self,
        paper_id: &str,
        limit: Option<u32>,
        fields: Option<&str>,
    ) -> ClientResult<EdgePage> {
        let request = UpstreamRequest::paper_citations(paper_id, limit, fields)?;
        let body = self.get(&request).await?;
        normalize::edge_page(body, EdgeDirection::Citing, request.fields())
    }

    /// Get papers referenced by a paper.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for a blank ID (no request is sent); otherwise the
    /// classified upstream failure.
    pub async fn get_paper_references(
        &self,
        paper_id: &str,
        limit: Option<u32>,
        fields: Option<&str>,
    ) -> ClientResult<EdgePage> {
        let request = UpstreamRequest::paper_references(paper_id, limit, fields)?;
        let body = self.get(&request).await?;
        normalize::edge_page(body, EdgeDirection::Cited, request.fields())
    }

    /// Get papers written by an author.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for a blank ID (no request is sent); otherwise the
    /// classified upstream failure.
    pub async fn get_author_papers(
        &self,
        author_id: &str,
        limit: Option<u32>,
        fields: Option<&str>,
    ) -> ClientResult<PaperPage> {
        let request = UpstreamRequest::author_papers(author_id, limit, fields)?;
        let body = self.get(&request).await?;
        normalize::paper_page(body, request.fields())
    }

    /// Make a GET request and parse the body as JSON.
    async fn get(&self, request: &UpstreamRequest) -> ClientResult<Value> {
        let url = request.url(&self.base_url)?;
        let operation = request.operation.name();

        let response = self.client.get(url).query(&request.query).send().await.map_err(|e| {
            let err = ClientError::from(e);
            tracing::warn!(operation, error = %err, "Upstream request failed");
            err
        })?;

        let response = Self::handle_response(response, request).await.inspect_err(|err| {
            tracing::warn!(operation, kind = %err.kind(), error = %err, "Upstream returned an error");
        })?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(operation, error = %e, "Upstream body is not JSON");
            ClientError::malformed(format!("{operation}: body is not valid JSON ({e})"))
        })
    }

    /// Handle API response status codes.
    async fn handle_response(
        response: reqwest::Response,
        request: &UpstreamRequest,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse().ok());

                Err(ClientError::rate_limited(retry_after))
            }
            404 => Err(ClientError::not_found(request.resource.clone())),
            400..=499 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::invalid_request(upstream_message(&text, status)))
            }
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), upstream_message(&text, status)))
            }
            _ => Err(ClientError::server(
                status.as_u16(),
                format!("unexpected status {status}"),
            )),
        }
    }
}

/// Pull a readable message out of an error body.
///
/// The API answers errors with `{"error": "..."}` or `{"message": "..."}`.
fn upstream_message(body: &str, status: reqwest::StatusCode) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["error", "message"]
            .iter()
            .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
    });

    from_json
        .or_else(|| Some(body.trim().to_string()).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("no message").to_string())
}

impl std::fmt::Debug for SemanticScholarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScholarClient")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.has_api_key())
            .finish()
    }
}
