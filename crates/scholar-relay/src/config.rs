//! Configuration for the scholar-relay server.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Graph API endpoint.
    pub const GRAPH_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// Header carrying the optional API key.
    pub const API_KEY_HEADER: &str = "x-api-key";

    /// Request timeout for a single upstream call.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Minimum spacing between two outbound calls (1 req/s, with or without a key).
    pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Default field selectors per operation.
pub mod fields {
    /// Fields returned by `search_papers`.
    pub const SEARCH: &str = "title,authors,year,abstract,citationCount,url";

    /// Fields returned by `get_paper_details`.
    pub const PAPER_DETAILS: &str = "title,authors,year,abstract,citationCount,url,venue,\
                                     publicationDate,referenceCount,influentialCitationCount";

    /// Fields returned for each citing or cited paper.
    pub const CITATION_EDGE: &str = "title,authors,year,citationCount";

    /// Fields returned by `get_author_papers`.
    pub const AUTHOR_PAPERS: &str = "title,year,citationCount,url";

    /// Selectors that describe a citation edge rather than the linked paper.
    pub const EDGE_ATTRIBUTES: &[&str] = &["contexts", "intents", "isInfluential", "contextsWithIntent"];
}

/// Result-count bounds per operation.
pub mod limits {
    /// Default `limit` for every listing operation.
    pub const DEFAULT: u32 = 10;

    /// Upper bound accepted by the search endpoint.
    pub const SEARCH_MAX: u32 = 100;

    /// Upper bound accepted by citation, reference and author paper listings.
    pub const LISTING_MAX: u32 = 1000;
}

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "SEMANTIC_SCHOLAR_API_KEY";

/// Environment variable overriding the upstream base URL.
pub const BASE_URL_ENV: &str = "SEMANTIC_SCHOLAR_BASE_URL";

/// Client configuration.
#[derive(Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub api_key: Option<String>,

    /// Graph API root, without a trailing slash.
    pub base_url: String,

    /// Timeout for a single upstream request, measured from dispatch.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Minimum spacing between the start of two outbound calls.
    pub min_interval: Duration,
}

impl Config {
    /// Create a production configuration with an optional API key.
    ///
    /// The 1 req/s ceiling applies whether or not a key is present.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: api::GRAPH_API.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            min_interval: api::MIN_INTERVAL,
        }
    }

    /// Create a test configuration pointing at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: None,
            base_url: format!("{}/graph/v1", base_url.trim_end_matches('/')),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            min_interval: Duration::ZERO, // No spacing in tests
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL override is not a valid http(s) URL.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).ok();
        let mut config = Self::new(api_key);

        if let Some(url) = std::env::var(BASE_URL_ENV).ok().filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Override the upstream base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Check that the base URL is an absolute http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns error describing the offending value.
    pub fn validate(&self) -> anyhow::Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| anyhow::anyhow!("invalid base URL '{}': {e}", self.base_url))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => anyhow::bail!("unsupported base URL scheme '{other}' in '{}'", self.base_url),
        }
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("has_api_key", &self.has_api_key())
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("min_interval", &self.min_interval)
            .finish()
    }
}
