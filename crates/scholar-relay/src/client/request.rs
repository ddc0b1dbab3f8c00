//! Request building and local validation for the five upstream operations.

use crate::config::{fields, limits};
use crate::error::{ClientError, ClientResult};

/// The upstream operations this client can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `GET /paper/search`
    SearchPapers,
    /// `GET /paper/{id}`
    PaperDetails,
    /// `GET /paper/{id}/citations`
    PaperCitations,
    /// `GET /paper/{id}/references`
    PaperReferences,
    /// `GET /author/{id}/papers`
    AuthorPapers,
}

impl Operation {
    /// Tool-facing name of the operation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SearchPapers => "search_papers",
            Self::PaperDetails => "get_paper_details",
            Self::PaperCitations => "get_paper_citations",
            Self::PaperReferences => "get_paper_references",
            Self::AuthorPapers => "get_author_papers",
        }
    }

    /// Field selectors used when the caller gives none.
    #[must_use]
    pub const fn default_fields(self) -> &'static str {
        match self {
            Self::SearchPapers => fields::SEARCH,
            Self::PaperDetails => fields::PAPER_DETAILS,
            Self::PaperCitations | Self::PaperReferences => fields::CITATION_EDGE,
            Self::AuthorPapers => fields::AUTHOR_PAPERS,
        }
    }

    /// Largest `limit` the endpoint accepts, or `None` if it takes no limit.
    #[must_use]
    pub const fn max_limit(self) -> Option<u32> {
        match self {
            Self::SearchPapers => Some(limits::SEARCH_MAX),
            Self::PaperDetails => None,
            Self::PaperCitations | Self::PaperReferences | Self::AuthorPapers => {
                Some(limits::LISTING_MAX)
            }
        }
    }
}

/// A validated, ready-to-send GET request relative to the API root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// Operation this request performs.
    pub operation: Operation,

    /// Path below the API root, starting with `/`.
    pub path: String,

    /// Query parameters in send order.
    pub query: Vec<(&'static str, String)>,

    /// What a 404 refers to, for error messages.
    pub resource: String,
}

impl UpstreamRequest {
    /// Build a paper search request.
    pub fn search_papers(
        query: &str,
        limit: Option<u32>,
        fields: Option<&str>,
    ) -> ClientResult<Self> {
        let query = require("query", query)?;
        let op = Operation::SearchPapers;

        Ok(Self {
            operation: op,
            path: "/paper/search".to_string(),
            query: vec![
                ("query", query.to_string()),
                limit_param(op, limit),
                ("fields", select_fields(op, fields)),
            ],
            resource: format!("search results for '{query}'"),
        })
    }

    /// Build a paper detail request.
    pub fn paper_details(paper_id: &str, fields: Option<&str>) -> ClientResult<Self> {
        let paper_id = require_id("paper_id", paper_id)?;
        let op = Operation::PaperDetails;

        Ok(Self {
            operation: op,
            path: format!("/paper/{paper_id}"),
            query: vec![("fields", select_fields(op, fields))],
            resource: format!("paper '{paper_id}'"),
        })
    }

    /// Build a request for papers citing `paper_id`.
    pub fn paper_citations(
        paper_id: &str,
        limit: Option<u32>,
        fields: Option<&str>,
    ) -> ClientResult<Self> {
        Self::paper_edges(Operation::PaperCitations, "citations", paper_id, limit, fields)
    }

    /// Build a request for papers referenced by `paper_id`.
    pub fn paper_references(
        paper_id: &str,
        limit: Option<u32>,
        fields: Option<&str>,
    ) -> ClientResult<Self> {
        Self::paper_edges(Operation::PaperReferences, "references", paper_id, limit, fields)
    }

    /// Build a request for an author's papers.
    pub fn author_papers(
        author_id: &str,
        limit: Option<u32>,
        fields: Option<&str>,
    ) -> ClientResult<Self> {
        let author_id = require_id("author_id", author_id)?;
        let op = Operation::AuthorPapers;

        Ok(Self {
            operation: op,
            path: format!("/author/{author_id}/papers"),
            query: vec![
                limit_param(op, limit),
                ("fields", select_fields(op, fields)),
            ],
            resource: format!("author '{author_id}'"),
        })
    }

    fn paper_edges(
        op: Operation,
        segment: &str,
        paper_id: &str,
        limit: Option<u32>,
        fields: Option<&str>,
    ) -> ClientResult<Self> {
        let paper_id = require_id("paper_id", paper_id)?;

        Ok(Self {
            operation: op,
            path: format!("/paper/{paper_id}/{segment}"),
            query: vec![
                limit_param(op, limit),
                ("fields", select_fields(op, fields)),
            ],
            resource: format!("paper '{paper_id}'"),
        })
    }

    /// The `fields` selector this request sends.
    #[must_use]
    pub fn fields(&self) -> &str {
        self.query
            .iter()
            .find(|(k, _)| *k == "fields")
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }

    /// The `limit` this request sends, if the operation takes one.
    #[must_use]
    pub fn limit(&self) -> Option<u32> {
        self.query.iter().find(|(k, _)| *k == "limit").and_then(|(_, v)| v.parse().ok())
    }

    /// Absolute URL for this request under `base_url`.
    pub fn url(&self, base_url: &str) -> ClientResult<url::Url> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        url::Url::parse(&raw)
            .map_err(|e| ClientError::invalid_request(format!("cannot build URL '{raw}': {e}")))
    }
}

/// Clamp a caller-supplied limit into `1..=max`, defaulting when absent.
#[must_use]
pub fn clamp_limit(limit: Option<u32>, max: u32) -> u32 {
    limit.unwrap_or(limits::DEFAULT).clamp(1, max)
}

fn limit_param(op: Operation, limit: Option<u32>) -> (&'static str, String) {
    let max = op.max_limit().unwrap_or(limits::DEFAULT);
    ("limit", clamp_limit(limit, max).to_string())
}

fn select_fields(op: Operation, requested: Option<&str>) -> String {
    requested
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| op.default_fields())
        .to_string()
}

fn require<'a>(name: &str, value: &'a str) -> ClientResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::invalid_request(format!("'{name}' must not be empty")));
    }
    Ok(trimmed)
}

// IDs go into the path verbatim (DOI ids keep their slashes), so anything
// that would end the path or move it to another endpoint is refused.
fn require_id<'a>(name: &str, value: &'a str) -> ClientResult<&'a str> {
    let id = require(name, value)?;
    if id.contains(['?', '#', '\\']) {
        return Err(ClientError::invalid_request(format!(
            "'{name}' must not contain '?', '#' or '\\': {id}"
        )));
    }
    if id.split('/').any(is_dot_segment) {
        return Err(ClientError::invalid_request(format!(
            "'{name}' must not contain '.' or '..' path segments: {id}"
        )));
    }
    Ok(id)
}

// URL parsing resolves these, including their percent-encoded spellings.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}
