//! Input models for MCP tool parameters.
//!
//! Parameter names are snake_case; camelCase spellings are accepted as aliases.

use serde::{Deserialize, Serialize};

use super::ResponseFormat;

/// Input for `search_papers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPapersInput {
    /// Search query (e.g., "attention is all you need").
    pub query: String,

    /// Maximum results (default 10, capped at 100).
    #[serde(default)]
    pub limit: Option<u32>,

    /// Comma-separated field selectors.
    #[serde(default)]
    pub fields: Option<String>,

    /// Output format.
    #[serde(default, alias = "responseFormat")]
    pub response_format: ResponseFormat,
}

/// Input for `get_paper_details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperDetailsInput {
    /// Paper ID (S2 ID, or prefixed such as `DOI:`, `ARXIV:`, `CorpusId:`).
    #[serde(alias = "paperId")]
    pub paper_id: String,

    /// Comma-separated field selectors.
    #[serde(default)]
    pub fields: Option<String>,

    /// Output format.
    #[serde(default, alias = "responseFormat")]
    pub response_format: ResponseFormat,
}

/// Input for `get_paper_citations` and `get_paper_references`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperEdgesInput {
    /// Paper whose citations or references are listed.
    #[serde(alias = "paperId")]
    pub paper_id: String,

    /// Maximum edges (default 10, capped at 1000).
    #[serde(default)]
    pub limit: Option<u32>,

    /// Comma-separated field selectors for each linked paper.
    #[serde(default)]
    pub fields: Option<String>,

    /// Output format.
    #[serde(default, alias = "responseFormat")]
    pub response_format: ResponseFormat,
}

/// Input for `get_author_papers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorPapersInput {
    /// Semantic Scholar author ID.
    #[serde(alias = "authorId")]
    pub author_id: String,

    /// Maximum papers (default 10, capped at 1000).
    #[serde(default)]
    pub limit: Option<u32>,

    /// Comma-separated field selectors.
    #[serde(default)]
    pub fields: Option<String>,

    /// Output format.
    #[serde(default, alias = "responseFormat")]
    pub response_format: ResponseFormat,
}
