//! Paper search and detail tools.

use serde_json::json;

use super::{McpTool, ToolContext, response_format_schema};
use crate::config::{fields, limits};
use crate::error::ToolResult;
use crate::formatters;
use crate::models::{PaperDetailsInput, ResponseFormat, SearchPapersInput};

/// Keyword search over Semantic Scholar papers.
pub struct SearchPapersTool;

#[async_trait::async_trait]
impl McpTool for SearchPapersTool {
    fn name(&self) -> &'static str {
        "search_papers"
    }

    fn description(&self) -> &'static str {
        "Search for academic papers on Semantic Scholar. Returns paper metadata \
         for the best matches of a keyword query."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query string"
                },
                "limit": {
                    "type": "integer",
                    "default": limits::DEFAULT,
                    "minimum": 1,
                    "maximum": limits::SEARCH_MAX,
                    "description": "Maximum number of results to return"
                },
                "fields": {
                    "type": "string",
                    "default": fields::SEARCH,
                    "description": "Comma-separated list of fields to return"
                },
                "response_format": response_format_schema()
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: SearchPapersInput = serde_json::from_value(input)?;

        let page = ctx
            .client
            .search_papers(&params.query, params.limit, params.fields.as_deref())
            .await?;

        match params.response_format {
            ResponseFormat::Markdown => {
                Ok(formatters::format_paper_page_markdown(&page, "Search Results"))
            }
            ResponseFormat::Json => formatters::to_json(&page),
        }
    }
}

/// Full metadata for one paper.
pub struct PaperDetailsTool;

#[async_trait::async_trait]
impl McpTool for PaperDetailsTool {
    fn name(&self) -> &'static str {
        "get_paper_details"
    }

    fn description(&self) -> &'static str {
        "Get detailed information about a specific paper by its Semantic Scholar ID \
         (or a prefixed ID such as DOI:, ARXIV:, CorpusId:)."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "paper_id": {
                    "type": "string",
                    "description": "Semantic Scholar paper ID (e.g., \"649def34f8be52c8b66281af98ae884c09aef38b\")"
                },
                "fields": {
                    "type": "string",
                    "default": fields::PAPER_DETAILS,
                    "description": "Comma-separated list of fields to return"
                },
                "response_format": response_format_schema()
            },
            "required": ["paper_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: PaperDetailsInput = serde_json::from_value(input)?;

        let paper =
            ctx.client.get_paper_details(&params.paper_id, params.fields.as_deref()).await?;

        match params.response_format {
            ResponseFormat::Markdown => Ok(formatters::format_paper_markdown(&paper, 0)),
            ResponseFormat::Json => formatters::to_json(&paper),
        }
    }
}
