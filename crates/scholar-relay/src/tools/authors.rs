//! Author paper listing tool.

use serde_json::json;

use super::{McpTool, ToolContext, response_format_schema};
use crate::config::{fields, limits};
use crate::error::ToolResult;
use crate::formatters;
use crate::models::{AuthorPapersInput, ResponseFormat};

/// Papers written by an author.
pub struct AuthorPapersTool;

#[async_trait::async_trait]
impl McpTool for AuthorPapersTool {
    fn name(&self) -> &'static str {
        "get_author_papers"
    }

    fn description(&self) -> &'static str {
        "Get papers by a specific author, identified by Semantic Scholar author ID."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "author_id": {
                    "type": "string",
                    "description": "Semantic Scholar author ID"
                },
                "limit": {
                    "type": "integer",
                    "default": limits::DEFAULT,
                    "minimum": 1,
                    "maximum": limits::LISTING_MAX,
                    "description": "Maximum number of papers to return"
                },
                "fields": {
                    "type": "string",
                    "default": fields::AUTHOR_PAPERS,
                    "description": "Comma-separated list of fields to return for each paper"
                },
                "response_format": response_format_schema()
            },
            "required": ["author_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: AuthorPapersInput = serde_json::from_value(input)?;

        let page = ctx
            .client
            .get_author_papers(&params.author_id, params.limit, params.fields.as_deref())
            .await?;

        match params.response_format {
            ResponseFormat::Markdown => {
                Ok(formatters::format_paper_page_markdown(&page, "Author Papers"))
            }
            ResponseFormat::Json => formatters::to_json(&page),
        }
    }
}
