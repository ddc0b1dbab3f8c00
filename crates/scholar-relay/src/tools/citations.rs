//! Citation graph tools: who cites a paper, and what it cites.

use serde_json::json;

use super::{McpTool, ToolContext, response_format_schema};
use crate::config::{fields, limits};
use crate::error::ToolResult;
use crate::formatters;
use crate::models::{EdgePage, PaperEdgesInput, ResponseFormat};

fn edges_schema(id_description: &str, fields_description: &str) -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "paper_id": {
                "type": "string",
                "description": id_description
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
                "default": fields::CITATION_EDGE,
                "description": fields_description
            },
            "response_format": response_format_schema()
        },
        "required": ["paper_id"]
    })
}

fn render(page: &EdgePage, format: ResponseFormat, heading: &str) -> ToolResult<String> {
    match format {
        ResponseFormat::Markdown => Ok(formatters::format_edge_page_markdown(page, heading)),
        ResponseFormat::Json => formatters::to_json(page),
    }
}

/// Papers citing a given paper.
pub struct PaperCitationsTool;

#[async_trait::async_trait]
impl McpTool for PaperCitationsTool {
    fn name(&self) -> &'static str {
        "get_paper_citations"
    }

    fn description(&self) -> &'static str {
        "Get papers that cite a specific paper."
    }

    fn input_schema(&self) -> serde_json::Value {
        edges_schema(
            "Semantic Scholar paper ID",
            "Comma-separated list of fields to return for each citing paper",
        )
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: PaperEdgesInput = serde_json::from_value(input)?;

        let page = ctx
            .client
            .get_paper_citations(&params.paper_id, params.limit, params.fields.as_deref())
            .await?;

        render(&page, params.response_format, "Citations")
    }
}

/// Papers referenced by a given paper.
pub struct PaperReferencesTool;

#[async_trait::async_trait]
impl McpTool for PaperReferencesTool {
    fn name(&self) -> &'static str {
        "get_paper_references"
    }

    fn description(&self) -> &'static str {
        "Get papers referenced by a specific paper."
    }

    fn input_schema(&self) -> serde_json::Value {
        edges_schema(
            "Semantic Scholar paper ID",
            "Comma-separated list of fields to return for each referenced paper",
        )
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: PaperEdgesInput = serde_json::from_value(input)?;

        let page = ctx
            .client
            .get_paper_references(&params.paper_id, params.limit, params.fields.as_deref())
            .await?;

        render(&page, params.response_format, "References")
    }
}
