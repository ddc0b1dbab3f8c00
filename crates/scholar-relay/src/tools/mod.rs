//! MCP tool implementations.
//!
//! Each tool:
//! 1. Parses its input parameters
//! 2. Calls the Semantic Scholar API client (one upstream request)
//! 3. Formats the payload as JSON or Markdown

mod authors;
mod citations;
mod papers;

pub use authors::AuthorPapersTool;
pub use citations::{PaperCitationsTool, PaperReferencesTool};
pub use papers::{PaperDetailsTool, SearchPapersTool};

use std::sync::Arc;

use crate::client::SemanticScholarClient;
use crate::error::ToolResult;

/// Tool execution context.
pub struct ToolContext {
    /// API client.
    pub client: Arc<SemanticScholarClient>,
}

impl ToolContext {
    /// Create a new tool context.
    #[must_use]
    pub fn new(client: Arc<SemanticScholarClient>) -> Self {
        Self { client }
    }
}

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "search_papers").
    fn name(&self) -> &'static str;

    /// Tool description for LLM.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given input.
    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String>;
}

/// Register all tools.
#[must_use]
pub fn register_all_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(papers::SearchPapersTool),
        Box::new(papers::PaperDetailsTool),
        Box::new(citations::PaperCitationsTool),
        Box::new(citations::PaperReferencesTool),
        Box::new(authors::AuthorPapersTool),
    ]
}

/// Schema fragment shared by every tool's `response_format` parameter.
fn response_format_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "enum": ["json", "markdown"],
        "default": "json",
        "description": "json returns the API payload; markdown returns a readable summary"
    })
}
