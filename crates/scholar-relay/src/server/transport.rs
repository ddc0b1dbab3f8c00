//! HTTP transport for MCP protocol.
//!
//! A single `POST /mcp` endpoint takes one JSON-RPC message per request and
//! answers with the JSON-RPC response body. There are no sessions and no
//! server-sent events; notifications are acknowledged with `202 Accepted`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::protocol::{self, JsonRpcResponse};
use crate::tools::{McpTool, ToolContext};

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub tools: Vec<Box<dyn McpTool>>,
    pub ctx: ToolContext,
}

/// Create the HTTP router for MCP.
pub fn create_router(tools: Vec<Box<dyn McpTool>>, ctx: ToolContext) -> Router {
    let state = Arc::new(HttpState { tools, ctx });

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/mcp", post(handle_mcp_post))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "tools": state.tools.len(),
        "authenticated": state.ctx.client.has_api_key()
    }))
}

/// Handle POST requests to /mcp.
async fn handle_mcp_post(State(state): State<Arc<HttpState>>, body: String) -> Response {
    let request = match protocol::parse_request(&body) {
        Ok(request) => request,
        Err(error_response) => return rpc_response(StatusCode::BAD_REQUEST, &error_response),
    };

    match protocol::handle_request(&request, &state.tools, &state.ctx).await {
        Some(response) => rpc_response(StatusCode::OK, &response),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

fn rpc_response(status: StatusCode, response: &JsonRpcResponse) -> Response {
    (status, Json(response)).into_response()
}
