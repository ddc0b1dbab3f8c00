//! MCP JSON-RPC dispatch over both transports.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tokio::io::BufReader;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scholar_relay::client::SemanticScholarClient;
use scholar_relay::config::Config;
use scholar_relay::server::protocol::{self, JsonRpcRequest, codes};
use scholar_relay::server::{McpServer, stdio, transport};
use scholar_relay::tools::{ToolContext, register_all_tools};

fn setup_test_context(mock_server: &MockServer) -> ToolContext {
    let config = Config::for_testing(&mock_server.uri());
    let client = SemanticScholarClient::new(config).unwrap();
    ToolContext::new(Arc::new(client))
}

fn request(value: Value) -> JsonRpcRequest {
    serde_json::from_value(value).unwrap()
}

async fn dispatch(ctx: &ToolContext, value: Value) -> Option<Value> {
    let tools = register_all_tools();
    protocol::handle_request(&request(value), &tools, ctx)
        .await
        .map(|r| serde_json::to_value(r).unwrap())
}

async fn mount_not_found(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Paper not found"})))
        .mount(mock_server)
        .await;
}

// =============================================================================
// Dispatch
// =============================================================================

#[tokio::test]
async fn test_initialize_echoes_protocol_version() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let response = dispatch(
        &ctx,
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": "2025-03-26"}}),
    )
    .await
    .unwrap();

    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(response["result"]["serverInfo"]["name"], "scholar-relay");
    assert!(response["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_tools_list() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let response =
        dispatch(&ctx, json!({"jsonrpc": "2.0", "id": "a", "method": "tools/list"})).await.unwrap();

    let tools = response["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 5);
    for tool in tools {
        assert!(tool["inputSchema"]["properties"].is_object());
    }
}

#[tokio::test]
async fn test_tools_call_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"paperId": "abc", "title": "Found"})))
        .mount(&mock_server)
        .await;

    let ctx = setup_test_context(&mock_server);
    let response = dispatch(
        &ctx,
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {"name": "get_paper_details", "arguments": {"paper_id": "abc", "fields": "paperId,title"}}
        }),
    )
    .await
    .unwrap();

    assert_eq!(response["result"]["isError"], false);
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["title"], "Found");
}

#[tokio::test]
async fn test_tools_call_upstream_failure_is_tool_error() {
    let mock_server = MockServer::start().await;
    mount_not_found(&mock_server).await;

    let ctx = setup_test_context(&mock_server);
    let response = dispatch(
        &ctx,
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {"name": "get_paper_details", "arguments": {"paper_id": "missing"}}
        }),
    )
    .await
    .unwrap();

    assert!(response.get("error").is_none());
    assert_eq!(response["result"]["isError"], true);

    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    let descriptor: Value = serde_json::from_str(text).unwrap();
    assert_eq!(descriptor["error"], "not_found");
    assert!(descriptor["message"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_tools_call_bad_arguments_is_invalid_params() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let response = dispatch(
        &ctx,
        json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {"name": "search_papers", "arguments": {"limit": "ten"}}
        }),
    )
    .await
    .unwrap();

    assert_eq!(response["error"]["code"], codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_tools_call_unknown_tool() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let response = dispatch(
        &ctx,
        json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call", "params": {"name": "export_bibtex"}}),
    )
    .await
    .unwrap();

    assert_eq!(response["error"]["code"], codes::INVALID_PARAMS);
    assert!(response["error"]["message"].as_str().unwrap().contains("export_bibtex"));
}

#[tokio::test]
async fn test_unknown_method() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let response =
        dispatch(&ctx, json!({"jsonrpc": "2.0", "id": 6, "method": "resources/list"})).await.unwrap();

    assert_eq!(response["error"]["code"], codes::METHOD_NOT_FOUND);
    assert_eq!(response["id"], 6);
}

#[tokio::test]
async fn test_null_id_is_not_a_notification() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let response =
        dispatch(&ctx, json!({"jsonrpc": "2.0", "id": null, "method": "tools/list"})).await.unwrap();

    assert_eq!(response["id"], Value::Null);
    assert_eq!(response["result"]["tools"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_notification_gets_no_response() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let response =
        dispatch(&ctx, json!({"jsonrpc": "2.0", "method": "notifications/initialized"})).await;
    assert!(response.is_none());
}

// =============================================================================
// Stdio transport
// =============================================================================

async fn run_stdio_lines(ctx: &ToolContext, input: &[&str]) -> Vec<Value> {
    let tools = register_all_tools();
    let input = input.join("\n");

    let mut output = Vec::new();
    stdio::serve(BufReader::new(input.as_bytes()), &mut output, &tools, ctx).await.unwrap();

    String::from_utf8(output).unwrap().lines().map(|l| serde_json::from_str(l).unwrap()).collect()
}

fn response_for(lines: &[Value], id: Value) -> &Value {
    lines.iter().find(|l| l["id"] == id).unwrap()
}

#[tokio::test]
async fn test_stdio_answers_every_request() {
    let mock_server = MockServer::start().await;
    mount_not_found(&mock_server).await;

    let ctx = setup_test_context(&mock_server);
    let lines = run_stdio_lines(
        &ctx,
        &[
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "",
            "{broken",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_paper_details","arguments":{"paper_id":"missing"}}}"#,
        ],
    )
    .await;

    assert_eq!(lines.len(), 3);

    let init = response_for(&lines, json!(1));
    assert_eq!(init["result"]["protocolVersion"], protocol::DEFAULT_PROTOCOL_VERSION);

    let parse_error = response_for(&lines, Value::Null);
    assert_eq!(parse_error["error"]["code"], codes::PARSE_ERROR);

    let call = response_for(&lines, json!(2));
    assert_eq!(call["result"]["isError"], true);
}

#[tokio::test]
async fn test_stdio_slow_call_does_not_block_ping() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"title": "Eventually"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let ctx = setup_test_context(&mock_server);
    let lines = run_stdio_lines(
        &ctx,
        &[
            r#"{"jsonrpc":"2.0","id":"slow","method":"tools/call","params":{"name":"get_paper_details","arguments":{"paper_id":"slow","fields":"title"}}}"#,
            r#"{"jsonrpc":"2.0","id":"ping","method":"ping"}"#,
        ],
    )
    .await;

    // The ping is answered while the tool call is still waiting upstream,
    // and the tool call still completes after stdin closes.
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["id"], "ping");
    assert_eq!(lines[1]["id"], "slow");
    assert_eq!(lines[1]["result"]["isError"], false);
}

#[tokio::test]
async fn test_stdio_null_id_gets_response() {
    let mock_server = MockServer::start().await;
    let ctx = setup_test_context(&mock_server);

    let lines =
        run_stdio_lines(&ctx, &[r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#]).await;

    assert_eq!(lines.len(), 1);
    assert!(lines[0].get("id").is_some());
    assert_eq!(lines[0]["id"], Value::Null);
    assert!(lines[0]["result"].is_object());
}

// =============================================================================
// HTTP transport
// =============================================================================

fn build_test_router(mock_server: &MockServer) -> axum::Router {
    transport::create_router(register_all_tools(), setup_test_context(mock_server))
}

async fn post_mcp(app: axum::Router, body: String) -> (StatusCode, Option<Value>) {
    let response = app
        .oneshot(
            Request::post("/mcp")
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).ok())
}

#[tokio::test]
async fn test_http_health() {
    let mock_server = MockServer::start().await;
    let app = build_test_router(&mock_server);

    let response = app.oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["tools"], 5);
    assert_eq!(health["authenticated"], false);
}

#[tokio::test]
async fn test_http_tools_list() {
    let mock_server = MockServer::start().await;

    let (status, body) = post_mcp(
        build_test_router(&mock_server),
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["result"]["tools"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_http_tool_failure_is_tool_result() {
    let mock_server = MockServer::start().await;
    mount_not_found(&mock_server).await;

    let (status, body) = post_mcp(
        build_test_router(&mock_server),
        json!({
            "jsonrpc": "2.0",
            "id": 9,
            "method": "tools/call",
            "params": {"name": "get_paper_details", "arguments": {"paper_id": "missing"}}
        })
        .to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["result"]["isError"], true);
}

#[tokio::test]
async fn test_http_parse_error() {
    let mock_server = MockServer::start().await;

    let (status, body) = post_mcp(build_test_router(&mock_server), "{oops".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"]["code"], codes::PARSE_ERROR);
}

#[tokio::test]
async fn test_http_notification_accepted() {
    let mock_server = MockServer::start().await;

    let (status, body) = post_mcp(
        build_test_router(&mock_server),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body.is_none());
}

#[test]
fn test_server_registers_all_tools() {
    let client = SemanticScholarClient::new(Config::default()).unwrap();
    let server = McpServer::new(client);

    assert_eq!(server.list_tools().len(), 5);
    assert!(server.get_tool("get_author_papers").is_some());
    assert!(server.get_tool("search_authors").is_none());
}
