//! Stdio transport for MCP protocol.
//!
//! Handles newline-delimited JSON-RPC 2.0 over stdin/stdout. Logging must go
//! to stderr while this transport runs.

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::protocol::{self, JsonRpcResponse};
use crate::tools::{McpTool, ToolContext};

/// Handle MCP protocol over the process's stdin/stdout.
pub async fn run_stdio(tools: Vec<Box<dyn McpTool>>, ctx: ToolContext) -> anyhow::Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve(reader, writer, &tools, &ctx).await
}

/// Serve requests from `reader` until EOF, writing responses to `writer`.
///
/// Requests run concurrently, so a slow upstream call does not hold up a
/// `ping` or another tool call queued behind it. Responses are written as
/// they complete and may come out of request order; callers match them by
/// id. Pending requests are drained after EOF.
pub async fn serve<R, W>(
    reader: R,
    mut writer: W,
    tools: &[Box<dyn McpTool>],
    ctx: &ToolContext,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut in_flight = FuturesUnordered::new();
    let mut input_open = true;

    tracing::info!("MCP stdio server ready, waiting for requests...");

    loop {
        tokio::select! {
            // `next_line` is cancel-safe, so losing the race to a finished
            // request never drops input.
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    tracing::info!(pending = in_flight.len(), "Stdin closed, shutting down");
                    input_open = false;
                    continue;
                };

                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match protocol::parse_request(trimmed) {
                    Ok(request) => in_flight.push(async move {
                        protocol::handle_request(&request, tools, ctx).await
                    }),
                    Err(error_response) => write_response(&mut writer, &error_response).await?,
                }
            }
            Some(response) = in_flight.next(), if !in_flight.is_empty() => {
                if let Some(response) = response {
                    write_response(&mut writer, &response).await?;
                }
            }
            else => break,
        }
    }

    Ok(())
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let response_json = serde_json::to_string(response)?;
    writer.write_all(response_json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
