//! scholar-relay - Entry Point
//!
//! Provides both stdio and HTTP transports.

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use scholar_relay::{SemanticScholarClient, config::Config, server::McpServer};

#[derive(Parser, Debug)]
#[command(name = "scholar-relay")]
#[command(about = "Rate-limited MCP server for the Semantic Scholar API")]
#[command(version)]
struct Cli {
    /// Semantic Scholar API key (optional)
    #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Graph API root override (e.g., for a proxy or mock server)
    #[arg(long, env = "SEMANTIC_SCHOLAR_BASE_URL")]
    base_url: Option<String>,

    /// Transport mode: stdio or http
    #[arg(long, default_value = "stdio")]
    transport: Transport,

    /// HTTP server port (only used with --transport http)
    #[arg(long, default_value = "8000", env = "PORT")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Transport {
    /// Standard input/output
    #[default]
    Stdio,
    /// JSON-RPC over HTTP POST
    Http,
}

// Logs go to stderr: stdout carries the stdio protocol.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?cli.transport,
        "Starting scholar-relay"
    );

    let mut config = Config::new(cli.api_key);
    if let Some(base_url) = cli.base_url.filter(|u| !u.trim().is_empty()) {
        config = config.with_base_url(base_url);
    }

    tracing::info!(
        authenticated = config.has_api_key(),
        base_url = %config.base_url,
        min_interval_ms = config.min_interval.as_millis() as u64,
        "Upstream configured"
    );

    let client = SemanticScholarClient::new(config)?;
    let server = McpServer::new(client);

    match cli.transport {
        Transport::Stdio => {
            tracing::info!("Running in stdio mode");
            server.run_stdio().await?;
        }
        Transport::Http => {
            tracing::info!(port = cli.port, "Running in HTTP mode");
            server.run_http(cli.port).await?;
        }
    }

    Ok(())
}
