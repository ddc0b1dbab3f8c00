//! scholar-relay
//!
//! A Model Context Protocol (MCP) server that exposes five Semantic Scholar
//! Graph API lookups as tools: paper search, paper details, citations,
//! references and author papers.
//!
//! # Features
//!
//! - **Rate-limited**: every upstream call, from any tool invocation, is
//!   spaced at least one second from the previous one
//! - **Typed failures**: invalid input, not found, upstream throttling,
//!   upstream outages and malformed bodies are distinct error kinds
//! - **Optional API key** sent as `x-api-key`
//!
//! # Example
//!
//! ```no_run
//! use scholar_relay::{client::SemanticScholarClient, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = SemanticScholarClient::new(config)?;
//!
//!     let page = client.search_papers("attention is all you need", Some(5), None).await?;
//!     println!("{} papers", page.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod limiter;
pub mod models;
pub mod server;
pub mod tools;

pub use client::SemanticScholarClient;
pub use config::Config;
pub use error::{ClientError, ErrorKind, ToolError};
pub use limiter::RateLimiter;
