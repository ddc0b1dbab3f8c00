//! Middleware for the HTTP client.
//!
//! Every request passing through [`RateLimitMiddleware`] first takes a turn
//! from the shared [`RateLimiter`]. The request timeout configured on the
//! inner `reqwest::Client` only starts once the turn is granted.

use std::sync::Arc;

use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};

use crate::limiter::RateLimiter;

/// Gates each outbound request on the shared rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<RateLimiter>,
}

impl RateLimitMiddleware {
    /// Wrap a limiter shared with the rest of the process.
    #[must_use]
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

#[async_trait::async_trait]
impl Middleware for RateLimitMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let waited = self.limiter.await_turn().await;

        tracing::debug!(
            path = req.url().path(),
            waited_ms = waited.as_millis() as u64,
            "Dispatching upstream request"
        );

        next.run(req, extensions).await
    }
}
