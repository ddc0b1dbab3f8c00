//! Process-wide admission gate for outbound Semantic Scholar calls.
//!
//! Every upstream request waits on [`RateLimiter::await_turn`] before it is
//! dispatched. Grants are spaced at least `min_interval` apart, measured from
//! one grant to the next, no matter how many tool invocations are in flight.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Spaces outbound calls by a fixed minimum interval.
///
/// Share one instance (behind an `Arc`) between every caller that talks to
/// the same upstream.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,

    /// Time of the most recent grant. The guard is held for the whole
    /// read/wait/record sequence so racing callers cannot both see a stale value.
    last_grant: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter that has never granted a turn.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval, last_grant: Mutex::new(None) }
    }

    /// Wait until the caller may issue exactly one upstream call.
    ///
    /// Returns how long the caller was suspended. Never fails.
    ///
    /// Cancel-safe: if the returned future is dropped while waiting, no grant
    /// is recorded and the next caller is spaced from the previous grant.
    pub async fn await_turn(&self) -> Duration {
        let mut last_grant = self.last_grant.lock().await;

        let waited = match *last_grant {
            Some(previous) => {
                let ready_at = previous + self.min_interval;
                let now = Instant::now();
                if ready_at > now {
                    let wait = ready_at - now;
                    tracing::trace!(wait_ms = wait.as_millis() as u64, "Waiting for rate limit turn");
                    tokio::time::sleep_until(ready_at).await;
                    wait
                } else {
                    Duration::ZERO
                }
            }
            None => Duration::ZERO,
        };

        *last_grant = Some(Instant::now());
        waited
    }

    /// Time of the most recent grant, if any.
    ///
    /// Waits for an in-progress [`await_turn`](Self::await_turn) to finish first.
    pub async fn last_grant(&self) -> Option<Instant> {
        *self.last_grant.lock().await
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(crate::config::api::MIN_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_test::{assert_pending, assert_ready};

    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[tokio::test(start_paused = true)]
    async fn test_first_turn_is_immediate() {
        let limiter = RateLimiter::new(SECOND);
        assert!(limiter.last_grant().await.is_none());

        let start = Instant::now();
        let waited = limiter.await_turn().await;

        assert_eq!(waited, Duration::ZERO);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.last_grant().await, Some(start));
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_turns_wait_one_interval() {
        let limiter = RateLimiter::new(SECOND);
        let start = Instant::now();

        limiter.await_turn().await;
        let waited = limiter.await_turn().await;

        assert_eq!(waited, SECOND);
        assert_eq!(start.elapsed(), SECOND);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_elapsed_waits_remainder() {
        let limiter = RateLimiter::new(SECOND);
        limiter.await_turn().await;

        tokio::time::advance(Duration::from_millis(400)).await;
        let waited = limiter.await_turn().await;

        assert_eq!(waited, Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_after_interval_is_immediate() {
        let limiter = RateLimiter::new(SECOND);
        limiter.await_turn().await;

        tokio::time::sleep(Duration::from_millis(1100)).await;

        let start = Instant::now();
        assert_eq!(limiter.await_turn().await, Duration::ZERO);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_turn_stays_pending_until_interval() {
        let limiter = RateLimiter::new(SECOND);
        limiter.await_turn().await;

        let mut turn = tokio_test::task::spawn(limiter.await_turn());
        assert_pending!(turn.poll());

        tokio::time::advance(Duration::from_millis(999)).await;
        assert_pending!(turn.poll());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(turn.is_woken());
        assert_eq!(assert_ready!(turn.poll()), SECOND);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_grants_are_spaced() {
        let limiter = Arc::new(RateLimiter::new(SECOND));

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter.await_turn().await;
                    Instant::now()
                })
            })
            .collect();

        let mut grants = Vec::new();
        for handle in handles {
            grants.push(handle.await.unwrap());
        }
        grants.sort();

        for pair in grants.windows(2) {
            assert!(pair[1] - pair[0] >= SECOND, "grants too close: {:?}", pair[1] - pair[0]);
        }
        assert_eq!(grants[4] - grants[0], SECOND * 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_waiter_records_nothing() {
        let limiter = RateLimiter::new(SECOND);
        limiter.await_turn().await;
        let first = limiter.last_grant().await;

        let cancelled =
            tokio::time::timeout(Duration::from_millis(300), limiter.await_turn()).await;
        assert!(cancelled.is_err());
        assert_eq!(limiter.last_grant().await, first);

        // Next caller is spaced from the first grant, not from the abandoned one.
        let waited = limiter.await_turn().await;
        assert_eq!(waited, Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_never_waits() {
        let limiter = RateLimiter::new(Duration::ZERO);
        for _ in 0..3 {
            assert_eq!(limiter.await_turn().await, Duration::ZERO);
        }
    }
}
