use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, instrument};

/// Paces outgoing requests to stay under the NCBI E-utilities limits
///
/// NCBI allows 3 requests per second without an API key and 10 with one.
/// Each [`acquire`](RateLimiter::acquire) reserves the next free slot and
/// sleeps until it arrives. Clones share the same schedule, so several client
/// instances built from one limiter stay under a single budget.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Create a limiter allowing `rate` requests per second
    ///
    /// # Example
    ///
    /// ```
    /// use entrez_variants::rate_limit::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(3.0);
    /// assert_eq!(limiter.interval().as_millis(), 333);
    /// ```
    pub fn new(rate: f64) -> Self {
        let interval = if rate.is_finite() && rate > 0.0 {
            Duration::from_secs_f64(1.0 / rate)
        } else {
            Duration::ZERO
        };

        Self {
            interval,
            next_slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Minimum spacing between two requests
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until a request may be sent
    #[instrument(skip(self))]
    pub async fn acquire(&self) {
        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next_slot {
                Some(reserved) if reserved > now => reserved,
                _ => now,
            };
            *next_slot = Some(slot + self.interval);
            slot
        };

        let now = Instant::now();
        if slot > now {
            debug!(
                wait_ms = (slot - now).as_millis() as u64,
                "Waiting for rate limit slot"
            );
            sleep_until(slot).await;
        }
    }
}
