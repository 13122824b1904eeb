// Interval rate limiter for classifier calls.
//
// Vision API projects have per-minute request quotas. When SAFEGATE_VISION_QPS
// is set, every classify() waits here first so a burst of uploads is spread
// out instead of tripping the quota. Requests are spaced at least
// 1/requests_per_second apart.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Longest spacing the limiter will ever apply.
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
}

struct RateLimiterInner {
    interval: Duration,
    /// Earliest instant the next request may go out.
    next_slot: Option<Instant>,
}

impl RateLimiter {
    /// Rates too small to space (zero, negative, NaN, or slower than one
    /// request per `MAX_INTERVAL`) are clamped to `MAX_INTERVAL`.
    pub fn new(requests_per_second: f64) -> Self {
        let interval = Self::interval_for(requests_per_second).unwrap_or(MAX_INTERVAL);
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                interval,
                next_slot: None,
            })),
        }
    }

    /// Spacing between requests for a rate, or `None` if the rate is not a
    /// positive number or would need more than `MAX_INTERVAL` between requests.
    pub fn interval_for(requests_per_second: f64) -> Option<Duration> {
        if !(requests_per_second > 0.0) {
            return None;
        }
        Duration::try_from_secs_f64(1.0 / requests_per_second)
            .ok()
            .filter(|interval| *interval <= MAX_INTERVAL)
    }

    /// Wait for the next free slot.
    ///
    /// The slot is reserved while holding the lock and the sleep happens after
    /// it is released, so concurrent callers queue up one interval apart.
    pub async fn acquire(&self) {
        let wait_until = {
            let mut inner = self.inner.lock().await;
            let now = Instant::now();
            let slot = match inner.next_slot {
                Some(next) if next > now => next,
                _ => now,
            };
            inner.next_slot = Some(slot + inner.interval);
            slot
        };

        tokio::time::sleep_until(wait_until).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiter_allows_first_request_immediately() {
        let limiter = RateLimiter::new(1.0);
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_rate_limiter_delays_second_request() {
        let limiter = RateLimiter::new(4.0); // 250ms apart
        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(200),
            "Expected ~250ms delay, got {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_concurrent_callers_are_spaced() {
        let limiter = RateLimiter::new(10.0); // 100ms apart
        let start = Instant::now();
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.acquire().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }
        // Third caller waits two intervals
        assert!(start.elapsed() >= Duration::from_millis(180));
    }

    #[test]
    fn test_interval_for_rejects_unusable_rates() {
        assert_eq!(RateLimiter::interval_for(4.0), Some(Duration::from_millis(250)));
        assert_eq!(RateLimiter::interval_for(0.0), None);
        assert_eq!(RateLimiter::interval_for(-1.0), None);
        assert_eq!(RateLimiter::interval_for(f64::NAN), None);
        assert_eq!(RateLimiter::interval_for(1e-300), None);
        assert_eq!(RateLimiter::interval_for(1e-6), None);
    }

    #[tokio::test]
    async fn test_tiny_rate_is_clamped_not_a_panic() {
        let limiter = RateLimiter::new(1e-300);
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
        assert_eq!(limiter.inner.lock().await.interval, MAX_INTERVAL);
    }
}
