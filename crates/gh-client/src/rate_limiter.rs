//! Fixed-interval request pacing
//!
//! One `RateLimiter` represents one upstream quota, so a single instance is
//! shared (behind an `Arc`) by every caller that issues requests. Each
//! request takes one permit; permits are released on a fixed wall-clock
//! cadence and are not accumulated while nobody is waiting.

use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// 10 permits per second
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Returned by [`RateLimiter::acquire`] once the limiter has been stopped
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("rate limiter stopped")]
pub struct RateLimiterStopped;

/// Shared pacing gate emitting one permit per interval
///
/// Must be created from within a tokio runtime. Callers are served in no
/// particular order. Call [`RateLimiter::stop`] at shutdown to release the
/// timer; later acquisitions fail instead of blocking.
#[derive(Debug)]
pub struct RateLimiter {
    period: Duration,
    ticker: Mutex<Option<Interval>>,
}

impl RateLimiter {
    /// Create a limiter releasing one permit every `period`
    ///
    /// The first permit becomes available one full period after creation.
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let mut ticker = time::interval_at(Instant::now() + period, period);
        // A late waiter gets one permit immediately, never a backlog
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            period,
            ticker: Mutex::new(Some(ticker)),
        }
    }

    /// Create a limiter releasing `permits` permits per second
    pub fn per_second(permits: u32) -> Self {
        Self::new(Duration::from_secs(1) / permits.max(1))
    }

    /// Interval between permits
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next permit
    pub async fn acquire(&self) -> Result<(), RateLimiterStopped> {
        let mut ticker = self.ticker.lock().await;
        match ticker.as_mut() {
            Some(interval) => {
                interval.tick().await;
                Ok(())
            }
            None => Err(RateLimiterStopped),
        }
    }

    /// Release the timer; every later `acquire` fails
    pub async fn stop(&self) {
        if self.ticker.lock().await.take().is_some() {
            log::debug!("Rate limiter stopped");
        }
    }

    /// Whether `stop` has been called
    pub async fn is_stopped(&self) -> bool {
        self.ticker.lock().await.is_none()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_acquire_waits_one_period_per_permit() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        let start = Instant::now();

        for _ in 0..3 {
            limiter.acquire().await.unwrap();
        }

        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_time_does_not_build_a_burst() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        time::sleep(Duration::from_millis(550)).await;

        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await.unwrap();
        }

        // One permit is ready right away, the rest follow the cadence
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_between_tasks() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(100)));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_stop_rejects_later_acquire() {
        let limiter = RateLimiter::new(Duration::from_millis(10));
        assert!(!limiter.is_stopped().await);

        limiter.stop().await;

        assert!(limiter.is_stopped().await);
        assert_eq!(limiter.acquire().await, Err(RateLimiterStopped));
    }

    #[tokio::test]
    async fn test_per_second() {
        assert_eq!(RateLimiter::per_second(10).period(), Duration::from_millis(100));
        assert_eq!(RateLimiter::per_second(0).period(), Duration::from_secs(1));
    }
}
