//! Token-bucket admission control for outbound calls.
//!
//! Every client operation acquires one credit from a shared [`TokenBucket`]
//! before it is dispatched, so the aggregate call rate across all operation
//! types never exceeds `capacity` calls per `refill_window`.
//!
//! # Algorithm
//!
//! - The bucket starts full.
//! - Credits refill continuously at `capacity / refill_window` per second,
//!   measured on a monotonic clock, capped at `capacity`.
//! - `acquire()` refills, then consumes one credit if at least one is
//!   available. Otherwise it sleeps for the time needed to accrue one credit,
//!   at most one second and at least ten milliseconds, and tries again.
//!
//! Waiters are not queued: whichever waiter wakes first after a refill gets
//! the credit. Every waiter makes progress at the refill rate.
//!
//! # Cancellation
//!
//! `acquire()` has no timeout. Wrap it in [`tokio::time::timeout`] to bound
//! the wait; a dropped future never consumes a credit.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::error::ConfigError;

/// Upper bound on a single sleep inside `acquire()`.
const MAX_WAIT_SLICE: Duration = Duration::from_secs(1);

/// Lower bound on a single sleep inside `acquire()`.
const MIN_WAIT_SLICE: Duration = Duration::from_millis(10);

#[derive(Debug)]
struct BucketState {
    available: f64,
    last_refill: Instant,
}

/// A thread-safe token bucket.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use plausible_api::clients::TokenBucket;
///
/// # tokio_test::block_on(async {
/// let bucket = TokenBucket::new(2, Duration::from_secs(60)).unwrap();
/// bucket.acquire().await;
/// bucket.acquire().await;
/// assert!(bucket.available().await < 1.0);
/// # });
/// ```
#[derive(Debug)]
pub struct TokenBucket {
    capacity: f64,
    refill_window: Duration,
    /// Credits per second.
    rate: f64,
    state: Mutex<BucketState>,
}

// Verify TokenBucket is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenBucket>();
};

impl TokenBucket {
    /// Creates a full bucket holding `capacity` credits that refills from
    /// empty to full over `refill_window`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRateLimitCapacity`] if `capacity` is zero
    /// and [`ConfigError::InvalidRateLimitWindow`] if `refill_window` is zero.
    pub fn new(capacity: u32, refill_window: Duration) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidRateLimitCapacity { capacity });
        }
        if refill_window.is_zero() {
            return Err(ConfigError::InvalidRateLimitWindow);
        }

        let capacity = f64::from(capacity);
        Ok(Self {
            capacity,
            refill_window,
            rate: capacity / refill_window.as_secs_f64(),
            state: Mutex::new(BucketState {
                available: capacity,
                last_refill: Instant::now(),
            }),
        })
    }

    /// Returns the bucket capacity.
    #[must_use]
    pub const fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Returns the time needed to refill an empty bucket.
    #[must_use]
    pub const fn refill_window(&self) -> Duration {
        self.refill_window
    }

    /// Returns the credits currently available, after refilling.
    pub async fn available(&self) -> f64 {
        let mut state = self.state.lock().await;
        self.refill(&mut state);
        state.available
    }

    /// Waits until a credit is available, then consumes it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                self.refill(&mut state);
                if state.available >= 1.0 {
                    state.available -= 1.0;
                    return;
                }
                let needed = 1.0 - state.available;
                Duration::from_secs_f64(needed / self.rate)
            };

            let slice = wait.clamp(MIN_WAIT_SLICE, MAX_WAIT_SLICE);
            tracing::debug!(
                "Rate limiter waiting {:?} for a credit ({:?} until next credit)",
                slice,
                wait
            );
            sleep(slice).await;
        }
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(state.last_refill);
        if elapsed.is_zero() {
            return;
        }
        state.available = elapsed
            .as_secs_f64()
            .mul_add(self.rate, state.available)
            .min(self.capacity);
        state.last_refill = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_capacity() {
        assert!(matches!(
            TokenBucket::new(0, Duration::from_secs(1)),
            Err(ConfigError::InvalidRateLimitCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_rejects_zero_window() {
        assert!(matches!(
            TokenBucket::new(5, Duration::ZERO),
            Err(ConfigError::InvalidRateLimitWindow)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_full_and_grants_burst_immediately() {
        let bucket = TokenBucket::new(5, Duration::from_secs(10)).unwrap();
        let start = Instant::now();

        for _ in 0..5 {
            bucket.acquire().await;
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(bucket.available().await < 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_refill_when_empty() {
        // One credit per second.
        let bucket = TokenBucket::new(2, Duration::from_secs(2)).unwrap();
        bucket.acquire().await;
        bucket.acquire().await;

        let start = Instant::now();
        bucket.acquire().await;
        let waited = start.elapsed();

        assert!(waited >= Duration::from_secs(1), "waited {waited:?}");
        assert!(waited < Duration::from_millis(1100), "waited {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_refill_is_linear_and_capped() {
        let bucket = TokenBucket::new(10, Duration::from_secs(10)).unwrap();
        for _ in 0..10 {
            bucket.acquire().await;
        }

        tokio::time::advance(Duration::from_secs(5)).await;
        let half = bucket.available().await;
        assert!((half - 5.0).abs() < 1e-6, "available {half}");

        tokio::time::advance(Duration::from_secs(5)).await;
        let full = bucket.available().await;
        assert!(full >= 10.0 - 1e-6, "available {full}");

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(bucket.available().await <= 10.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_waits_are_sliced() {
        // One credit per hour: the wait is split into one-second sleeps.
        let bucket = TokenBucket::new(1, Duration::from_secs(3600)).unwrap();
        bucket.acquire().await;

        let acquired = tokio::time::timeout(Duration::from_millis(1500), bucket.acquire()).await;
        assert!(acquired.is_err());

        // The abandoned attempt did not consume anything.
        let available = bucket.available().await;
        assert!(available > 0.0 && available < 1.0, "available {available}");
    }
}
