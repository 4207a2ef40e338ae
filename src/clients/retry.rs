//! Transport retry policy.
//!
//! The policy only decides *whether* another attempt is made and *how long*
//! to wait before it. It never produces an error of its own: when attempts
//! run out, the last response (or connection failure) goes to the
//! [response classifier](crate::clients::classify) unchanged.

use std::time::Duration;

use crate::clients::http_response::HttpResponse;

/// Status codes that are retried.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Upper bound on any single backoff delay.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Retry policy applied to every outbound call.
///
/// Retries are made for [`RETRYABLE_STATUSES`] and for connection-level
/// failures, on every HTTP method. Before retry `n` (1-based) the transport
/// waits `backoff_factor * 2^(n-1)` seconds, capped at the maximum backoff.
/// For 429 and 503 a numeric `Retry-After` header can lengthen that wait.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use plausible_api::clients::RetryPolicy;
///
/// let policy = RetryPolicy::new(3, 0.5);
/// assert_eq!(policy.total_attempts(), 4);
/// assert_eq!(policy.backoff(1), Duration::from_millis(500));
/// assert_eq!(policy.backoff(2), Duration::from_secs(1));
/// assert_eq!(policy.backoff(3), Duration::from_secs(2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff_factor: f64,
    max_backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy making up to `max_retries` retries after the first
    /// attempt. A negative or non-finite `backoff_factor` is treated as zero.
    #[must_use]
    pub fn new(max_retries: u32, backoff_factor: f64) -> Self {
        let backoff_factor = if backoff_factor.is_finite() && backoff_factor > 0.0 {
            backoff_factor
        } else {
            0.0
        };
        Self {
            max_retries,
            backoff_factor,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            backoff_factor: 0.0,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }

    /// Overrides the maximum backoff delay.
    #[must_use]
    pub const fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Returns the number of retries after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the total number of attempts, including the first.
    #[must_use]
    pub const fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Returns `true` if a response with this status is retried.
    #[must_use]
    pub fn is_retryable_status(code: u16) -> bool {
        RETRYABLE_STATUSES.contains(&code)
    }

    /// Returns `true` if a transport failure is connection-level and retried.
    ///
    /// A body that breaks off mid-read counts as a connection failure.
    #[must_use]
    pub fn is_retryable_error(error: &reqwest::Error) -> bool {
        error.is_connect()
            || error.is_timeout()
            || error.is_request()
            || error.is_body()
            || error.is_decode()
    }

    /// Returns the exponential backoff before retry `retry` (1-based).
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry == 0 || self.backoff_factor == 0.0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let secs = (self.backoff_factor * 2f64.powi(exponent)).min(self.max_backoff.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Returns the delay before retry `retry` (1-based), given the response
    /// that triggered it, if any.
    ///
    /// A `Retry-After` header on a 429 or 503 response lengthens the delay
    /// but never shortens it; the result is capped at the maximum backoff.
    #[must_use]
    pub fn delay_for(&self, retry: u32, response: Option<&HttpResponse>) -> Duration {
        let backoff = self.backoff(retry);
        let retry_after = response
            .filter(|r| r.code == 429 || r.code == 503)
            .and_then(|r| r.retry_request_after)
            .map(|secs| Duration::from_secs_f64(secs.min(self.max_backoff.as_secs_f64())));

        retry_after.map_or(backoff, |after| after.max(backoff))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response_with_retry_after(code: u16, value: &str) -> HttpResponse {
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec![value.to_string()]);
        HttpResponse::new(code, headers, "")
    }

    #[test]
    fn test_retryable_statuses() {
        for code in [429, 500, 502, 503, 504] {
            assert!(RetryPolicy::is_retryable_status(code), "{code} should retry");
        }
        for code in [200, 400, 401, 403, 404, 422, 501] {
            assert!(!RetryPolicy::is_retryable_status(code), "{code} should not retry");
        }
    }

    #[test]
    fn test_backoff_is_exponential() {
        let policy = RetryPolicy::new(5, 0.5);
        assert_eq!(policy.backoff(0), Duration::ZERO);
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_secs(1));
        assert_eq!(policy.backoff(3), Duration::from_secs(2));
        assert_eq!(policy.backoff(4), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::new(50, 1.0).with_max_backoff(Duration::from_secs(10));
        assert_eq!(policy.backoff(10), Duration::from_secs(10));
        assert_eq!(policy.backoff(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn test_zero_factor_never_waits() {
        let policy = RetryPolicy::new(3, 0.0);
        assert_eq!(policy.backoff(3), Duration::ZERO);
        assert_eq!(RetryPolicy::new(3, -2.0).backoff(1), Duration::ZERO);
        assert_eq!(RetryPolicy::new(3, f64::INFINITY).backoff(1), Duration::ZERO);
    }

    #[test]
    fn test_total_attempts_includes_first() {
        assert_eq!(RetryPolicy::new(3, 0.5).total_attempts(), 4);
        assert_eq!(RetryPolicy::none().total_attempts(), 1);
        assert_eq!(RetryPolicy::new(u32::MAX, 0.5).total_attempts(), u32::MAX);
    }

    #[test]
    fn test_retry_after_lengthens_delay_for_429_and_503() {
        let policy = RetryPolicy::new(3, 0.5);
        let limited = response_with_retry_after(429, "3");
        assert_eq!(policy.delay_for(1, Some(&limited)), Duration::from_secs(3));

        let unavailable = response_with_retry_after(503, "0.1");
        assert_eq!(
            policy.delay_for(2, Some(&unavailable)),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_retry_after_ignored_for_other_statuses() {
        let policy = RetryPolicy::new(3, 0.5);
        let error = response_with_retry_after(500, "30");
        assert_eq!(policy.delay_for(1, Some(&error)), Duration::from_millis(500));
        assert_eq!(policy.delay_for(1, None), Duration::from_millis(500));
    }

    #[test]
    fn test_retry_after_is_capped() {
        let policy = RetryPolicy::new(3, 0.5).with_max_backoff(Duration::from_secs(5));
        let limited = response_with_retry_after(429, "3600");
        assert_eq!(policy.delay_for(1, Some(&limited)), Duration::from_secs(5));
    }
}
