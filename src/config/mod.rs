//! Configuration types for the Plausible API client.
//!
//! This module provides the configuration used to construct a
//! [`PlausibleClient`](crate::PlausibleClient).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`PlausibleConfig`]: The main configuration struct holding all client settings
//! - [`PlausibleConfigBuilder`]: A builder for constructing [`PlausibleConfig`] instances
//! - [`StatsApiKey`]: A validated Stats API bearer token with masked debug output
//! - [`SitesApiKey`]: A validated Sites API bearer token with masked debug output
//! - [`BaseUrl`]: A validated base URL for the Plausible instance
//!
//! # Environment
//!
//! Values not supplied explicitly may be loaded from the environment with
//! [`PlausibleConfigBuilder::from_env`]. Configuration is always an explicit
//! value handed to the client; nothing is cached process-wide.
//!
//! | Variable | Setting |
//! |---|---|
//! | `PLAUSIBLE_STATS_API_KEY` | Stats API key |
//! | `PLAUSIBLE_SITES_API_KEY` | Sites API key |
//! | `PLAUSIBLE_BASE_URL` | Base URL |
//! | `PLAUSIBLE_TIMEOUT_S` | Per-call timeout in seconds |
//! | `PLAUSIBLE_RATE_LIMIT_PER_HOUR` | Rate limit capacity per hour |
//! | `PLAUSIBLE_MAX_RETRIES` | Transport retries |
//! | `PLAUSIBLE_BACKOFF_FACTOR` | Backoff factor in seconds |
//!
//! # Example
//!
//! ```rust
//! use plausible_api::{PlausibleConfig, SitesApiKey, StatsApiKey};
//!
//! let config = PlausibleConfig::builder()
//!     .stats_api_key(StatsApiKey::new("stats-token").unwrap())
//!     .sites_api_key(SitesApiKey::new("sites-token").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{BaseUrl, SitesApiKey, StatsApiKey};

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of transport retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default backoff factor in seconds.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 0.5;

/// Default number of calls allowed per rate limit window.
pub const DEFAULT_RATE_LIMIT_CAPACITY: u32 = 600;

/// Default rate limit window (one hour).
pub const DEFAULT_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(3600);

const ENV_STATS_API_KEY: &str = "PLAUSIBLE_STATS_API_KEY";
const ENV_SITES_API_KEY: &str = "PLAUSIBLE_SITES_API_KEY";
const ENV_BASE_URL: &str = "PLAUSIBLE_BASE_URL";
const ENV_TIMEOUT_S: &str = "PLAUSIBLE_TIMEOUT_S";
const ENV_RATE_LIMIT_PER_HOUR: &str = "PLAUSIBLE_RATE_LIMIT_PER_HOUR";
const ENV_MAX_RETRIES: &str = "PLAUSIBLE_MAX_RETRIES";
const ENV_BACKOFF_FACTOR: &str = "PLAUSIBLE_BACKOFF_FACTOR";

/// Configuration for the Plausible API client.
///
/// # Thread Safety
///
/// `PlausibleConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use plausible_api::{BaseUrl, PlausibleConfig};
///
/// let config = PlausibleConfig::builder()
///     .base_url(BaseUrl::new("https://analytics.example.com").unwrap())
///     .timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.timeout(), Duration::from_secs(10));
/// assert!(config.stats_api_key().is_none());
/// ```
#[derive(Clone, Debug)]
pub struct PlausibleConfig {
    base_url: BaseUrl,
    stats_api_key: Option<StatsApiKey>,
    sites_api_key: Option<SitesApiKey>,
    timeout: Duration,
    max_retries: u32,
    backoff_factor: f64,
    rate_limit_capacity: u32,
    rate_limit_window: Duration,
    user_agent_prefix: Option<String>,
}

impl PlausibleConfig {
    /// Creates a new builder for constructing a `PlausibleConfig`.
    #[must_use]
    pub fn builder() -> PlausibleConfigBuilder {
        PlausibleConfigBuilder::new()
    }

    /// Builds a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an environment value cannot be parsed or
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        PlausibleConfigBuilder::from_env()?.build()
    }

    /// Returns a copy of this configuration that uses `token` for both the
    /// Stats and the Sites scope.
    ///
    /// This is how a request carrying its own `Authorization: Bearer` token
    /// gets a client of its own while keeping every other setting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the token is empty.
    pub fn with_shared_token(&self, token: &str) -> Result<Self, ConfigError> {
        let mut config = self.clone();
        config.stats_api_key = Some(StatsApiKey::new(token)?);
        config.sites_api_key = Some(SitesApiKey::new(token)?);
        Ok(config)
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the Stats API key, if configured.
    #[must_use]
    pub const fn stats_api_key(&self) -> Option<&StatsApiKey> {
        self.stats_api_key.as_ref()
    }

    /// Returns the Sites API key, if configured.
    #[must_use]
    pub const fn sites_api_key(&self) -> Option<&SitesApiKey> {
        self.sites_api_key.as_ref()
    }

    /// Returns the per-call timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the number of transport retries after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the backoff factor in seconds.
    #[must_use]
    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    /// Returns the rate limiter capacity.
    #[must_use]
    pub const fn rate_limit_capacity(&self) -> u32 {
        self.rate_limit_capacity
    }

    /// Returns the rate limiter refill window.
    #[must_use]
    pub const fn rate_limit_window(&self) -> Duration {
        self.rate_limit_window
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify PlausibleConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PlausibleConfig>();
};

/// Builder for constructing [`PlausibleConfig`] instances.
///
/// No field is required. Both API keys may be absent; operations that need a
/// missing key fail before any request is sent.
///
/// # Defaults
///
/// - `base_url`: `https://plausible.io`
/// - `timeout`: 30 seconds
/// - `max_retries`: 3
/// - `backoff_factor`: 0.5
/// - `rate_limit`: 600 calls per 3600 seconds
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct PlausibleConfigBuilder {
    base_url: Option<BaseUrl>,
    stats_api_key: Option<StatsApiKey>,
    sites_api_key: Option<SitesApiKey>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    backoff_factor: Option<f64>,
    rate_limit_capacity: Option<u32>,
    rate_limit_window: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl PlausibleConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-populated from the process environment.
    ///
    /// Builder calls made afterwards override the environment values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an environment value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Creates a builder pre-populated from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value cannot be parsed or fails validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let mut builder = Self::new();

        if let Some(key) = get(ENV_STATS_API_KEY) {
            builder.stats_api_key = Some(StatsApiKey::new(key)?);
        }
        if let Some(key) = get(ENV_SITES_API_KEY) {
            builder.sites_api_key = Some(SitesApiKey::new(key)?);
        }
        if let Some(url) = get(ENV_BASE_URL) {
            builder.base_url = Some(BaseUrl::new(url)?);
        }
        if let Some(value) = get(ENV_TIMEOUT_S) {
            let secs: u64 = parse_env(ENV_TIMEOUT_S, &value)?;
            builder.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(value) = get(ENV_RATE_LIMIT_PER_HOUR) {
            builder.rate_limit_capacity = Some(parse_env(ENV_RATE_LIMIT_PER_HOUR, &value)?);
            builder.rate_limit_window = Some(DEFAULT_RATE_LIMIT_WINDOW);
        }
        if let Some(value) = get(ENV_MAX_RETRIES) {
            builder.max_retries = Some(parse_env(ENV_MAX_RETRIES, &value)?);
        }
        if let Some(value) = get(ENV_BACKOFF_FACTOR) {
            builder.backoff_factor = Some(parse_env(ENV_BACKOFF_FACTOR, &value)?);
        }

        Ok(builder)
    }

    /// Sets the base URL of the Plausible instance.
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the Stats API key.
    #[must_use]
    pub fn stats_api_key(mut self, key: StatsApiKey) -> Self {
        self.stats_api_key = Some(key);
        self
    }

    /// Sets the Sites API key.
    #[must_use]
    pub fn sites_api_key(mut self, key: SitesApiKey) -> Self {
        self.sites_api_key = Some(key);
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the number of transport retries after the first attempt.
    #[must_use]
    pub const fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Sets the backoff factor in seconds.
    ///
    /// The delay before retry `n` is `backoff_factor * 2^(n-1)` seconds.
    #[must_use]
    pub fn backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = Some(factor);
        self
    }

    /// Sets the rate limit: at most `capacity` calls per `window`.
    #[must_use]
    pub const fn rate_limit(mut self, capacity: u32, window: Duration) -> Self {
        self.rate_limit_capacity = Some(capacity);
        self.rate_limit_window = Some(window);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`PlausibleConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the rate limit capacity, window or timeout
    /// is zero, or the backoff factor is negative or not finite.
    pub fn build(self) -> Result<PlausibleConfig, ConfigError> {
        let rate_limit_capacity = self
            .rate_limit_capacity
            .unwrap_or(DEFAULT_RATE_LIMIT_CAPACITY);
        if rate_limit_capacity == 0 {
            return Err(ConfigError::InvalidRateLimitCapacity {
                capacity: rate_limit_capacity,
            });
        }

        let rate_limit_window = self.rate_limit_window.unwrap_or(DEFAULT_RATE_LIMIT_WINDOW);
        if rate_limit_window.is_zero() {
            return Err(ConfigError::InvalidRateLimitWindow);
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }

        let backoff_factor = self.backoff_factor.unwrap_or(DEFAULT_BACKOFF_FACTOR);
        if !backoff_factor.is_finite() || backoff_factor < 0.0 {
            return Err(ConfigError::InvalidBackoffFactor {
                factor: backoff_factor,
            });
        }

        Ok(PlausibleConfig {
            base_url: self.base_url.unwrap_or_default(),
            stats_api_key: self.stats_api_key,
            sites_api_key: self.sites_api_key,
            timeout,
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            backoff_factor,
            rate_limit_capacity,
            rate_limit_window,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

fn parse_env<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnvValue {
            var,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = PlausibleConfig::builder().build().unwrap();

        assert_eq!(config.base_url().as_ref(), "https://plausible.io");
        assert!(config.stats_api_key().is_none());
        assert!(config.sites_api_key().is_none());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries(), 3);
        assert!((config.backoff_factor() - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.rate_limit_capacity(), 600);
        assert_eq!(config.rate_limit_window(), Duration::from_secs(3600));
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_builder_rejects_zero_capacity() {
        let result = PlausibleConfig::builder()
            .rate_limit(0, Duration::from_secs(60))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidRateLimitCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_builder_rejects_zero_window() {
        let result = PlausibleConfig::builder()
            .rate_limit(10, Duration::ZERO)
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidRateLimitWindow)));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = PlausibleConfig::builder().timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(ConfigError::InvalidTimeout)));

        let result =
            PlausibleConfigBuilder::from_lookup(lookup_from(&[("PLAUSIBLE_TIMEOUT_S", "0")]))
                .unwrap()
                .build();
        assert!(matches!(result, Err(ConfigError::InvalidTimeout)));
    }

    #[test]
    fn test_builder_rejects_negative_backoff() {
        let result = PlausibleConfig::builder().backoff_factor(-1.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidBackoffFactor { .. })
        ));

        let result = PlausibleConfig::builder().backoff_factor(f64::NAN).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let builder = PlausibleConfigBuilder::from_lookup(lookup_from(&[
            ("PLAUSIBLE_STATS_API_KEY", "stats"),
            ("PLAUSIBLE_SITES_API_KEY", "sites"),
            ("PLAUSIBLE_BASE_URL", "https://analytics.example.com/"),
            ("PLAUSIBLE_TIMEOUT_S", "12"),
            ("PLAUSIBLE_RATE_LIMIT_PER_HOUR", "100"),
            ("PLAUSIBLE_MAX_RETRIES", "5"),
            ("PLAUSIBLE_BACKOFF_FACTOR", "0.25"),
        ]))
        .unwrap();
        let config = builder.build().unwrap();

        assert_eq!(config.stats_api_key().unwrap().as_ref(), "stats");
        assert_eq!(config.sites_api_key().unwrap().as_ref(), "sites");
        assert_eq!(config.base_url().as_ref(), "https://analytics.example.com");
        assert_eq!(config.timeout(), Duration::from_secs(12));
        assert_eq!(config.rate_limit_capacity(), 100);
        assert_eq!(config.rate_limit_window(), Duration::from_secs(3600));
        assert_eq!(config.max_retries(), 5);
        assert!((config.backoff_factor() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_lookup_treats_empty_values_as_unset() {
        let config = PlausibleConfigBuilder::from_lookup(lookup_from(&[
            ("PLAUSIBLE_STATS_API_KEY", ""),
            ("PLAUSIBLE_TIMEOUT_S", "  "),
        ]))
        .unwrap()
        .build()
        .unwrap();

        assert!(config.stats_api_key().is_none());
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_lookup_rejects_unparseable_values() {
        let result =
            PlausibleConfigBuilder::from_lookup(lookup_from(&[("PLAUSIBLE_TIMEOUT_S", "soon")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvValue {
                var: "PLAUSIBLE_TIMEOUT_S",
                ..
            })
        ));
    }

    #[test]
    fn test_explicit_values_override_environment() {
        let config = PlausibleConfigBuilder::from_lookup(lookup_from(&[
            ("PLAUSIBLE_STATS_API_KEY", "from-env"),
            ("PLAUSIBLE_MAX_RETRIES", "7"),
        ]))
        .unwrap()
        .stats_api_key(StatsApiKey::new("explicit").unwrap())
        .max_retries(1)
        .build()
        .unwrap();

        assert_eq!(config.stats_api_key().unwrap().as_ref(), "explicit");
        assert_eq!(config.max_retries(), 1);
    }

    #[test]
    fn test_with_shared_token_sets_both_scopes() {
        let config = PlausibleConfig::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        let shared = config.with_shared_token("inbound-token").unwrap();
        assert_eq!(shared.stats_api_key().unwrap().as_ref(), "inbound-token");
        assert_eq!(shared.sites_api_key().unwrap().as_ref(), "inbound-token");
        assert_eq!(shared.timeout(), Duration::from_secs(5));
        assert!(config.stats_api_key().is_none());

        assert!(config.with_shared_token("").is_err());
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlausibleConfig>();
    }
}
