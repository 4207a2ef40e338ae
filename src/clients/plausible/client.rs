//! The Plausible API client.

use std::borrow::Cow;

use crate::clients::errors::{CredentialScope, PlausibleError};
use crate::clients::http_client::HttpClient;
use crate::clients::http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
use crate::clients::rate_limiter::TokenBucket;
use crate::clients::response_classifier::{classify, Payload};
use crate::config::{PlausibleConfig, SitesApiKey, StatsApiKey};
use crate::error::ConfigError;

pub(super) const STATS_ENDPOINT: &str = "/api/v2/query";
pub(super) const EVENT_ENDPOINT: &str = "/api/event";
pub(super) const SITES_V1: &str = "/api/v1/sites";

/// Client for the Plausible Stats, Events and Sites APIs.
///
/// Every operation runs the same pipeline:
///
/// 1. check the credential it needs, failing with
///    [`PlausibleError::MissingCredential`] before anything is sent
/// 2. build and validate the request
/// 3. acquire one credit from the client's [`TokenBucket`]
/// 4. dispatch it through the retrying [`HttpClient`]
/// 5. classify the final response
///
/// # Thread Safety
///
/// `PlausibleClient` is `Send + Sync`. Share one instance behind an `Arc` so
/// that all tasks draw from the same rate-limit budget.
///
/// # Example
///
/// ```rust,ignore
/// use plausible_api::{PlausibleClient, PlausibleConfig, StatsApiKey};
/// use plausible_api::clients::StatsQuery;
///
/// let config = PlausibleConfig::builder()
///     .stats_api_key(StatsApiKey::new("stats-key")?)
///     .build()?;
/// let client = PlausibleClient::new(&config)?;
///
/// let payload = client
///     .query_stats(&StatsQuery::new("example.com", ["visitors"], "7d"))
///     .await?;
/// println!("{:?}", payload.get("results"));
/// ```
#[derive(Debug)]
pub struct PlausibleClient {
    http_client: HttpClient,
    rate_limiter: TokenBucket,
    stats_api_key: Option<StatsApiKey>,
    sites_api_key: Option<SitesApiKey>,
}

// Verify PlausibleClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PlausibleClient>();
};

impl PlausibleClient {
    /// Creates a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the rate limit parameters are invalid or the
    /// HTTP transport cannot be created.
    pub fn new(config: &PlausibleConfig) -> Result<Self, ConfigError> {
        let rate_limiter =
            TokenBucket::new(config.rate_limit_capacity(), config.rate_limit_window())?;
        let http_client = HttpClient::new(config)?;

        tracing::debug!(
            "Plausible client created for {} (stats key: {}, sites key: {})",
            config.base_url().host_name(),
            config.stats_api_key().is_some(),
            config.sites_api_key().is_some()
        );

        Ok(Self {
            http_client,
            rate_limiter,
            stats_api_key: config.stats_api_key().cloned(),
            sites_api_key: config.sites_api_key().cloned(),
        })
    }

    /// Creates a client configured from `PLAUSIBLE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an environment value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(&PlausibleConfig::from_env()?)
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Returns the client's rate limiter.
    #[must_use]
    pub const fn rate_limiter(&self) -> &TokenBucket {
        &self.rate_limiter
    }

    /// Starts a Stats API request, checking the stats credential.
    pub(super) fn stats_request(
        &self,
        method: HttpMethod,
        path: impl Into<String>,
    ) -> Result<HttpRequestBuilder, PlausibleError> {
        let key = self
            .stats_api_key
            .as_ref()
            .ok_or(PlausibleError::MissingCredential {
                scope: CredentialScope::Stats,
            })?;
        Ok(HttpRequest::builder(method, path).bearer_auth(key.as_ref()))
    }

    /// Starts a Sites API request, checking the sites credential.
    pub(super) fn sites_request(
        &self,
        method: HttpMethod,
        path: impl Into<String>,
    ) -> Result<HttpRequestBuilder, PlausibleError> {
        let key = self
            .sites_api_key
            .as_ref()
            .ok_or(PlausibleError::MissingCredential {
                scope: CredentialScope::Sites,
            })?;
        Ok(HttpRequest::builder(method, path).bearer_auth(key.as_ref()))
    }

    /// Builds the request, waits for a rate-limit credit, then dispatches and
    /// classifies.
    ///
    /// A request that fails validation spends no credit.
    pub(super) async fn execute(&self, builder: HttpRequestBuilder) -> Result<Payload, PlausibleError> {
        let request = builder.build()?;
        self.rate_limiter.acquire().await;
        let response = self.http_client.request(&request).await?;
        classify(&response)
    }
}

/// Percent-encodes a value placed in a URL path.
pub(super) fn path_segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
