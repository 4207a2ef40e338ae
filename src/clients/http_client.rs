//! HTTP transport for Plausible API communication.
//!
//! This module provides the [`HttpClient`] type: one pooled connection
//! manager per client, default headers, a per-request timeout, and the
//! [`RetryPolicy`] applied to every outbound call.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::clients::errors::{InvalidHttpRequestError, PlausibleError};
use crate::clients::http_request::{HttpRequest, RequestBody};
use crate::clients::http_response::HttpResponse;
use crate::clients::retry::RetryPolicy;
use crate::config::{BaseUrl, PlausibleConfig};
use crate::error::ConfigError;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP transport for the Plausible API.
///
/// The client handles:
/// - URL construction from the configured base URL
/// - Default headers (`User-Agent`, `Accept: application/json`), which
///   request headers override
/// - JSON and quoted multipart bodies
/// - Transport retries for 429/5xx responses and connection failures
///
/// It does not interpret responses: whatever the final attempt produced is
/// returned for classification.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use plausible_api::clients::{HttpClient, HttpMethod, HttpRequest};
/// use plausible_api::PlausibleConfig;
///
/// let config = PlausibleConfig::builder().build()?;
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/api/v1/sites")
///     .bearer_auth("sites-token")
///     .build()?;
///
/// let response = client.request(&request).await?;
/// println!("HTTP {}", response.code);
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL (e.g., `https://plausible.io`).
    base_url: BaseUrl,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    retry_policy: RetryPolicy,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new transport from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the underlying reqwest client
    /// cannot be created (e.g., TLS initialization failure).
    pub fn new(config: &PlausibleConfig) -> Result<Self, ConfigError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Plausible API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            default_headers,
            retry_policy: RetryPolicy::new(config.max_retries(), config.backoff_factor()),
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the retry policy for this client.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Sends a request, retrying per the [`RetryPolicy`].
    ///
    /// Any response, including a non-2xx one, is returned as `Ok` once no
    /// further retry applies.
    ///
    /// # Errors
    ///
    /// Returns [`PlausibleError::InvalidRequest`] if validation fails and
    /// [`PlausibleError::Network`] if no attempt produced a response.
    pub async fn request(&self, request: &HttpRequest) -> Result<HttpResponse, PlausibleError> {
        request.verify()?;

        let url = self.base_url.join(&request.path);
        let headers = self.merged_headers(request)?;

        let mut retry: u32 = 0;
        loop {
            let mut req_builder = self
                .client
                .request(request.http_method.as_reqwest(), &url)
                .headers(headers.clone());

            if !request.query.is_empty() {
                req_builder = req_builder.query(&request.query);
            }

            req_builder = match &request.body {
                Some(RequestBody::Json(body)) => req_builder.json(body),
                Some(RequestBody::Form(form)) => req_builder.multipart(form.to_multipart()),
                None => req_builder,
            };

            tracing::debug!(
                "Sending {} {} (attempt {} of {})",
                request.http_method,
                request.path,
                retry + 1,
                self.retry_policy.total_attempts()
            );

            let exhausted = retry >= self.retry_policy.max_retries();
            match Self::receive(req_builder).await {
                Ok(response) => {
                    let code = response.code;
                    if exhausted || !RetryPolicy::is_retryable_status(code) {
                        return Ok(response);
                    }

                    retry += 1;
                    let delay = self.retry_policy.delay_for(retry, Some(&response));
                    tracing::warn!(
                        "Retrying {} {} after HTTP {} in {:?} (retry {} of {})",
                        request.http_method,
                        request.path,
                        code,
                        delay,
                        retry,
                        self.retry_policy.max_retries()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => {
                    if exhausted || !RetryPolicy::is_retryable_error(&error) {
                        return Err(PlausibleError::Network(error));
                    }

                    retry += 1;
                    let delay = self.retry_policy.delay_for(retry, None);
                    tracing::warn!(
                        "Retrying {} {} after connection failure in {:?} (retry {} of {}): {}",
                        request.http_method,
                        request.path,
                        delay,
                        retry,
                        self.retry_policy.max_retries(),
                        error
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Sends one attempt and reads its full body.
    async fn receive(req_builder: reqwest::RequestBuilder) -> Result<HttpResponse, reqwest::Error> {
        let res = req_builder.send().await?;
        let code = res.status().as_u16();
        let res_headers = HttpResponse::parse_headers(res.headers());
        let body = res.text().await?;
        Ok(HttpResponse::new(code, res_headers, body))
    }

    /// Merges the default headers with the request's own; request headers win.
    fn merged_headers(&self, request: &HttpRequest) -> Result<HeaderMap, InvalidHttpRequestError> {
        let mut headers = HeaderMap::new();
        let pairs = self.default_headers.iter().chain(
            request
                .headers
                .iter()
                .map(|(name, value)| (name, value)),
        );
        for (name, value) in pairs {
            let invalid = || InvalidHttpRequestError::InvalidHeader { name: name.clone() };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }
}
