//! HTTP client types for Plausible API communication.
//!
//! This module provides the outbound request path, leaves first:
//!
//! - [`TokenBucket`]: admission control shared by all operations of a client
//! - [`RetryPolicy`]: which failures are retried and how long to wait
//! - [`HttpClient`]: the async transport applying the retry policy
//! - [`HttpRequest`]: a request to be sent to the API
//! - [`HttpResponse`]: a completed response, before classification
//! - [`classify`]: maps a response to a [`Payload`] or a [`PlausibleError`]
//! - [`PlausibleClient`]: the Stats, Events and Sites API operations
//!
//! # Example
//!
//! ```rust,ignore
//! use plausible_api::clients::{HttpClient, HttpMethod, HttpRequest, classify};
//! use plausible_api::PlausibleConfig;
//!
//! let client = HttpClient::new(&PlausibleConfig::builder().build()?)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/api/v1/sites")
//!     .bearer_auth("sites-key")
//!     .build()?;
//!
//! let payload = classify(&client.request(&request).await?)?;
//! ```
//!
//! # Retry Behavior
//!
//! The transport retries transient failures before the classifier sees them:
//!
//! - **429, 500, 502, 503, 504**: Retried with exponential backoff
//!   (`backoff_factor * 2^(n-1)` seconds, at most 120 s); a `Retry-After`
//!   header on 429 and 503 can lengthen the wait
//! - **Connection failures and timeouts**: Retried with the same backoff
//! - **Other statuses**: Returned immediately without retry
//!
//! When retries run out, the last response is classified like any other.

mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod plausible;
mod rate_limiter;
mod response_classifier;
mod retry;

pub use errors::{ApiError, CredentialScope, InvalidHttpRequestError, PlausibleError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, QuotedForm, RequestBody};
pub use http_response::HttpResponse;
pub use rate_limiter::TokenBucket;
pub use response_classifier::{classify, Payload};
pub use retry::{RetryPolicy, DEFAULT_MAX_BACKOFF, RETRYABLE_STATUSES};

// Re-export Plausible client types at the clients module level
pub use plausible::{
    CreateSite, DateRange, Event, GoalType, GuestRole, IncludeOptions, ListParams, Pagination,
    PlausibleClient, PutGoal, PutGuest, QueryResultRow, SortDirection, StatsQuery, StatsResponse,
    DEFAULT_TIMEZONE,
};
