//! Error types for Plausible API operations.
//!
//! Every operation on [`PlausibleClient`](crate::PlausibleClient) returns
//! `Result<Payload, PlausibleError>`. The variants form a closed taxonomy:
//!
//! - [`PlausibleError::MissingCredential`]: the operation needs an API key that
//!   is not configured; raised before any request is sent
//! - [`PlausibleError::Unauthorized`]: the service answered 401 or 403
//! - [`PlausibleError::RateLimited`]: the service answered 429, even after
//!   transport retries
//! - [`PlausibleError::Api`]: any other non-2xx answer
//! - [`PlausibleError::Network`]: the request never produced a response
//!   (connect failure, timeout, reset), even after transport retries
//! - [`PlausibleError::InvalidRequest`]: the request failed validation before
//!   it was sent
//!
//! # Example
//!
//! ```rust,ignore
//! use plausible_api::PlausibleError;
//!
//! match client.list_sites(&ListParams::default()).await {
//!     Ok(payload) => println!("Sites: {:?}", payload.get("sites")),
//!     Err(PlausibleError::Unauthorized { .. }) => refresh_credentials(),
//!     Err(PlausibleError::RateLimited { .. }) => back_off(),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

use std::fmt;

use serde_json::{json, Map, Value};
use thiserror::Error;

/// The scope an API key grants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialScope {
    /// Stats API (`/api/v2/query`).
    Stats,
    /// Sites API (`/api/v1/sites/...`).
    Sites,
}

impl CredentialScope {
    /// Returns the environment variable that configures this scope's key.
    #[must_use]
    pub const fn env_var(&self) -> &'static str {
        match self {
            Self::Stats => "PLAUSIBLE_STATS_API_KEY",
            Self::Sites => "PLAUSIBLE_SITES_API_KEY",
        }
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stats => write!(f, "Stats"),
            Self::Sites => write!(f, "Sites"),
        }
    }
}

/// A non-2xx response that is neither an auth failure nor a rate limit.
///
/// Carries the raw body for diagnostics and a best-effort decoded payload,
/// which is empty when the body is absent or not a JSON object.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("HTTP {status}")]
pub struct ApiError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// The raw response body.
    pub body: String,
    /// The decoded JSON body, or an empty map.
    pub payload: Map<String, Value>,
}

/// Error returned when a request fails validation before being sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A body was attached to a GET request.
    #[error("Cannot send a body with {method}.")]
    UnexpectedBody {
        /// The HTTP method that cannot carry a body.
        method: String,
    },

    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A JSON body could not be serialized.
    #[error("Invalid JSON body: {reason}")]
    InvalidJsonBody {
        /// The serializer's message.
        reason: String,
    },

    /// A header name or value is not valid HTTP.
    #[error("Invalid header '{name}'.")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },
}

/// Unified error type for every Plausible API operation.
#[derive(Debug, Error)]
pub enum PlausibleError {
    /// The operation requires an API key that is not configured.
    #[error("{scope} API key missing. Set {} or pass it explicitly.", .scope.env_var())]
    MissingCredential {
        /// Which key is missing.
        scope: CredentialScope,
    },

    /// The service rejected the credential (401 or 403).
    #[error("Unauthorized or forbidden (HTTP {status})")]
    Unauthorized {
        /// The HTTP status code (401 or 403).
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// The service answered 429 Too Many Requests.
    #[error("Rate limit exceeded (HTTP {status})")]
    RateLimited {
        /// The HTTP status code (always 429).
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// Any other non-success response.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Network or connection error that outlasted transport retries.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),
}

impl PlausibleError {
    /// Returns the HTTP status a service boundary should answer with.
    ///
    /// Missing credentials map to 401; responses keep their own status; a
    /// failure without a response maps to 500.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MissingCredential { .. } => 401,
            Self::Unauthorized { status, .. }
            | Self::RateLimited { status, .. }
            | Self::Api(ApiError { status, .. }) => *status,
            Self::Network(_) | Self::InvalidRequest(_) => 500,
        }
    }

    /// Returns a stable machine-readable name for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential { .. } | Self::Unauthorized { .. } => "plausible_auth_error",
            Self::RateLimited { .. } => "plausible_rate_limited",
            Self::Api(_) | Self::Network(_) | Self::InvalidRequest(_) => "plausible_api_error",
        }
    }

    /// Returns the raw response body, if the error came from a response.
    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { body, .. }
            | Self::RateLimited { body, .. }
            | Self::Api(ApiError { body, .. }) => Some(body),
            _ => None,
        }
    }

    /// Renders the structured error body a service boundary returns.
    ///
    /// The shape is `{"error": kind, "message": text, "details": payload}`,
    /// where `details` is only non-null for [`PlausibleError::Api`].
    #[must_use]
    pub fn to_error_body(&self) -> Value {
        let details = match self {
            Self::Api(e) => Value::Object(e.payload.clone()),
            _ => Value::Null,
        };
        json!({
            "error": self.kind(),
            "message": self.to_string(),
            "details": details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16) -> PlausibleError {
        let mut payload = Map::new();
        payload.insert("error".to_string(), json!("site not found"));
        PlausibleError::Api(ApiError {
            status,
            body: r#"{"error":"site not found"}"#.to_string(),
            payload,
        })
    }

    #[test]
    fn test_missing_credential_message_names_env_var() {
        let error = PlausibleError::MissingCredential {
            scope: CredentialScope::Sites,
        };
        let message = error.to_string();
        assert!(message.contains("Sites API key missing"));
        assert!(message.contains("PLAUSIBLE_SITES_API_KEY"));
    }

    #[test]
    fn test_api_error_message_includes_status() {
        assert_eq!(api_error(404).to_string(), "HTTP 404");
    }

    #[test]
    fn test_status_code_mapping() {
        let missing = PlausibleError::MissingCredential {
            scope: CredentialScope::Stats,
        };
        assert_eq!(missing.status_code(), 401);

        let forbidden = PlausibleError::Unauthorized {
            status: 403,
            body: String::new(),
        };
        assert_eq!(forbidden.status_code(), 403);

        let limited = PlausibleError::RateLimited {
            status: 429,
            body: String::new(),
        };
        assert_eq!(limited.status_code(), 429);

        assert_eq!(api_error(422).status_code(), 422);

        let invalid = PlausibleError::InvalidRequest(InvalidHttpRequestError::MissingBody {
            method: "post".to_string(),
        });
        assert_eq!(invalid.status_code(), 500);
    }

    #[test]
    fn test_kind_names() {
        let missing = PlausibleError::MissingCredential {
            scope: CredentialScope::Sites,
        };
        assert_eq!(missing.kind(), "plausible_auth_error");

        let limited = PlausibleError::RateLimited {
            status: 429,
            body: String::new(),
        };
        assert_eq!(limited.kind(), "plausible_rate_limited");
        assert_eq!(api_error(500).kind(), "plausible_api_error");
    }

    #[test]
    fn test_error_body_carries_details_for_api_errors() {
        let body = api_error(404).to_error_body();
        assert_eq!(body["error"], "plausible_api_error");
        assert_eq!(body["message"], "HTTP 404");
        assert_eq!(body["details"]["error"], "site not found");

        let limited = PlausibleError::RateLimited {
            status: 429,
            body: "slow down".to_string(),
        };
        let body = limited.to_error_body();
        assert_eq!(body["error"], "plausible_rate_limited");
        assert!(body["details"].is_null());
        assert_eq!(limited.response_body(), Some("slow down"));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let error: &dyn std::error::Error = &api_error(400);
        let _ = error;

        let invalid: &dyn std::error::Error = &InvalidHttpRequestError::InvalidHeader {
            name: "X-Bad".to_string(),
        };
        let _ = invalid;
    }
}
