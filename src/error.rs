//! Error types for the Plausible API client.
//!
//! This module contains error types used throughout the crate for configuration
//! and validation errors.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use plausible_api::{StatsApiKey, ConfigError};
//!
//! let result = StatsApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the client.
///
/// Every variant is raised synchronously at construction time and is never
/// retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// An API key was provided but is empty.
    #[error("{scope} API key cannot be empty. Please provide a valid Plausible API key.")]
    EmptyApiKey {
        /// The scope of the key ("Stats" or "Sites").
        scope: &'static str,
    },

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a URL with an http or https scheme (e.g., 'https://plausible.io').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Rate limiter capacity must be positive.
    #[error("Rate limit capacity must be greater than zero, got {capacity}.")]
    InvalidRateLimitCapacity {
        /// The rejected capacity.
        capacity: u32,
    },

    /// Rate limiter refill window must be positive.
    #[error("Rate limit refill window must be greater than zero.")]
    InvalidRateLimitWindow,

    /// Per-call timeout must be positive.
    #[error("Request timeout must be greater than zero.")]
    InvalidTimeout,

    /// Backoff factor must be a finite, non-negative number.
    #[error("Invalid backoff factor {factor}. Expected a finite number >= 0.")]
    InvalidBackoffFactor {
        /// The rejected factor.
        factor: f64,
    },

    /// An environment variable holds a value that cannot be parsed.
    #[error("Invalid value '{value}' for environment variable {var}.")]
    InvalidEnvValue {
        /// The environment variable name.
        var: &'static str,
        /// The raw value found.
        value: String,
    },

    /// The underlying HTTP transport could not be created.
    #[error("Failed to create HTTP client: {reason}")]
    HttpClient {
        /// Why the transport failed to build.
        reason: String,
    },
}
