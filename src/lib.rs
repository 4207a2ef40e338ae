//! # Plausible API Rust Client
//!
//! A Rust client for the Plausible Analytics Stats, Events and Sites APIs,
//! with type-safe configuration, client-side rate limiting, transport retries
//! and a typed error taxonomy.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`PlausibleConfig`] and [`PlausibleConfigBuilder`]
//! - Validated newtypes for API credentials and the service URL
//! - A token-bucket limiter that keeps all calls of a client within budget
//! - Async HTTP transport with exponential-backoff retries
//! - Response classification into [`PlausibleError`] kinds
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use plausible_api::{PlausibleConfig, SitesApiKey, StatsApiKey};
//!
//! let config = PlausibleConfig::builder()
//!     .stats_api_key(StatsApiKey::new("your-stats-key").unwrap())
//!     .sites_api_key(SitesApiKey::new("your-sites-key").unwrap())
//!     .rate_limit(600, Duration::from_secs(3600))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_retries(), 3);
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use plausible_api::{PlausibleClient, PlausibleConfig, PlausibleError};
//! use plausible_api::clients::{Event, StatsQuery, StatsResponse};
//!
//! let client = PlausibleClient::new(&PlausibleConfig::from_env()?)?;
//!
//! // Stats API
//! let payload = client
//!     .query_stats(&StatsQuery::new("example.com", ["visitors"], "7d"))
//!     .await?;
//! let stats = StatsResponse::from_payload(payload)?;
//!
//! // Events API
//! let event = Event::new("example.com", "pageview", "https://example.com/", user_agent)
//!     .client_ip(visitor_ip);
//! client.send_event(&event).await?;
//! ```
//!
//! ## Error Handling
//!
//! ```rust,ignore
//! match client.get_site("example.com").await {
//!     Ok(site) => println!("{site:?}"),
//!     Err(PlausibleError::MissingCredential { scope }) => eprintln!("configure {}", scope.env_var()),
//!     Err(PlausibleError::RateLimited { .. }) => eprintln!("try again later"),
//!     Err(e) => eprintln!("HTTP {}: {e}", e.status_code()),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **One budget per client**: Share a client to share its rate limit

pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, PlausibleConfig, PlausibleConfigBuilder, SitesApiKey, StatsApiKey};
pub use error::ConfigError;

// Re-export client types
pub use clients::{
    classify, ApiError, CredentialScope, HttpClient, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse, InvalidHttpRequestError, Payload, PlausibleClient, PlausibleError, RetryPolicy,
    TokenBucket,
};
