//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated bearer token for the Stats API (`/api/v2/query`).
///
/// The `Debug` implementation masks the token so it never leaks into logs.
///
/// # Example
///
/// ```rust
/// use plausible_api::StatsApiKey;
///
/// let key = StatsApiKey::new("stats-token").unwrap();
/// assert_eq!(key.as_ref(), "stats-token");
/// assert_eq!(format!("{:?}", key), "StatsApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct StatsApiKey(String);

impl StatsApiKey {
    /// Creates a new validated Stats API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey { scope: "Stats" });
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for StatsApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StatsApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StatsApiKey(*****)")
    }
}

/// A validated bearer token with the Sites API scope (`/api/v1/sites`).
///
/// Like [`StatsApiKey`], the value is masked in debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct SitesApiKey(String);

impl SitesApiKey {
    /// Creates a new validated Sites API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey { scope: "Sites" });
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for SitesApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SitesApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SitesApiKey(*****)")
    }
}

/// A validated base URL for the Plausible instance.
///
/// Accepts `http` and `https` URLs with a non-empty host. Trailing slashes are
/// stripped so endpoint paths can be appended directly.
///
/// # Example
///
/// ```rust
/// use plausible_api::BaseUrl;
///
/// let url = BaseUrl::new("https://plausible.example.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://plausible.example.com");
/// assert_eq!(url.host_name(), "plausible.example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no http(s)
    /// scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidBaseUrl { url: url.clone() })?;

        let scheme = url[..scheme_end].to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        // Host ends at port, path, query, or end of string
        let host_end = url[host_start..]
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        Ok(Self {
            url,
            host_start,
            host_end,
        })
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Joins an absolute endpoint path (e.g. `/api/event`) onto this URL.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.url)
        } else {
            format!("{}/{path}", self.url)
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self {
            url: "https://plausible.io".to_string(),
            host_start: "https://".len(),
            host_end: "https://plausible.io".len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_key_rejects_empty_string() {
        assert!(matches!(
            StatsApiKey::new(""),
            Err(ConfigError::EmptyApiKey { scope: "Stats" })
        ));
        assert!(StatsApiKey::new("   ").is_err());
    }

    #[test]
    fn test_sites_key_rejects_empty_string() {
        assert!(matches!(
            SitesApiKey::new(""),
            Err(ConfigError::EmptyApiKey { scope: "Sites" })
        ));
    }

    #[test]
    fn test_keys_mask_value_in_debug() {
        let stats = StatsApiKey::new("super-secret-stats").unwrap();
        let sites = SitesApiKey::new("super-secret-sites").unwrap();
        assert_eq!(format!("{stats:?}"), "StatsApiKey(*****)");
        assert_eq!(format!("{sites:?}"), "SitesApiKey(*****)");
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let url = BaseUrl::new("https://plausible.io/").unwrap();
        assert_eq!(url.as_ref(), "https://plausible.io");
        assert_eq!(url.join("/api/event"), "https://plausible.io/api/event");
        assert_eq!(url.join("api/event"), "https://plausible.io/api/event");
    }

    #[test]
    fn test_base_url_with_port_and_path() {
        let url = BaseUrl::new("http://127.0.0.1:8000").unwrap();
        assert_eq!(url.host_name(), "127.0.0.1");

        let url = BaseUrl::new("https://analytics.example.com/proxy").unwrap();
        assert_eq!(url.host_name(), "analytics.example.com");
        assert_eq!(
            url.join("/api/v2/query"),
            "https://analytics.example.com/proxy/api/v2/query"
        );
    }

    #[test]
    fn test_base_url_rejects_invalid() {
        assert!(BaseUrl::new("plausible.io").is_err());
        assert!(BaseUrl::new("https://").is_err());
        assert!(BaseUrl::new("ftp://plausible.io").is_err());
        assert!(BaseUrl::new("https://:8000").is_err());
    }

    #[test]
    fn test_base_url_default_matches_hosted_service() {
        let url = BaseUrl::default();
        assert_eq!(url, BaseUrl::new("https://plausible.io").unwrap());
        assert_eq!(url.host_name(), "plausible.io");
    }
}
