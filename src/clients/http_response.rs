//! HTTP response types for the Plausible API client.
//!
//! This module provides the [`HttpResponse`] type: a completed response as
//! seen by the transport, before classification.

use std::collections::HashMap;

/// A completed HTTP response.
///
/// The body is kept as raw text; decoding is the job of the
/// [response classifier](crate::clients::classify).
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased names (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body. Empty when the response had no content.
    pub body: String,
    /// Seconds to wait before retrying (from `Retry-After` header).
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the `Retry-After` header.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: impl Into<String>) -> Self {
        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0);

        Self {
            code,
            headers,
            body: body.into(),
            retry_request_after,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` if the response carried content.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.body.is_empty()
    }

    /// Returns the first value of a header (name is matched lowercased).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Parses a reqwest header map into lowercased multi-valued headers.
    pub(crate) fn parse_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, HashMap::new(), "");
            assert!(response.is_ok(), "Expected is_ok() to be true for code {code}");
        }
    }

    #[test]
    fn test_is_ok_returns_false_for_4xx_and_5xx() {
        for code in [400, 401, 403, 404, 429, 500, 503] {
            assert!(!HttpResponse::new(code, HashMap::new(), "").is_ok());
        }
    }

    #[test]
    fn test_retry_after_parsing() {
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec!["2.5".to_string()]);

        let response = HttpResponse::new(429, headers, "");
        assert!((response.retry_request_after.unwrap() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_retry_after_ignores_http_dates_and_negatives() {
        let mut headers = HashMap::new();
        headers.insert(
            "retry-after".to_string(),
            vec!["Wed, 21 Oct 2015 07:28:00 GMT".to_string()],
        );
        assert!(HttpResponse::new(503, headers, "").retry_request_after.is_none());

        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec!["-3".to_string()]);
        assert!(HttpResponse::new(503, headers, "").retry_request_after.is_none());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["abc-123".to_string()]);

        let response = HttpResponse::new(200, headers, "{}");
        assert_eq!(response.header("X-Request-Id"), Some("abc-123"));
        assert!(response.has_content());
    }
}
