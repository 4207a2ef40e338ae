//! Response classification.
//!
//! Turns a completed [`HttpResponse`] into either a decoded [`Payload`] or one
//! of the typed [`PlausibleError`] kinds. Classification is pure: the same
//! status and body always produce the same outcome, and it never fails on a
//! malformed body.
//!
//! | Status | Outcome |
//! |---|---|
//! | 2xx | `Ok(payload)`, empty when there is no content |
//! | 429 | [`PlausibleError::RateLimited`] |
//! | 401, 403 | [`PlausibleError::Unauthorized`] |
//! | anything else | [`PlausibleError::Api`] |

use serde_json::{Map, Value};

use crate::clients::errors::{ApiError, PlausibleError};
use crate::clients::http_response::HttpResponse;

/// A decoded response body: a JSON object.
pub type Payload = Map<String, Value>;

/// Classifies a completed response.
///
/// # Errors
///
/// Returns the [`PlausibleError`] kind matching the response status for any
/// non-2xx response.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use plausible_api::clients::{classify, HttpResponse};
/// use plausible_api::PlausibleError;
///
/// let ok = HttpResponse::new(200, HashMap::new(), r#"{"sites":[]}"#);
/// assert!(classify(&ok).unwrap().contains_key("sites"));
///
/// let broken = HttpResponse::new(502, HashMap::new(), "<html>Bad Gateway</html>");
/// match classify(&broken) {
///     Err(PlausibleError::Api(e)) => {
///         assert_eq!(e.status, 502);
///         assert!(e.payload.is_empty());
///         assert_eq!(e.body, "<html>Bad Gateway</html>");
///     }
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
pub fn classify(response: &HttpResponse) -> Result<Payload, PlausibleError> {
    let status = response.code;

    if status == 429 {
        return Err(PlausibleError::RateLimited {
            status,
            body: response.body.clone(),
        });
    }

    if response.is_ok() {
        return Ok(decode_payload(&response.body).unwrap_or_else(|| {
            if response.has_content() {
                tracing::warn!(
                    "Discarding undecodable body of successful response (HTTP {})",
                    status
                );
            }
            Map::new()
        }));
    }

    if status == 401 || status == 403 {
        return Err(PlausibleError::Unauthorized {
            status,
            body: response.body.clone(),
        });
    }

    Err(PlausibleError::Api(ApiError {
        status,
        body: response.body.clone(),
        payload: decode_payload(&response.body).unwrap_or_default(),
    }))
}

/// Decodes a body as a JSON object, returning `None` for empty, malformed,
/// or non-object bodies.
fn decode_payload(body: &str) -> Option<Payload> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn response(code: u16, body: &str) -> HttpResponse {
        HttpResponse::new(code, HashMap::new(), body)
    }

    #[test]
    fn test_success_decodes_json_object() {
        let payload = classify(&response(200, r#"{"results":[{"metrics":[1]}]}"#)).unwrap();
        assert_eq!(payload["results"][0]["metrics"], json!([1]));
    }

    #[test]
    fn test_success_without_content_is_empty_payload() {
        let payload = classify(&response(202, "")).unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn test_success_with_malformed_body_is_empty_payload() {
        assert!(classify(&response(200, "ok")).unwrap().is_empty());
        assert!(classify(&response(200, "[1,2,3]")).unwrap().is_empty());
    }

    #[test]
    fn test_429_is_rate_limited() {
        let result = classify(&response(429, r#"{"error":"slow down"}"#));
        assert!(matches!(
            result,
            Err(PlausibleError::RateLimited { status: 429, ref body }) if body.contains("slow down")
        ));
    }

    #[test]
    fn test_401_and_403_are_unauthorized() {
        for code in [401, 403] {
            let result = classify(&response(code, "denied"));
            assert!(matches!(
                result,
                Err(PlausibleError::Unauthorized { status, ref body }) if status == code && body == "denied"
            ));
        }
    }

    #[test]
    fn test_other_errors_carry_status_body_and_payload() {
        let result = classify(&response(422, r#"{"error":"domain taken"}"#));
        match result {
            Err(PlausibleError::Api(e)) => {
                assert_eq!(e.status, 422);
                assert_eq!(e.body, r#"{"error":"domain taken"}"#);
                assert_eq!(e.payload["error"], "domain taken");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_error_body_degrades_to_empty_payload() {
        let result = classify(&response(500, "{not json"));
        match result {
            Err(PlausibleError::Api(e)) => {
                assert_eq!(e.status, 500);
                assert!(e.payload.is_empty());
                assert_eq!(e.body, "{not json");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let cases = [
            (200, "{}"),
            (204, ""),
            (400, "bad"),
            (401, ""),
            (403, "{}"),
            (404, r#"{"error":"nope"}"#),
            (429, ""),
            (500, "{broken"),
            (503, ""),
        ];
        for (code, body) in cases {
            let first = classify(&response(code, body));
            let second = classify(&response(code, body));
            match (first, second) {
                (Ok(a), Ok(b)) => assert_eq!(a, b),
                (Err(a), Err(b)) => {
                    assert_eq!(a.kind(), b.kind());
                    assert_eq!(a.status_code(), b.status_code());
                    assert_eq!(a.response_body(), b.response_body());
                }
                _ => panic!("Classification of ({code}, {body:?}) was not stable"),
            }
        }
    }
}
