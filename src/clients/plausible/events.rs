//! Events API.

use crate::clients::errors::{InvalidHttpRequestError, PlausibleError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::plausible::client::{PlausibleClient, EVENT_ENDPOINT};
use crate::clients::plausible::models::Event;
use crate::clients::response_classifier::Payload;

impl PlausibleClient {
    /// Records an event: `POST /api/event`.
    ///
    /// Needs no API key. The visitor's user agent is sent as `User-Agent`,
    /// replacing the library's own; a non-empty `client_ip` is sent as
    /// `X-Forwarded-For` and `debug` as `X-Debug-Request: true`.
    ///
    /// The service answers 202 with no body, which yields an empty payload;
    /// in debug mode it answers 200 with diagnostics.
    ///
    /// # Errors
    ///
    /// Returns the classified outcome of the request.
    pub async fn send_event(&self, event: &Event) -> Result<Payload, PlausibleError> {
        let body = serde_json::to_value(event).map_err(|e| {
            InvalidHttpRequestError::InvalidJsonBody {
                reason: e.to_string(),
            }
        })?;

        let mut builder = HttpRequest::builder(HttpMethod::Post, EVENT_ENDPOINT)
            .json(body)
            .header("User-Agent", event.user_agent.as_str());

        if let Some(ip) = event.client_ip.as_deref().filter(|ip| !ip.is_empty()) {
            builder = builder.header("X-Forwarded-For", ip);
        }
        if event.debug {
            builder = builder.header("X-Debug-Request", "true");
        }

        self.execute(builder).await
    }
}
