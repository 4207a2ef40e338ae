//! Stats API (v2).

use serde::Serialize;

use crate::clients::errors::{InvalidHttpRequestError, PlausibleError};
use crate::clients::http_request::HttpMethod;
use crate::clients::plausible::client::{PlausibleClient, STATS_ENDPOINT};
use crate::clients::response_classifier::Payload;

impl PlausibleClient {
    /// Runs a stats query: `POST /api/v2/query`.
    ///
    /// `query` is anything that serializes to the service's query document,
    /// typically a [`StatsQuery`](crate::clients::StatsQuery) or a raw
    /// `serde_json::Value`. Decode the result with
    /// [`StatsResponse::from_payload`](crate::clients::StatsResponse::from_payload).
    ///
    /// # Errors
    ///
    /// Returns [`PlausibleError::MissingCredential`] without sending anything
    /// if no stats key is configured, otherwise the classified outcome.
    pub async fn query_stats<Q>(&self, query: &Q) -> Result<Payload, PlausibleError>
    where
        Q: Serialize + ?Sized,
    {
        let builder = self.stats_request(HttpMethod::Post, STATS_ENDPOINT)?;
        let body = serde_json::to_value(query).map_err(|e| {
            InvalidHttpRequestError::InvalidJsonBody {
                reason: e.to_string(),
            }
        })?;
        self.execute(builder.json(body)).await
    }
}
