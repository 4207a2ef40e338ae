//! Sites API (v1): guests.

use crate::clients::errors::PlausibleError;
use crate::clients::http_request::HttpMethod;
use crate::clients::plausible::client::{path_segment, PlausibleClient, SITES_V1};
use crate::clients::plausible::models::{ListParams, PutGuest};
use crate::clients::response_classifier::Payload;

impl PlausibleClient {
    /// Lists a site's guests: `GET /api/v1/sites/guests?site_id=...`.
    ///
    /// # Errors
    ///
    /// Returns [`PlausibleError::MissingCredential`] without sending anything
    /// if no sites key is configured, otherwise the classified outcome.
    pub async fn list_guests(&self, site_id: &str, params: &ListParams) -> Result<Payload, PlausibleError> {
        let builder = self
            .sites_request(HttpMethod::Get, format!("{SITES_V1}/guests"))?
            .query_param("site_id", site_id);
        self.execute(params.apply(builder)).await
    }

    /// Finds or creates a guest invitation: `PUT /api/v1/sites/guests`.
    ///
    /// # Errors
    ///
    /// Same as [`list_guests`](Self::list_guests).
    pub async fn put_guest(&self, guest: &PutGuest) -> Result<Payload, PlausibleError> {
        let builder = self.sites_request(HttpMethod::Put, format!("{SITES_V1}/guests"))?;
        self.execute(builder.form(guest.to_form())).await
    }

    /// Removes a guest: `DELETE /api/v1/sites/guests/{email}`.
    ///
    /// # Errors
    ///
    /// Same as [`list_guests`](Self::list_guests).
    pub async fn delete_guest(&self, email: &str) -> Result<Payload, PlausibleError> {
        let path = format!("{SITES_V1}/guests/{}", path_segment(email));
        let builder = self.sites_request(HttpMethod::Delete, path)?;
        self.execute(builder).await
    }
}
