//! Sites API (v1): sites, teams and shared links.

use crate::clients::errors::PlausibleError;
use crate::clients::http_request::{HttpMethod, QuotedForm};
use crate::clients::plausible::client::{path_segment, PlausibleClient, SITES_V1};
use crate::clients::plausible::models::{CreateSite, ListParams};
use crate::clients::response_classifier::Payload;

impl PlausibleClient {
    /// Lists sites: `GET /api/v1/sites`.
    ///
    /// # Errors
    ///
    /// Returns [`PlausibleError::MissingCredential`] without sending anything
    /// if no sites key is configured, otherwise the classified outcome.
    pub async fn list_sites(&self, params: &ListParams) -> Result<Payload, PlausibleError> {
        let builder = self.sites_request(HttpMethod::Get, SITES_V1)?;
        self.execute(params.apply(builder)).await
    }

    /// Lists teams: `GET /api/v1/sites/teams`.
    ///
    /// # Errors
    ///
    /// Same as [`list_sites`](Self::list_sites).
    pub async fn list_teams(&self, params: &ListParams) -> Result<Payload, PlausibleError> {
        let builder = self.sites_request(HttpMethod::Get, format!("{SITES_V1}/teams"))?;
        self.execute(params.apply(builder)).await
    }

    /// Creates a site: `POST /api/v1/sites`.
    ///
    /// # Errors
    ///
    /// Same as [`list_sites`](Self::list_sites).
    pub async fn create_site(&self, site: &CreateSite) -> Result<Payload, PlausibleError> {
        let builder = self.sites_request(HttpMethod::Post, SITES_V1)?;
        self.execute(builder.form(site.to_form())).await
    }

    /// Fetches a site: `GET /api/v1/sites/{site_id}`.
    ///
    /// # Errors
    ///
    /// Same as [`list_sites`](Self::list_sites).
    pub async fn get_site(&self, site_id: &str) -> Result<Payload, PlausibleError> {
        let path = format!("{SITES_V1}/{}", path_segment(site_id));
        let builder = self.sites_request(HttpMethod::Get, path)?;
        self.execute(builder).await
    }

    /// Changes a site's domain: `PUT /api/v1/sites/{site_id}`.
    ///
    /// # Errors
    ///
    /// Same as [`list_sites`](Self::list_sites).
    pub async fn update_site_domain(
        &self,
        site_id: &str,
        new_domain: &str,
    ) -> Result<Payload, PlausibleError> {
        let path = format!("{SITES_V1}/{}", path_segment(site_id));
        let builder = self.sites_request(HttpMethod::Put, path)?;
        self.execute(builder.form(QuotedForm::new().field("domain", new_domain)))
            .await
    }

    /// Deletes a site and all its data: `DELETE /api/v1/sites/{site_id}`.
    ///
    /// # Errors
    ///
    /// Same as [`list_sites`](Self::list_sites).
    pub async fn delete_site(&self, site_id: &str) -> Result<Payload, PlausibleError> {
        let path = format!("{SITES_V1}/{}", path_segment(site_id));
        let builder = self.sites_request(HttpMethod::Delete, path)?;
        self.execute(builder).await
    }

    /// Finds or creates a shared link: `PUT /api/v1/sites/shared-links`.
    ///
    /// # Errors
    ///
    /// Same as [`list_sites`](Self::list_sites).
    pub async fn put_shared_link(&self, site_id: &str, name: &str) -> Result<Payload, PlausibleError> {
        let builder = self.sites_request(HttpMethod::Put, format!("{SITES_V1}/shared-links"))?;
        let form = QuotedForm::new().field("site_id", site_id).field("name", name);
        self.execute(builder.form(form)).await
    }
}
