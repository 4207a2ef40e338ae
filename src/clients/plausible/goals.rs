//! Sites API (v1): goals.

use crate::clients::errors::PlausibleError;
use crate::clients::http_request::{HttpMethod, QuotedForm};
use crate::clients::plausible::client::{path_segment, PlausibleClient, SITES_V1};
use crate::clients::plausible::models::{ListParams, PutGoal};
use crate::clients::response_classifier::Payload;

impl PlausibleClient {
    /// Lists a site's goals: `GET /api/v1/sites/goals?site_id=...`.
    ///
    /// # Errors
    ///
    /// Returns [`PlausibleError::MissingCredential`] without sending anything
    /// if no sites key is configured, otherwise the classified outcome.
    pub async fn list_goals(&self, site_id: &str, params: &ListParams) -> Result<Payload, PlausibleError> {
        let builder = self
            .sites_request(HttpMethod::Get, format!("{SITES_V1}/goals"))?
            .query_param("site_id", site_id);
        self.execute(params.apply(builder)).await
    }

    /// Finds or creates a goal: `PUT /api/v1/sites/goals`.
    ///
    /// # Errors
    ///
    /// Same as [`list_goals`](Self::list_goals).
    pub async fn put_goal(&self, goal: &PutGoal) -> Result<Payload, PlausibleError> {
        let builder = self.sites_request(HttpMethod::Put, format!("{SITES_V1}/goals"))?;
        self.execute(builder.form(goal.to_form())).await
    }

    /// Deletes a goal: `DELETE /api/v1/sites/goals/{goal_id}`.
    ///
    /// The site is identified by a `site_id` form field.
    ///
    /// # Errors
    ///
    /// Same as [`list_goals`](Self::list_goals).
    pub async fn delete_goal(&self, goal_id: &str, site_id: &str) -> Result<Payload, PlausibleError> {
        let path = format!("{SITES_V1}/goals/{}", path_segment(goal_id));
        let builder = self.sites_request(HttpMethod::Delete, path)?;
        self.execute(builder.form(QuotedForm::new().field("site_id", site_id)))
            .await
    }
}
