//! Request and response models for the Plausible APIs.
//!
//! The Stats API takes a JSON query document; the Sites API mutations take
//! quoted multipart forms. Each model knows how to render itself for the wire.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clients::http_request::{HttpRequestBuilder, QuotedForm};
use crate::clients::response_classifier::Payload;

/// Default timezone for new sites.
pub const DEFAULT_TIMEZONE: &str = "Etc/UTC";

// ---------------------------------------------------------------------------
// Stats API
// ---------------------------------------------------------------------------

/// The period a stats query covers.
///
/// Either a named period understood by the service (`"day"`, `"7d"`,
/// `"30d"`, `"month"`, `"6mo"`, `"12mo"`, `"year"`, `"all"`) or a custom
/// `[start, end]` pair of ISO 8601 dates or timestamps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateRange {
    /// A named period, e.g. `"7d"`.
    Period(String),
    /// A custom `[start, end]` range.
    Custom([String; 2]),
}

impl DateRange {
    /// Creates a custom range.
    #[must_use]
    pub fn custom(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self::Custom([start.into(), end.into()])
    }
}

impl From<&str> for DateRange {
    fn from(period: &str) -> Self {
        Self::Period(period.to_string())
    }
}

impl From<String> for DateRange {
    fn from(period: String) -> Self {
        Self::Period(period)
    }
}

/// Sort direction for `order_by` entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// Optional extras to include in a stats response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeOptions {
    /// Include imported data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imports: Option<bool>,
    /// Include time labels for time dimensions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_labels: Option<bool>,
    /// Include the total row count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<bool>,
}

/// Result pagination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Rows to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// A Stats API (v2) query.
///
/// `site_id`, `metrics` and `date_range` are required; everything else is
/// omitted from the wire when unset.
///
/// # Example
///
/// ```rust
/// use plausible_api::clients::{SortDirection, StatsQuery};
/// use serde_json::json;
///
/// let query = StatsQuery::new("example.com", ["visitors", "pageviews"], "7d")
///     .dimension("visit:country_name")
///     .order_by("visitors", SortDirection::Desc);
///
/// assert_eq!(
///     serde_json::to_value(&query).unwrap(),
///     json!({
///         "site_id": "example.com",
///         "metrics": ["visitors", "pageviews"],
///         "date_range": "7d",
///         "dimensions": ["visit:country_name"],
///         "order_by": [["visitors", "desc"]]
///     })
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsQuery {
    /// Domain of the site, as registered with the service.
    pub site_id: String,
    /// Metrics to compute, e.g. `visitors`, `pageviews`, `bounce_rate`.
    pub metrics: Vec<String>,
    /// The period the query covers.
    pub date_range: DateRange,
    /// Dimensions to group by, e.g. `event:page`, `time:day`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<String>,
    /// Filters, in the service's array syntax.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Value>,
    /// `(dimension_or_metric, direction)` sort entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<(String, SortDirection)>,
    /// Optional response extras.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<IncludeOptions>,
    /// Optional pagination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl StatsQuery {
    /// Creates a query with the required fields.
    pub fn new<I, M>(site_id: impl Into<String>, metrics: I, date_range: impl Into<DateRange>) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            site_id: site_id.into(),
            metrics: metrics.into_iter().map(Into::into).collect(),
            date_range: date_range.into(),
            dimensions: Vec::new(),
            filters: Vec::new(),
            order_by: Vec::new(),
            include: None,
            pagination: None,
        }
    }

    /// Adds a dimension.
    #[must_use]
    pub fn dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimensions.push(dimension.into());
        self
    }

    /// Adds a filter, e.g. `json!(["is", "visit:country_name", ["Germany"]])`.
    #[must_use]
    pub fn filter(mut self, filter: Value) -> Self {
        self.filters.push(filter);
        self
    }

    /// Adds a sort entry.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push((field.into(), direction));
        self
    }

    /// Sets the response extras.
    #[must_use]
    pub const fn include(mut self, include: IncludeOptions) -> Self {
        self.include = Some(include);
        self
    }

    /// Sets pagination.
    #[must_use]
    pub const fn pagination(mut self, limit: u32, offset: u32) -> Self {
        self.pagination = Some(Pagination {
            limit: Some(limit),
            offset: Some(offset),
        });
        self
    }
}

/// One row of a stats response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResultRow {
    /// Metric values, in the order requested.
    #[serde(default)]
    pub metrics: Vec<Value>,
    /// Dimension values, in the order requested.
    #[serde(default)]
    pub dimensions: Vec<Value>,
}

/// A decoded Stats API response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Result rows.
    #[serde(default)]
    pub results: Vec<QueryResultRow>,
    /// Response metadata.
    #[serde(default)]
    pub meta: Map<String, Value>,
    /// The query as the service interpreted it.
    #[serde(default)]
    pub query: Map<String, Value>,
}

impl StatsResponse {
    /// Decodes a response from a classified payload.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the payload does not have the
    /// stats response shape.
    pub fn from_payload(payload: Payload) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(payload))
    }
}

// ---------------------------------------------------------------------------
// Events API
// ---------------------------------------------------------------------------

/// An event for the Events API.
///
/// `user_agent`, `client_ip` and `debug` travel as request headers
/// (`User-Agent`, `X-Forwarded-For`, `X-Debug-Request`); the service uses
/// them to attribute the event to a visitor.
///
/// # Example
///
/// ```rust
/// use plausible_api::clients::Event;
///
/// let event = Event::new("example.com", "pageview", "https://example.com/", "Mozilla/5.0")
///     .client_ip("1.2.3.4")
///     .referrer("https://news.ycombinator.com");
///
/// assert!(event.interactive);
/// assert_eq!(event.client_ip.as_deref(), Some("1.2.3.4"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    /// Domain of the site.
    pub domain: String,
    /// Event name; `pageview` for page views.
    pub name: String,
    /// URL the event happened on.
    pub url: String,
    /// Whether the event counts towards bounce rate.
    pub interactive: bool,
    /// Referrer URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    /// Custom properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<Map<String, Value>>,
    /// Revenue, e.g. `{"currency": "USD", "amount": 10.5}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Map<String, Value>>,
    /// The visitor's user agent.
    #[serde(skip)]
    pub user_agent: String,
    /// The visitor's IP address.
    #[serde(skip)]
    pub client_ip: Option<String>,
    /// Ask the service to echo debugging information.
    #[serde(skip)]
    pub debug: bool,
}

impl Event {
    /// Creates an interactive event.
    pub fn new(
        domain: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            url: url.into(),
            interactive: true,
            referrer: None,
            props: None,
            revenue: None,
            user_agent: user_agent.into(),
            client_ip: None,
            debug: false,
        }
    }

    /// Sets the referrer.
    #[must_use]
    pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    /// Sets custom properties.
    #[must_use]
    pub fn props(mut self, props: Map<String, Value>) -> Self {
        self.props = Some(props);
        self
    }

    /// Sets revenue.
    #[must_use]
    pub fn revenue(mut self, revenue: Map<String, Value>) -> Self {
        self.revenue = Some(revenue);
        self
    }

    /// Sets whether the event is interactive.
    #[must_use]
    pub const fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Sets the visitor's IP address.
    #[must_use]
    pub fn client_ip(mut self, client_ip: impl Into<String>) -> Self {
        self.client_ip = Some(client_ip.into());
        self
    }

    /// Enables the service's debug mode for this event.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

// ---------------------------------------------------------------------------
// Sites API
// ---------------------------------------------------------------------------

/// Cursor pagination for Sites API list endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Return items after this cursor.
    pub after: Option<String>,
    /// Return items before this cursor.
    pub before: Option<String>,
    /// Maximum number of items.
    pub limit: Option<u32>,
}

impl ListParams {
    /// Creates empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `after` cursor.
    #[must_use]
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Sets the `before` cursor.
    #[must_use]
    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn apply(&self, builder: HttpRequestBuilder) -> HttpRequestBuilder {
        builder
            .optional_query_param("after", self.after.clone())
            .optional_query_param("before", self.before.clone())
            .optional_query_param("limit", self.limit.map(|limit| limit.to_string()))
    }
}

/// A new site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateSite {
    /// Domain of the site.
    pub domain: String,
    /// IANA timezone for reports.
    pub timezone: String,
    /// Team to create the site in.
    pub team_id: Option<String>,
}

impl CreateSite {
    /// Creates a site in [`DEFAULT_TIMEZONE`].
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            team_id: None,
        }
    }

    /// Sets the timezone.
    #[must_use]
    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Sets the team.
    #[must_use]
    pub fn team_id(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    pub(crate) fn to_form(&self) -> QuotedForm {
        QuotedForm::new()
            .field("domain", &self.domain)
            .field("timezone", &self.timezone)
            .optional_field(
                "team_id",
                self.team_id.as_deref().filter(|team| !team.is_empty()),
            )
    }
}

/// Kind of goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoalType {
    /// A custom event goal.
    Event,
    /// A pageview goal.
    Page,
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event => write!(f, "event"),
            Self::Page => write!(f, "page"),
        }
    }
}

/// A goal to create or find.
///
/// The service treats `PUT` as find-or-create, so sending the same goal
/// twice is harmless.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PutGoal {
    /// Domain of the site.
    pub site_id: String,
    /// Kind of goal.
    pub goal_type: GoalType,
    /// Event name, for event goals.
    pub event_name: Option<String>,
    /// Page path, for page goals.
    pub page_path: Option<String>,
    /// Name shown in the dashboard.
    pub display_name: Option<String>,
}

impl PutGoal {
    /// Creates an event goal.
    pub fn event(site_id: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            goal_type: GoalType::Event,
            event_name: Some(event_name.into()),
            page_path: None,
            display_name: None,
        }
    }

    /// Creates a pageview goal.
    pub fn page(site_id: impl Into<String>, page_path: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            goal_type: GoalType::Page,
            event_name: None,
            page_path: Some(page_path.into()),
            display_name: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub(crate) fn to_form(&self) -> QuotedForm {
        QuotedForm::new()
            .field("site_id", &self.site_id)
            .field("goal_type", self.goal_type.to_string())
            .optional_field("event_name", self.event_name.as_deref())
            .optional_field("page_path", self.page_path.as_deref())
            .optional_field("display_name", self.display_name.as_deref())
    }
}

/// Guest access level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuestRole {
    /// Read-only access.
    Viewer,
    /// Read-write access.
    Editor,
}

impl fmt::Display for GuestRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Viewer => write!(f, "viewer"),
            Self::Editor => write!(f, "editor"),
        }
    }
}

/// A guest invitation to create or find.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PutGuest {
    /// Domain of the site.
    pub site_id: String,
    /// Email of the guest.
    pub email: String,
    /// Access level.
    pub role: GuestRole,
}

impl PutGuest {
    /// Creates a guest invitation.
    pub fn new(site_id: impl Into<String>, email: impl Into<String>, role: GuestRole) -> Self {
        Self {
            site_id: site_id.into(),
            email: email.into(),
            role,
        }
    }

    pub(crate) fn to_form(&self) -> QuotedForm {
        QuotedForm::new()
            .field("site_id", &self.site_id)
            .field("email", &self.email)
            .field("role", self.role.to_string())
    }
}
