//! HTTP request types for the Plausible API client.
//!
//! This module provides the [`HttpRequest`] descriptor and its builder, plus
//! the [`QuotedForm`] body used by the Sites API mutation endpoints.

use std::fmt;

use reqwest::multipart::{Form, Part};

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the Plausible API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources and sending events.
    Post,
    /// HTTP PUT method for updating or upserting resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    pub(crate) const fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Form fields for Sites API mutations.
///
/// The Sites API documents its mutation bodies as multipart form fields whose
/// values are JSON string literals, so every value is wrapped in double quotes
/// exactly as given: `example.com` is sent as `"example.com"`. No escaping is
/// applied.
///
/// # Example
///
/// ```rust
/// use plausible_api::clients::QuotedForm;
///
/// let form = QuotedForm::new()
///     .field("domain", "example.com")
///     .optional_field("team_id", None);
///
/// assert_eq!(form.get("domain"), Some("\"example.com\""));
/// assert_eq!(form.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuotedForm {
    fields: Vec<(String, String)>,
}

impl QuotedForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, quoting its value.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.fields
            .push((name.into(), format!("\"{}\"", value.as_ref())));
        self
    }

    /// Adds a field only when a value is present.
    #[must_use]
    pub fn optional_field(self, name: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    /// Returns the quoted value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the fields in insertion order, values already quoted.
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the form has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders the form as a multipart body.
    ///
    /// Each part is named after its field and carries the field name as its
    /// filename, which is how the service's reference client sends them.
    /// A fresh [`Form`] is produced on every call since multipart bodies are
    /// consumed when sent.
    pub(crate) fn to_multipart(&self) -> Form {
        self.fields.iter().fold(Form::new(), |form, (name, value)| {
            form.part(
                name.clone(),
                Part::text(value.clone()).file_name(name.clone()),
            )
        })
    }
}

/// Body of an outbound request.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// JSON body (`application/json`), used by the Stats and Events APIs.
    Json(serde_json::Value),
    /// Quoted multipart form body, used by Sites API mutations.
    Form(QuotedForm),
}

/// An outbound request descriptor.
///
/// Use [`HttpRequest::builder`] to construct requests. Once built, a request
/// is immutable; the transport may send it several times when retrying.
///
/// # Example
///
/// ```rust
/// use plausible_api::clients::{HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Post, "/api/v2/query")
///     .json(json!({"site_id": "example.com", "metrics": ["visitors"], "date_range": "7d"}))
///     .bearer_auth("stats-token")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.path, "/api/v2/query");
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The absolute endpoint path, joined onto the base URL.
    pub path: String,
    /// The request body, if any.
    pub body: Option<RequestBody>,
    /// Query parameters to append to the URL, in order.
    pub query: Vec<(String, String)>,
    /// Headers to include in the request. These override client defaults.
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Returns the value of a header set on this request (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `http_method` is `Get` and a body is present
    /// - `http_method` is `Post` or `Put` and no body is present
    /// - a header name or value is not valid HTTP
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.http_method == HttpMethod::Get && self.body.is_some() {
            return Err(InvalidHttpRequestError::UnexpectedBody {
                method: self.http_method.to_string(),
            });
        }

        if matches!(self.http_method, HttpMethod::Post | HttpMethod::Put) && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        for (name, value) in &self.headers {
            let valid_name = reqwest::header::HeaderName::from_bytes(name.as_bytes()).is_ok();
            let valid_value = reqwest::header::HeaderValue::from_str(value).is_ok();
            if !valid_name || !valid_value {
                return Err(InvalidHttpRequestError::InvalidHeader { name: name.clone() });
            }
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<RequestBody>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(RequestBody::Json(body.into()));
        self
    }

    /// Sets a quoted form body.
    #[must_use]
    pub fn form(mut self, form: QuotedForm) -> Self {
        self.body = Some(RequestBody::Form(form));
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds a query parameter only when a value is present.
    #[must_use]
    pub fn optional_query_param(self, key: impl Into<String>, value: Option<String>) -> Self {
        match value {
            Some(value) => self.query_param(key, value),
            None => self,
        }
    }

    /// Sets a header, replacing any earlier value with the same name.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&key));
        self.headers.push((key, value.into()));
        self
    }

    /// Sets `Authorization: Bearer {token}`.
    #[must_use]
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            query: self.query,
            headers: self.headers,
        };
        request.verify()?;
        Ok(request)
    }
}
