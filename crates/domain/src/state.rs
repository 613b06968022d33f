//! Per-scenario state.
//!
//! One `ScenarioState` belongs to exactly one running scenario. It holds
//! the request being assembled by builder steps and the last response
//! captured by a send step.

use indexmap::IndexMap;

use crate::request::Headers;
use crate::response::ResponseSpec;

/// Header whose value is replaced rather than accumulated.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Header carrying request cookies.
pub const COOKIE: &str = "Cookie";

/// Mutable state shared by the steps of one scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioState {
    base_url: String,
    /// Headers accumulated for outgoing requests.
    pub request_headers: Headers,
    /// Cookies accumulated for outgoing requests.
    pub request_cookies: IndexMap<String, String>,
    /// Body sent by the next plain send step.
    pub request_body: Vec<u8>,
    response: ResponseSpec,
    insecure_transport: bool,
}

impl ScenarioState {
    /// Creates fresh state for a scenario targeting `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Returns the base URL resolved for this scenario.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Clears everything and retargets the state at `base_url`.
    pub fn reset(&mut self, base_url: impl Into<String>) {
        *self = Self::new(base_url);
    }

    /// Forgets the last response without touching the request builder.
    pub fn reset_response(&mut self) {
        self.response = ResponseSpec::default();
    }

    /// Adds a request header value.
    ///
    /// `Content-Type` is single-valued: a later value replaces an earlier
    /// one, so an explicit header wins over a multipart boundary set by
    /// an attachment. Every other name accumulates values.
    pub fn add_request_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if name.eq_ignore_ascii_case(CONTENT_TYPE) {
            self.request_headers.set(name, value);
        } else {
            self.request_headers.add(name, value);
        }
    }

    /// Builds the header set for the wire.
    ///
    /// Cookies are rendered into a single `Cookie` header unless one was
    /// set explicitly. `default_content_type` is applied only when no
    /// `Content-Type` header is present.
    #[must_use]
    pub fn outgoing_headers(&self, default_content_type: Option<&str>) -> Headers {
        let mut headers = self.request_headers.clone();
        if !self.request_cookies.is_empty() && !headers.contains(COOKIE) {
            let rendered = self
                .request_cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            headers.set(COOKIE, rendered);
        }
        if let Some(content_type) = default_content_type
            && !headers.contains(CONTENT_TYPE)
        {
            headers.set(CONTENT_TYPE, content_type);
        }
        headers
    }

    /// Returns the last recorded response.
    #[must_use]
    pub const fn response(&self) -> &ResponseSpec {
        &self.response
    }

    /// Replaces the last response in a single assignment.
    pub fn record_response(&mut self, response: ResponseSpec) {
        self.response = response;
    }

    /// Returns true once TLS verification has been disabled.
    #[must_use]
    pub const fn insecure_transport(&self) -> bool {
        self.insecure_transport
    }

    /// Marks the transport as skipping certificate verification.
    pub const fn mark_insecure(&mut self) {
        self.insecure_transport = true;
    }
}
