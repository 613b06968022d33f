//! Fully resolved outgoing request

use super::{Headers, HttpMethod};

/// A request ready to hand to the transport.
///
/// `headers` is the complete header set: the transport sends exactly
/// these, replacing any client defaults with the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// Headers to send.
    pub headers: Headers,
    /// Raw body bytes; empty means no body.
    pub body: Vec<u8>,
}

impl RequestSpec {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Sets the headers (builder pattern).
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns true if the request carries a body.
    #[must_use]
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}
