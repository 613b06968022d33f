//! HTTP Client port

use std::future::Future;

use stepcheck_domain::{RequestSpec, ResponseSpec, SuiteConfig};

/// Errors raised by a transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpClientError {
    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name or value is not valid on the wire.
    #[error("invalid header {name}: {message}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Reason.
        message: String,
    },

    /// The request exceeded the configured timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Timeout in milliseconds, 0 when unknown.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("DNS lookup failed for {host}: {message}")]
    DnsError {
        /// Host being resolved.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection failure, TLS handshakes included.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The response body could not be read.
    #[error("failed to read body: {0}")]
    ReadBody(String),

    /// The client could not be constructed.
    #[error("failed to build client: {0}")]
    Build(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// An implementation sends exactly the headers in the request, reads the
/// whole body into memory and never retries.
pub trait HttpClient: Send + Sync {
    /// Executes an HTTP request and returns the response.
    ///
    /// `Ok(None)` reports a transport that produced neither a response
    /// nor an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails due to network issues,
    /// timeout, or a body that cannot be read.
    fn execute(
        &self,
        request: &RequestSpec,
    ) -> impl Future<Output = Result<Option<ResponseSpec>, HttpClientError>> + Send;

    /// Stops validating server certificates for every later request.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be rebuilt.
    fn disable_certificate_verification(&mut self) -> Result<(), HttpClientError>;
}

/// Builds a fresh transport for each scenario.
pub trait ClientFactory: Send + Sync {
    /// The transport produced.
    type Client: HttpClient;

    /// Creates a client honouring `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be constructed.
    fn create(&self, config: &SuiteConfig) -> Result<Self::Client, HttpClientError>;
}
