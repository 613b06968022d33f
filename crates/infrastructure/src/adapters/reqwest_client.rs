//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! Every request carries exactly the headers of its `RequestSpec` and the
//! whole body is read before the response is returned.

use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};
use stepcheck_application::ports::{ClientFactory, HttpClient, HttpClientError};
use stepcheck_domain::{Headers, HttpMethod, RequestSpec, ResponseSpec, SuiteConfig};
use tracing::debug;

/// `User-Agent` sent when neither the configuration nor a step sets one.
pub const DEFAULT_USER_AGENT: &str = concat!("stepcheck/", env!("CARGO_PKG_VERSION"));

const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
///
/// Certificate verification can be switched off once; the underlying
/// `reqwest::Client` is rebuilt when that happens.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    config: SuiteConfig,
    insecure: bool,
}

impl ReqwestHttpClient {
    /// Creates a client honouring the timeout and user agent of `config`.
    ///
    /// Redirects are followed up to ten hops and TLS certificates are
    /// verified.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(config: &SuiteConfig) -> Result<Self, HttpClientError> {
        Ok(Self {
            client: Self::build_client(config, false)?,
            config: config.clone(),
            insecure: false,
        })
    }

    /// Returns true once certificate verification has been disabled.
    #[must_use]
    pub const fn is_insecure(&self) -> bool {
        self.insecure
    }

    fn build_client(config: &SuiteConfig, insecure: bool) -> Result<Client, HttpClientError> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(insecure);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| HttpClientError::Build(e.to_string()))
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Converts domain headers to a reqwest header map, keeping repeats.
    fn to_header_map(headers: &Headers) -> Result<HeaderMap, HttpClientError> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers.iter() {
            let invalid = |message: String| HttpClientError::InvalidHeader {
                name: name.to_string(),
                message,
            };
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            map.append(header_name, header_value);
        }
        Ok(map)
    }

    /// Converts reqwest response headers to domain headers.
    fn from_header_map(map: &HeaderMap) -> Headers {
        map.iter()
            .map(|(name, value)| {
                (
                    name.as_str(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn timeout_ms(&self) -> u64 {
        self.config
            .timeout
            .map_or(0, |timeout| timeout.as_millis() as u64)
    }

    /// Maps reqwest errors to the port's `HttpClientError`.
    fn map_error(&self, error: &reqwest::Error) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout {
                timeout_ms: self.timeout_ms(),
            };
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = error_chain(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_builder() {
            return HttpClientError::InvalidUrl(error_chain(error));
        }

        HttpClientError::Other(error_chain(error))
    }
}

/// Renders an error with all of its sources.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &RequestSpec) -> Result<Option<ResponseSpec>, HttpClientError> {
        let url = Url::parse(&request.url)
            .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {}", request.url)))?;
        let headers = Self::to_header_map(&request.headers)?;

        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .headers(headers);
        if request.has_body() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await.map_err(|e| self.map_error(&e))?;

        let status = response.status().as_u16();
        let response_headers = Self::from_header_map(response.headers());

        let body = response
            .bytes()
            .await
            .map_err(|e| HttpClientError::ReadBody(error_chain(&e)))?
            .to_vec();

        let duration = start.elapsed();
        debug!(status, bytes = body.len(), ?duration, "response read");

        Ok(Some(ResponseSpec::new(
            status,
            response_headers,
            body,
            duration,
        )))
    }

    fn disable_certificate_verification(&mut self) -> Result<(), HttpClientError> {
        self.client = Self::build_client(&self.config, true)?;
        self.insecure = true;
        Ok(())
    }
}

/// Builds a [`ReqwestHttpClient`] per scenario.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestClientFactory;

impl ReqwestClientFactory {
    /// Creates a new factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ClientFactory for ReqwestClientFactory {
    type Client = ReqwestHttpClient;

    fn create(&self, config: &SuiteConfig) -> Result<ReqwestHttpClient, HttpClientError> {
        ReqwestHttpClient::new(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Put),
            Method::PUT
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_client_creation() {
        let config = SuiteConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("suite/1.0");
        let client = ReqwestHttpClient::new(&config).unwrap();
        assert!(!client.is_insecure());
        assert_eq!(client.timeout_ms(), 5000);
    }

    #[test]
    fn test_header_map_keeps_repeated_values() {
        let headers: Headers = [("Accept", "a"), ("accept", "b"), ("X-Id", "1")]
            .into_iter()
            .collect();

        let map = ReqwestHttpClient::to_header_map(&headers).unwrap();

        let accept: Vec<_> = map.get_all("accept").iter().collect();
        assert_eq!(accept, ["a", "b"]);
        assert_eq!(map.get("x-id").unwrap(), "1");
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let headers: Headers = [("Bad Name", "x")].into_iter().collect();

        let err = ReqwestHttpClient::to_header_map(&headers).unwrap_err();

        assert!(matches!(err, HttpClientError::InvalidHeader { ref name, .. } if name == "Bad Name"));
    }

    #[test]
    fn test_disable_certificate_verification() {
        let mut client = ReqwestClientFactory::new()
            .create(&SuiteConfig::default())
            .unwrap();

        client.disable_certificate_verification().unwrap();

        assert!(client.is_insecure());
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let client = ReqwestHttpClient::new(&SuiteConfig::default()).unwrap();
        let request = RequestSpec::new(HttpMethod::Get, "not a url/health");

        let err = client.execute(&request).await.unwrap_err();

        assert!(matches!(err, HttpClientError::InvalidUrl(_)));
    }
}
