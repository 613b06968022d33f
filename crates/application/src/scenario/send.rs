//! Sending the assembled request.

use stepcheck_domain::{DataTable, HttpMethod, RequestSpec};
use tracing::debug;

use super::Scenario;
use super::builder::encode_table;
use crate::error::{StepError, StepResult};
use crate::ports::{FileSystem, HttpClient, HttpClientError};

const JSON_CONTENT_TYPE: &str = "application/json";

impl<C: HttpClient, F: FileSystem> Scenario<C, F> {
    /// Sends the current body to `path` and records the response.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Configuration`] when no base URL is set,
    /// otherwise a transport error. The previous response is kept on
    /// failure.
    pub async fn send(&mut self, method: HttpMethod, path: &str) -> StepResult<()> {
        let body = self.state.request_body.clone();
        self.dispatch(method, path, body, None).await
    }

    /// Sends `document` as the body.
    ///
    /// The accumulated request body is neither used nor changed.
    ///
    /// # Errors
    ///
    /// Same as [`Scenario::send`].
    pub async fn send_with_body(
        &mut self,
        method: HttpMethod,
        path: &str,
        document: &str,
    ) -> StepResult<()> {
        self.dispatch(method, path, document.as_bytes().to_vec(), None)
            .await
    }

    /// Sends a JSON object built from the rows as the body.
    ///
    /// `Content-Type: application/json` is added unless a content type was
    /// already set. The accumulated request body is neither used nor
    /// changed.
    ///
    /// # Errors
    ///
    /// A malformed table fails before anything is sent; otherwise same as
    /// [`Scenario::send`].
    pub async fn send_with_values(
        &mut self,
        method: HttpMethod,
        path: &str,
        table: &DataTable,
    ) -> StepResult<()> {
        let body = encode_table(table)?;
        self.dispatch(method, path, body, Some(JSON_CONTENT_TYPE))
            .await
    }

    /// Stops verifying server certificates for the rest of the scenario.
    ///
    /// Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::TransportSetup`] if the transport cannot be
    /// rebuilt.
    pub fn disable_security_check(&mut self) -> StepResult<()> {
        if self.state.insecure_transport() {
            return Ok(());
        }
        self.client
            .disable_certificate_verification()
            .map_err(StepError::TransportSetup)?;
        self.state.mark_insecure();
        debug!("certificate verification disabled");
        Ok(())
    }

    async fn dispatch(
        &mut self,
        method: HttpMethod,
        path: &str,
        body: Vec<u8>,
        default_content_type: Option<&str>,
    ) -> StepResult<()> {
        if self.state.base_url().trim().is_empty() {
            return Err(StepError::Configuration {
                endpoint: path.to_string(),
            });
        }

        let url = format!("{}{path}", self.state.base_url());
        let request = RequestSpec::new(method, url.clone())
            .with_headers(self.state.outgoing_headers(default_content_type))
            .with_body(body);

        debug!(
            method = %method,
            url = %url,
            body_len = request.body.len(),
            "sending request"
        );

        let response = match self.client.execute(&request).await {
            Ok(Some(response)) => response,
            Ok(None) => return Err(StepError::EmptyResponse(url)),
            Err(HttpClientError::ReadBody(message)) => {
                return Err(StepError::ResponseRead(message));
            }
            Err(source) => return Err(StepError::Network { url, source }),
        };

        debug!(
            status = response.status,
            duration_ms = response.duration.as_millis(),
            "response received"
        );
        self.state.record_response(response);
        Ok(())
    }
}
