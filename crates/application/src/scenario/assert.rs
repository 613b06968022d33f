//! Response checks and diagnostics.

use std::io::Write;

use stepcheck_domain::testing;
use tracing::warn;

use super::Scenario;
use crate::error::StepResult;
use crate::ports::{FileSystem, HttpClient};

impl<C: HttpClient, F: FileSystem> Scenario<C, F> {
    /// Checks the recorded status code.
    ///
    /// # Errors
    ///
    /// Fails with a status mismatch; the body is quoted for statuses of
    /// 400 and above.
    pub fn assert_status(&self, expected: u16) -> StepResult<()> {
        Ok(testing::check_status(self.state.response(), expected)?)
    }

    /// Checks that the body is the JSON `document`, ignoring key order and
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Fails when either side is not JSON or the canonical forms differ.
    pub fn assert_json_body(&self, document: &str) -> StepResult<()> {
        Ok(testing::check_json_body(self.state.response(), document)?)
    }

    /// Checks that the body contains `text`.
    ///
    /// # Errors
    ///
    /// Fails when the text is absent.
    pub fn assert_text_contains(&self, text: &str) -> StepResult<()> {
        Ok(testing::check_text_contains(self.state.response(), text)?)
    }

    /// Checks a response header value, ignoring case.
    ///
    /// # Errors
    ///
    /// Fails when the header is missing, empty or different.
    pub fn assert_header_equals(&self, name: &str, value: &str) -> StepResult<()> {
        Ok(testing::check_header_equals(
            self.state.response(),
            name,
            value,
        )?)
    }

    /// Checks the value found at a JSON path in the body, ignoring case.
    ///
    /// # Errors
    ///
    /// Fails when the path resolves nothing or to another value.
    pub fn assert_json_path_equals(&self, path: &str, value: &str) -> StepResult<()> {
        Ok(testing::check_json_path_equals(
            self.state.response(),
            path,
            value,
        )?)
    }

    /// Writes the raw response body to standard output.
    pub fn print_response(&self) {
        self.print_response_to(&mut std::io::stdout().lock());
    }

    /// Writes the raw response body and a newline to `out`.
    ///
    /// Write failures are logged and otherwise ignored.
    pub fn print_response_to<W: Write>(&self, out: &mut W) {
        let body = &self.state.response().body;
        if let Err(error) = out.write_all(body).and_then(|()| out.write_all(b"\n")) {
            warn!(%error, "failed to print response body");
        }
    }
}
