//! Step pattern registry.
//!
//! The BDD framework owns text matching. This module only publishes the
//! patterns it should match and dispatches a matched step, with its
//! captured groups and payload, to the scenario.

use stepcheck_domain::{DataTable, HttpMethod};

use crate::error::{StepError, StepResult};
use crate::ports::{FileSystem, HttpClient};
use crate::scenario::Scenario;

/// Every step understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// `I disable security check`
    DisableSecurityCheck,
    /// `I set header "name" with value "value"`
    SetHeader,
    /// `I set headers with values:` followed by a table
    SetHeaders,
    /// `I set cookie "name" with value "value"`
    SetCookie,
    /// `I attach the file "path" as "field"`
    AttachFile,
    /// `I set request body:` followed by a doc string
    SetBody,
    /// `I set request body with values:` followed by a table
    SetBodyValues,
    /// `I send a "METHOD" request to "path" with body:`
    SendWithBody,
    /// `I send a "METHOD" request to "path" with values:`
    SendWithValues,
    /// `I send a "METHOD" request to "path"`
    Send,
    /// `the response code should be N`
    ResponseCode,
    /// `the response should contain json:`
    ResponseJson,
    /// `the response should contain text:`
    ResponseText,
    /// `the response header "name" should be "value"`
    ResponseHeader,
    /// `the response body path "path" should be "value"`
    ResponseBodyPath,
    /// `print response`
    PrintResponse,
}

impl StepKind {
    /// All steps, in matching priority order.
    pub const ALL: [Self; 16] = [
        Self::DisableSecurityCheck,
        Self::SetHeader,
        Self::SetHeaders,
        Self::SetCookie,
        Self::AttachFile,
        Self::SetBody,
        Self::SetBodyValues,
        Self::SendWithBody,
        Self::SendWithValues,
        Self::Send,
        Self::ResponseCode,
        Self::ResponseJson,
        Self::ResponseText,
        Self::ResponseHeader,
        Self::ResponseBodyPath,
        Self::PrintResponse,
    ];

    /// Anchored regular expression matched against the step text.
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::DisableSecurityCheck => r"^I disable security check$",
            Self::SetHeader => r#"^I set header "([^"]*)" with value "([^"]*)"$"#,
            Self::SetHeaders => r"^I set headers with values:$",
            Self::SetCookie => r#"^I set cookie "([^"]*)" with value "([^"]*)"$"#,
            Self::AttachFile => r#"^I attach the file "([^"]*)" as "([^"]*)"$"#,
            Self::SetBody => r"^I set request body:$",
            Self::SetBodyValues => r"^I set request body with values:$",
            Self::SendWithBody => {
                r#"^I send a "(GET|POST|PUT|DELETE)" request to "([^"]*)" with body:$"#
            }
            Self::SendWithValues => {
                r#"^I send a "(GET|POST|PUT|DELETE)" request to "([^"]*)" with values:$"#
            }
            Self::Send => r#"^I send a "(GET|POST|PUT|DELETE)" request to "([^"]*)"$"#,
            Self::ResponseCode => r"^the response code should be (\d+)$",
            Self::ResponseJson => r"^the response should contain json:$",
            Self::ResponseText => r"^the response should contain text:$",
            Self::ResponseHeader => r#"^the response header "([^"]*)" should be "([^"]*)"$"#,
            Self::ResponseBodyPath => {
                r#"^the response body path "([^"]*)" should be "([^"]*)"$"#
            }
            Self::PrintResponse => r"^print response$",
        }
    }
}

/// `(pattern, step)` pairs to register with the step framework.
pub const STEP_PATTERNS: [(&str, StepKind); StepKind::ALL.len()] = {
    let mut table = [("", StepKind::PrintResponse); StepKind::ALL.len()];
    let mut i = 0;
    while i < table.len() {
        table[i] = (StepKind::ALL[i].pattern(), StepKind::ALL[i]);
        i += 1;
    }
    table
};

/// Arguments of a matched step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepInput {
    /// Capture groups, in order, without the whole match.
    pub captures: Vec<String>,
    /// Attached data table.
    pub table: Option<DataTable>,
    /// Attached doc string.
    pub doc_string: Option<String>,
}

impl StepInput {
    /// Creates input from capture groups.
    #[must_use]
    pub fn new<I, S>(captures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            captures: captures.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Attaches a data table (builder pattern).
    #[must_use]
    pub fn with_table(mut self, table: DataTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Attaches a doc string (builder pattern).
    #[must_use]
    pub fn with_doc_string(mut self, doc_string: impl Into<String>) -> Self {
        self.doc_string = Some(doc_string.into());
        self
    }

    fn capture(&self, kind: StepKind, index: usize) -> StepResult<&str> {
        self.captures
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| invalid(kind, format!("missing capture group {}", index + 1)))
    }

    fn method(&self, kind: StepKind, index: usize) -> StepResult<HttpMethod> {
        Ok(self.capture(kind, index)?.parse::<HttpMethod>()?)
    }

    fn status(&self, kind: StepKind, index: usize) -> StepResult<u16> {
        let raw = self.capture(kind, index)?;
        raw.parse()
            .map_err(|e| invalid(kind, format!("invalid status code {raw}: {e}")))
    }

    fn table(&self, kind: StepKind) -> StepResult<&DataTable> {
        self.table
            .as_ref()
            .ok_or_else(|| invalid(kind, "missing data table".to_string()))
    }

    fn doc_string(&self, kind: StepKind) -> StepResult<&str> {
        self.doc_string
            .as_deref()
            .ok_or_else(|| invalid(kind, "missing doc string".to_string()))
    }
}

fn invalid(kind: StepKind, message: String) -> StepError {
    StepError::InvalidStepArguments {
        step: kind.pattern(),
        message,
    }
}

impl<C: HttpClient, F: FileSystem> Scenario<C, F> {
    /// Runs a matched step.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidStepArguments`] when `input` does not
    /// fit the step, otherwise whatever the step itself returns.
    pub async fn run_step(&mut self, kind: StepKind, input: &StepInput) -> StepResult<()> {
        match kind {
            StepKind::DisableSecurityCheck => self.disable_security_check(),
            StepKind::SetHeader => {
                self.set_header(input.capture(kind, 0)?, input.capture(kind, 1)?);
                Ok(())
            }
            StepKind::SetHeaders => self.set_headers_from_table(input.table(kind)?),
            StepKind::SetCookie => {
                self.set_cookie(input.capture(kind, 0)?, input.capture(kind, 1)?);
                Ok(())
            }
            StepKind::AttachFile => {
                self.attach_file(input.capture(kind, 0)?, input.capture(kind, 1)?)
                    .await
            }
            StepKind::SetBody => {
                self.set_body_from_document(input.doc_string(kind)?);
                Ok(())
            }
            StepKind::SetBodyValues => self.set_body_from_table(input.table(kind)?),
            StepKind::SendWithBody => {
                let method = input.method(kind, 0)?;
                self.send_with_body(method, input.capture(kind, 1)?, input.doc_string(kind)?)
                    .await
            }
            StepKind::SendWithValues => {
                let method = input.method(kind, 0)?;
                self.send_with_values(method, input.capture(kind, 1)?, input.table(kind)?)
                    .await
            }
            StepKind::Send => {
                let method = input.method(kind, 0)?;
                self.send(method, input.capture(kind, 1)?).await
            }
            StepKind::ResponseCode => self.assert_status(input.status(kind, 0)?),
            StepKind::ResponseJson => self.assert_json_body(input.doc_string(kind)?),
            StepKind::ResponseText => self.assert_text_contains(input.doc_string(kind)?),
            StepKind::ResponseHeader => {
                self.assert_header_equals(input.capture(kind, 0)?, input.capture(kind, 1)?)
            }
            StepKind::ResponseBodyPath => {
                self.assert_json_path_equals(input.capture(kind, 0)?, input.capture(kind, 1)?)
            }
            StepKind::PrintResponse => {
                self.print_response();
                Ok(())
            }
        }
    }
}
