//! Request building steps.

use std::collections::BTreeMap;
use std::path::Path;

use stepcheck_domain::state::CONTENT_TYPE;
use stepcheck_domain::{DataTable, MultipartBody};
use tracing::debug;

use super::Scenario;
use crate::error::{StepError, StepResult};
use crate::ports::{FileSystem, FileSystemError, HttpClient};

impl<C: HttpClient, F: FileSystem> Scenario<C, F> {
    /// Adds a request header value; existing values are kept.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.state.add_request_header(name, value);
    }

    /// Adds one header per `(name, value)` row.
    ///
    /// # Errors
    ///
    /// Returns a malformed table error, leaving the headers untouched,
    /// if any row does not have exactly two cells.
    pub fn set_headers_from_table(&mut self, table: &DataTable) -> StepResult<()> {
        for (name, value) in table.pairs()? {
            self.state.add_request_header(name, value);
        }
        Ok(())
    }

    /// Records a cookie sent with every later request.
    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.state
            .request_cookies
            .insert(name.to_string(), value.to_string());
    }

    /// Replaces the request body with a single-file multipart form.
    ///
    /// The part is named `field_name` and carries the file's base name.
    /// `Content-Type` is set to the multipart boundary.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::FileNotFound`] or [`StepError::Io`]; the body
    /// and headers are then left as they were.
    pub async fn attach_file(&mut self, path: impl AsRef<Path>, field_name: &str) -> StepResult<()> {
        let path = path.as_ref();
        let content = self.files.read_file(path).await.map_err(|err| match err {
            FileSystemError::NotFound(missing) => StepError::FileNotFound(missing),
            other => StepError::Io {
                path: path.to_path_buf(),
                source: other,
            },
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let body = MultipartBody::single_file(field_name, &file_name, &content);

        debug!(
            path = %path.display(),
            field = field_name,
            size = content.len(),
            "attached file"
        );
        self.state.add_request_header(CONTENT_TYPE, body.content_type());
        self.state.request_body = body.into_bytes();
        Ok(())
    }

    /// Replaces the request body with `text`, byte for byte.
    pub fn set_body_from_document(&mut self, text: &str) {
        self.state.request_body = text.as_bytes().to_vec();
    }

    /// Replaces the request body with a JSON object built from the rows.
    ///
    /// Keys are serialized in sorted order; a repeated key keeps its last
    /// value.
    ///
    /// # Errors
    ///
    /// Returns a malformed table error, leaving the body untouched, if any
    /// row does not have exactly two cells.
    pub fn set_body_from_table(&mut self, table: &DataTable) -> StepResult<()> {
        self.state.request_body = encode_table(table)?;
        Ok(())
    }
}

/// Serializes `(key, value)` rows as a JSON object with sorted keys.
pub(super) fn encode_table(table: &DataTable) -> StepResult<Vec<u8>> {
    let values: BTreeMap<&str, &str> = table.pairs()?.into_iter().collect();
    Ok(serde_json::to_vec(&values)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::error::StepError;
    use crate::test_support::{MockFileSystem, scenario, scenario_with_file, scenario_with_files};
    use pretty_assertions::assert_eq;
    use stepcheck_domain::{DataTable, DomainError};

    #[test]
    fn test_set_header_accumulates() {
        let mut scenario = scenario("http://api");
        scenario.set_header("Accept", "application/json");
        scenario.set_header("Accept", "text/plain");

        assert_eq!(
            scenario.state().request_headers.get_all("accept"),
            ["application/json", "text/plain"]
        );
    }

    #[test]
    fn test_headers_from_table_adds_every_row() {
        let mut scenario = scenario("http://api");
        let table = DataTable::new([["X-Id", "1"], ["X-Id", "2"], ["Accept", "*/*"]]);

        scenario.set_headers_from_table(&table).unwrap();

        let headers = &scenario.state().request_headers;
        assert_eq!(headers.get_all("X-Id"), ["1", "2"]);
        assert_eq!(headers.get("Accept"), Some("*/*"));
    }

    #[test]
    fn test_malformed_table_applies_nothing() {
        let mut scenario = scenario("http://api");
        let table = DataTable::new([vec!["test"], vec!["X-Later", "applied?"]]);

        let err = scenario.set_headers_from_table(&table).unwrap_err();

        assert!(matches!(
            err,
            StepError::Domain(DomainError::MalformedTable { actual: 1, .. })
        ));
        assert!(scenario.state().request_headers.is_empty());
    }

    #[test]
    fn test_later_malformed_row_applies_nothing() {
        let mut scenario = scenario("http://api");
        let table = DataTable::new([vec!["X-First", "1"], vec!["X-Bad"]]);

        assert!(scenario.set_headers_from_table(&table).is_err());
        assert!(scenario.state().request_headers.is_empty());
    }

    #[test]
    fn test_body_from_document_is_verbatim() {
        let mut scenario = scenario("http://api");
        scenario.set_body_from_document("{ \"raw\" :  true }\n");
        assert_eq!(scenario.state().request_body, b"{ \"raw\" :  true }\n");
    }

    #[test]
    fn test_body_from_table_last_key_wins() {
        let mut scenario = scenario("http://api");
        let table = DataTable::new([["b", "2"], ["a", "1"], ["b", "3"]]);

        scenario.set_body_from_table(&table).unwrap();

        assert_eq!(
            String::from_utf8(scenario.state().request_body.clone()).unwrap(),
            r#"{"a":"1","b":"3"}"#
        );
    }

    #[test]
    fn test_body_from_malformed_table_keeps_body() {
        let mut scenario = scenario("http://api");
        scenario.set_body_from_document("previous");

        let table = DataTable::new([vec!["a", "1", "extra"]]);
        assert!(scenario.set_body_from_table(&table).is_err());
        assert_eq!(scenario.state().request_body, b"previous");
    }

    #[tokio::test]
    async fn test_attach_file_builds_multipart_body() {
        let mut scenario = scenario_with_file("/data/report.csv", b"a,b\n1,2\n");

        scenario.attach_file("/data/report.csv", "upload").await.unwrap();

        let content_type = scenario
            .state()
            .request_headers
            .get("Content-Type")
            .unwrap()
            .to_string();
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap();
        let body = String::from_utf8(scenario.state().request_body.clone()).unwrap();
        assert!(body.starts_with(&format!("--{boundary}\r\n")));
        assert!(body.contains(r#"name="upload"; filename="report.csv""#));
        assert!(body.contains("a,b\n1,2\n"));
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[tokio::test]
    async fn test_attach_missing_file_keeps_state() {
        let mut scenario = scenario("http://api");
        scenario.set_body_from_document("previous");
        scenario.set_header("Content-Type", "text/plain");

        let err = scenario.attach_file("unknown.go", "file").await.unwrap_err();

        assert!(matches!(err, StepError::FileNotFound(_)));
        assert_eq!(scenario.state().request_body, b"previous");
        assert_eq!(
            scenario.state().request_headers.get("Content-Type"),
            Some("text/plain")
        );
    }

    #[tokio::test]
    async fn test_attach_unreadable_file_is_io_error() {
        let files = MockFileSystem::default().with_denied("/secret.key");
        let mut scenario = scenario_with_files("http://api", files);

        let err = scenario.attach_file("/secret.key", "file").await.unwrap_err();

        assert!(matches!(err, StepError::Io { ref path, .. } if path.ends_with("secret.key")));
        assert!(scenario.state().request_body.is_empty());
    }

    #[tokio::test]
    async fn test_header_override_order() {
        let mut scenario = scenario_with_file("upload.bin", b"\x00\x01");

        scenario.set_header("Content-Type", "text/plain");
        scenario.attach_file("upload.bin", "file").await.unwrap();
        assert!(
            scenario
                .state()
                .request_headers
                .get("Content-Type")
                .unwrap()
                .starts_with("multipart/form-data; boundary=")
        );

        scenario.set_header("Content-Type", "application/octet-stream");
        assert_eq!(
            scenario.state().request_headers.get_all("Content-Type"),
            ["application/octet-stream"]
        );
    }

    #[test]
    fn test_cookie_last_value_wins() {
        let mut scenario = scenario("http://api");
        scenario.set_cookie("session", "a");
        scenario.set_cookie("session", "b");
        assert_eq!(
            scenario.state().request_cookies.get("session").map(String::as_str),
            Some("b")
        );
    }
}
