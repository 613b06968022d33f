//! `multipart/form-data` encoding for file attachments.

use uuid::Uuid;

const CRLF: &str = "\r\n";

/// An encoded `multipart/form-data` payload together with its boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    boundary: String,
    bytes: Vec<u8>,
}

impl MultipartBody {
    /// Encodes a single file part under a freshly generated boundary.
    #[must_use]
    pub fn single_file(field_name: &str, file_name: &str, content: &[u8]) -> Self {
        Self::single_file_with_boundary(
            Uuid::now_v7().simple().to_string(),
            field_name,
            file_name,
            content,
        )
    }

    /// Encodes a single file part under the given boundary.
    #[must_use]
    pub fn single_file_with_boundary(
        boundary: impl Into<String>,
        field_name: &str,
        file_name: &str,
        content: &[u8],
    ) -> Self {
        let boundary = boundary.into();
        let mut bytes = Vec::with_capacity(content.len() + 256);

        let head = format!(
            "--{boundary}{CRLF}\
             Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"{CRLF}\
             Content-Type: application/octet-stream{CRLF}{CRLF}",
            escape_param(field_name),
            escape_param(file_name),
        );
        bytes.extend_from_slice(head.as_bytes());
        bytes.extend_from_slice(content);
        bytes.extend_from_slice(format!("{CRLF}--{boundary}--{CRLF}").as_bytes());

        Self { boundary, bytes }
    }

    /// Returns the `Content-Type` header value announcing the boundary.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Consumes the body, returning the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Escapes a `Content-Disposition` parameter value.
///
/// Quotes and backslashes are backslash-escaped; CR and LF are
/// percent-encoded so they cannot break out of the header line.
fn escape_param(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
