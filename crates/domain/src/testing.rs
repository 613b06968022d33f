//! Response assertions.
//!
//! Each check reads a captured [`ResponseSpec`] and either succeeds or
//! returns an [`AssertionError`] whose message is meant for the person
//! reading the scenario report. None of them mutate anything.

use serde_json::Value;
use thiserror::Error;

use crate::json_path;
use crate::response::ResponseSpec;

/// Which side of a JSON comparison failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonSide {
    /// The document written in the scenario.
    Expected,
    /// The captured response body.
    Actual,
}

impl std::fmt::Display for JsonSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expected => f.write_str("expected"),
            Self::Actual => f.write_str("actual"),
        }
    }
}

/// A response did not meet an expectation, or could not be checked.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssertionError {
    /// Status code differs.
    #[error(
        "expected response code to be: {expected}, but actual is: {actual}{}",
        response_message(.body.as_deref())
    )]
    StatusMismatch {
        /// Expected status.
        expected: u16,
        /// Recorded status.
        actual: u16,
        /// Response body, attached for error statuses only.
        body: Option<String>,
    },

    /// One of the documents is not valid JSON.
    #[error("error unmarshalling {side} data: {message}")]
    JsonParse {
        /// Which document failed.
        side: JsonSide,
        /// Parser message.
        message: String,
    },

    /// Canonical JSON forms differ.
    #[error("expected json {expected}, does not match actual: {actual}")]
    JsonMismatch {
        /// Canonical expected document.
        expected: String,
        /// Canonical response body.
        actual: String,
    },

    /// Body does not contain the text.
    #[error("expected text {expected}, not found in actual response: {actual}")]
    TextNotFound {
        /// Text searched for.
        expected: String,
        /// Response body.
        actual: String,
    },

    /// Header absent or empty.
    #[error("header : {name} not found in the response")]
    HeaderNotFound {
        /// Header name.
        name: String,
    },

    /// Header present with another value.
    #[error(
        "expected header ({name}) value: {expected}, not equal to actual response header value: {actual}"
    )]
    HeaderMismatch {
        /// Header name.
        name: String,
        /// Expected value.
        expected: String,
        /// Recorded value.
        actual: String,
    },

    /// Path does not resolve in the body.
    #[error("response body path : {path} not found in the response")]
    PathNotFound {
        /// JSON path.
        path: String,
    },

    /// Path resolves to another value.
    #[error(
        "expected response value : {expected} not equal to the actual value : {actual} for the response body path : {path}"
    )]
    ValueMismatch {
        /// JSON path.
        path: String,
        /// Expected value.
        expected: String,
        /// Resolved value.
        actual: String,
    },
}

fn response_message(body: Option<&str>) -> String {
    body.map(|body| format!(", response message: {body}"))
        .unwrap_or_default()
}

/// Result of a single check.
pub type AssertionResult = Result<(), AssertionError>;

/// Checks the status code.
///
/// # Errors
///
/// [`AssertionError::StatusMismatch`]; the body is included when the
/// recorded status is 400 or above.
pub fn check_status(response: &ResponseSpec, expected: u16) -> AssertionResult {
    if response.status == expected {
        return Ok(());
    }
    let body = response
        .status_code()
        .is_error()
        .then(|| response.body_text());
    Err(AssertionError::StatusMismatch {
        expected,
        actual: response.status,
        body,
    })
}

/// Checks that the body is structurally equal to `expected` JSON.
///
/// Object key order and whitespace are ignored; array order, leaf values
/// and key sets must match.
///
/// # Errors
///
/// [`AssertionError::JsonParse`] or [`AssertionError::JsonMismatch`].
pub fn check_json_body(response: &ResponseSpec, expected: &str) -> AssertionResult {
    let expected = canonical_json(expected.as_bytes()).map_err(|e| AssertionError::JsonParse {
        side: JsonSide::Expected,
        message: e.to_string(),
    })?;
    let actual = canonical_json(&response.body).map_err(|e| AssertionError::JsonParse {
        side: JsonSide::Actual,
        message: e.to_string(),
    })?;

    if expected == actual {
        Ok(())
    } else {
        Err(AssertionError::JsonMismatch { expected, actual })
    }
}

/// Checks that the body contains `expected` as a substring.
///
/// # Errors
///
/// [`AssertionError::TextNotFound`].
pub fn check_text_contains(response: &ResponseSpec, expected: &str) -> AssertionResult {
    let actual = response.body_text();
    if actual.contains(expected) {
        Ok(())
    } else {
        Err(AssertionError::TextNotFound {
            expected: expected.to_string(),
            actual,
        })
    }
}

/// Checks a response header, comparing values case-insensitively.
///
/// # Errors
///
/// [`AssertionError::HeaderNotFound`] or [`AssertionError::HeaderMismatch`].
pub fn check_header_equals(response: &ResponseSpec, name: &str, expected: &str) -> AssertionResult {
    let actual = match response.get_header(name) {
        Some(value) if !value.is_empty() => value,
        _ => {
            return Err(AssertionError::HeaderNotFound {
                name: name.to_string(),
            });
        }
    };

    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(AssertionError::HeaderMismatch {
            name: name.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Checks the value found at `path` in the JSON body.
///
/// A body that is not JSON resolves nothing.
///
/// # Errors
///
/// [`AssertionError::PathNotFound`] or [`AssertionError::ValueMismatch`].
pub fn check_json_path_equals(response: &ResponseSpec, path: &str, expected: &str) -> AssertionResult {
    let found = serde_json::from_slice::<Value>(&response.body)
        .ok()
        .and_then(|json| json_path::query(&json, path))
        .ok_or_else(|| AssertionError::PathNotFound {
            path: path.to_string(),
        })?;

    let actual = json_path::stringify(&found);
    if actual.to_lowercase() == expected.to_lowercase() {
        Ok(())
    } else {
        Err(AssertionError::ValueMismatch {
            path: path.to_string(),
            expected: expected.to_string(),
            actual,
        })
    }
}

/// Parses and re-serializes a JSON document into its canonical form.
///
/// Keys come out sorted, whitespace is dropped and integral floats are
/// written as integers, so `1.0` and `1` compare equal.
///
/// # Errors
///
/// Returns the parser error when `raw` is not JSON.
pub fn canonical_json(raw: &[u8]) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_slice(raw)?;
    Ok(json_path::normalize_numbers(value).to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::request::Headers;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn response(status: u16, body: &str) -> ResponseSpec {
        ResponseSpec::new(status, Headers::new(), body.as_bytes().to_vec(), Duration::ZERO)
    }

    fn response_with_header(name: &str, value: &str) -> ResponseSpec {
        let headers: Headers = [(name, value)].into_iter().collect();
        ResponseSpec::new(200, headers, Vec::new(), Duration::ZERO)
    }

    #[test]
    fn test_status_matches() {
        assert_eq!(check_status(&response(200, ""), 200), Ok(()));
    }

    #[test]
    fn test_status_mismatch_on_error_embeds_body() {
        let err = check_status(&response(500, ""), 200).unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected response code to be: 200, but actual is: 500, response message: "
        );

        let err = check_status(&response(404, "no such user"), 200).unwrap_err();
        assert!(err.to_string().ends_with("response message: no such user"));
    }

    #[test]
    fn test_status_mismatch_below_400_omits_body() {
        let err = check_status(&response(201, "created"), 200).unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected response code to be: 200, but actual is: 201"
        );
    }

    #[test]
    fn test_json_body_ignores_key_order() {
        let res = response(200, r#"{"a":1,"b":2}"#);
        assert_eq!(check_json_body(&res, r#"{ "b": 2, "a": 1 }"#), Ok(()));
    }

    #[test]
    fn test_json_body_respects_array_order() {
        let res = response(200, "[1,2]");
        assert_eq!(
            check_json_body(&res, "[2,1]"),
            Err(AssertionError::JsonMismatch {
                expected: "[2,1]".to_string(),
                actual: "[1,2]".to_string(),
            })
        );
    }

    #[test]
    fn test_json_body_value_mismatch() {
        let res = response(200, r#"{"firstName":"John","lastName":"Dow"}"#);
        let result = check_json_body(&res, r#"{"firstName":"Ben","lastName":"Dow"}"#);
        assert!(matches!(result, Err(AssertionError::JsonMismatch { .. })));
    }

    #[test]
    fn test_json_body_integral_floats_compare_equal() {
        let res = response(200, r#"{"n":1.0}"#);
        assert_eq!(check_json_body(&res, r#"{"n":1}"#), Ok(()));
    }

    #[test]
    fn test_json_body_invalid_expected() {
        let res = response(200, r#"{"firstName":"John"}"#);
        assert!(matches!(
            check_json_body(&res, ""),
            Err(AssertionError::JsonParse {
                side: JsonSide::Expected,
                ..
            })
        ));
    }

    #[test]
    fn test_json_body_invalid_actual() {
        let res = response(200, "");
        assert!(matches!(
            check_json_body(&res, r#"{"firstName":"John"}"#),
            Err(AssertionError::JsonParse {
                side: JsonSide::Actual,
                ..
            })
        ));
    }

    #[test]
    fn test_text_contains() {
        let res = response(200, r#"{"firstName":"John","lastName":"Dow"}"#);
        assert_eq!(check_text_contains(&res, "John"), Ok(()));
        assert!(matches!(
            check_text_contains(&res, "Ben"),
            Err(AssertionError::TextNotFound { .. })
        ));
    }

    #[test]
    fn test_header_present() {
        let res = response_with_header("expected_header", "value");
        assert_eq!(check_header_equals(&res, "expected_header", "VALUE"), Ok(()));
    }

    #[test]
    fn test_header_not_present() {
        let res = response_with_header("actual_header", "value");
        let err = check_header_equals(&res, "expected_header", "value").unwrap_err();
        assert_eq!(
            err.to_string(),
            "header : expected_header not found in the response"
        );
    }

    #[test]
    fn test_header_empty_counts_as_missing() {
        let res = response_with_header("X-Empty", "");
        assert!(matches!(
            check_header_equals(&res, "X-Empty", ""),
            Err(AssertionError::HeaderNotFound { .. })
        ));
    }

    #[test]
    fn test_header_value_not_equal() {
        let res = response_with_header("expected_header", "actual_value");
        let err = check_header_equals(&res, "expected_header", "expected_value").unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected header (expected_header) value: expected_value, not equal to actual response header value: actual_value"
        );
    }

    #[test]
    fn test_json_path_present() {
        let res = response(200, r#"{"name":{"firstName":"John","lastName":"Dow"}}"#);
        assert_eq!(check_json_path_equals(&res, "name.firstName", "John"), Ok(()));
        assert_eq!(check_json_path_equals(&res, "name.firstName", "john"), Ok(()));
    }

    #[test]
    fn test_json_path_not_present() {
        let res = response(200, r#"{"name":{"firstName":"John","lastName":"Dow"}}"#);
        let err = check_json_path_equals(&res, "name.middleName", "John").unwrap_err();
        assert_eq!(
            err.to_string(),
            "response body path : name.middleName not found in the response"
        );
    }

    #[test]
    fn test_json_path_value_not_equal() {
        let res = response(200, r#"{"name":{"firstName":"John","lastName":"Dow"}}"#);
        let err = check_json_path_equals(&res, "name.firstName", "Ben").unwrap_err();
        assert_eq!(
            err,
            AssertionError::ValueMismatch {
                path: "name.firstName".to_string(),
                expected: "Ben".to_string(),
                actual: "John".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "expected response value : Ben not equal to the actual value : John for the response body path : name.firstName"
        );
    }

    #[test]
    fn test_json_path_on_non_json_body() {
        let res = response(200, "plain text");
        assert!(matches!(
            check_json_path_equals(&res, "a", "b"),
            Err(AssertionError::PathNotFound { .. })
        ));
    }

    #[test]
    fn test_json_path_integral_floats_match_integers() {
        let res = response(200, r#"{"price": 2.0, "n": 1e3}"#);
        assert_eq!(check_json_path_equals(&res, "price", "2"), Ok(()));
        assert_eq!(check_json_path_equals(&res, "n", "1000"), Ok(()));
    }

    #[test]
    fn test_json_path_empty_is_not_found() {
        let res = response(200, r#"{"a": 1}"#);
        for path in ["", "$"] {
            assert_eq!(
                check_json_path_equals(&res, path, "x"),
                Err(AssertionError::PathNotFound {
                    path: path.to_string()
                })
            );
        }
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        assert_eq!(
            canonical_json(br#"{"z": [1, 2.0], "a": {"y": null, "b": "s"}}"#).unwrap(),
            r#"{"a":{"b":"s","y":null},"z":[1,2]}"#
        );
    }
}
