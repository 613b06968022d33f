//! Step error types

use std::path::PathBuf;

use stepcheck_domain::{AssertionError, DomainError};
use thiserror::Error;

use crate::ports::{ConfigError, FileSystemError, HttpClientError};

/// Why a step failed.
///
/// Every variant is recoverable: the caller marks the step as failed and
/// moves on. Assertion failures and infrastructure failures are told
/// apart only by their message.
#[derive(Debug, Error)]
pub enum StepError {
    /// Invalid step input such as a malformed table or unknown method.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The captured response did not meet an expectation.
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// The file to attach does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file to attach exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File being attached.
        path: PathBuf,
        /// Underlying failure.
        source: FileSystemError,
    },

    /// No usable base URL; checked before any network I/O.
    #[error("base URL not set for endpoint : {endpoint}")]
    Configuration {
        /// Path the step tried to reach.
        endpoint: String,
    },

    /// The configuration source failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The transport could not be built or reconfigured.
    #[error("transport setup failed: {0}")]
    TransportSetup(#[source] HttpClientError),

    /// The request failed at the transport level.
    #[error("request to {url} failed: {source}")]
    Network {
        /// Full request URL.
        url: String,
        /// Underlying failure.
        source: HttpClientError,
    },

    /// The transport returned neither a response nor an error.
    #[error("unable to get response from endpoint: {0}")]
    EmptyResponse(String),

    /// The response body could not be read to the end.
    #[error("error reading response body: {0}")]
    ResponseRead(String),

    /// A request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The step framework supplied arguments the step cannot use.
    #[error("invalid arguments for step `{step}`: {message}")]
    InvalidStepArguments {
        /// Pattern of the step.
        step: &'static str,
        /// What was wrong.
        message: String,
    },
}

/// Result type alias for step operations.
pub type StepResult<T> = Result<T, StepError>;
