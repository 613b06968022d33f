//! Suite configuration.
//!
//! Values read once per scenario by a configuration source and frozen
//! for the scenario's duration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base URL used when no explicit value is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8888";

/// Configuration consumed by the scenario engine and transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Prefix prepended to every request path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional whole-request timeout applied by the transport.
    #[serde(
        default,
        rename = "timeout_ms",
        with = "optional_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
    /// Optional `User-Agent` the transport sends when a step sets none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl SuiteConfig {
    /// Creates a configuration pointing at `base_url` with no timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Sets the transport timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the default user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Returns true when the base URL is missing or blank.
    #[must_use]
    pub fn base_url_is_blank(&self) -> bool {
        self.base_url.trim().is_empty()
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

mod optional_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation, clippy::ref_option)]
    pub fn serialize<S>(timeout: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match timeout {
            Some(timeout) => serializer.serialize_some(&(timeout.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
