//! Configuration source port

use std::future::Future;

use stepcheck_domain::SuiteConfig;

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A setting is present but unusable.
    #[error("invalid value for {key}: {message}")]
    Invalid {
        /// Setting name.
        key: String,
        /// Reason.
        message: String,
    },
}

/// Supplies configuration at the start of every scenario.
pub trait ConfigSource: Send + Sync {
    /// Reads the current configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a setting cannot be interpreted.
    fn load(&self) -> impl Future<Output = Result<SuiteConfig, ConfigError>> + Send;
}

/// A fixed configuration, mostly useful in tests and embedded runners.
impl ConfigSource for SuiteConfig {
    async fn load(&self) -> Result<SuiteConfig, ConfigError> {
        Ok(self.clone())
    }
}
