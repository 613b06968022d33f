//! Suite configuration stored as JSON.

use std::path::{Path, PathBuf};

use stepcheck_application::ports::{ConfigError, ConfigSource};
use stepcheck_domain::SuiteConfig;
use tokio::fs;
use tracing::debug;

/// Reads [`SuiteConfig`] from a JSON file on every load.
///
/// A missing file yields the default configuration. Unknown keys are
/// ignored and absent keys take their defaults:
///
/// ```json
/// { "base_url": "https://staging.example.com", "timeout_ms": 5000 }
/// ```
#[derive(Debug, Clone)]
pub struct JsonConfigSource {
    path: PathBuf,
}

impl JsonConfigSource {
    /// Creates a source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file this source reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn invalid(&self, message: impl ToString) -> ConfigError {
        ConfigError::Invalid {
            key: self.path.display().to_string(),
            message: message.to_string(),
        }
    }
}

impl ConfigSource for JsonConfigSource {
    async fn load(&self) -> Result<SuiteConfig, ConfigError> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| self.invalid(e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no configuration file, using defaults");
                Ok(SuiteConfig::default())
            }
            Err(e) => Err(self.invalid(e)),
        }
    }
}
