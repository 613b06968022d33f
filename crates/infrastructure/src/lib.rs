//! Stepcheck Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus [`default_lifecycle`] wiring
//! them together for a suite runner.

pub mod adapters;
pub mod logging;
pub mod persistence;

use std::path::PathBuf;

pub use adapters::{DEFAULT_USER_AGENT, ReqwestClientFactory, ReqwestHttpClient};
pub use logging::init_tracing;
pub use persistence::{JsonConfigSource, TokioFileSystem};

use stepcheck_application::ScenarioLifecycle;

/// Lifecycle using the real transport, file system and a JSON config file.
pub type DefaultLifecycle = ScenarioLifecycle<JsonConfigSource, ReqwestClientFactory, TokioFileSystem>;

/// Builds a lifecycle reading its configuration from `config_path`.
pub fn default_lifecycle(config_path: impl Into<PathBuf>) -> DefaultLifecycle {
    ScenarioLifecycle::new(
        JsonConfigSource::new(config_path),
        ReqwestClientFactory::new(),
        TokioFileSystem::new(),
    )
}
