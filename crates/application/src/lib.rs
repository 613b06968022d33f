//! Stepcheck Application - Scenario engine and ports
//!
//! This crate defines the application layer with:
//! - Port traits (transport, file access, configuration)
//! - The per-scenario engine driving request building, sending and assertions
//! - The lifecycle controller resetting state between scenarios
//! - The step pattern registry handed to a BDD framework

pub mod error;
pub mod lifecycle;
pub mod ports;
pub mod scenario;
pub mod steps;

#[cfg(test)]
mod test_support;

pub use error::{StepError, StepResult};
pub use lifecycle::ScenarioLifecycle;
pub use ports::{
    ClientFactory, ConfigError, ConfigSource, FileSystem, FileSystemError, HttpClient,
    HttpClientError,
};
pub use scenario::Scenario;
pub use steps::{STEP_PATTERNS, StepInput, StepKind};
