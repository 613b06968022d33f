//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the scenario engine and external systems.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod config_source;
mod file_system;
mod http_client;

pub use config_source::{ConfigError, ConfigSource};
pub use file_system::{FileSystem, FileSystemError};
pub use http_client::{ClientFactory, HttpClient, HttpClientError};
