//! Stepcheck Domain - Core scenario types
//!
//! This crate defines the domain model for the Stepcheck HTTP assertion engine.
//! All types here are pure Rust with no I/O dependencies.

pub mod config;
pub mod error;
pub mod json_path;
pub mod request;
pub mod response;
pub mod state;
pub mod testing;

pub use config::SuiteConfig;
pub use error::{DomainError, DomainResult};
pub use request::{DataTable, Headers, HttpMethod, MultipartBody, RequestSpec};
pub use response::ResponseSpec;
pub use state::ScenarioState;
pub use testing::{AssertionError, AssertionResult, JsonSide};
