//! File-backed adapters.

mod config_file;
mod file_system;

pub use config_file::JsonConfigSource;
pub use file_system::TokioFileSystem;
