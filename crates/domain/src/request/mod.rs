//! Outgoing request domain types

mod header;
mod method;
mod multipart;
mod spec;
mod table;

pub use header::Headers;
pub use method::HttpMethod;
pub use multipart::MultipartBody;
pub use spec::RequestSpec;
pub use table::DataTable;
