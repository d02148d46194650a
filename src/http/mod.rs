//! HTTP protocol layer module
//!
//! Range parsing, validators, MIME detection and response builders, decoupled from
//! how resources are resolved.

pub mod cache;
pub mod mime;
mod mime_table;
pub mod range;
pub mod request;
pub mod response;

// Re-export commonly used types
pub use range::{parse_range_header, RangeSpec};
pub use response::{
    build_304_response, build_404_response, build_405_response, build_416_response,
    build_500_response, build_full_response, build_partial_response, build_redirect_response,
};
