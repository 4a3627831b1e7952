//! HTTP protocol layer module
//!
//! Response builders, content types and cache validators, decoupled from the
//! upload and static-file logic that uses them.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_options_response,
    json_response,
};
