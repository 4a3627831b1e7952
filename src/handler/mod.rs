//! Request handler module
//!
//! Responsible for request routing dispatch and business logic processing:
//! static file serving, the photo upload route and its error mapping.

pub mod error_map;
pub mod router;
pub mod static_files;
pub mod upload;

// Re-export main entry point
pub use router::handle_request;
