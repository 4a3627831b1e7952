//! Photo upload domain
//!
//! Validation, naming and storage of a single uploaded JPEG, independent of
//! HTTP. The request-facing side lives in `handler::upload`.

mod error;
pub mod naming;
pub mod store;
mod validator;

pub use error::UploadError;
pub use store::{prepare_upload_dir, StoredUpload};
pub use validator::UploadPolicy;
