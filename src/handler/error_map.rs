//! Error mapper
//!
//! The single place where upload failures become HTTP responses. Bodies are
//! always `{"message": "..."}`; storage details never reach the client.

use crate::http;
use crate::upload::UploadError;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Generic body for failures the client cannot act on
pub const SERVER_ERROR_MESSAGE: &str = "Server error!";

#[derive(Debug, Serialize)]
pub struct MessageBody<'a> {
    pub message: &'a str,
}

impl UploadError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::FileTooLarge { .. } | Self::PayloadTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidFileType
            | Self::UnexpectedField(_)
            | Self::Multipart(_)
            | Self::MissingFile => StatusCode::BAD_REQUEST,
        }
    }

    /// Text safe to show the client
    ///
    /// Every size overrun names `file_limit`, the only ceiling users choose against.
    pub fn client_message(&self, file_limit: u64) -> String {
        match self {
            Self::Storage(_) => SERVER_ERROR_MESSAGE.to_string(),
            Self::PayloadTooLarge { .. } => Self::FileTooLarge { limit: file_limit }.to_string(),
            other => other.to_string(),
        }
    }
}

pub fn error_response(err: &UploadError, file_limit: u64) -> Response<Full<Bytes>> {
    let message = err.client_message(file_limit);
    http::json_response(err.status(), &MessageBody { message: &message })
}
