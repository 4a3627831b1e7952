//! Upload failure kinds
//!
//! Every way a photo upload can fail is one variant here. The handler's error
//! mapper turns them into status codes and JSON bodies.

use std::io;
use thiserror::Error;

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum UploadError {
    /// Declared MIME type or filename extension outside the allow-list
    #[error("Invalid file type. Only JPEG/JPG allowed!")]
    InvalidFileType,

    /// The photo itself crossed the per-file ceiling
    #[error("File too large! Max {}MB allowed!", .limit / MIB)]
    FileTooLarge { limit: u64 },

    /// The whole request body crossed the request ceiling
    ///
    /// Clients are told the per-file ceiling, see `client_message`.
    #[error("Request body over the {limit} byte ceiling")]
    PayloadTooLarge { limit: u64 },

    /// A file part under an unexpected field name, or a second photo
    #[error("Unexpected field")]
    UnexpectedField(String),

    /// The multipart body could not be parsed
    #[error("{0}")]
    Multipart(String),

    #[error("No file uploaded!")]
    MissingFile,

    /// Disk failure while persisting; detail stays in the error log
    #[error("storage failure: {0}")]
    Storage(#[from] io::Error),
}

impl From<multer::Error> for UploadError {
    fn from(err: multer::Error) -> Self {
        match err {
            multer::Error::StreamSizeExceeded { limit } => Self::PayloadTooLarge { limit },
            multer::Error::FieldSizeExceeded { limit, .. } => Self::FileTooLarge { limit },
            other => Self::Multipart(other.to_string()),
        }
    }
}

impl UploadError {
    /// Short machine-readable tag used in log lines
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidFileType => "invalid_type",
            Self::FileTooLarge { .. } | Self::PayloadTooLarge { .. } => "too_large",
            Self::UnexpectedField(_) => "unexpected_field",
            Self::Multipart(_) => "malformed",
            Self::MissingFile => "missing_file",
            Self::Storage(_) => "storage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_message_uses_limit() {
        let err = UploadError::FileTooLarge { limit: 5 * MIB };
        assert_eq!(err.to_string(), "File too large! Max 5MB allowed!");

        let err = UploadError::FileTooLarge { limit: 1536 * 1024 };
        assert_eq!(err.to_string(), "File too large! Max 1MB allowed!");
    }

    #[test]
    fn test_multer_size_errors_are_tagged() {
        let err = UploadError::from(multer::Error::StreamSizeExceeded { limit: 42 });
        assert!(matches!(err, UploadError::PayloadTooLarge { limit: 42 }));

        let err = UploadError::from(multer::Error::FieldSizeExceeded {
            limit: 7,
            field_name: Some("photo".to_string()),
        });
        assert!(matches!(err, UploadError::FileTooLarge { limit: 7 }));
    }

    #[test]
    fn test_other_multer_errors_keep_text() {
        let source = multer::Error::IncompleteStream;
        let text = source.to_string();
        match UploadError::from(source) {
            UploadError::Multipart(msg) => assert_eq!(msg, text),
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
