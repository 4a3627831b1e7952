//! Upload validator
//!
//! Two independent allow-list checks on the part headers, combined with AND:
//! the declared MIME type and the filename extension. Neither is trusted on
//! its own. The byte ceiling is carried here but enforced by the store while
//! streaming.

use super::error::UploadError;
use super::naming::original_extension;
use crate::config::UploadConfig;

#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub field_name: String,
    pub max_file_size: u64,
    allowed_mime_types: Vec<String>,
    allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            field_name: config.field_name.clone(),
            max_file_size: config.max_file_size,
            allowed_mime_types: config
                .allowed_mime_types
                .iter()
                .map(|m| m.trim().to_ascii_lowercase())
                .collect(),
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|e| normalize_extension(e))
                .collect(),
        }
    }

    /// Accept or reject a candidate file before any of its bytes are stored
    pub fn check(&self, mime_type: Option<&str>, filename: Option<&str>) -> Result<(), UploadError> {
        if self.mime_allowed(mime_type) && self.extension_allowed(filename) {
            Ok(())
        } else {
            Err(UploadError::InvalidFileType)
        }
    }

    fn mime_allowed(&self, mime_type: Option<&str>) -> bool {
        let Some(mime_type) = mime_type else {
            return false;
        };
        // Parameters such as `; charset=...` are not part of the type
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.allowed_mime_types.iter().any(|m| *m == essence)
    }

    fn extension_allowed(&self, filename: Option<&str>) -> bool {
        filename
            .and_then(original_extension)
            .map(|ext| ext.to_ascii_lowercase())
            .is_some_and(|ext| self.allowed_extensions.contains(&ext))
    }
}

/// `JPG`, `.jpg` and ` .JPG ` all become `.jpg`
fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_ascii_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}
