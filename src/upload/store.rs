//! Disk persistence for accepted photos
//!
//! Files are streamed chunk by chunk into the upload directory under a
//! generated name. A write that does not complete is removed again, so a
//! rejected or failed upload never leaves a partial file behind.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::error::UploadError;
use super::naming::storage_name;
use crate::logger;

/// A photo that has been fully written to disk
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Client-supplied name, untrusted, kept for logging only
    pub original_name: String,
    /// Client-declared MIME type, untrusted
    pub mime_type: String,
    pub size: u64,
    /// Server-generated name returned to the client
    pub filename: String,
    pub path: PathBuf,
}

/// Create the upload directory if it does not exist yet
///
/// Called once at startup, before the listener accepts connections.
pub fn prepare_upload_dir(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)
}

/// Stream one multipart field into `dir`, enforcing `limit` bytes
pub async fn write_field(
    mut field: multer::Field<'_>,
    dir: &Path,
    limit: u64,
) -> Result<StoredUpload, UploadError> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    let mime_type = field
        .content_type()
        .map(ToString::to_string)
        .unwrap_or_default();
    let filename = storage_name(&original_name);
    let path = dir.join(&filename);

    // create_new: a name clash fails instead of overwriting another upload
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await?;

    match copy_limited(&mut field, &mut file, limit).await {
        Ok(size) => Ok(StoredUpload {
            original_name,
            mime_type,
            size,
            filename,
            path,
        }),
        Err(err) => {
            drop(file);
            discard(&path).await;
            Err(err)
        }
    }
}

/// Remove a stored or partially written file
pub async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != io::ErrorKind::NotFound {
            logger::log_error(&format!(
                "Failed to remove incomplete upload '{}': {e}",
                path.display()
            ));
        }
    }
}

async fn copy_limited(
    field: &mut multer::Field<'_>,
    file: &mut File,
    limit: u64,
) -> Result<u64, UploadError> {
    let mut written: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        written = written.saturating_add(chunk.len() as u64);
        if written > limit {
            return Err(UploadError::FileTooLarge { limit });
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(written)
}
