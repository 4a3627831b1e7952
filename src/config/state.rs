// Application state module
// Read-only state shared by every request

use std::path::PathBuf;

use super::types::Config;
use crate::upload::UploadPolicy;

/// Application state
///
/// Built once at startup; requests only read from it, so no locking is needed.
pub struct AppState {
    pub config: Config,
    pub upload_policy: UploadPolicy,
    pub upload_dir: PathBuf,
    pub static_root: PathBuf,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let upload_policy = UploadPolicy::from_config(&config.upload);
        let upload_dir = PathBuf::from(&config.upload.dir);
        let static_root = PathBuf::from(&config.static_files.root);

        Self {
            config,
            upload_policy,
            upload_dir,
            static_root,
        }
    }
}
