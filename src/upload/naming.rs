//! Storage filename generation
//!
//! Stored names look like `1718000000000-482913377.jpg`: unix millis, a random
//! integer, then the client's extension. The client's base name is dropped.

use rand::Rng;
use std::path::Path;

const RANDOM_SUFFIX_MAX: u32 = 1_000_000_000;

/// Server-assigned name for a file the client called `original`
pub fn storage_name(original: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = rand::thread_rng().gen_range(0..=RANDOM_SUFFIX_MAX);
    let ext = original_extension(original).unwrap_or_default();
    format!("{millis}-{suffix}{ext}")
}

/// Extension of a client filename with its leading dot, case preserved
///
/// Dotfiles such as `.jpg` have no extension.
pub fn original_extension(original: &str) -> Option<String> {
    // Browsers on Windows may send the full client path
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    Path::new(base)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{e}"))
}
