//! Static file serving module
//!
//! Serves the public directory (upload form and its assets). `/` falls back to
//! a built-in upload form when the directory has no index file.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve a GET/HEAD request from the public directory
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let index_files = &state.config.static_files.index_files;
    match load_from_directory(&state.static_root, ctx.path, index_files).await {
        Some((content, content_type)) => {
            build_static_file_response(content, content_type, ctx.if_none_match.as_deref(), ctx.is_head)
        }
        None if ctx.path == "/" => http::response::build_html_response(
            upload_form_page(&state.config.upload.route, &state.config.upload.field_name),
            ctx.is_head,
        ),
        None => http::build_404_response(),
    }
}

/// Resolve `path` under `static_dir`, trying index files for directories
///
/// Anything that resolves outside the directory is treated as missing.
pub async fn load_from_directory(
    static_dir: &Path,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // Request paths arrive percent-encoded; undecodable ones cannot name a file
    let decoded = urlencoding::decode(path).ok()?;
    let relative_path = decoded.trim_start_matches('/');

    let static_dir_canonical = match static_dir.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_debug(&format!(
                "Public directory not accessible '{}': {e}",
                static_dir.display()
            ));
            return None;
        }
    };

    let mut file_path: PathBuf = static_dir_canonical.join(relative_path);

    if relative_path.is_empty() || relative_path.ends_with('/') || file_path.is_dir() {
        file_path = index_files
            .iter()
            .map(|index| file_path.join(index))
            .find(|candidate| candidate.is_file())?;
    }

    // Not found is the common case and not worth a log line
    let file_path_canonical = file_path.canonicalize().ok()?;
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }
    if !file_path_canonical.is_file() {
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path_canonical.display()
            ));
            return None;
        }
    };

    let content_type =
        mime::get_content_type(file_path_canonical.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

fn build_static_file_response(
    data: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(Bytes::from(data), content_type, &etag, is_head)
}

/// Built-in upload form, posting `field_name` to `route`
pub fn upload_form_page(route: &str, field_name: &str) -> String {
    UPLOAD_FORM_TEMPLATE
        .replace("{{route}}", route)
        .replace("{{field}}", field_name)
}

const UPLOAD_FORM_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Upload a photo</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
            max-width: 480px;
            margin: 60px auto;
            padding: 0 20px;
            color: #222;
        }
        form {
            display: flex;
            flex-direction: column;
            gap: 16px;
        }
        button {
            padding: 10px;
            font-size: 1em;
        }
        pre {
            background: #f4f4f4;
            padding: 12px;
            white-space: pre-wrap;
        }
    </style>
</head>
<body>
    <h1>Upload a photo</h1>
    <p>JPEG only (.jpg, .jpeg), up to 5MB.</p>
    <form id="upload" action="{{route}}" method="post" enctype="multipart/form-data">
        <input type="file" name="{{field}}" accept=".jpg,.jpeg,image/jpeg" required>
        <button type="submit">Upload</button>
    </form>
    <pre id="result"></pre>
    <script>
        document.getElementById("upload").addEventListener("submit", async (event) => {
            event.preventDefault();
            const form = event.target;
            const result = document.getElementById("result");
            try {
                const response = await fetch(form.action, { method: "POST", body: new FormData(form) });
                const data = await response.json();
                result.textContent = response.status + " " + JSON.stringify(data, null, 2);
            } catch (err) {
                result.textContent = "Upload failed: " + err;
            }
        });
    </script>
</body>
</html>
"#;
