//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method check, dispatch to the
//! upload handler or the static file server, then the access log line.

use crate::config::AppState;
use crate::handler::{static_files, upload};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// What the static file server needs from a GET/HEAD request
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let started = Instant::now();
    let access_log = state.config.logging.access_log;
    let mut entry = access_log.then(|| access_entry(&req, peer_addr));

    let mut response = route_request(req, &state).await;

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(hyper::header::SERVER, server_name);
    }

    if let Some(entry) = entry.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let method = req.method().clone();
    let is_head = method == Method::HEAD;
    let on_upload_route = req.uri().path() == state.config.upload.route;

    match method {
        Method::POST if on_upload_route => upload::handle_upload(req, state).await,
        Method::POST => http::build_404_response(),
        Method::GET | Method::HEAD => {
            let ctx = RequestContext {
                path: req.uri().path(),
                is_head,
                if_none_match: header_string(&req, hyper::header::IF_NONE_MATCH),
            };
            static_files::serve(&ctx, state).await
        }
        Method::OPTIONS => http::build_options_response(state.config.http.enable_cors),
        other => {
            logger::log_warning(&format!("Method not allowed: {other}"));
            http::build_405_response()
        }
    }
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header_string(req, hyper::header::REFERER);
    entry.user_agent = header_string(req, hyper::header::USER_AGENT);
    entry
}

fn header_string<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use std::path::Path;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn test_state(public: &Path, uploads: &Path) -> Arc<AppState> {
        let mut config = Config::default();
        config.static_files.root = public.to_string_lossy().into_owned();
        config.upload.dir = uploads.to_string_lossy().into_owned();
        config.logging.access_log = false;
        Arc::new(AppState::new(config))
    }

    fn request(method: Method, uri: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_root_serves_public_index() {
        let public = tempfile::tempdir().unwrap();
        let uploads = tempfile::tempdir().unwrap();
        std::fs::write(public.path().join("index.html"), "<h1>custom form</h1>").unwrap();
        let state = test_state(public.path(), uploads.path());

        let resp = handle_request(request(Method::GET, "/"), state, peer()).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
        assert_eq!(body_string(resp).await, "<h1>custom form</h1>");
    }

    #[tokio::test]
    async fn test_root_falls_back_to_builtin_form() {
        let public = tempfile::tempdir().unwrap();
        let uploads = tempfile::tempdir().unwrap();
        let state = test_state(&public.path().join("absent"), uploads.path());

        let resp = handle_request(request(Method::GET, "/"), state, peer()).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_string(resp).await;
        assert!(body.contains(r#"action="/upload""#));
        assert!(body.contains(r#"name="photo""#));
    }

    #[tokio::test]
    async fn test_static_asset_and_conditional_get() {
        let public = tempfile::tempdir().unwrap();
        let uploads = tempfile::tempdir().unwrap();
        std::fs::write(public.path().join("app.js"), "console.log(1)").unwrap();
        let state = test_state(public.path(), uploads.path());

        let resp = handle_request(request(Method::GET, "/app.js"), Arc::clone(&state), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "application/javascript");
        let etag = resp.headers()["ETag"].to_str().unwrap().to_string();

        let mut conditional = request(Method::GET, "/app.js");
        conditional
            .headers_mut()
            .insert(hyper::header::IF_NONE_MATCH, HeaderValue::from_str(&etag).unwrap());
        let resp = handle_request(conditional, state, peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let public = tempfile::tempdir().unwrap();
        let uploads = tempfile::tempdir().unwrap();
        std::fs::write(public.path().join("index.html"), "<form></form>").unwrap();
        let state = test_state(public.path(), uploads.path());

        let resp = handle_request(request(Method::HEAD, "/index.html"), state, peer())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Length"], "13");
        assert!(body_string(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_static_path_is_404() {
        let public = tempfile::tempdir().unwrap();
        let uploads = tempfile::tempdir().unwrap();
        let state = test_state(public.path(), uploads.path());

        let resp = handle_request(request(Method::GET, "/missing.png"), Arc::clone(&state), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        // The upload route only answers POST
        let resp = handle_request(request(Method::GET, "/upload"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_dispatch() {
        let public = tempfile::tempdir().unwrap();
        let uploads = tempfile::tempdir().unwrap();
        let state = test_state(public.path(), uploads.path());

        let resp = handle_request(request(Method::POST, "/upload"), Arc::clone(&state), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(resp).await, r#"{"message":"No file uploaded!"}"#);

        let resp = handle_request(request(Method::POST, "/elsewhere"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_other_methods() {
        let public = tempfile::tempdir().unwrap();
        let uploads = tempfile::tempdir().unwrap();
        let state = test_state(public.path(), uploads.path());

        let resp = handle_request(request(Method::OPTIONS, "/upload"), Arc::clone(&state), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = handle_request(request(Method::DELETE, "/upload"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["Allow"], "GET, HEAD, POST, OPTIONS");
    }

    #[tokio::test]
    async fn test_server_header() {
        let public = tempfile::tempdir().unwrap();
        let uploads = tempfile::tempdir().unwrap();
        let state = test_state(public.path(), uploads.path());

        let resp = handle_request(request(Method::GET, "/"), state, peer()).await.unwrap();
        assert_eq!(resp.headers()["Server"], "jpeg-upload/0.1");
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/upload?src=form")
            .version(Version::HTTP_10)
            .header("User-Agent", "curl/8.0")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let entry = access_entry(&req, peer());
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.path, "/upload");
        assert_eq!(entry.query.as_deref(), Some("src=form"));
        assert_eq!(entry.http_version, "1.0");
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert!(entry.referer.is_none());
    }
}
