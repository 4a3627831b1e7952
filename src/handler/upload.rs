//! Upload handler
//!
//! Receives the single photo field of a multipart POST, validates its headers,
//! streams it to the upload directory and answers with JSON.

use std::error::Error as StdError;

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use multer::{Constraints, Multipart, SizeLimit};
use serde::Serialize;

use crate::config::AppState;
use crate::handler::error_map;
use crate::http;
use crate::logger;
use crate::upload::{store, StoredUpload, UploadError};

pub const SUCCESS_MESSAGE: &str = "Upload successful!";

#[derive(Debug, Serialize)]
struct UploadSuccess<'a> {
    message: &'a str,
    filename: &'a str,
}

/// Handle `POST <upload route>`
pub async fn handle_upload<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    match receive_photo(req, state).await {
        Ok(upload) => {
            logger::log_upload_stored(&upload);
            http::json_response(
                StatusCode::OK,
                &UploadSuccess {
                    message: SUCCESS_MESSAGE,
                    filename: &upload.filename,
                },
            )
        }
        Err(err) => {
            logger::log_upload_rejected(&err);
            error_map::error_response(&err, state.upload_policy.max_file_size)
        }
    }
}

async fn receive_photo<B>(req: Request<B>, state: &AppState) -> Result<StoredUpload, UploadError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let max_body_size = state.config.http.max_body_size;
    check_content_length(&req, max_body_size)?;

    // Requests that are not multipart carry no file at all
    let Some(content_type) = req
        .headers()
        .get(hyper::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return Err(UploadError::MissingFile);
    };
    let boundary = match multer::parse_boundary(content_type) {
        Ok(b) => b,
        Err(multer::Error::NoMultipart) => return Err(UploadError::MissingFile),
        Err(e) => return Err(e.into()),
    };

    let constraints =
        Constraints::new().size_limit(SizeLimit::new().whole_stream(max_body_size));
    let mut multipart = Multipart::with_constraints(
        req.into_body().into_data_stream(),
        boundary,
        constraints,
    );

    let mut stored = None;
    let outcome = read_parts(&mut multipart, state, &mut stored).await;
    match (outcome, stored) {
        (Ok(()), Some(upload)) => Ok(upload),
        (Ok(()), None) => Err(UploadError::MissingFile),
        (Err(err), Some(upload)) => {
            // A later part failed; the photo already on disk must not survive
            store::discard(&upload.path).await;
            Err(err)
        }
        (Err(err), None) => Err(err),
    }
}

/// Walk every part: keep the first photo, drain text parts, reject other files
async fn read_parts(
    multipart: &mut Multipart<'static>,
    state: &AppState,
    stored: &mut Option<StoredUpload>,
) -> Result<(), UploadError> {
    let policy = &state.upload_policy;

    while let Some(mut field) = multipart.next_field().await? {
        // Browsers send an empty filename when no file was chosen
        if field.file_name().map_or(true, str::is_empty) {
            while field.chunk().await?.is_some() {}
            continue;
        }

        let name = field.name().unwrap_or_default().to_string();
        if name != policy.field_name || stored.is_some() {
            return Err(UploadError::UnexpectedField(name));
        }

        policy.check(
            field.content_type().map(|m| m.essence_str()),
            field.file_name(),
        )?;

        *stored = Some(store::write_field(field, &state.upload_dir, policy.max_file_size).await?);
    }

    Ok(())
}

/// Reject a declared body larger than the request ceiling before reading it
fn check_content_length<B>(req: &Request<B>, max_body_size: u64) -> Result<(), UploadError> {
    let declared = req
        .headers()
        .get(hyper::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    match declared {
        Some(size) if size > max_body_size => Err(UploadError::PayloadTooLarge {
            limit: max_body_size,
        }),
        _ => Ok(()),
    }
}
