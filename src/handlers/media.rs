//! Video uploads stored as plain files under the configured media directory.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path as FsPath;
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::AppPath;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Multipart body accepted by the upload endpoint
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// The video file; its file name becomes the stored name
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Where an uploaded file was stored
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub filename: String,
    /// Path under which the file is served back
    pub path: String,
    pub size: usize,
}

/// Accepts only a bare file name so it cannot escape the media directory.
pub(crate) fn checked_file_name(name: &str) -> ApiResult<&str> {
    let plain = !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0']);

    if plain {
        Ok(name)
    } else {
        warn!("Rejected media file name {:?}", name);
        Err(ApiError::BadRequest(format!("Invalid file name '{}'", name)))
    }
}

/// Content type served for a stored file, chosen by extension.
pub(crate) fn content_type_for(name: &str) -> &'static str {
    let extension = FsPath::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        Some("ogv") => "video/ogg",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "video/mp4",
    }
}

/// Upload a video file (admin only)
///
/// Expects a multipart field named `file`. An existing file with the same
/// name is overwritten.
#[utoipa::path(
    post,
    path = "/upload-video",
    tag = "media",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video uploaded successfully", body = ApiResponse<UploadResponse>),
        (status = 400, description = "Missing file or invalid file name", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(admin = %admin.0.username))]
pub async fn upload_video(
    State(state): State<AppState>,
    admin: AdminUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UploadResponse>>)> {
    let mut multipart = multipart?;
    let malformed = |e: axum::extract::multipart::MultipartError| {
        warn!("Malformed multipart upload: {}", e);
        ApiError::BadRequest(format!("Malformed upload: {}", e))
    };

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some("file") {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let filename = checked_file_name(field.file_name().unwrap_or_default())?.to_string();
        let bytes = field.bytes().await.map_err(malformed)?;

        let destination = state.config.media_dir.join(&filename);
        tokio::fs::write(&destination, &bytes).await.map_err(|e| {
            error!("Failed to write {}: {}", destination.display(), e);
            ApiError::Internal(format!("Failed to store upload: {}", e))
        })?;

        info!("Stored upload {} ({} bytes)", filename, bytes.len());
        let response = UploadResponse {
            path: format!("/media/{}", filename),
            size: bytes.len(),
            filename,
        };
        return Ok((
            StatusCode::CREATED,
            Json(ApiResponse::new(response, "Video uploaded successfully")),
        ));
    }

    Err(ApiError::BadRequest("Missing multipart field 'file'".to_string()))
}

/// Fetch a stored media file
#[utoipa::path(
    get,
    path = "/media/{filename}",
    tag = "media",
    params(("filename" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "Raw file contents", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid file name", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_media(
    AppPath(filename): AppPath<String>,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let filename = checked_file_name(&filename)?;
    let location = state.config.media_dir.join(filename);

    let bytes = match tokio::fs::read(&location).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Media file {} not found", filename);
            return Err(ApiError::NotFound("File not found".to_string()));
        }
        Err(e) => {
            error!("Failed to read {}: {}", location.display(), e);
            return Err(ApiError::Internal(format!("Failed to read media file: {}", e)));
        }
    };

    debug!("Serving {} ({} bytes)", filename, bytes.len());
    Ok(([(header::CONTENT_TYPE, content_type_for(filename))], bytes))
}
