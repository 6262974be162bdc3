//! File handlers for Web API.

use axum::{
    body::Body,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use crate::service::UploadSession;
use crate::web::dto::{
    FileEntryResponse, MessageResponse, UploadForm, UploadResponse, FILE_DELETED, UPLOAD_FIELD,
};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;
use crate::FiledropError;

const FILE_NOT_FOUND: &str = "File not found";

/// Map a failed lookup (fetch/delete) to an API error.
///
/// Validation failures become 400, missing files 404, and anything else a 500
/// carrying `internal_message`.
fn lookup_error(name: &str, err: FiledropError, internal_message: &str) -> ApiError {
    match err {
        FiledropError::Validation(msg) => {
            tracing::warn!(name = %name, "Rejected filename");
            ApiError::bad_request(msg)
        }
        FiledropError::NotFound(_) => ApiError::not_found(FILE_NOT_FOUND),
        e => {
            tracing::error!(name = %name, error = %e, "{}", internal_message);
            ApiError::internal(internal_message)
        }
    }
}

/// Map a multipart decoding failure to an API error.
fn multipart_error(e: MultipartError) -> ApiError {
    tracing::warn!("Failed to read multipart body: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("File too large")
    } else {
        ApiError::bad_request("Invalid multipart data")
    }
}

/// Map an upload failure from the file store to an API error.
fn upload_error(err: FiledropError) -> ApiError {
    match err {
        FiledropError::Validation(msg) => {
            tracing::warn!("Rejected upload: {}", msg);
            ApiError::bad_request(msg)
        }
        e => {
            tracing::error!("Failed to upload files: {}", e);
            ApiError::internal("Failed to upload files")
        }
    }
}

/// Stream every file part of a multipart body into `session`.
///
/// Fields without a filename are plain form fields and are skipped. A file
/// under any field other than `files` is rejected. Each part is written
/// chunk by chunk as it arrives.
async fn receive_parts(
    multipart: &mut Multipart,
    session: &mut UploadSession<'_>,
) -> Result<(), ApiError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        if field.name() != Some(UPLOAD_FIELD) {
            tracing::warn!(field = ?field.name(), "Rejected file under unexpected field");
            return Err(ApiError::bad_request("Unexpected field"));
        }

        let mut writer = session.create(&filename).await.map_err(upload_error)?;
        let mut size = 0u64;

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            size += chunk.len() as u64;
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| upload_error(e.into()))?;
        }
        writer.shutdown().await.map_err(|e| upload_error(e.into()))?;

        tracing::debug!(name = %filename, size, "Stored file");
    }

    Ok(())
}

/// POST /upload - Upload up to 10 files.
///
/// Request body: multipart/form-data with one or more `files` parts. Each part
/// is stored under its declared filename, overwriting any existing file. If
/// the request is rejected part way, files it already wrote are removed.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "files",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Files uploaded", body = UploadResponse),
        (status = 400, description = "No files, too many files or invalid filename", body = ErrorBody),
        (status = 413, description = "Request body over the configured limit", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut session = state.store.begin_upload();

    match multipart {
        Ok(mut multipart) => {
            if let Err(e) = receive_parts(&mut multipart, &mut session).await {
                session.abort().await;
                return Err(e);
            }
        }
        // A body that is not multipart at all carries no files.
        Err(rejection) => tracing::debug!("Upload without multipart body: {}", rejection),
    }

    let uploaded = session.finish().map_err(upload_error)?;

    tracing::info!(count = uploaded.len(), "Files uploaded");

    Ok(Json(UploadResponse::new(uploaded)))
}

/// GET /files - List stored files.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    responses(
        (status = 200, description = "Stored files", body = Vec<FileEntryResponse>),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FileEntryResponse>>, ApiError> {
    let entries = state.store.list().await.map_err(|e| {
        tracing::error!("Failed to list files: {}", e);
        ApiError::internal("Failed to list files")
    })?;

    Ok(Json(
        entries.into_iter().map(FileEntryResponse::from).collect(),
    ))
}

/// GET /files/:filename - Download a stored file.
///
/// The body is streamed from storage. The content type is inferred from the
/// filename.
#[utoipa::path(
    get,
    path = "/files/{filename}",
    tag = "files",
    params(
        ("filename" = String, Path, description = "Stored filename")
    ),
    responses(
        (status = 200, description = "Raw file content"),
        (status = 400, description = "Invalid filename", body = ErrorBody),
        (status = 404, description = "File not found", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let reader = state
        .store
        .open(&filename)
        .await
        .map_err(|e| lookup_error(&filename, e, "Failed to read file"))?;

    let content_type = mime_guess::from_path(&filename)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from_stream(ReaderStream::new(reader)))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to read file")
        })
}

/// DELETE /files/:filename - Delete a stored file.
#[utoipa::path(
    delete,
    path = "/files/{filename}",
    tag = "files",
    params(
        ("filename" = String, Path, description = "Stored filename")
    ),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 400, description = "Invalid filename", body = ErrorBody),
        (status = 404, description = "File not found", body = ErrorBody),
        (status = 500, description = "Failed to delete file", body = ErrorBody)
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .delete(&filename)
        .await
        .map_err(|e| lookup_error(&filename, e, "Failed to delete file"))?;

    tracing::info!(name = %filename, "File deleted");

    Ok(Json(MessageResponse::new(FILE_DELETED)))
}
