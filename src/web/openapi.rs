//! OpenAPI document for the HTTP surface.

use axum::Json;
use utoipa::OpenApi;

use super::dto::{
    FileEntryResponse, MessageResponse, StatusResponse, UploadForm, UploadResponse,
    UploadedFileResponse,
};
use super::error::ErrorBody;
use super::handlers;

/// OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    info(title = "Filedrop", description = "Multipart file upload and download service"),
    paths(
        handlers::files::upload_files,
        handlers::files::list_files,
        handlers::files::get_file,
        handlers::files::delete_file,
        handlers::status::status,
    ),
    components(schemas(
        UploadForm,
        UploadResponse,
        UploadedFileResponse,
        FileEntryResponse,
        MessageResponse,
        StatusResponse,
        ErrorBody,
    )),
    tags(
        (name = "files", description = "Upload, list, download and delete files"),
        (name = "status", description = "Liveness probe")
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json - Serve the OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        assert!(paths.contains(&"/upload".to_string()));
        assert!(paths.contains(&"/files".to_string()));
        assert!(paths.contains(&"/files/{filename}".to_string()));
        assert!(paths.contains(&"/status".to_string()));
    }
}
