//! Request DTOs for Web API.

use utoipa::ToSchema;

/// Multipart field carrying the uploaded files.
pub const UPLOAD_FIELD: &str = "files";

/// Multipart upload form.
///
/// Only used to describe `POST /upload` in the OpenAPI document; the handler
/// reads the multipart stream directly.
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// One part per file. The part's filename becomes the stored name.
    #[schema(value_type = Vec<String>)]
    pub files: Vec<Vec<u8>>,
}
