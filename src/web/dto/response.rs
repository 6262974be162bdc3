//! Response DTOs for Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::service::{FileEntry, UploadedFile};

/// Message sent after a successful upload.
pub const FILES_UPLOADED: &str = "Files uploaded successfully";

/// Message sent after a successful delete.
pub const FILE_DELETED: &str = "File deleted successfully";

/// Response to `POST /upload`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Fixed success message.
    #[schema(example = "Files uploaded successfully")]
    pub message: String,
    /// One entry per uploaded part, in request order.
    pub files: Vec<UploadedFileResponse>,
}

impl UploadResponse {
    /// Build the response for the given upload results.
    pub fn new(files: Vec<UploadedFile>) -> Self {
        Self {
            message: FILES_UPLOADED.to_string(),
            files: files.into_iter().map(UploadedFileResponse::from).collect(),
        }
    }
}

/// One uploaded part.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileResponse {
    /// Filename declared by the client.
    pub original_name: String,
    /// Stored filename, without directory prefix.
    pub file_path: String,
}

impl From<UploadedFile> for UploadedFileResponse {
    fn from(f: UploadedFile) -> Self {
        Self {
            original_name: f.original_name,
            file_path: f.stored_name,
        }
    }
}

/// Entry returned by `GET /files`.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileEntryResponse {
    /// Stored name.
    pub name: String,
    /// Download URL.
    #[schema(example = "/files/report.pdf")]
    pub url: String,
}

impl From<FileEntry> for FileEntryResponse {
    fn from(e: FileEntry) -> Self {
        Self {
            name: e.name,
            url: e.url,
        }
    }
}

/// Plain message response.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Liveness probe payload. Always `{ "message": true, "error": false }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Always true.
    pub message: bool,
    /// Always false.
    pub error: bool,
}

impl Default for StatusResponse {
    fn default() -> Self {
        Self {
            message: true,
            error: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upload_response_serialize() {
        let response = UploadResponse::new(vec![UploadedFile {
            original_name: "a.txt".to_string(),
            stored_name: "a.txt".to_string(),
        }]);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "message": "Files uploaded successfully",
                "files": [{ "originalName": "a.txt", "filePath": "a.txt" }]
            })
        );
    }

    #[test]
    fn test_file_entry_response_serialize() {
        let response = FileEntryResponse::from(FileEntry::new("a.txt"));

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({ "name": "a.txt", "url": "/files/a.txt" }));
    }

    #[test]
    fn test_status_response_serialize() {
        let value = serde_json::to_value(StatusResponse::default()).unwrap();
        assert_eq!(value, json!({ "message": true, "error": false }));
    }
}
