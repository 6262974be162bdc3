//! Filedrop - a minimal multipart file upload service.
//!
//! Clients POST files, list them, fetch them by name or delete them. Every
//! file lives in one flat storage directory under the name the client gave it.

pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod storage;
pub mod web;

pub use config::Config;
pub use error::{FiledropError, Result};
pub use service::{FileEntry, FileStore, NamePolicy, UploadSession, UploadedFile};
pub use storage::{LocalStorage, MemoryStorage, StoragePort};
pub use web::WebServer;
