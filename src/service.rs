//! File store service.
//!
//! Upload, list, open and delete operations over a [`StoragePort`]. The
//! service keeps no state of its own: every call goes straight to storage.
//!
//! Uploads are streamed. An [`UploadSession`] checks each part as it arrives
//! and hands back a [`FileWriter`], so no part is held in memory. A request
//! that fails part way is rolled back with [`UploadSession::abort`].
//!
//! There is no locking around storage mutations. Two uploads of the same
//! name race and the last write wins; a fetch racing a delete may see the
//! file disappear. This is acceptable for single-writer or low-contention
//! deployments only.

use std::sync::Arc;

use crate::storage::{FileReader, FileWriter, StoragePort};
use crate::{FiledropError, Result};

/// Default maximum number of parts in one upload request.
pub const DEFAULT_MAX_FILES_PER_UPLOAD: usize = 10;

/// Message for an upload without any file part.
pub const NO_FILES_UPLOADED: &str = "No files uploaded";

/// Message for an upload exceeding the part cap.
pub const TOO_MANY_FILES: &str = "Too many files";

/// Message for a filename rejected by the name policy.
pub const INVALID_FILENAME: &str = "Invalid filename";

/// Rule deciding which client-supplied filenames are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    /// Reject empty names, `.`, `..` and names containing `/`, `\` or NUL.
    #[default]
    Strict,
    /// Pass every name to storage unchanged.
    Passthrough,
}

impl NamePolicy {
    /// Build the policy from the `allow_path_separators` config switch.
    pub fn from_config(allow_path_separators: bool) -> Self {
        if allow_path_separators {
            NamePolicy::Passthrough
        } else {
            NamePolicy::Strict
        }
    }

    /// Check a name against this policy.
    pub fn check(&self, name: &str) -> Result<()> {
        match self {
            NamePolicy::Passthrough => Ok(()),
            NamePolicy::Strict => {
                let invalid = name.is_empty()
                    || name == "."
                    || name == ".."
                    || name.contains(['/', '\\', '\0']);

                if invalid {
                    Err(FiledropError::Validation(INVALID_FILENAME.to_string()))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Result entry for one uploaded part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Filename declared by the client.
    pub original_name: String,
    /// Name the file was stored under.
    pub stored_name: String,
}

/// Entry in a storage listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Entry name.
    pub name: String,
    /// Download URL, relative to the service root.
    pub url: String,
}

impl FileEntry {
    /// Build the entry for a stored name. The name is inserted verbatim.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let url = format!("/files/{name}");
        Self { name, url }
    }
}

/// File store service.
#[derive(Clone)]
pub struct FileStore {
    storage: Arc<dyn StoragePort>,
    policy: NamePolicy,
    max_files: usize,
}

impl FileStore {
    /// Create a service over `storage` with the strict name policy and the
    /// default part cap.
    pub fn new(storage: Arc<dyn StoragePort>) -> Self {
        Self {
            storage,
            policy: NamePolicy::Strict,
            max_files: DEFAULT_MAX_FILES_PER_UPLOAD,
        }
    }

    /// Set the name policy.
    pub fn with_name_policy(mut self, policy: NamePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the maximum number of parts per upload.
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Get the name policy.
    pub fn name_policy(&self) -> NamePolicy {
        self.policy
    }

    /// Get the maximum number of parts per upload.
    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Ensure the storage directory exists.
    pub async fn init(&self) -> Result<()> {
        self.storage.create_dir_all().await
    }

    /// Start receiving an upload.
    pub fn begin_upload(&self) -> UploadSession<'_> {
        UploadSession {
            store: self,
            uploaded: Vec::new(),
        }
    }

    /// List every entry in storage.
    pub async fn list(&self) -> Result<Vec<FileEntry>> {
        let names = self.storage.list().await?;
        Ok(names.into_iter().map(FileEntry::new).collect())
    }

    /// Open a stored file for streaming.
    pub async fn open(&self, name: &str) -> Result<FileReader> {
        self.policy.check(name)?;

        if !self.storage.exists(name).await? {
            return Err(FiledropError::NotFound(format!("File: {name}")));
        }

        self.storage.open(name).await
    }

    /// Delete a stored file.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.policy.check(name)?;

        if !self.storage.exists(name).await? {
            return Err(FiledropError::NotFound(format!("File: {name}")));
        }

        self.storage.remove(name).await
    }
}

/// An upload request being received.
///
/// Parts are stored in arrival order. Each one is checked against the part
/// cap and the name policy before its file is created.
pub struct UploadSession<'a> {
    store: &'a FileStore,
    uploaded: Vec<UploadedFile>,
}

impl UploadSession<'_> {
    /// Create the file for the next part.
    ///
    /// The caller streams the content into the returned writer and shuts it
    /// down before starting the next part.
    pub async fn create(&mut self, name: &str) -> Result<FileWriter> {
        if self.uploaded.len() >= self.store.max_files {
            return Err(FiledropError::Validation(TOO_MANY_FILES.to_string()));
        }
        self.store.policy.check(name)?;

        let writer = self.store.storage.create(name).await?;
        self.uploaded.push(UploadedFile {
            original_name: name.to_string(),
            stored_name: name.to_string(),
        });

        Ok(writer)
    }

    /// Complete the upload and return the stored parts in order.
    pub fn finish(self) -> Result<Vec<UploadedFile>> {
        if self.uploaded.is_empty() {
            return Err(FiledropError::Validation(NO_FILES_UPLOADED.to_string()));
        }
        Ok(self.uploaded)
    }

    /// Remove every file this upload created.
    ///
    /// A file that replaced an earlier one with the same name is removed too;
    /// the earlier content is not restored.
    pub async fn abort(self) {
        for file in self.uploaded.iter().rev() {
            match self.store.storage.remove(&file.stored_name).await {
                Ok(()) | Err(FiledropError::NotFound(_)) => {}
                Err(e) => {
                    tracing::warn!(name = %file.stored_name, error = %e, "Failed to remove partial upload");
                }
            }
        }
        tracing::debug!(count = self.uploaded.len(), "Upload rolled back");
    }
}

impl std::fmt::Debug for UploadSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadSession")
            .field("uploaded", &self.uploaded)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("policy", &self.policy)
            .field("max_files", &self.max_files)
            .finish_non_exhaustive()
    }
}
