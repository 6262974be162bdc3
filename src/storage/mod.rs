//! Storage port for Filedrop.
//!
//! All service state lives in a single flat directory. The [`StoragePort`]
//! trait wraps the handful of directory operations the service needs so the
//! handlers can run against the local filesystem in production and an
//! in-memory map in tests.

mod local;
mod memory;

pub use local::LocalStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::Result;

/// Readable handle to a stored file.
pub type FileReader = Box<dyn AsyncRead + Send + Unpin>;

/// Writable handle to a file being stored.
///
/// Content is only guaranteed to be in storage once the writer has been
/// shut down with [`AsyncWriteExt::shutdown`].
pub type FileWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Operations over the flat storage namespace.
///
/// Names are used verbatim as keys. Filtering untrusted names is the
/// caller's job (see [`crate::service::NamePolicy`]).
///
/// Missing entries are reported as [`crate::FiledropError::NotFound`].
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Ensure the storage root exists.
    async fn create_dir_all(&self) -> Result<()>;

    /// Create `name` for streaming writes, truncating any existing content.
    async fn create(&self, name: &str) -> Result<FileWriter>;

    /// Write `data` under `name`, replacing any existing content.
    async fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        let mut writer = self.create(name).await?;
        writer.write_all(data).await?;
        writer.shutdown().await?;
        Ok(())
    }

    /// Read the whole content stored under `name`.
    async fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Open `name` for streaming reads.
    async fn open(&self, name: &str) -> Result<FileReader>;

    /// Names of all entries directly under the root, in native order.
    async fn list(&self) -> Result<Vec<String>>;

    /// Remove the file stored under `name`.
    async fn remove(&self, name: &str) -> Result<()>;

    /// Check whether an entry called `name` exists.
    async fn exists(&self, name: &str) -> Result<bool>;
}
