//! In-memory storage.

use std::collections::BTreeMap;
use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use super::{FileReader, FileWriter, StoragePort};
use crate::{FiledropError, Result};

type Files = Arc<RwLock<BTreeMap<String, Vec<u8>>>>;

fn poisoned() -> io::Error {
    io::Error::other("memory storage lock poisoned")
}

/// Storage that keeps every file in a map.
///
/// Contents are lost when the value is dropped. Listing is sorted by name.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Files,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.files.read().map_err(|_| poisoned().into())
    }

    fn files_mut(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.files.write().map_err(|_| poisoned().into())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.files.read().unwrap().len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Appends every written chunk to one map entry.
struct MemoryWriter {
    name: String,
    files: Files,
}

impl AsyncWrite for MemoryWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let mut files = self.files.write().map_err(|_| poisoned())?;
        files
            .entry(self.name.clone())
            .or_default()
            .extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[async_trait]
impl StoragePort for MemoryStorage {
    async fn create_dir_all(&self) -> Result<()> {
        Ok(())
    }

    async fn create(&self, name: &str) -> Result<FileWriter> {
        self.files_mut()?.insert(name.to_string(), Vec::new());
        Ok(Box::new(MemoryWriter {
            name: name.to_string(),
            files: Arc::clone(&self.files),
        }))
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>> {
        self.files()?
            .get(name)
            .cloned()
            .ok_or_else(|| FiledropError::NotFound(format!("File: {name}")))
    }

    async fn open(&self, name: &str) -> Result<FileReader> {
        let content = self.read(name).await?;
        Ok(Box::new(Cursor::new(content)))
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.files()?.keys().cloned().collect())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        self.files_mut()?
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| FiledropError::NotFound(format!("File: {name}")))
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.files()?.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_write_read_overwrite() {
        let storage = MemoryStorage::new();

        storage.write("a.txt", b"one").await.unwrap();
        storage.write("a.txt", b"two").await.unwrap();

        assert_eq!(storage.read("a.txt").await.unwrap(), b"two");
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn test_create_appends_chunks() {
        let storage = MemoryStorage::new();
        storage.write("a.txt", b"stale").await.unwrap();

        let mut writer = storage.create("a.txt").await.unwrap();
        assert_eq!(storage.read("a.txt").await.unwrap(), b"");

        writer.write_all(b"fresh ").await.unwrap();
        writer.write_all(b"content").await.unwrap();
        writer.shutdown().await.unwrap();

        assert_eq!(storage.read("a.txt").await.unwrap(), b"fresh content");
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let storage = MemoryStorage::new();
        storage.write("b.txt", b"").await.unwrap();
        storage.write("a.txt", b"").await.unwrap();

        assert_eq!(
            storage.list().await.unwrap(),
            vec!["a.txt".to_string(), "b.txt".to_string()]
        );
    }

    #[tokio::test]
    async fn test_open() {
        let storage = MemoryStorage::new();
        storage.write("a.bin", &[0, 1, 2, 255]).await.unwrap();

        let mut reader = storage.open("a.bin").await.unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();

        assert_eq!(buf, vec![0, 1, 2, 255]);
    }

    #[tokio::test]
    async fn test_missing_entries() {
        let storage = MemoryStorage::new();

        assert!(storage.is_empty());
        assert!(!storage.exists("x").await.unwrap());
        assert!(matches!(
            storage.read("x").await,
            Err(FiledropError::NotFound(_))
        ));
        assert!(matches!(
            storage.remove("x").await,
            Err(FiledropError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_remove() {
        let storage = MemoryStorage::new();
        storage.write("a.txt", b"data").await.unwrap();

        storage.remove("a.txt").await.unwrap();

        assert!(storage.is_empty());
    }
}
