//! Local filesystem storage.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{FileReader, FileWriter, StoragePort};
use crate::{FiledropError, Result};

/// Storage backed by a single directory on the host filesystem.
///
/// ```text
/// {root}/
/// ├── report.pdf
/// ├── photo.jpg
/// └── notes.txt
/// ```
#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Directory holding every stored file.
    root: PathBuf,
}

impl LocalStorage {
    /// Create a storage rooted at `root`.
    ///
    /// Nothing touches the filesystem until [`StoragePort::create_dir_all`]
    /// or another operation is called.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory of this storage.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the full path for a stored name.
    ///
    /// Leading separators are stripped so that an absolute name still
    /// resolves below the root instead of replacing it.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root
            .join(name.trim_start_matches(|c| c == '/' || c == '\\'))
    }
}

fn not_found(name: &str, e: io::Error) -> FiledropError {
    if e.kind() == io::ErrorKind::NotFound {
        FiledropError::NotFound(format!("File: {name}"))
    } else {
        e.into()
    }
}

#[async_trait]
impl StoragePort for LocalStorage {
    async fn create_dir_all(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    async fn create(&self, name: &str) -> Result<FileWriter> {
        let file = fs::File::create(self.path_for(name)).await?;
        Ok(Box::new(file))
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>> {
        fs::read(self.path_for(name))
            .await
            .map_err(|e| not_found(name, e))
    }

    async fn open(&self, name: &str) -> Result<FileReader> {
        let file = fs::File::open(self.path_for(name))
            .await
            .map_err(|e| not_found(name, e))?;

        // Opening a directory succeeds on unix; reading it does not.
        if file.metadata().await?.is_dir() {
            return Err(FiledropError::Io(io::Error::other(format!(
                "{name} is a directory"
            ))));
        }

        Ok(Box::new(file))
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        Ok(names)
    }

    async fn remove(&self, name: &str) -> Result<()> {
        fs::remove_file(self.path_for(name))
            .await
            .map_err(|e| not_found(name, e))
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(fs::try_exists(self.path_for(name)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn setup_storage() -> (TempDir, LocalStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("uploads"));
        storage.create_dir_all().await.unwrap();
        (temp_dir, storage)
    }

    #[tokio::test]
    async fn test_create_dir_all_creates_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("a").join("b");
        let storage = LocalStorage::new(&root);

        assert!(!root.exists());
        storage.create_dir_all().await.unwrap();
        assert!(root.is_dir());

        // Idempotent
        storage.create_dir_all().await.unwrap();
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let (_temp_dir, storage) = setup_storage().await;

        storage.write("hello.txt", b"Hello, World!").await.unwrap();

        assert_eq!(storage.read("hello.txt").await.unwrap(), b"Hello, World!");
        assert!(storage.root().join("hello.txt").is_file());
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let (_temp_dir, storage) = setup_storage().await;

        storage.write("a.txt", b"first version").await.unwrap();
        storage.write("a.txt", b"second").await.unwrap();

        assert_eq!(storage.read("a.txt").await.unwrap(), b"second");
        assert_eq!(storage.list().await.unwrap(), vec!["a.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_create_writes_in_chunks() {
        let (_temp_dir, storage) = setup_storage().await;
        storage.write("big.bin", b"old content").await.unwrap();

        let mut writer = storage.create("big.bin").await.unwrap();
        for chunk in [&b"abc"[..], &b"def"[..], &b"g"[..]] {
            writer.write_all(chunk).await.unwrap();
        }
        writer.shutdown().await.unwrap();

        assert_eq!(storage.read("big.bin").await.unwrap(), b"abcdefg");
    }

    #[tokio::test]
    async fn test_create_missing_parent_fails() {
        let (_temp_dir, storage) = setup_storage().await;

        let result = storage.create("missing-dir/a.txt").await;
        assert!(matches!(result, Err(FiledropError::Io(_))));
    }

    #[tokio::test]
    async fn test_read_not_found() {
        let (_temp_dir, storage) = setup_storage().await;

        let result = storage.read("missing.txt").await;
        assert!(matches!(result, Err(FiledropError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_open_streams_content() {
        let (_temp_dir, storage) = setup_storage().await;
        let content: Vec<u8> = (0..=255).collect();
        storage.write("binary.bin", &content).await.unwrap();

        let mut reader = storage.open("binary.bin").await.unwrap();
        let mut loaded = Vec::new();
        reader.read_to_end(&mut loaded).await.unwrap();

        assert_eq!(loaded, content);
    }

    #[tokio::test]
    async fn test_open_not_found() {
        let (_temp_dir, storage) = setup_storage().await;

        let result = storage.open("missing.txt").await;
        assert!(matches!(result, Err(FiledropError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_open_directory_is_error() {
        let (_temp_dir, storage) = setup_storage().await;
        std::fs::create_dir(storage.root().join("nested")).unwrap();

        let result = storage.open("nested").await;
        assert!(matches!(result, Err(FiledropError::Io(_))));
    }

    #[tokio::test]
    async fn test_list_includes_directories_without_recursing() {
        let (_temp_dir, storage) = setup_storage().await;
        storage.write("one.txt", b"1").await.unwrap();
        std::fs::create_dir(storage.root().join("nested")).unwrap();
        std::fs::write(storage.root().join("nested").join("inner.txt"), b"x").unwrap();

        let mut names = storage.list().await.unwrap();
        names.sort();

        assert_eq!(names, vec!["nested".to_string(), "one.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_list_missing_root_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("never-created"));

        assert!(storage.list().await.is_err());
    }

    #[tokio::test]
    async fn test_remove() {
        let (_temp_dir, storage) = setup_storage().await;
        storage.write("gone.txt", b"bye").await.unwrap();

        storage.remove("gone.txt").await.unwrap();

        assert!(!storage.exists("gone.txt").await.unwrap());
        let result = storage.remove("gone.txt").await;
        assert!(matches!(result, Err(FiledropError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_directory_fails() {
        let (_temp_dir, storage) = setup_storage().await;
        std::fs::create_dir(storage.root().join("nested")).unwrap();

        let result = storage.remove("nested").await;
        assert!(matches!(result, Err(FiledropError::Io(_))));
        assert!(storage.root().join("nested").is_dir());
    }

    #[tokio::test]
    async fn test_exists() {
        let (_temp_dir, storage) = setup_storage().await;
        storage.write("here.txt", b"data").await.unwrap();

        assert!(storage.exists("here.txt").await.unwrap());
        assert!(!storage.exists("missing.txt").await.unwrap());
    }

    #[test]
    fn test_path_for() {
        let storage = LocalStorage::new("/srv/uploads");

        assert_eq!(
            storage.path_for("a.txt"),
            PathBuf::from("/srv/uploads/a.txt")
        );
        assert_eq!(
            storage.path_for("/etc/passwd"),
            PathBuf::from("/srv/uploads/etc/passwd")
        );
    }

    #[tokio::test]
    async fn test_unicode_name() {
        let (_temp_dir, storage) = setup_storage().await;

        storage.write("日本語ファイル.txt", b"data").await.unwrap();

        assert!(storage.exists("日本語ファイル.txt").await.unwrap());
        assert_eq!(
            storage.list().await.unwrap(),
            vec!["日本語ファイル.txt".to_string()]
        );
    }
}
