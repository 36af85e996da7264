//! File-backed key/value storage.
//!
//! Each key is one JSON document at `{root}/{key}.json`. Updates hold an
//! exclusive advisory lock on `{key}.json.lock` from the read until the
//! write lands, so several `pbot` processes can share one data directory.
//! Writes go through a sibling temporary file and a rename so a crash never
//! leaves half a file.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use personabot_core::storage::KeyValueStorage;
use personabot_types::error::StorageError;

pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the storage directory. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the document holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{file_name}.json"))
    }

    async fn read(path: &Path) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Io(format!(
                "failed to read {}: {err}",
                path.display()
            ))),
        }
    }

    async fn write(path: &Path, value: &str) -> Result<(), StorageError> {
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| StorageError::Io(format!("failed to write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| StorageError::Io(format!("failed to replace {}: {e}", path.display())))?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn backend_name(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::read(&self.path_for(key)).await
    }

    async fn update<F, E>(&self, key: &str, f: F) -> Result<(), E>
    where
        F: FnOnce(Option<String>) -> Result<String, E> + Send,
        E: From<StorageError> + Send,
    {
        let path = self.path_for(key);

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::Io(format!("failed to create {}: {e}", self.root.display())))?;

        let _lock = KeyLock::acquire(path.with_extension("json.lock")).await?;

        let current = Self::read(&path).await?;
        let value = f(current)?;
        Self::write(&path, &value).await?;

        tracing::debug!(path = %path.display(), bytes = value.len(), "Wrote storage key");
        Ok(())
    }
}

/// Exclusive advisory lock on a key's lock file, released on drop.
///
/// The lock file itself is left in place. Removing it would let a waiter
/// that already opened the old file lock an unlinked inode.
struct KeyLock {
    file: File,
}

impl KeyLock {
    async fn acquire(lock_path: PathBuf) -> Result<Self, StorageError> {
        tokio::task::spawn_blocking(move || {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(&lock_path)
                .map_err(|e| {
                    StorageError::Io(format!("failed to open {}: {e}", lock_path.display()))
                })?;
            file.lock_exclusive().map_err(|e| {
                StorageError::Io(format!("failed to lock {}: {e}", lock_path.display()))
            })?;
            Ok(KeyLock { file })
        })
        .await
        .map_err(|e| StorageError::Io(format!("lock task failed: {e}")))?
    }
}

impl Drop for KeyLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn put(value: &'static str) -> impl FnOnce(Option<String>) -> Result<String, StorageError> {
        move |_| Ok(value.to_string())
    }

    #[tokio::test]
    async fn test_update_and_get() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage"));

        storage.update("personabot.bots", put("[]")).await.unwrap();
        assert_eq!(storage.get("personabot.bots").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.get("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_sees_current_value_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.update("k", put("one")).await.unwrap();
        storage
            .update("k", |current| {
                assert_eq!(current.as_deref(), Some("one"));
                Ok::<_, StorageError>("two".to_string())
            })
            .await
            .unwrap();

        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("two"));
        assert!(!dir.path().join("k.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_update_writes_nothing() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.update("k", put("kept")).await.unwrap();

        let err = storage
            .update("k", |_| Err(StorageError::Serialization("bad".to_string())))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("kept"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_serialized() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();

        let mut handles = Vec::new();
        for _ in 0..16 {
            // Separate instances, as separate processes would have.
            let storage = FileStorage::new(root.clone());
            handles.push(tokio::spawn(async move {
                storage
                    .update("counter", |current| {
                        let n: u32 = current.as_deref().unwrap_or("0").parse().unwrap();
                        std::thread::sleep(std::time::Duration::from_millis(2));
                        Ok::<_, StorageError>((n + 1).to_string())
                    })
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let storage = FileStorage::new(root);
        assert_eq!(storage.get("counter").await.unwrap().as_deref(), Some("16"));
    }

    #[test]
    fn test_path_for_sanitizes_key() {
        let storage = FileStorage::new("/data/storage");
        assert_eq!(
            storage.path_for("personabot.bots"),
            PathBuf::from("/data/storage/personabot.bots.json")
        );
        assert_eq!(
            storage.path_for("../etc/passwd"),
            PathBuf::from("/data/storage/.._etc_passwd.json")
        );
    }
}
