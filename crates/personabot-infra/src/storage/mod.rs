//! Key/value storage adapters and the storage accessor.
//!
//! [`open_storage`] acquires the file backend under the data directory and
//! degrades to [`MemoryStorage`] when that directory cannot be used, so the
//! application always starts.

pub mod file;
pub mod memory;

use std::path::{Path, PathBuf};

use personabot_core::storage::KeyValueStorage;
use personabot_types::error::StorageError;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Name of the file written to check the storage directory.
const WRITE_CHECK_FILE: &str = ".write-check";

/// The storage backend picked at startup.
pub enum StorageBackend {
    File(FileStorage),
    Memory(MemoryStorage),
}

impl StorageBackend {
    /// Whether data written now survives a restart.
    pub fn is_durable(&self) -> bool {
        matches!(self, StorageBackend::File(_))
    }
}

impl KeyValueStorage for StorageBackend {
    fn backend_name(&self) -> &str {
        match self {
            StorageBackend::File(s) => s.backend_name(),
            StorageBackend::Memory(s) => s.backend_name(),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            StorageBackend::File(s) => s.get(key).await,
            StorageBackend::Memory(s) => s.get(key).await,
        }
    }

    async fn update<F, E>(&self, key: &str, f: F) -> Result<(), E>
    where
        F: FnOnce(Option<String>) -> Result<String, E> + Send,
        E: From<StorageError> + Send,
    {
        match self {
            StorageBackend::File(s) => s.update(key, f).await,
            StorageBackend::Memory(s) => s.update(key, f).await,
        }
    }
}

/// Storage directory under the data directory: `{data_dir}/storage/`.
pub fn storage_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("storage")
}

/// Open durable storage under `data_dir`, or fall back to memory.
///
/// The directory is created and a test file written and removed. Any failure
/// is logged and answered with a memory-only backend.
pub async fn open_storage(data_dir: &Path) -> StorageBackend {
    let root = storage_dir(data_dir);
    match check_writable(&root).await {
        Ok(()) => {
            tracing::debug!(path = %root.display(), "Using file storage");
            StorageBackend::File(FileStorage::new(root))
        }
        Err(err) => {
            tracing::warn!(
                path = %root.display(),
                "Storage unavailable, bots will not be saved: {err}"
            );
            StorageBackend::Memory(MemoryStorage::new())
        }
    }
}

async fn check_writable(root: &Path) -> Result<(), StorageError> {
    tokio::fs::create_dir_all(root)
        .await
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
    let check = root.join(WRITE_CHECK_FILE);
    tokio::fs::write(&check, b"")
        .await
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
    tokio::fs::remove_file(&check)
        .await
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
    Ok(())
}
