//! In-memory key/value storage, used when no durable storage is available.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use personabot_core::storage::KeyValueStorage;
use personabot_types::error::StorageError;

/// Process-lifetime storage. Contents vanish on exit.
#[derive(Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn update<F, E>(&self, key: &str, f: F) -> Result<(), E>
    where
        F: FnOnce(Option<String>) -> Result<String, E> + Send,
        E: From<StorageError> + Send,
    {
        // The entry guard holds the shard lock until the new value is in.
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let value = f(Some(entry.get().clone()))?;
                entry.insert(value);
            }
            Entry::Vacant(entry) => {
                let value = f(None)?;
                entry.insert(value);
            }
        }
        Ok(())
    }
}
