//! Durable key/value storage port.
//!
//! The bot store persists its whole collection under a single key, the way a
//! browser app would use `localStorage`. Implementations live in
//! personabot-infra (file-backed and in-memory).

use personabot_types::error::StorageError;

/// String key/value storage.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait KeyValueStorage: Send + Sync {
    /// Short backend name for status output (e.g. "file", "memory").
    fn backend_name(&self) -> &str;

    /// Read the value stored under `key`, or `None` if it was never written.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Read-modify-write the value stored under `key`.
    ///
    /// `f` receives the current value (`None` if never written) and returns
    /// the replacement. The backend holds `key` exclusively from the read
    /// until the write completes, so concurrent writers, including other
    /// processes, are serialized. If `f` fails nothing is written.
    fn update<F, E>(
        &self,
        key: &str,
        f: F,
    ) -> impl std::future::Future<Output = Result<(), E>> + Send
    where
        F: FnOnce(Option<String>) -> Result<String, E> + Send,
        E: From<StorageError> + Send;
}
