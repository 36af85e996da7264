//! Bot store: the in-memory bot collection mirrored to durable storage.
//!
//! The collection is one JSON array under one storage key. Every mutation is
//! a read-modify-write through [`KeyValueStorage::update`]: the current stored
//! array is re-read, the change applied to it, and the result written back
//! while the backend holds the key exclusively. Other processes sharing the
//! key therefore never lose each other's writes. The in-memory copy is
//! replaced only after a successful write.

use personabot_types::bot::{Bot, BotId, CreateBotRequest};
use personabot_types::chat::Message;
use personabot_types::error::{StorageError, StoreError};
use tracing::{debug, info, warn};

use crate::storage::KeyValueStorage;

/// Minimum id prefix length accepted by [`BotStore::resolve`].
const MIN_ID_PREFIX: usize = 4;

/// Owns all bot records. Views get references; changes go through methods.
pub struct BotStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    bots: Vec<Bot>,
}

impl<S: KeyValueStorage> BotStore<S> {
    /// Load the collection stored under `key`.
    ///
    /// Never fails: a missing key gives an empty store, and unreadable or
    /// unparsable content is logged and replaced by an empty collection.
    pub async fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();

        let bots = match storage.get(&key).await {
            Ok(raw) => decode_bots(raw.as_deref(), &key),
            Err(err) => {
                warn!(key = %key, "Failed to read stored bots, starting empty: {err}");
                Vec::new()
            }
        };

        Self { storage, key, bots }
    }

    /// The storage backend this store persists to.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The storage key holding the collection.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// All bots in creation order.
    pub fn list(&self) -> &[Bot] {
        &self.bots
    }

    pub fn get(&self, id: &BotId) -> Option<&Bot> {
        self.bots.iter().find(|b| &b.id == id)
    }

    /// Find a bot by full id, unique id prefix, or case-insensitive name.
    pub fn resolve(&self, selector: &str) -> Result<&Bot, StoreError> {
        let selector = selector.trim();

        if let Some(bot) = self.bots.iter().find(|b| b.id.to_string() == selector) {
            return Ok(bot);
        }

        let lowered = selector.to_lowercase();
        if lowered.len() >= MIN_ID_PREFIX {
            let by_prefix: Vec<&Bot> = self
                .bots
                .iter()
                .filter(|b| b.id.to_string().starts_with(&lowered))
                .collect();
            match by_prefix.as_slice() {
                [bot] => return Ok(*bot),
                [] => {}
                _ => return Err(StoreError::Ambiguous(selector.to_string())),
            }
        }

        let by_name: Vec<&Bot> = self
            .bots
            .iter()
            .filter(|b| b.name.to_lowercase() == lowered)
            .collect();
        match by_name.as_slice() {
            [bot] => Ok(*bot),
            [] => Err(StoreError::NotFound(selector.to_string())),
            _ => Err(StoreError::Ambiguous(selector.to_string())),
        }
    }

    /// Create and persist a new bot.
    ///
    /// Blank name or persona is rejected before anything is touched.
    pub async fn create(&mut self, request: CreateBotRequest) -> Result<Bot, StoreError> {
        let bot = Bot::new(request)?;

        let created = bot.clone();
        self.commit(move |bots| {
            bots.push(created);
            Ok(())
        })
        .await?;

        info!(bot_id = %bot.id, name = %bot.name, "Bot created");
        Ok(bot)
    }

    /// Remove a bot and its conversation.
    pub async fn delete(&mut self, id: &BotId) -> Result<Bot, StoreError> {
        let removed = self
            .commit(|bots| {
                let index = index_of(bots, id)?;
                Ok(bots.remove(index))
            })
            .await?;

        info!(bot_id = %removed.id, name = %removed.name, "Bot deleted");
        Ok(removed)
    }

    /// Append one message to a bot's conversation.
    pub async fn append_message(&mut self, id: &BotId, message: Message) -> Result<(), StoreError> {
        self.append_all(id, vec![message]).await
    }

    /// Append a completed user/bot exchange with a single write.
    pub async fn append_turn(
        &mut self,
        id: &BotId,
        user: Message,
        reply: Message,
    ) -> Result<(), StoreError> {
        self.append_all(id, vec![user, reply]).await
    }

    async fn append_all(&mut self, id: &BotId, messages: Vec<Message>) -> Result<(), StoreError> {
        self.commit(|bots| {
            let index = index_of(bots, id)?;
            bots[index].messages.extend(messages);
            Ok(())
        })
        .await
    }

    /// Apply `mutate` to the freshly stored collection and write it back.
    ///
    /// On any error nothing is written and the in-memory copy is untouched.
    async fn commit<T, F>(&mut self, mutate: F) -> Result<T, StoreError>
    where
        T: Send,
        F: FnOnce(&mut Vec<Bot>) -> Result<T, StoreError> + Send,
    {
        let key = self.key.as_str();
        let mut outcome: Option<(Vec<Bot>, T)> = None;

        self.storage
            .update(key, |current| {
                let mut bots = decode_bots(current.as_deref(), key);
                let value = mutate(&mut bots)?;
                let json = serde_json::to_string(&bots)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                outcome = Some((bots, value));
                Ok::<_, StoreError>(json)
            })
            .await?;

        let (bots, value) = outcome
            .ok_or_else(|| StorageError::Io("storage update did not run".to_string()))?;
        debug!(key = %self.key, count = bots.len(), "Persisted bots");
        self.bots = bots;
        Ok(value)
    }
}

fn index_of(bots: &[Bot], id: &BotId) -> Result<usize, StoreError> {
    bots.iter()
        .position(|b| &b.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

/// Parse the stored collection. Missing or corrupt content yields an empty one.
fn decode_bots(raw: Option<&str>, key: &str) -> Vec<Bot> {
    let Some(raw) = raw else {
        debug!(key = %key, "No stored bots, starting empty");
        return Vec::new();
    };
    match serde_json::from_str::<Vec<Bot>>(raw) {
        Ok(bots) => {
            debug!(key = %key, count = bots.len(), "Loaded bots from storage");
            bots
        }
        Err(err) => {
            warn!(key = %key, "Stored bots are corrupt, starting empty: {err}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::SharedMapStorage;
    use personabot_types::error::ValidationError;

    const KEY: &str = "personabot.bots";

    async fn empty_store() -> (BotStore<SharedMapStorage>, SharedMapStorage) {
        let storage = SharedMapStorage::default();
        let store = BotStore::load(storage.clone(), KEY).await;
        (store, storage)
    }

    async fn reload(storage: &SharedMapStorage) -> BotStore<SharedMapStorage> {
        BotStore::load(storage.clone(), KEY).await
    }

    #[tokio::test]
    async fn test_create_luna() {
        let (mut store, _) = empty_store().await;
        let bot = store
            .create(CreateBotRequest::new("Luna", "Friendly assistant"))
            .await
            .unwrap();

        assert_eq!(store.list().len(), 1);
        assert_eq!(bot.name, "Luna");
        assert_eq!(bot.persona, "Friendly assistant");
        assert!(!bot.id.to_string().is_empty());
        assert!(bot.messages.is_empty());
    }

    #[tokio::test]
    async fn test_blank_fields_never_mutate() {
        let (mut store, storage) = empty_store().await;

        let err = store.create(CreateBotRequest::new("  ", "persona")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::EmptyName)));

        let err = store.create(CreateBotRequest::new("Luna", "\n")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::EmptyPersona)));

        assert!(store.list().is_empty());
        assert!(storage.raw(KEY).is_none());
    }

    #[tokio::test]
    async fn test_create_delete_sequence_round_trips() {
        let (mut store, storage) = empty_store().await;

        let a = store.create(CreateBotRequest::new("Alpha", "a")).await.unwrap();
        let b = store.create(CreateBotRequest::new("Beta", "b")).await.unwrap();
        store.delete(&a.id).await.unwrap();
        let c = store.create(CreateBotRequest::new("Gamma", "c")).await.unwrap();

        let reloaded = reload(&storage).await;
        assert_eq!(reloaded.list(), store.list());
        let ids: Vec<&BotId> = reloaded.list().iter().map(|b| &b.id).collect();
        assert_eq!(ids, vec![&b.id, &c.id]);
    }

    #[tokio::test]
    async fn test_delete_removes_only_target() {
        let (mut store, storage) = empty_store().await;
        let a = store.create(CreateBotRequest::new("Alpha", "a")).await.unwrap();
        let b = store.create(CreateBotRequest::new("Beta", "b")).await.unwrap();
        let c = store.create(CreateBotRequest::new("Gamma", "c")).await.unwrap();

        let removed = store.delete(&b.id).await.unwrap();
        assert_eq!(removed.id, b.id);

        assert!(store.get(&b.id).is_none());
        assert!(store.get(&a.id).is_some());
        assert!(store.get(&c.id).is_some());

        let reloaded = reload(&storage).await;
        assert_eq!(reloaded.list().len(), 2);
        assert!(reloaded.get(&b.id).is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let (mut store, _) = empty_store().await;
        let err = store.delete(&BotId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_messages_persist_in_order() {
        let (mut store, storage) = empty_store().await;
        let bot = store.create(CreateBotRequest::new("Luna", "p")).await.unwrap();

        store.append_message(&bot.id, Message::user("one")).await.unwrap();
        store
            .append_turn(&bot.id, Message::user("two"), Message::bot("three", "AAA="))
            .await
            .unwrap();

        let reloaded = reload(&storage).await;
        let texts: Vec<&str> = reloaded.get(&bot.id).unwrap().messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_corrupt_storage_loads_empty() {
        let storage = SharedMapStorage::with_value(KEY, "{not json");
        let store = BotStore::load(storage, KEY).await;
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_storage_is_overwritten_on_next_create() {
        let storage = SharedMapStorage::with_value(KEY, "[{\"oops\":1}]");
        let mut store = BotStore::load(storage.clone(), KEY).await;
        store.create(CreateBotRequest::new("Luna", "p")).await.unwrap();

        let reloaded = reload(&storage).await;
        assert_eq!(reloaded.list().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back_memory() {
        let (mut store, storage) = empty_store().await;
        let bot = store.create(CreateBotRequest::new("Luna", "p")).await.unwrap();

        storage.set_fail_writes(true);

        let err = store.create(CreateBotRequest::new("Sol", "p")).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert_eq!(store.list().len(), 1);

        assert!(store.delete(&bot.id).await.is_err());
        assert!(store.get(&bot.id).is_some());

        assert!(store.append_message(&bot.id, Message::user("hi")).await.is_err());
        assert!(store.get(&bot.id).unwrap().messages.is_empty());
    }

    #[tokio::test]
    async fn test_stale_store_keeps_concurrent_create() {
        let (mut seed, storage) = empty_store().await;
        let luna = seed.create(CreateBotRequest::new("Luna", "p")).await.unwrap();

        let mut stale = reload(&storage).await;
        let mut other = reload(&storage).await;
        let sol = other.create(CreateBotRequest::new("Sol", "p")).await.unwrap();

        stale
            .append_turn(&luna.id, Message::user("hi"), Message::bot("hello", "AAA="))
            .await
            .unwrap();

        let reloaded = reload(&storage).await;
        assert!(reloaded.get(&sol.id).is_some());
        assert_eq!(reloaded.get(&luna.id).unwrap().messages.len(), 2);
        assert_eq!(stale.list(), reloaded.list());
    }

    #[tokio::test]
    async fn test_stale_store_delete_of_removed_bot_is_not_found() {
        let (mut first, storage) = empty_store().await;
        let luna = first.create(CreateBotRequest::new("Luna", "p")).await.unwrap();
        let mut second = reload(&storage).await;

        first.delete(&luna.id).await.unwrap();

        let err = second.delete(&luna.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(second.get(&luna.id).is_some());
    }

    #[tokio::test]
    async fn test_resolve_by_name_and_prefix() {
        let (mut store, _) = empty_store().await;
        let luna = store.create(CreateBotRequest::new("Luna", "p")).await.unwrap();
        store.create(CreateBotRequest::new("Sol", "p")).await.unwrap();

        assert_eq!(store.resolve("luna").unwrap().id, luna.id);
        assert_eq!(store.resolve(&luna.id.to_string()).unwrap().id, luna.id);
        assert!(matches!(store.resolve("nobody"), Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_duplicate_names_is_ambiguous() {
        let (mut store, _) = empty_store().await;
        store.create(CreateBotRequest::new("Luna", "p")).await.unwrap();
        store.create(CreateBotRequest::new("luna", "q")).await.unwrap();

        assert!(matches!(store.resolve("LUNA"), Err(StoreError::Ambiguous(_))));
    }
}
