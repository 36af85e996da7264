//! Application state wiring storage, the bot store and the generation client.
//!
//! The store is generic over its storage backend; AppState pins it to the
//! backend chosen at startup by [`open_storage`].

use std::path::PathBuf;

use personabot_core::storage::KeyValueStorage;
use personabot_core::store::bot::BotStore;
use personabot_infra::config::{load_app_config, with_api_base_url};
use personabot_infra::filesystem::resolve_data_dir;
use personabot_infra::generate::HttpGenerationClient;
use personabot_infra::storage::{StorageBackend, open_storage};
use personabot_types::config::AppConfig;

/// Bot store pinned to the startup storage backend.
pub type ConcreteBotStore = BotStore<StorageBackend>;

/// Everything a command needs. Commands that mutate bots take `&mut AppState`.
pub struct AppState {
    pub store: ConcreteBotStore,
    pub client: HttpGenerationClient,
    pub config: AppConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data directory, load config, open storage and load bots.
    ///
    /// Storage problems never fail startup; they degrade to memory-only.
    pub async fn init(api_base_url: Option<String>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = with_api_base_url(load_app_config(&data_dir).await, api_base_url);

        let storage = open_storage(&data_dir).await;
        let store = BotStore::load(storage, config.storage_key.clone()).await;
        let client = HttpGenerationClient::new(&config)?;

        tracing::info!(
            data_dir = %data_dir.display(),
            storage = store.storage().backend_name(),
            endpoint = client.url(),
            bots = store.list().len(),
            "Application state initialized"
        );

        Ok(Self {
            store,
            client,
            config,
            data_dir,
        })
    }

    /// Whether bots written in this run survive a restart.
    pub fn is_durable(&self) -> bool {
        self.store.storage().is_durable()
    }
}
