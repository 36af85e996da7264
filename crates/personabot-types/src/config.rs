//! Application configuration types for personabot.
//!
//! `AppConfig` represents the optional `config.toml` in the data directory.
//! All fields have defaults so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

/// Storage key holding the JSON array of bots.
pub const DEFAULT_STORAGE_KEY: &str = "personabot.bots";

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the generation endpoint (without `/generate`).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Key under which the bot collection is persisted.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            storage_key: default_storage_key(),
        }
    }
}

impl AppConfig {
    /// The full generate URL, tolerating a trailing slash on the base.
    pub fn generate_url(&self) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            crate::generate::GENERATE_PATH
        )
    }
}
