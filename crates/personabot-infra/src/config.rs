//! Configuration loader for personabot.
//!
//! Reads `config.toml` from the data directory (`~/.personabot/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the file
//! is missing or malformed. The generation base URL can be overridden from
//! the command line or the `PERSONABOT_API_BASE_URL` environment variable.

use std::path::Path;

use personabot_types::config::AppConfig;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = crate::filesystem::config_path(data_dir);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Apply a base URL override (CLI flag or environment), ignoring blanks.
pub fn with_api_base_url(mut config: AppConfig, api_base_url: Option<String>) -> AppConfig {
    if let Some(url) = api_base_url.map(|u| u.trim().to_string()) {
        if !url.is_empty() {
            config.api_base_url = url;
        }
    }
    config
}
