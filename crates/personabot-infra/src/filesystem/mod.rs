//! Data directory layout for personabot.
//!
//! ```text
//! ~/.personabot/
//! ├── config.toml          # optional, see `config`
//! └── storage/
//!     └── personabot.bots.json
//! ```

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PERSONABOT_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `PERSONABOT_DATA_DIR` environment variable
/// 2. `~/.personabot`
/// 3. `.personabot` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(std::env::var(DATA_DIR_ENV).ok(), dirs::home_dir())
}

fn data_dir_from(env_value: Option<String>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = env_value.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(home) = home {
        return home.join(".personabot");
    }

    PathBuf::from(".personabot")
}

/// Path of the optional config file.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}
