//! Configuration management for troupe-bot.
//!
//! Settings load from defaults, then `~/.troupe/config.toml` (or an explicit
//! `--config` path). Hosted API keys never live in the file; entries name an
//! environment variable instead.

mod schema;

pub use schema::{
    BotConfig, ConfigIssue, IssueLevel, ModelConfig, ProfileBinding, ProfilesConfig, RosterKind,
    SessionSettings, UiConfig,
};

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{BotError, Result};

/// Get the default config directory path.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".troupe")
}

/// Get the default config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from the default path, falling back to defaults when
/// the file does not exist.
pub async fn load_config() -> Result<BotConfig> {
    let path = config_path();
    if !path.exists() {
        info!(path = %path.display(), "config file not found, using defaults");
        return Ok(BotConfig::default());
    }
    load_config_from(&path).await
}

/// Load configuration from an explicitly given path.
///
/// Unlike [`load_config`], a missing file here is an error: an
/// operator-supplied path with a typo must not silently become the built-in
/// defaults.
pub async fn load_config_from(path: &Path) -> Result<BotConfig> {
    if !path.exists() {
        return Err(BotError::config(format!(
            "config file not found: {}",
            path.display()
        )));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: BotConfig =
        toml::from_str(&content).map_err(|e| BotError::config(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), "loaded config file");

    Ok(config)
}

/// Save configuration to a specific path, creating parent directories.
pub async fn save_config_to(config: &BotConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| BotError::config(e.to_string()))?;
    tokio::fs::write(path, content).await?;
    info!(path = %path.display(), "saved config file");

    Ok(())
}

/// Initialize the configuration directory and write a default config if none
/// exists. Also creates the code-execution sandbox directory.
pub async fn init_config() -> Result<BotConfig> {
    let cfg_dir = default_config_dir();
    let cfg_path = config_path();

    tokio::fs::create_dir_all(&cfg_dir).await?;

    if !cfg_path.exists() {
        let config = BotConfig::default();
        save_config_to(&config, &cfg_path).await?;
        info!("created default config at {}", cfg_path.display());
    }

    let config = load_config().await?;
    tokio::fs::create_dir_all(&config.session.work_dir).await?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let cfg_dir = default_config_dir();
        assert!(cfg_dir.ends_with(".troupe"));
        assert!(config_path().ends_with("config.toml"));
    }

    #[tokio::test]
    async fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Path::new("/nonexistent/troupe/config.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::Config(msg) if msg.contains("not found")));
    }

    #[tokio::test]
    async fn save_and_reload() {
        let dir = std::env::temp_dir().join("troupe-bot-config-test");
        let path = dir.join("config.toml");

        let mut config = BotConfig::default();
        config.session.max_rounds = 6;
        save_config_to(&config, &path).await.unwrap();

        let loaded = load_config_from(&path).await.unwrap();
        assert_eq!(loaded.session.max_rounds, 6);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
