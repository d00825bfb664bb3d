//! Config file discovery and override layering for the binary.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use streamify_core::config::{Config, MEDIA_ROOT_ENV};

/// Locations searched when no `--config` is given, in order.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "./streamify.toml",
    "~/.config/streamify/config.toml",
    "/etc/streamify/config.toml",
];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = Config::from_toml(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    for warning in config.validate() {
        tracing::warn!("{}: {}", path.display(), warning);
    }

    Ok(config)
}

/// The first default location that exists, if any.
pub fn find_default_config() -> Option<PathBuf> {
    DEFAULT_CONFIG_PATHS.iter().find_map(|path_str| {
        let path = PathBuf::from(shellexpand::tilde(path_str).as_ref());
        path.exists().then_some(path)
    })
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    match find_default_config() {
        Some(path) => {
            tracing::debug!("Using config file {}", path.display());
            load_config(&path)
        }
        None => Ok(Config::default()),
    }
}

/// Load config and apply the environment and command-line overrides.
///
/// Precedence for the media root: `--media-root`, then
/// `STREAMIFY_MEDIA_ROOT`, then the config file, then `./media`.
pub fn resolve(custom_path: Option<&Path>, media_root: Option<&Path>) -> Result<Config> {
    let mut config = load_config_or_default(custom_path)?;
    config.apply_env();

    if let Some(root) = media_root {
        config.storage.media_root = root.to_path_buf();
    }

    let expanded = shellexpand::tilde(&config.storage.media_root.to_string_lossy()).into_owned();
    config.storage.media_root = PathBuf::from(expanded);

    Ok(config)
}
