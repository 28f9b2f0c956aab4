//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate with fallbacks.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/deploy-cash/`, `~/.cache/deploy-cash/`
//! - macOS: `~/Library/Application Support/deploy-cash/`, `~/Library/Caches/deploy-cash/`
//! - Windows: `%APPDATA%\deploy-cash\`, `%LOCALAPPDATA%\deploy-cash\`

use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const APP_NAME: &str = "deploy-cash";

/// Get the application config directory
/// Returns ~/.config/deploy-cash/ on Linux, ~/Library/Application Support/deploy-cash/ on macOS
///
/// Unlike [`cache_dir`] this does not create the directory; the config file
/// is optional and only ever read.
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get the application cache directory
/// Returns ~/.cache/deploy-cash/ on Linux, ~/Library/Caches/deploy-cash/ on macOS
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
    Ok(dir)
}

/// Get path to app config file in the config directory
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
