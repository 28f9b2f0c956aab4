//! Config file discovery

use std::path::PathBuf;

/// File name looked up in the working and home directories
pub const CONFIG_FILE_NAME: &str = ".deploy-cash.toml";

/// Candidate config files, most specific first
///
/// `.deploy-cash.toml` in the working directory, then in the home directory,
/// then `config.toml` in the application config directory.
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
    candidates.extend(dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME)));
    candidates.extend(crate::paths::app_config_path().ok());
    candidates
}

/// Content of the first readable config file, if any
pub fn load_config_file() -> Option<String> {
    config_file_candidates().into_iter().find_map(|path| {
        let content = std::fs::read_to_string(&path).ok()?;
        log::debug!("Loaded config from {}", path.display());
        Some(content)
    })
}
