//! Application configuration
//!
//! Configuration loaded from .deploy-cash.toml file.

use crate::repository::RepositoryConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration loaded from .deploy-cash.toml
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Repository whose staging deploys are tracked
    #[serde(default)]
    pub repository: RepositoryConfig,
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Load config from an explicit path
    ///
    /// Unlike [`AppConfig::load`], a missing or invalid file is an error:
    /// the caller asked for this file specifically.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::info!("Loaded app config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.repository.owner, "Expensify");
        assert_eq!(config.repository.name, "Expensify.cash");
        assert_eq!(config.repository.tracking_label, "StagingDeployCash");
        assert_eq!(config.repository.assignees, vec!["applausebot"]);
        assert_eq!(config.repository.notify_team, "Expensify/applauseleads");
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [repository]
            owner = "acme"
            name = "rocket"
            assignees = ["alice", "bob"]
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository.owner, "acme");
        assert_eq!(config.repository.name, "rocket");
        assert_eq!(config.repository.assignees, vec!["alice", "bob"]);
        // Unset fields use defaults
        assert_eq!(config.repository.tracking_label, "StagingDeployCash");
        assert_eq!(config.repository.staging_branch, "staging");
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_from_file_missing_is_error() {
        let missing = std::env::temp_dir().join("deploy-cash-definitely-missing.toml");
        assert!(AppConfig::from_file(&missing).is_err());
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!(
            "deploy-cash-config-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[repository]\ntracking_label = \"Release\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.repository.tracking_label, "Release");

        std::fs::remove_file(&path).unwrap();
    }
}
