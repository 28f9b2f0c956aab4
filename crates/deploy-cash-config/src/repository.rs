//! Target repository configuration
//!
//! Everything the checklist needs to know about the repository it manages:
//! where it lives, which label marks the tracking issue, who gets assigned
//! and notified, and which pull requests are automation noise.

use crate::DEFAULT_HOST;
use serde::{Deserialize, Serialize};

/// The repository whose staging deploys are tracked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Organization or owner name
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Repository name
    #[serde(default = "default_name")]
    pub name: String,

    /// GitHub host (None = github.com)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Label identifying the staging deploy tracking issue
    #[serde(default = "default_tracking_label")]
    pub tracking_label: String,

    /// Users assigned to a newly created tracking issue
    #[serde(default = "default_assignees")]
    pub assignees: Vec<String>,

    /// Team mentioned at the bottom of the tracking issue (without `@`)
    #[serde(default = "default_notify_team")]
    pub notify_team: String,

    /// Branch holding what is live in production
    #[serde(default = "default_production_branch")]
    pub production_branch: String,

    /// Branch holding the staging candidate
    #[serde(default = "default_staging_branch")]
    pub staging_branch: String,

    /// Account that opens automated pull requests (version bumps etc.)
    #[serde(default = "default_automation_author")]
    pub automation_author: String,

    /// Label carried by automated pull requests
    #[serde(default = "default_automation_label")]
    pub automation_label: String,
}

fn default_owner() -> String {
    "Expensify".to_string()
}

fn default_name() -> String {
    "Expensify.cash".to_string()
}

fn default_tracking_label() -> String {
    "StagingDeployCash".to_string()
}

fn default_assignees() -> Vec<String> {
    vec!["applausebot".to_string()]
}

fn default_notify_team() -> String {
    "Expensify/applauseleads".to_string()
}

fn default_production_branch() -> String {
    "production".to_string()
}

fn default_staging_branch() -> String {
    "staging".to_string()
}

fn default_automation_author() -> String {
    "OSBotify".to_string()
}

fn default_automation_label() -> String {
    "automerge".to_string()
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            name: default_name(),
            host: None,
            tracking_label: default_tracking_label(),
            assignees: default_assignees(),
            notify_team: default_notify_team(),
            production_branch: default_production_branch(),
            staging_branch: default_staging_branch(),
            automation_author: default_automation_author(),
            automation_label: default_automation_label(),
        }
    }
}

impl RepositoryConfig {
    /// Get the effective host (defaults to github.com)
    pub fn effective_host(&self) -> &str {
        self.host
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_HOST)
    }

    /// Host to hand to the API client (None = github.com)
    pub fn api_host(&self) -> Option<&str> {
        Some(self.effective_host()).filter(|h| *h != DEFAULT_HOST)
    }

    /// Get the web URL for this repository
    pub fn web_url(&self) -> String {
        format!(
            "https://{}/{}/{}",
            self.effective_host(),
            self.owner,
            self.name
        )
    }

    /// Compare view between production and staging
    pub fn compare_url(&self) -> String {
        format!(
            "{}/compare/{}...{}",
            self.web_url(),
            self.production_branch,
            self.staging_branch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let repo = RepositoryConfig::default();
        assert_eq!(repo.web_url(), "https://github.com/Expensify/Expensify.cash");
        assert_eq!(
            repo.compare_url(),
            "https://github.com/Expensify/Expensify.cash/compare/production...staging"
        );
        assert_eq!(repo.api_host(), None);
    }

    #[test]
    fn test_enterprise_host() {
        let repo = RepositoryConfig {
            host: Some("ghe.example.com".to_string()),
            ..RepositoryConfig::default()
        };
        assert_eq!(repo.effective_host(), "ghe.example.com");
        assert_eq!(repo.api_host(), Some("ghe.example.com"));
        assert_eq!(
            repo.web_url(),
            "https://ghe.example.com/Expensify/Expensify.cash"
        );
    }

    #[test]
    fn test_explicit_github_com_is_default_host() {
        let repo = RepositoryConfig {
            host: Some(DEFAULT_HOST.to_string()),
            ..RepositoryConfig::default()
        };
        assert_eq!(repo.api_host(), None);

        let empty = RepositoryConfig {
            host: Some(String::new()),
            ..RepositoryConfig::default()
        };
        assert_eq!(empty.effective_host(), DEFAULT_HOST);
    }
}
