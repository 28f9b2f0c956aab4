//! GitHub API data transfer objects
//!
//! These types represent the data exchanged with the GitHub API,
//! independent of octocrab's models.

use serde::{Deserialize, Serialize};

/// An issue from the GitHub API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number (e.g., 29)
    pub number: u64,

    /// Issue title
    pub title: String,

    /// Issue body; GitHub returns `null` for issues created without one
    pub body: Option<String>,

    /// Label names attached to the issue
    pub labels: Vec<String>,

    /// API URL (`https://api.github.com/repos/<owner>/<repo>/issues/<n>`)
    pub url: String,

    /// Issue URL for opening in browser
    pub html_url: String,

    /// Whether the issues endpoint returned a pull request
    ///
    /// GitHub lists pull requests alongside issues; callers that only
    /// care about real issues filter on this.
    #[serde(default)]
    pub is_pull_request: bool,
}

/// A git tag from the GitHub API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name (e.g., "1.0.1-47")
    pub name: String,
}

/// A pull request from the GitHub API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 123)
    pub number: u64,

    /// PR title
    pub title: String,

    /// Author's GitHub username
    pub author: String,

    /// Label names attached to the PR
    pub labels: Vec<String>,

    /// PR URL for opening in browser
    pub html_url: String,
}

impl PullRequest {
    /// Whether the PR carries a label with the given name
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label == name)
    }
}

/// Request payload for creating an issue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssue {
    /// Issue title
    pub title: String,

    /// Issue body (markdown)
    pub body: String,

    /// Labels to apply on creation
    pub labels: Vec<String>,

    /// Users to assign on creation
    pub assignees: Vec<String>,
}

/// Request payload for updating an existing issue
///
/// Only the fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueUpdate {
    /// Replacement title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Replacement body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl IssueUpdate {
    /// An update that only replaces the body
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: Some(body.into()),
        }
    }
}
