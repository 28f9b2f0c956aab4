//! GitHub client trait
//!
//! This module defines the `GitHubClient` trait: the minimal surface the
//! staging deploy checklist needs from the hosting service. The core never
//! performs raw HTTP; it only calls these operations.

use crate::types::{Issue, IssueUpdate, NewIssue, PullRequest, Tag};
use async_trait::async_trait;

/// GitHub API client trait
///
/// Implementations can be direct (hitting the API) or test doubles.
/// Retry, timeouts and rate limiting belong to the implementation, never
/// to callers of this trait.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{GitHubClient, Issue};
///
/// async fn tracking_issues(client: &dyn GitHubClient) -> anyhow::Result<Vec<Issue>> {
///     client
///         .list_open_issues_by_label("Expensify", "Expensify.cash", "StagingDeployCash")
///         .await
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// List open issues carrying a label
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner (user or organization)
    /// * `repo` - Repository name
    /// * `label` - Label name the issues must carry
    ///
    /// # Returns
    ///
    /// Every open issue with the label. GitHub's issue listing includes
    /// pull requests; those are returned with `is_pull_request` set.
    async fn list_open_issues_by_label(
        &self,
        owner: &str,
        repo: &str,
        label: &str,
    ) -> anyhow::Result<Vec<Issue>>;

    /// Create an issue
    ///
    /// # Returns
    ///
    /// The issue as created by GitHub.
    async fn create_issue(&self, owner: &str, repo: &str, issue: &NewIssue)
        -> anyhow::Result<Issue>;

    /// Update an existing issue
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `issue_number` - Issue number
    /// * `update` - Fields to replace
    ///
    /// # Returns
    ///
    /// The issue after the update.
    async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        update: &IssueUpdate,
    ) -> anyhow::Result<Issue>;

    /// List the repository's tags
    async fn list_tags(&self, owner: &str, repo: &str) -> anyhow::Result<Vec<Tag>>;

    /// List the repository's most recent pull requests, in any state
    async fn list_pull_requests(&self, owner: &str, repo: &str)
        -> anyhow::Result<Vec<PullRequest>>;
}
